//! Provider priority tiers and the severity-to-tier translation table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::Severity;

/// Provider-recognised urgency bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Lowest,
    Low,
    Normal,
    High,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority tier: {0}")]
pub struct ParseTierError(pub String);

impl PriorityTier {
    /// Numeric priority sent on the wire (`-2..=2`).
    pub const fn provider_code(self) -> i8 {
        match self {
            Self::Lowest => -2,
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
            Self::Emergency => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest" => Ok(Self::Lowest),
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "emergency" => Ok(Self::Emergency),
            _ => Err(ParseTierError(s.to_owned())),
        }
    }
}

/// Priority attached to an outbound message.
///
/// `retry` and `expire` only exist for [`PriorityTier::Emergency`]; the
/// setters ignore values on every other tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Priority {
    tier: PriorityTier,
    retry: Option<u32>,
    expire: Option<u32>,
}

impl Priority {
    pub fn new(tier: PriorityTier) -> Self {
        Self {
            tier,
            retry: None,
            expire: None,
        }
    }

    pub fn tier(&self) -> PriorityTier {
        self.tier
    }

    /// Seconds between re-alerts of an unacknowledged emergency message.
    pub fn retry(&self) -> Option<u32> {
        self.retry
    }

    /// Seconds after which emergency re-alerts stop.
    pub fn expire(&self) -> Option<u32> {
        self.expire
    }

    pub fn set_retry(&mut self, seconds: u32) -> &mut Self {
        if self.tier == PriorityTier::Emergency {
            self.retry = Some(seconds);
        }
        self
    }

    pub fn set_expire(&mut self, seconds: u32) -> &mut Self {
        if self.tier == PriorityTier::Emergency {
            self.expire = Some(seconds);
        }
        self
    }
}

/// Returned by [`SeverityPriorityMap::from_codes`] for codes above 7.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("severity code {0} is outside 0..=7")]
pub struct SeverityCodeOutOfRange(pub u8);

/// Translation from [`Severity`] to [`PriorityTier`].
///
/// The map is immutable once built; writers replace it wholesale rather than
/// editing entries. It may be partial, in which case a lookup for an unmapped
/// severity returns `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeverityPriorityMap {
    tiers: BTreeMap<Severity, PriorityTier>,
}

impl SeverityPriorityMap {
    /// Build a map from explicit `(severity, tier)` pairs.
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Severity, PriorityTier)>,
    {
        Self {
            tiers: pairs.into_iter().collect(),
        }
    }

    /// Build a map from numeric severity codes.
    pub fn from_codes<I>(pairs: I) -> Result<Self, SeverityCodeOutOfRange>
    where
        I: IntoIterator<Item = (u8, PriorityTier)>,
    {
        let tiers = pairs
            .into_iter()
            .map(|(code, tier)| {
                Severity::from_code(code)
                    .map(|severity| (severity, tier))
                    .ok_or(SeverityCodeOutOfRange(code))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { tiers })
    }

    pub fn get(&self, severity: Severity) -> Option<PriorityTier> {
        self.tiers.get(&severity).copied()
    }

    /// Whether every severity `0..=7` has a tier.
    pub fn is_total(&self) -> bool {
        Severity::ALL.iter().all(|s| self.tiers.contains_key(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Severity, PriorityTier)> + '_ {
        self.tiers.iter().map(|(s, t)| (*s, *t))
    }
}

impl Default for SeverityPriorityMap {
    fn default() -> Self {
        use PriorityTier::*;
        Self::new([
            (Severity::Emergency, Emergency),
            (Severity::Alert, Emergency),
            (Severity::Critical, High),
            (Severity::Error, High),
            (Severity::Warning, Normal),
            (Severity::Notice, Low),
            (Severity::Informational, Low),
            (Severity::Debug, Lowest),
        ])
    }
}
