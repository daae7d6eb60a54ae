//! INI configuration for a Pushover-backed writer.
//!
//! ```ini
//! [pushover]
//! token = azGDORePK8gMaC0QOYAMyEEuzJnyUi
//! user = uQiRzpo4DXghDmr9QzzfQu27cmVRsG
//! device = pixel
//!
//! [options]
//! title = prod
//! sound = siren
//! retry = 60
//!
//! [levels]
//! 0 = emergency
//! warning = high
//! ```
//!
//! `[levels]` keys are severity codes or names. When present the section
//! replaces the default severity map entirely.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::DateTime;
use encoding_rs::{Encoding, UTF_8};
use ini::{Ini, Properties};
use thiserror::Error;

use crate::client::Recipient;
use crate::level::Severity;
use crate::options::DeliveryOptions;
use crate::priority::{PriorityTier, SeverityPriorityMap};
use crate::pushover::PushoverConfig;

const PUSHOVER_SECTION: &str = "pushover";
const OPTIONS_SECTION: &str = "options";
const LEVELS_SECTION: &str = "levels";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} doesn't exist")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is an empty file")]
    Empty(String),
    #[error("unknown encoding {0}")]
    UnknownEncoding(String),
    #[error("{path} is not valid {encoding}")]
    Decode { path: String, encoding: &'static str },
    #[error("invalid INI: {0}")]
    Syntax(String),
    #[error("missing [{section}] {key}")]
    Missing {
        section: &'static str,
        key: &'static str,
    },
    #[error("[{section}] {key} = {value:?} is invalid: {reason}")]
    InvalidValue {
        section: &'static str,
        key: String,
        value: String,
        reason: String,
    },
    #[error("unknown key {key:?} in [{section}]")]
    UnknownKey { section: &'static str, key: String },
}

/// Everything needed to build a [`crate::PushoverClient`] and its writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushoverSettings {
    pub client: PushoverConfig,
    pub recipient: Recipient,
    pub options: DeliveryOptions,
    /// Severity map from `[levels]`, or `None` to keep the default.
    pub levels: Option<SeverityPriorityMap>,
}

/// Load settings from a UTF-8 file.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn load(path: impl AsRef<Path>) -> Result<PushoverSettings, ConfigError> {
    load_with_encoding(path, None)
}

/// Load settings from a file in the encoding named by `encoding`, which
/// takes WHATWG labels such as `latin1` or `windows-1252`.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn load_with_encoding(
    path: impl AsRef<Path>,
    encoding: Option<&str>,
) -> Result<PushoverSettings, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(display.clone()),
        _ => ConfigError::Io {
            path: display.clone(),
            source: err,
        },
    })?;
    if bytes.is_empty() {
        return Err(ConfigError::Empty(display));
    }
    let text = decode_contents(&display, &bytes, encoding)?;
    parse(&text)
}

fn decode_contents(path: &str, bytes: &[u8], label: Option<&str>) -> Result<String, ConfigError> {
    let encoding = match label {
        Some(label) => {
            let normalized = label.trim().to_ascii_lowercase();
            Encoding::for_label(normalized.as_bytes())
                .ok_or_else(|| ConfigError::UnknownEncoding(label.to_owned()))?
        }
        None => UTF_8,
    };
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConfigError::Decode {
            path: path.to_owned(),
            encoding: encoding.name(),
        });
    }
    Ok(decoded.into_owned())
}

/// Parse settings from INI text.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn parse(text: &str) -> Result<PushoverSettings, ConfigError> {
    let ini = Ini::load_from_str(text).map_err(|err| ConfigError::Syntax(err.to_string()))?;
    let empty = Properties::new();
    let pushover = ini.section(Some(PUSHOVER_SECTION)).unwrap_or(&empty);

    let token = required(pushover, "token")?;
    let user = required(pushover, "user")?;
    let mut recipient = Recipient::new(user);
    if let Some(device) = non_empty(pushover.get("device")) {
        recipient = recipient.with_device(device);
    }

    let mut client = PushoverConfig::new(token);
    if let Some(base) = non_empty(pushover.get("api_base")) {
        client = client.with_api_base(base);
    }
    if let Some(secs) = parsed::<u64>(pushover, PUSHOVER_SECTION, "connect_timeout")? {
        client = client.with_connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = parsed::<u64>(pushover, PUSHOVER_SECTION, "timeout")? {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let options = match ini.section(Some(OPTIONS_SECTION)) {
        Some(props) => parse_options(props)?,
        None => DeliveryOptions::default(),
    };
    let levels = ini
        .section(Some(LEVELS_SECTION))
        .map(parse_levels)
        .transpose()?;

    Ok(PushoverSettings {
        client,
        recipient,
        options,
        levels,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(props: &'a Properties, key: &'static str) -> Result<&'a str, ConfigError> {
    non_empty(props.get(key)).ok_or(ConfigError::Missing {
        section: PUSHOVER_SECTION,
        key,
    })
}

fn invalid(section: &'static str, key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        section,
        key: key.to_owned(),
        value: value.to_owned(),
        reason: reason.to_string(),
    }
}

fn parsed<T>(props: &Properties, section: &'static str, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    non_empty(props.get(key))
        .map(|value| value.parse().map_err(|err| invalid(section, key, value, err)))
        .transpose()
}

/// Accept either Unix seconds or an RFC 3339 date-time.
fn parse_timestamp(value: &str) -> Result<i64, ConfigError> {
    if let Ok(secs) = value.parse::<i64>() {
        return Ok(secs);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|err| invalid(OPTIONS_SECTION, "timestamp", value, err))
}

fn parse_options(props: &Properties) -> Result<DeliveryOptions, ConfigError> {
    let mut options = DeliveryOptions::default();
    for (key, value) in props.iter() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key {
            "retry" => options.retry = parsed(props, OPTIONS_SECTION, key)?,
            "expire" => options.expire = parsed(props, OPTIONS_SECTION, key)?,
            "title" => options.title = Some(value.to_owned()),
            "url" => options.url = Some(value.to_owned()),
            "url-title" | "url_title" => options.url_title = Some(value.to_owned()),
            "timestamp" => options.timestamp = Some(parse_timestamp(value)?),
            "sound" => options.sound = Some(value.to_owned()),
            other => {
                return Err(ConfigError::UnknownKey {
                    section: OPTIONS_SECTION,
                    key: other.to_owned(),
                });
            }
        }
    }
    Ok(options)
}

fn parse_severity_key(key: &str) -> Result<Severity, ConfigError> {
    match key.parse::<u8>() {
        Ok(code) => Severity::from_code(code).ok_or_else(|| {
            invalid(
                LEVELS_SECTION,
                key,
                key,
                format!("severity code {code} is outside 0..=7"),
            )
        }),
        Err(_) => key
            .parse::<Severity>()
            .map_err(|err| invalid(LEVELS_SECTION, key, key, err)),
    }
}

fn parse_levels(props: &Properties) -> Result<SeverityPriorityMap, ConfigError> {
    let pairs = props
        .iter()
        .map(|(key, value)| {
            let severity = parse_severity_key(key.trim())?;
            let tier = value
                .trim()
                .parse::<PriorityTier>()
                .map_err(|err| invalid(LEVELS_SECTION, key, value, err))?;
            Ok((severity, tier))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(SeverityPriorityMap::new(pairs))
}
