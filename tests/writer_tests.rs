//! Behaviour of `NotificationLogWriter` through the public API.

use std::error::Error as _;
use std::sync::Arc;
use std::thread;

use pushover_logger::test_utils::RecordingClient;
use pushover_logger::{
    ApiError, DeliveryOptions, INVALID_RECIPIENT, LogEntry, MAX_MESSAGE_CHARS,
    MessageOnlyFormatter, NotificationLogWriter, PriorityTier, Recipient, Severity,
    SeverityPriorityMap, SharedFormatter, WriterError,
};
use rstest::{fixture, rstest};

#[fixture]
fn client() -> RecordingClient {
    RecordingClient::new()
}

fn writer(client: &RecordingClient) -> NotificationLogWriter<RecordingClient> {
    NotificationLogWriter::new(client.clone(), Recipient::new("user-key"))
        .expect("recipient accepted")
        .with_formatter(SharedFormatter::new(MessageOnlyFormatter))
}

#[rstest]
fn rejected_recipient_fails_construction() {
    let client = RecordingClient::new().rejecting_recipients(ApiError::new("user invalid", 400));
    let err = NotificationLogWriter::new(client.clone(), Recipient::new("nobody")).unwrap_err();
    assert!(matches!(err, WriterError::InvalidConfiguration(ref m) if m == INVALID_RECIPIENT));
    assert_eq!(client.verified().len(), 1);
    assert_eq!(client.send_attempts(), 0);
}

#[rstest]
#[case(Severity::Emergency, PriorityTier::Emergency)]
#[case(Severity::Alert, PriorityTier::Emergency)]
#[case(Severity::Critical, PriorityTier::High)]
#[case(Severity::Error, PriorityTier::High)]
#[case(Severity::Warning, PriorityTier::Normal)]
#[case(Severity::Notice, PriorityTier::Low)]
#[case(Severity::Informational, PriorityTier::Low)]
#[case(Severity::Debug, PriorityTier::Lowest)]
fn default_map_selects_tier(
    client: RecordingClient,
    #[case] severity: Severity,
    #[case] tier: PriorityTier,
) {
    writer(&client)
        .write(&LogEntry::new("app", severity, "event"))
        .expect("sent");
    assert_eq!(client.sent()[0].priority.tier(), tier);
}

#[rstest]
fn one_write_is_one_send(client: RecordingClient) {
    let writer = writer(&client);
    for i in 0..3 {
        writer
            .write(&LogEntry::new("app", Severity::Error, &format!("event {i}")))
            .expect("sent");
    }
    let bodies: Vec<_> = client.sent().into_iter().map(|m| m.body).collect();
    assert_eq!(bodies, ["event 0", "event 1", "event 2"]);
}

#[rstest]
fn long_bodies_are_truncated(client: RecordingClient) {
    let text = "é".repeat(MAX_MESSAGE_CHARS + 100);
    writer(&client)
        .write(&LogEntry::new("app", Severity::Error, &text))
        .expect("sent");
    let sent = client.sent();
    assert_eq!(sent[0].body.chars().count(), MAX_MESSAGE_CHARS);
    assert!(text.starts_with(&sent[0].body));
}

#[rstest]
fn retry_and_expire_only_reach_emergency(client: RecordingClient) {
    let writer = writer(&client);
    writer.set_options(DeliveryOptions::new().with_retry(30).with_expire(300));
    writer
        .write(&LogEntry::new("app", Severity::Emergency, "down"))
        .expect("sent");
    writer
        .write(&LogEntry::new("app", Severity::Error, "degraded"))
        .expect("sent");

    let sent = client.sent();
    assert_eq!(sent[0].priority.retry(), Some(30));
    assert_eq!(sent[0].priority.expire(), Some(300));
    assert_eq!(sent[1].priority.retry(), None);
    assert_eq!(sent[1].priority.expire(), None);
}

#[rstest]
fn options_are_replaced_not_merged(client: RecordingClient) {
    let writer = writer(&client);
    writer
        .set_options(DeliveryOptions::new().with_title("first").with_url("https://a"))
        .set_options(DeliveryOptions::new().with_title("second"));
    writer
        .write(&LogEntry::new("app", Severity::Error, "x"))
        .expect("sent");
    let sent = client.sent();
    assert_eq!(sent[0].title.as_deref(), Some("second"));
    assert_eq!(sent[0].url, None);
}

#[rstest]
fn custom_map_replaces_default(client: RecordingClient) {
    let writer = writer(&client);
    writer.set_severity_priority_map(SeverityPriorityMap::new([(
        Severity::Warning,
        PriorityTier::Emergency,
    )]));
    writer
        .write(&LogEntry::new("app", Severity::Warning, "x"))
        .expect("sent");
    assert_eq!(client.sent()[0].priority.tier(), PriorityTier::Emergency);

    let err = writer
        .write(&LogEntry::new("app", Severity::Error, "y"))
        .unwrap_err();
    assert!(err.is_invalid_configuration());
    assert_eq!(client.send_attempts(), 1);
}

#[rstest]
fn delivery_failure_preserves_provider_error(client: RecordingClient) {
    let writer = writer(&client);
    client.fail_sends_with(ApiError::new("message is too long", 400));
    let err = writer
        .write(&LogEntry::new("app", Severity::Error, "x"))
        .unwrap_err();
    assert!(err.is_delivery_failure());
    assert_eq!(err.to_string(), "message is too long");
    assert_eq!(err.code(), Some(400));
    assert!(err.source().is_some());
    assert_eq!(client.send_attempts(), 1);

    client.succeed_sends();
    let receipt = writer
        .write(&LogEntry::new("app", Severity::Error, "again"))
        .expect("sent after recovery");
    assert_eq!(receipt, 1);
}

#[rstest]
fn rejected_sound_is_a_delivery_failure() {
    let client = RecordingClient::new().rejecting_sounds(ApiError::new("sound is invalid", 400));
    let writer = writer(&client);
    writer.set_options(DeliveryOptions::new().with_sound("siren"));
    let err = writer
        .write(&LogEntry::new("app", Severity::Error, "x"))
        .unwrap_err();
    assert!(err.is_delivery_failure());
    assert_eq!(client.send_attempts(), 0);
}

#[rstest]
fn concurrent_writes_see_whole_option_sets(client: RecordingClient) {
    let writer = Arc::new(writer(&client));
    let a = DeliveryOptions::new().with_title("a").with_url("https://a");
    let b = DeliveryOptions::new().with_title("b").with_url("https://b");
    writer.set_options(a.clone());

    let setter = {
        let writer = Arc::clone(&writer);
        thread::spawn(move || {
            for i in 0..200 {
                writer.set_options(if i % 2 == 0 { b.clone() } else { a.clone() });
            }
        })
    };
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for _ in 0..50 {
                    writer
                        .write(&LogEntry::new("app", Severity::Error, "x"))
                        .expect("sent");
                }
            })
        })
        .collect();
    setter.join().expect("setter thread");
    for handle in writers {
        handle.join().expect("writer thread");
    }

    let sent = client.sent();
    assert_eq!(sent.len(), 200);
    for message in sent {
        let title = message.title.expect("title set");
        let url = message.url.expect("url set");
        assert_eq!(url, format!("https://{title}"));
    }
}
