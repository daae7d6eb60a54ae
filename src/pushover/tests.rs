//! Tests for the Pushover client against an in-process HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rstest::{fixture, rstest};

use crate::client::{LOCAL_ERROR_CODE, PushClient, Recipient};
use crate::level::Severity;
use crate::log_record::LogEntry;
use crate::options::DeliveryOptions;
use crate::writer::NotificationLogWriter;

use super::{PushoverClient, PushoverConfig};

#[derive(Debug)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn form_value(&self, key: &str) -> Option<&str> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Canned reply for one request.
struct Reply {
    status: u16,
    body: &'static str,
}

const ACCEPTED: Reply = Reply {
    status: 200,
    body: r#"{"status":1,"request":"req-1"}"#,
};

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Parses a single header line into a key-value pair.
fn parse_header_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
}

fn read_http_request(stream: &mut TcpStream) -> CapturedRequest {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let parts: Vec<&str> = request_line.trim().split(' ').collect();
    let method = parts.first().unwrap_or(&"").to_string();
    let path = parts.get(1).unwrap_or(&"").to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = parse_header_line(&line) else {
            continue;
        };
        if key == "content-length" {
            content_length = value.parse().unwrap_or(0);
        }
        headers.push((key, value));
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("read body");
    }

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Serve `replies` in order, one per connection, reporting each request.
fn spawn_mock_server(
    listener: TcpListener,
    replies: Vec<Reply>,
) -> (SocketAddr, mpsc::Receiver<CapturedRequest>) {
    let addr = listener.local_addr().expect("listener has address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let captured = read_http_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                status_text(reply.status),
                reply.body.len(),
                reply.body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(captured);
        }
    });

    (addr, rx)
}

#[fixture]
fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

fn client_for(addr: SocketAddr) -> PushoverClient {
    let config = PushoverConfig::new("app-token")
        .with_api_base(format!("http://{addr}/1/"))
        .with_connect_timeout(Duration::from_secs(5))
        .with_timeout(Duration::from_secs(5));
    PushoverClient::new(config).expect("client")
}

fn next_request(rx: &mpsc::Receiver<CapturedRequest>) -> CapturedRequest {
    rx.recv_timeout(Duration::from_secs(5)).expect("request")
}

#[rstest]
fn verify_recipient_posts_to_validate(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![ACCEPTED]);
    let client = client_for(addr);

    client
        .verify_recipient(&Recipient::new("user-key").with_device("pixel"))
        .expect("valid recipient");

    let captured = next_request(&rx);
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/1/users/validate.json");
    assert_eq!(
        captured.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(captured.body, "token=app-token&user=user-key&device=pixel");
}

#[rstest]
fn invalid_user_is_reported_with_http_status(tcp_listener: TcpListener) {
    let (addr, _rx) = spawn_mock_server(
        tcp_listener,
        vec![Reply {
            status: 400,
            body: r#"{"user":"invalid","errors":["user identifier is not a valid user, group, or subscribed user key"],"status":0,"request":"req-2"}"#,
        }],
    );
    let err = client_for(addr)
        .verify_recipient(&Recipient::new("nobody"))
        .unwrap_err();
    assert_eq!(err.code, 400);
    assert!(err.message.starts_with("user identifier is not a valid user"));
}

#[rstest]
fn send_returns_receipt(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(
        tcp_listener,
        vec![Reply {
            status: 200,
            body: r#"{"status":1,"request":"req-3","receipt":"rcpt-3"}"#,
        }],
    );
    let client = client_for(addr);
    let message = crate::message::OutboundMessage::new(
        Recipient::new("user-key"),
        client.build_priority(crate::priority::PriorityTier::Emergency),
        "db down",
    );

    let receipt = client.send(&message).expect("accepted");
    assert_eq!(receipt.request, "req-3");
    assert_eq!(receipt.receipt.as_deref(), Some("rcpt-3"));

    let captured = next_request(&rx);
    assert_eq!(captured.path, "/1/messages.json");
    assert_eq!(captured.form_value("message"), Some("db+down"));
    assert_eq!(captured.form_value("priority"), Some("2"));
    assert_eq!(captured.form_value("retry"), Some("60"));
    assert_eq!(captured.form_value("expire"), Some("3600"));
}

#[rstest]
fn server_errors_are_not_retried(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(
        tcp_listener,
        vec![
            Reply {
                status: 500,
                body: "oops",
            },
            ACCEPTED,
        ],
    );
    let client = client_for(addr);
    let message = crate::message::OutboundMessage::new(
        Recipient::new("user-key"),
        client.build_priority(crate::priority::PriorityTier::Normal),
        "hello",
    );

    let err = client.send(&message).unwrap_err();
    assert_eq!(err.code, 500);

    let _first = next_request(&rx);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[rstest]
fn connection_refused_is_a_local_error(tcp_listener: TcpListener) {
    let addr = tcp_listener.local_addr().expect("address");
    drop(tcp_listener);
    let err = client_for(addr)
        .verify_recipient(&Recipient::new("user-key"))
        .unwrap_err();
    assert_eq!(err.code, LOCAL_ERROR_CODE);
}

#[rstest]
fn writer_end_to_end(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![ACCEPTED, ACCEPTED]);
    let writer = NotificationLogWriter::new(client_for(addr), Recipient::new("user-key"))
        .expect("recipient accepted");
    writer.set_options(
        DeliveryOptions::new()
            .with_title("prod")
            .with_sound("siren")
            .with_retry(90),
    );

    let receipt = writer
        .write(&LogEntry::new("db", Severity::Warning, "replica lag"))
        .expect("sent");
    assert_eq!(receipt.request, "req-1");

    let _validate = next_request(&rx);
    let send = next_request(&rx);
    assert_eq!(send.form_value("message"), Some("db+%5BWARNING%5D+replica+lag"));
    assert_eq!(send.form_value("priority"), Some("0"));
    assert_eq!(send.form_value("title"), Some("prod"));
    assert_eq!(send.form_value("sound"), Some("siren"));
    assert_eq!(send.form_value("retry"), None);
}
