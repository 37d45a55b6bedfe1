//! HTTP client tests against a one-shot local server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use route_verifier::error::ClientError;
use route_verifier::route::{Costing, RouteQuery, RouteRequest};
use route_verifier::traits::RouteProvider;
use route_verifier::valhalla::{ValhallaClient, ValhallaConfig};
use serde_json::value::RawValue;

struct Captured {
    request_line: String,
    body: String,
}

/// Serves exactly one request with `status` and `body`, handing back what it
/// received.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/route", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut raw = vec![0; content_length];
        reader.read_exact(&mut raw).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();

        tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(raw).unwrap(),
        })
        .unwrap();
    });

    (url, rx)
}

fn request() -> RouteRequest {
    let query = RouteQuery {
        origin: (10.814736, 106.71283),
        destination: (10.85404, 106.661329),
        depart_at: "2023-10-19T21:26".to_string(),
        costing: Costing::Motorcycle,
    };
    let costing = RawValue::from_string(r#"{"use_highways":0.3}"#.to_string()).unwrap();
    RouteRequest::for_query(&query, &costing)
}

fn client(url: String, timeout_secs: u64) -> ValhallaClient {
    ValhallaClient::new(ValhallaConfig { url, timeout_secs }).expect("build client")
}

#[test]
fn test_posts_request_and_returns_body() {
    let (url, rx) = serve_once("200 OK", r#"{"trip":{"legs":[]}}"#);

    let body = client(url, 5).route(&request()).unwrap();
    assert_eq!(body, r#"{"trip":{"legs":[]}}"#);

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "POST /route HTTP/1.1");

    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["costing"], "motorcycle");
    assert_eq!(sent["costing_options"]["motorcycle"]["use_highways"], 0.3);
    assert_eq!(sent["date_time"]["type"], 1);
    assert_eq!(sent["locations"].as_array().unwrap().len(), 2);
}

#[test]
fn test_non_success_status_keeps_body() {
    let (url, _rx) = serve_once(
        "400 Bad Request",
        r#"{"error_code":171,"error":"No suitable edges near location"}"#,
    );

    match client(url, 5).route(&request()) {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("No suitable edges"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[test]
fn test_connection_refused_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/route", listener.local_addr().unwrap());
    drop(listener);

    assert!(matches!(
        client(url, 5).route(&request()),
        Err(ClientError::Request(_))
    ));
}

#[test]
fn test_slow_service_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/route", listener.local_addr().unwrap());
    thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(5));
    });

    match client(url, 1).route(&request()) {
        Err(ClientError::Request(err)) => assert!(err.is_timeout(), "{}", err),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[test]
fn test_default_config_uses_bounded_timeout() {
    let config = ValhallaConfig::default();
    assert_eq!(config.timeout_secs, 30);
    assert!(config.url.ends_with("/route"));
}
