use rawhttp::http::connection::{Connection, ConnectionLimits, message_length};
use rawhttp::routes::dispatcher::Dispatcher;
use rawhttp::routes::router::FileRouter;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn site() -> (TempDir, Arc<Dispatcher>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    let extensions = vec!["html".to_string()];
    let router = FileRouter::scan(dir.path(), &extensions).unwrap();
    (dir, Arc::new(Dispatcher::with_defaults(router)))
}

async fn exchange(
    dispatcher: Arc<Dispatcher>,
    limits: ConnectionLimits,
    chunks: &[&[u8]],
    close_after_write: bool,
) -> String {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, dispatcher, limits);
        conn.run().await
    });

    for chunk in chunks {
        client.write_all(chunk).await.unwrap();
        tokio::task::yield_now().await;
    }
    if close_after_write {
        client.shutdown().await.unwrap();
    }

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    String::from_utf8(out).unwrap()
}

async fn send(dispatcher: Arc<Dispatcher>, raw: &str) -> String {
    exchange(dispatcher, ConnectionLimits::default(), &[raw.as_bytes()], false).await
}

#[tokio::test]
async fn test_get_serves_file_and_closes() {
    let (_dir, dispatcher) = site();
    let response = send(dispatcher, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("content-type: text/html\r\n"));
    assert!(response.contains("content-length: 13\r\n"));
    assert!(response.contains("connection: close\r\n"));
    assert!(response.contains("date: "));
    assert!(response.ends_with("\r\n\r\n<h1>home</h1>"));
}

#[tokio::test]
async fn test_head_has_headers_but_no_body() {
    let (_dir, dispatcher) = site();
    let response = send(dispatcher, "HEAD / HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("content-length: 13\r\n"));
    assert!(response.ends_with("\r\n\r\n"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_dir, dispatcher) = site();
    let response = send(dispatcher, "GET /missing HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(!response.contains("content-type"));
}

#[tokio::test]
async fn test_method_without_handler_is_not_found() {
    let (_dir, dispatcher) = site();
    let response = send(dispatcher, "PUT / HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_unsupported_method() {
    let (_dir, dispatcher) = site();
    let response = send(dispatcher, "PATCH / HTTP/1.1\r\n\r\n").await;

    // No handler for PATCH, so nothing is resolved and 404 wins.
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_post_with_content_length() {
    let (_dir, dispatcher) = site();
    let response = exchange(
        dispatcher,
        ConnectionLimits::default(),
        &[b"POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 5\r\n\r\n", b"hello"],
        false,
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("content-type: text/plain\r\n"));
    assert!(response.ends_with("POST /: received 5 bytes\n"));
}

#[tokio::test]
async fn test_chunked_post_in_pieces() {
    let (_dir, dispatcher) = site();
    let response = exchange(
        dispatcher,
        ConnectionLimits::default(),
        &[
            b"POST / HTTP/1.1\r\nHost: h\r\nTransfer-Encoding: chunked\r\n\r\n",
            b"5\r\nhello\r\n",
            b"6\r\n world\r\n",
            b"0\r\nx-trailer: yes\r\n\r\n",
        ],
        false,
    )
    .await;

    assert!(response.ends_with("POST /: received 11 bytes\n"));
}

#[tokio::test]
async fn test_expect_continue() {
    let (_dir, dispatcher) = site();
    let response = send(
        dispatcher,
        "POST / HTTP/1.1\r\nHost: h\r\nContent-Length: 5\r\nExpect: 100-continue\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 100 Continue\r\n"));
    assert!(response.ends_with("\r\n\r\n"));
}

#[tokio::test]
async fn test_expect_on_http10_waits_for_body() {
    let (_dir, dispatcher) = site();
    let response = exchange(
        dispatcher,
        ConnectionLimits::default(),
        &[
            b"POST / HTTP/1.0\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\nhel",
            b"lo",
        ],
        false,
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("POST /: received 5 bytes\n"));
}

#[tokio::test]
async fn test_peer_close_parses_what_arrived() {
    let (_dir, dispatcher) = site();
    let response = exchange(
        dispatcher,
        ConnectionLimits::default(),
        &[b"GET / HTTP/1.0\r\n"],
        true,
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_peer_close_without_data() {
    let (_dir, dispatcher) = site();
    let response = exchange(dispatcher, ConnectionLimits::default(), &[], true).await;

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_oversized_request_is_bad_request() {
    let (_dir, dispatcher) = site();
    let limits = ConnectionLimits {
        read_timeout: Duration::from_secs(5),
        max_request_bytes: 16,
    };
    let response = exchange(
        dispatcher,
        limits,
        &[b"GET / HTTP/1.1\r\nX-Pad: aaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n"],
        false,
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_stalled_request_times_out() {
    let (_dir, dispatcher) = site();
    let limits = ConnectionLimits {
        read_timeout: Duration::from_millis(50),
        max_request_bytes: 1024,
    };
    let response = exchange(
        dispatcher,
        limits,
        &[b"GET / HTTP/1.1\r\nHost: h\r\n"],
        false,
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_message_length_head_only() {
    let raw = b"GET / HTTP/1.1\r\nHost: h\r\n\r\n";
    assert_eq!(message_length(raw), Some(raw.len()));
    assert_eq!(message_length(b"GET / HTTP/1.1\r\nHost: h\r\n"), None);
}

#[test]
fn test_message_length_content_length() {
    let raw = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel";
    assert_eq!(message_length(raw), None);

    let raw = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
    assert_eq!(message_length(raw), Some(raw.len() - 5));
}

#[test]
fn test_message_length_expect_continue() {
    let head = b"POST / HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\n";
    assert_eq!(message_length(head), Some(head.len()));

    let head = b"POST / HTTP/1.0\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\n";
    assert_eq!(message_length(head), None);

    let partial = b"POST / HTTP/1.0\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\nhel";
    assert_eq!(message_length(partial), None);

    let full = b"POST / HTTP/1.0\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\nhello";
    assert_eq!(message_length(full), Some(full.len()));
}

#[test]
fn test_message_length_chunked() {
    let partial = b"POST / HTTP/1.1\ntransfer-encoding: chunked\n\n3\nabc\n0\n";
    assert_eq!(message_length(partial), None);

    let full = b"POST / HTTP/1.1\ntransfer-encoding: chunked\n\n3\nabc\n0\nx: y\n\n";
    assert_eq!(message_length(full), Some(full.len()));

    // A data line that looks like a terminator is still data.
    let tricky = b"POST / HTTP/1.1\r\ntransfer-encoding: chunked\r\n\r\n1\r\n0\r\n0\r\n\r\n";
    assert_eq!(message_length(tricky), Some(tricky.len()));
}
