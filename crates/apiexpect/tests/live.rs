//! Requests over a real socket with [`HttpClient`].

use std::net::SocketAddr;
use std::sync::Arc;

use apiexpect::{Config, Expect, HttpClient, RecordingReporter, StatusRange};
use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Starts a minimal HTTP/1.1 server serving `/foo` and `/bar`.
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(serve(stream));
        }
    });

    addr
}

async fn serve(mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default();
    let path = request_line.next().unwrap_or_default();

    let response = match (method, path) {
        (_, "/foo") => json_response(r#"{"foo":123}"#),
        ("GET", "/bar") => json_response("[true, false]"),
        ("PUT", "/bar") => "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string(),
        _ => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    };

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn json_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// A client that ignores proxy settings from the environment.
fn direct_client() -> HttpClient {
    HttpClient::from_reqwest(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn expect_with(reporter: &Arc<RecordingReporter>, base_url: String) -> Expect {
    Expect::with_config(
        Config::new(reporter.clone())
            .with_base_url(base_url)
            .with_client(direct_client()),
    )
}

#[tokio::test]
async fn test_live_server() {
    let addr = spawn_server().await;
    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, format!("http://{addr}"));

    e.get("/foo")
        .expect()
        .await
        .status(StatusCode::OK)
        .json()
        .object()
        .value_equal("foo", &123);

    e.get("/bar")
        .expect()
        .await
        .status_range(StatusRange::Success)
        .json()
        .array()
        .elements([true, false]);

    e.put("/bar")
        .expect()
        .await
        .status(StatusCode::NO_CONTENT)
        .body()
        .empty();

    let mut response = e.get("/foo").expect().await;
    response.duration().ge(0);
    response.header("Content-Length").equal("11");

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
}

#[tokio::test]
async fn test_live_server_repeated() {
    let addr = spawn_server().await;
    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, format!("http://{addr}/"));

    for _ in 0..50 {
        e.get("foo")
            .expect()
            .await
            .status(StatusCode::OK)
            .json()
            .object()
            .value_equal("foo", &123);
    }

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
}

#[tokio::test]
async fn test_connection_refused_fails_chain() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, format!("http://{addr}"));

    let mut response = e.get("/foo").expect().await;
    response.status(StatusCode::OK).json().object().value_equal("foo", &123);

    assert!(response.is_failed());
    assert_eq!(reporter.count(), 1);
    assert!(reporter.failures()[0].starts_with("failed to send GET"));
}
