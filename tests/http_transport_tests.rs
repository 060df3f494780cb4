// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reqwest transport against a local stub server.

#![cfg(feature = "http")]

mod common;

use cfgresolve::adapters::HttpTransport;
use cfgresolve::domain::{ConfigError, ErrorKind, ResolveInputs, RetryPolicy};
use cfgresolve::ports::{ConfigTransport, FetchRequest, TransportFailure};
use cfgresolve::prelude::{ConfigurationResolver, Resolver};
use common::basic_app_body;
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves canned responses, one connection each, and hands back the raw
/// request heads.
async fn serve(responses: Vec<(&str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let responses: Vec<(String, String)> = responses
        .into_iter()
        .map(|(status, body)| (status.to_string(), body))
        .collect();

    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for (status_line, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buffer = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                head.extend_from_slice(&buffer[..read]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            heads.push(String::from_utf8_lossy(&head).into_owned());
        }
        heads
    });

    (address, handle)
}

async fn serve_once(status_line: &str, body: String) -> (String, JoinHandle<Vec<String>>) {
    serve(vec![(status_line, body)]).await
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

/// An address nothing listens on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_resolves_over_http() {
    let (address, server) = serve_once("200 OK", basic_app_body()).await;
    let inputs = ResolveInputs::new(&address, "basic-app", "development")
        .with_credentials("reader", "s3cret");

    let state = Resolver::http().unwrap().resolve(&inputs).await.unwrap();
    let head = server.await.unwrap().remove(0);

    assert!(head.starts_with("GET /basic-app/development HTTP/1.1"));
    assert_eq!(header(&head, "authorization"), Some("Basic cmVhZGVyOnMzY3JldA=="));
    assert_eq!(header(&head, "accept"), Some("application/json"));
    assert!(header(&head, "user-agent").unwrap().starts_with("cfgresolve/"));
    assert_eq!(state.properties.len(), 6);
}

#[tokio::test]
async fn test_no_authorization_without_credentials() {
    let (address, server) = serve_once("200 OK", basic_app_body()).await;
    let inputs = ResolveInputs::new(&address, "basic-app", "development");

    Resolver::http().unwrap().resolve(&inputs).await.unwrap();
    let head = server.await.unwrap().remove(0);

    assert_eq!(header(&head, "authorization"), None);
}

#[tokio::test]
async fn test_non_success_status_is_returned_not_failed() {
    let (address, server) = serve_once("404 Not Found", String::new()).await;
    let transport = HttpTransport::new().unwrap();
    let request = FetchRequest {
        url: format!("{}/orders/prod", address).parse().unwrap(),
        credentials: None,
        timeout: Duration::from_secs(5),
    };

    let response = transport.execute(&request).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = [0u8; 1024];
        socket.read(&mut buffer).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    let transport = HttpTransport::new().unwrap();
    let request = FetchRequest {
        url: format!("{}/orders/prod", address).parse().unwrap(),
        credentials: None,
        timeout: Duration::from_secs(5),
    };

    let response = transport.execute(&request).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status, 500);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_unavailable_server_is_retried_then_exhausted() {
    let (address, server) = serve(vec![
        ("503 Service Unavailable", String::new()),
        ("503 Service Unavailable", String::new()),
    ])
    .await;
    let inputs = ResolveInputs::new(&address, "orders", "prod")
        .with_retry(RetryPolicy::new(2, 1, 1.0));

    let error = Resolver::http().unwrap().resolve(&inputs).await.unwrap_err();
    assert_eq!(server.await.unwrap().len(), 2);

    match error {
        ConfigError::RetryExhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert_eq!(last.kind(), ErrorKind::ServiceUnavailable);
        }
        other => panic!("expected RetryExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
    });

    let transport = HttpTransport::new().unwrap();
    let request = FetchRequest {
        url: format!("{}/orders/prod", address).parse().unwrap(),
        credentials: None,
        timeout: Duration::from_millis(100),
    };

    let failure = transport.execute(&request).await.unwrap_err();
    server.abort();

    assert_eq!(failure, TransportFailure::Timeout);
}

#[tokio::test]
async fn test_connection_errors_are_redacted() {
    let address = closed_port().await;
    let inputs = ResolveInputs::new(
        format!("http://deployer:hunter2@{}", address),
        "orders",
        "prod",
    )
    .with_retry(RetryPolicy::no_retry());

    let error = Resolver::http().unwrap().resolve(&inputs).await.unwrap_err();

    let mut rendered = format!("{} | {:?}", error, error);
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    assert!(!rendered.contains("deployer"), "{}", rendered);
    assert!(!rendered.contains("hunter2"), "{}", rendered);
    assert!(rendered.contains("***:***"));
    assert!(matches!(
        error,
        ConfigError::RetryExhausted { ref last, .. } if last.kind() == ErrorKind::Network
    ));
}
