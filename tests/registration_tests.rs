//! Registration front end integration tests
//!
//! Exercises the real TCP listener and, for the end-to-end scenario, the
//! HTTP redirect server sharing the same store.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use shortkey::config::StaticConfig;
use shortkey::runtime::modes::build_http_server;
use shortkey::storage::{KEY_ALPHABET, UrlStore};
use shortkey::system::registration::{bind_registration_listener, start_registration_server};

// =============================================================================
// Test Setup
// =============================================================================

async fn start_registration(store: Arc<UrlStore>) -> SocketAddr {
    let listener = bind_registration_listener("127.0.0.1:0")
        .await
        .expect("Failed to bind registration listener");
    let addr = listener.local_addr().unwrap();
    start_registration_server(listener, store);
    addr
}

/// Send raw bytes and read the reply until the server closes the connection
async fn send(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");
    stream.write_all(request).await.unwrap();
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    reply
}

fn parse_key(reply: &str) -> String {
    reply
        .strip_prefix("key is ")
        .and_then(|r| r.strip_suffix('\n'))
        .unwrap_or_else(|| panic!("unexpected reply: {:?}", reply))
        .to_string()
}

/// Minimal HTTP/1.1 GET returning (status code, raw response)
async fn http_get(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect failed");
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("malformed status line");
    (status, response)
}

// =============================================================================
// Registration Protocol
// =============================================================================

#[tokio::test]
async fn test_register_valid_url() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    let reply = send(addr, b"https://example.com\n").await;
    let key = parse_key(&reply);

    assert_eq!(key.len(), 6);
    assert!(key.bytes().all(|b| KEY_ALPHABET.contains(&b)));
    assert_eq!(store.resolve(&key).as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn test_register_without_trailing_newline() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"https://example.com/eof").await.unwrap();
    stream.shutdown().await.unwrap();
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();

    let key = parse_key(&reply);
    assert_eq!(store.resolve(&key).as_deref(), Some("https://example.com/eof"));
}

#[tokio::test]
async fn test_empty_input() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    assert_eq!(send(addr, b"\n").await, "Don't send empty spaces!");
    assert_eq!(send(addr, b"    \n").await, "Don't send empty spaces!");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_invalid_url_echoes_input() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    let reply = send(addr, b"not a url\n").await;
    assert_eq!(reply, "Not a valid URL! not a url");
    assert!(reply.contains("not a url"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_bad_escape_is_rejected() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    assert_eq!(send(addr, b"/%zz\n").await, "Not a valid URL! /%zz");
    assert_eq!(
        send(addr, b"https://example.com/%zz\n").await,
        "Not a valid URL! https://example.com/%zz"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_concurrent_clients_get_unique_keys() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            tokio::spawn(async move {
                let url = format!("https://example.com/{}", i);
                let reply = send(addr, format!("{}\n", url).as_bytes()).await;
                (parse_key(&reply), url)
            })
        })
        .collect();

    let mut keys = std::collections::HashSet::new();
    for task in tasks {
        let (key, url) = task.await.unwrap();
        assert!(keys.insert(key.clone()), "duplicate key {}", key);
        assert_eq!(store.resolve(&key), Some(url));
    }
    assert_eq!(store.len(), 50);
}

#[tokio::test]
async fn test_stalled_client_does_not_block_others() {
    let store = Arc::new(UrlStore::default());
    let addr = start_registration(Arc::clone(&store)).await;

    // 一直不发送换行的客户端
    let mut stalled = TcpStream::connect(addr).await.unwrap();
    stalled.write_all(b"https://slow.example").await.unwrap();

    let reply = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        send(addr, b"https://fast.example\n"),
    )
    .await
    .expect("second client was blocked");
    parse_key(&reply);

    drop(stalled);
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_register_then_redirect_over_http() {
    let store = Arc::new(UrlStore::default());
    let registration_addr = start_registration(Arc::clone(&store)).await;

    let mut config = StaticConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.http_port = 0;
    config.server.workers = 1;

    let (server, addrs) = build_http_server(&config, Arc::clone(&store)).unwrap();
    let http_addr = addrs[0];
    let handle = server.handle();
    tokio::spawn(server);

    let key = parse_key(&send(registration_addr, b"https://example.com\n").await);

    let (status, response) = http_get(http_addr, &format!("/{}", key)).await;
    assert_eq!(status, 302);
    assert!(
        response
            .lines()
            .any(|l| l.eq_ignore_ascii_case("location: https://example.com")),
        "missing Location header in {:?}",
        response
    );

    let (status, _) = http_get(http_addr, "/doesnotexist").await;
    assert_eq!(status, 404);

    // 被拒绝的输入不会创建条目
    send(registration_addr, b"not a url\n").await;
    send(registration_addr, b"\n").await;
    assert_eq!(store.len(), 1);

    handle.stop(false).await;
}
