use std::time::Duration;

use magnetbit::service::{
    ConversionService, ConvertError, HttpConversionService, ResultKind, ServiceOptions,
};
use pretty_assertions::assert_eq;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};
use url::Url;

/// Answers a single HTTP request with `response` and reports the request
/// line it received.
async fn serve_once(response: String) -> (Url, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            if n == 0 {
                break;
            }
            read += n;
        }
        let request = String::from_utf8_lossy(&buf[..read]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    (Url::parse(&format!("http://{addr}/")).unwrap(), rx)
}

fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\nContent-Length: {}\r\n", body.len());
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("Connection: close\r\n\r\n");
    out.push_str(body);
    out
}

fn service(url: Url) -> HttpConversionService {
    service_with_timeout(url, Duration::from_secs(5))
}

fn service_with_timeout(url: Url, timeout: Duration) -> HttpConversionService {
    HttpConversionService::new(ServiceOptions {
        service_url: url,
        timeout: Some(timeout),
        torrent_link_template: "https://host/{info_hash}.torrent?title={name}".to_string(),
        placeholder_delay: Duration::ZERO,
    })
    .unwrap()
}

#[tokio::test]
async fn magnet_header_and_json_details() {
    let body = r#"{"torrentData":{"name":"foo","files":[{"path":"a"}],"announce":["udp://t"]}}"#;
    let (url, request) = serve_once(response(
        "200 OK",
        &[
            ("magnetURI", "magnet:?xt=urn:btih:ABC123"),
            ("Content-Type", "application/json"),
        ],
        body,
    ))
    .await;

    let result = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap();

    assert_eq!(
        request.await.unwrap(),
        "GET /https%3A%2F%2Fexample.com%2Ffile.torrent HTTP/1.1"
    );
    assert_eq!(result.kind, ResultKind::MagnetUri);
    assert_eq!(result.value, "magnet:?xt=urn:btih:ABC123");
    let meta = result.metadata.unwrap();
    assert_eq!(meta.name.as_deref(), Some("foo"));
    assert_eq!(meta.file_count, Some(1));
    assert_eq!(meta.tracker_count, Some(1));
}

#[tokio::test]
async fn non_json_body_is_ignored() {
    let (url, _request) = serve_once(response(
        "200 OK",
        &[
            ("magnetURI", "magnet:?xt=urn:btih:ABC123"),
            ("Content-Type", "text/plain"),
        ],
        "ok",
    ))
    .await;
    let result = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap();
    assert_eq!(result.metadata, None);
}

#[tokio::test]
async fn broken_json_is_swallowed() {
    let (url, _request) = serve_once(response(
        "200 OK",
        &[
            ("magnetURI", "magnet:?xt=urn:btih:ABC123"),
            ("Content-Type", "application/json"),
        ],
        "{not json",
    ))
    .await;
    let result = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap();
    assert_eq!(result.value, "magnet:?xt=urn:btih:ABC123");
    assert_eq!(result.metadata, None);
}

#[tokio::test]
async fn server_error_carries_status() {
    let (url, _request) = serve_once(response("500 Internal Server Error", &[], "boom")).await;
    let err = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Server(500)));
    assert_eq!(err.to_string(), "Server error: 500");
}

#[tokio::test]
async fn success_without_header_is_missing_result() {
    let (url, _request) = serve_once(response("200 OK", &[], "")).await;
    let err = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::MissingResult));
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    let err = service(url)
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Request(_)));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // accept and hold the connection without answering
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    let url = Url::parse(&format!("http://{addr}/")).unwrap();

    let err = service_with_timeout(url, Duration::from_millis(200))
        .torrent_to_magnet("https://example.com/file.torrent")
        .await
        .unwrap_err();
    match err {
        ConvertError::Request(inner) => assert!(inner.is_timeout(), "{inner}"),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn magnet_to_torrent_never_calls_the_server() {
    // nothing listens here
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    let result = service(url)
        .magnet_to_torrent(
            "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=My+File",
        )
        .await
        .unwrap();
    assert_eq!(result.kind, ResultKind::TorrentLink);
    assert_eq!(
        result.value,
        "https://host/0123456789ABCDEF0123456789ABCDEF01234567.torrent?title=My+File"
    );
}
