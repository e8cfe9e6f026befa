//! End-to-end GETs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then fetches each route with
//! `http_get` over real TCP. Bodies are cross-checked against ureq so the
//! hand-written framing agrees with an independent HTTP implementation.

use std::net::SocketAddr;

use tinyhttp_core::{http_get, GetOptions, OutputSink};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn fetch(addr: SocketAddr, path: &str, options: &GetOptions) -> Vec<u8> {
    let mut out = Vec::new();
    http_get(&format!("http://{addr}{path}"), options, &mut out).expect("http_get failed");
    out
}

fn ureq_body(addr: SocketAddr, path: &str) -> Vec<u8> {
    ureq::get(&format!("http://{addr}{path}"))
        .call()
        .expect("ureq transport error")
        .body_mut()
        .read_to_vec()
        .unwrap()
}

fn with_headers(headers: &[&str]) -> GetOptions {
    GetOptions {
        custom_headers: headers.iter().map(|h| h.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn content_length_body() {
    let addr = start_server();
    let out = fetch(addr, "/", &GetOptions::default());
    assert_eq!(out, b"Hello, world!");
    assert_eq!(out, ureq_body(addr, "/"));
}

#[test]
fn chunked_body() {
    let addr = start_server();
    let mut out = Vec::new();
    let summary = http_get(
        &format!("http://{addr}/chunked"),
        &GetOptions::default(),
        &mut out,
    )
    .unwrap();
    assert!(summary.chunked, "mock server should stream /chunked");
    assert_eq!(out, b"Hello, world!");
    assert_eq!(summary.body_bytes, Some(13));
}

#[test]
fn large_chunked_body_matches_ureq() {
    let addr = start_server();
    let out = fetch(addr, "/large", &GetOptions::default());
    assert_eq!(out, mock_server::large_parts().concat());
    assert_eq!(out, ureq_body(addr, "/large"));
}

#[test]
fn show_headers_then_body() {
    let addr = start_server();
    let options = GetOptions {
        show_headers: true,
        ..Default::default()
    };
    let out = String::from_utf8(fetch(addr, "/chunked", &options)).unwrap();
    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"), "{out:?}");
    let (head, body) = out.split_once("\r\n\r\n").unwrap();
    assert!(head.to_ascii_lowercase().contains("transfer-encoding: chunked"));
    assert_eq!(body, "Hello, world!");
}

#[test]
fn headers_only_has_no_body() {
    let addr = start_server();
    let options = GetOptions {
        show_only_headers: true,
        ..Default::default()
    };
    let out = String::from_utf8(fetch(addr, "/", &options)).unwrap();
    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(out.ends_with("\r\n\r\n"));
    assert!(!out.contains("Hello, world!"));
}

#[test]
fn accept_header_selects_representation() {
    let addr = start_server();
    let out = fetch(addr, "/negotiate", &with_headers(&["Accept: text/plain"]));
    assert_eq!(out, mock_server::GREETING.as_bytes());

    let out = fetch(addr, "/negotiate", &with_headers(&["Accept: application/xml"]));
    assert_eq!(out, mock_server::GREETING_XML.as_bytes());
}

#[test]
fn multiple_custom_headers_reach_the_server() {
    let addr = start_server();
    let options = with_headers(&["Authorization: Basic XXXXX", "Custom-Auth: SecretToken"]);
    let out = fetch(addr, "/auth", &options);
    assert_eq!(out, mock_server::AUTH_OK.as_bytes());
}

#[test]
fn request_headers_as_seen_by_server() {
    let addr = start_server();
    let out = fetch(addr, "/headers", &with_headers(&["X-Trace: abc"]));
    let echoed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(echoed["host"], "127.0.0.1");
    assert_eq!(echoed["x-trace"], "abc");
}

#[test]
fn error_status_body_is_still_delivered() {
    let addr = start_server();
    let options = GetOptions {
        show_headers: true,
        ..Default::default()
    };
    let out = String::from_utf8(fetch(addr, "/auth", &options)).unwrap();
    assert!(out.starts_with("HTTP/1.1 403 Forbidden\r\n"), "{out:?}");
    assert!(out.ends_with("\r\n\r\nForbidden"));
}

#[test]
fn output_to_file() {
    let addr = start_server();
    let path = std::env::temp_dir().join(format!("tinyhttp-it-{}-body.txt", std::process::id()));
    let options = GetOptions {
        output_file: Some(path.clone()),
        ..Default::default()
    };

    let mut sink = OutputSink::from_options(&options).unwrap();
    http_get(&format!("http://{addr}/"), &options, &mut sink).unwrap();
    drop(sink);

    assert_eq!(std::fs::read(&path).unwrap(), b"Hello, world!");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn headers_only_output_to_file() {
    let addr = start_server();
    let path = std::env::temp_dir().join(format!("tinyhttp-it-{}-head.txt", std::process::id()));
    let options = GetOptions {
        show_only_headers: true,
        output_file: Some(path.clone()),
        ..Default::default()
    };

    let mut sink = OutputSink::from_options(&options).unwrap();
    http_get(&format!("http://{addr}/"), &options, &mut sink).unwrap();
    drop(sink);

    let written = String::from_utf8(std::fs::read(&path).unwrap()).unwrap();
    assert!(written.contains("HTTP/1.1"));
    assert!(!written.contains("Hello, world!"));
    std::fs::remove_file(&path).unwrap();
}
