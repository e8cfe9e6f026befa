use std::{collections::BTreeMap, convert::Infallible};

use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use futures_util::stream;
use tokio::net::TcpListener;

pub const GREETING: &str = "Hello, world!";
pub const GREETING_XML: &str = "<greeting>Hello, world!</greeting>";
pub const AUTH_OK: &str = "Authentication successful!";

/// Pieces `/chunked` streams as separate body frames.
pub const GREETING_PARTS: [&str; 4] = ["Hello", ", ", "world", "!"];

/// Frame sizes streamed by `/large`: one byte, one frame over the client's
/// read buffer, one exactly at it, and a small tail.
pub const LARGE_PART_SIZES: [usize; 4] = [1, 5000, 4096, 10];

/// The frames `/large` streams, each filled with its own letter.
pub fn large_parts() -> Vec<Vec<u8>> {
    LARGE_PART_SIZES
        .iter()
        .enumerate()
        .map(|(i, &len)| vec![b'a' + i as u8; len])
        .collect()
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/chunked", get(chunked_greeting))
        .route("/large", get(large))
        .route("/auth", get(auth))
        .route("/negotiate", get(negotiate))
        .route("/headers", get(echo_headers))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Fixed-length body; axum sets `Content-Length`.
async fn greeting() -> &'static str {
    GREETING
}

/// A body without a known length, which hyper sends chunked.
fn streamed(parts: Vec<Bytes>) -> Response {
    let frames = stream::iter(parts.into_iter().map(Ok::<_, Infallible>));
    (
        [(header::CONTENT_TYPE, "text/plain")],
        Body::from_stream(frames),
    )
        .into_response()
}

async fn chunked_greeting() -> Response {
    streamed(
        GREETING_PARTS
            .iter()
            .map(|part| Bytes::from_static(part.as_bytes()))
            .collect(),
    )
}

async fn large() -> Response {
    streamed(large_parts().into_iter().map(Bytes::from).collect())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn auth(headers: HeaderMap) -> (StatusCode, &'static str) {
    let authorized = header_str(&headers, "authorization") == Some("Basic XXXXX")
        && header_str(&headers, "custom-auth") == Some("SecretToken");
    if authorized {
        (StatusCode::OK, AUTH_OK)
    } else {
        (StatusCode::FORBIDDEN, "Forbidden")
    }
}

async fn negotiate(headers: HeaderMap) -> Response {
    match header_str(&headers, "accept") {
        Some("text/plain") => ([(header::CONTENT_TYPE, "text/plain")], GREETING).into_response(),
        Some("application/xml") => {
            ([(header::CONTENT_TYPE, "application/xml")], GREETING_XML).into_response()
        }
        _ => StatusCode::NOT_ACCEPTABLE.into_response(),
    }
}

/// Request headers as a JSON object; repeated names are joined with `, `.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let mut echoed: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        echoed
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.to_string());
    }
    Json(echoed)
}
