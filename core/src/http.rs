//! Request side of the exchange: URL splitting and the raw GET request.
//!
//! # Design
//! The request is assembled as one `String` and handed to the connection in a
//! single `write_all`, so callers never observe a half-built request on the
//! wire. Custom header lines are copied through untouched; checking their
//! syntax is the caller's business.

use std::io::Write;

use crate::error::FetchError;

const DEFAULT_PORT: &str = "80";

/// Host, port and path extracted from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: String,
    pub path: String,
}

impl Target {
    /// Best-effort split of `scheme://host[:port][/path]`.
    ///
    /// The scheme is optional and ignored. The port defaults to `80` and the
    /// path to `/`. Only an empty host is rejected.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let rest = match url.find("://") {
            Some(idx) => &url[idx + 3..],
            None => url,
        };
        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        let (host, port) = match authority.split_once(':') {
            Some((host, port)) if !port.is_empty() => (host, port),
            Some((host, _)) => (host, DEFAULT_PORT),
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
            path: path.to_string(),
        })
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Assemble the request-line and header block for a GET of `target`.
pub fn build_request(target: &Target, custom_headers: &[String]) -> String {
    let mut request = format!("GET {} HTTP/1.1\r\nHost: {}\r\n", target.path, target.host);
    for header in custom_headers {
        request.push_str(header);
        request.push_str("\r\n");
    }
    request.push_str("Connection: close\r\n\r\n");
    request
}

/// Write the full request to `conn`. No retry on failure.
pub fn write_request<W: Write>(
    conn: &mut W,
    target: &Target,
    custom_headers: &[String],
) -> Result<(), FetchError> {
    let request = build_request(target, custom_headers);
    tracing::debug!(
        path = %target.path,
        custom_headers = custom_headers.len(),
        bytes = request.len(),
        "sending request"
    );
    conn.write_all(request.as_bytes())
        .map_err(FetchError::WriteRequest)
}
