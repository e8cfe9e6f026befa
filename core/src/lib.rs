//! Minimal HTTP/1.1 GET client over a raw TCP connection.
//!
//! # Overview
//! Writes a single `GET` with `Connection: close`, reads the response header
//! block off the socket, and streams the body to any `Write` sink, decoding
//! `Transfer-Encoding: chunked` when the server uses it. No HTTP library is
//! involved; the framing lives in [`framing`].
//!
//! # Design
//! - One connection per call, one thread, blocking I/O. Nothing is kept
//!   between calls.
//! - The connection is wrapped in a single buffered cursor that the header
//!   reader hands to the body decoder, so no buffered byte is lost between
//!   the two phases.
//! - The output sink is always an explicit parameter.
//! - The status line is passed through untouched; status codes are never
//!   interpreted.

pub mod client;
pub mod error;
pub mod framing;
pub mod http;
pub mod sink;
pub mod types;

pub use client::{exchange, http_get, FetchSummary};
pub use error::FetchError;
pub use framing::{BodyFraming, ResponseHead};
pub use http::Target;
pub use sink::OutputSink;
pub use types::{DisplayMode, GetOptions};
