//! One GET, start to finish.
//!
//! # Design
//! `exchange` runs the request/response cycle over any `Read + Write`
//! connection so it can be driven in memory; `http_get` adds URL parsing and
//! the TCP dial. The connection is moved into `exchange` and dropped when it
//! returns, which closes it on every path, early headers-only return and
//! decode errors included.

use std::io::{BufReader, Read, Write};
use std::net::TcpStream;

use crate::error::FetchError;
use crate::framing::read_head;
use crate::http::{write_request, Target};
use crate::types::GetOptions;

/// What a successful exchange delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub chunked: bool,
    /// Length of the raw header block, blank line included.
    pub head_bytes: usize,
    /// Decoded body length; `None` when the body was not read.
    pub body_bytes: Option<u64>,
}

/// Send a GET for `target` over `conn` and stream the reply into `sink`.
pub fn exchange<C, W>(
    mut conn: C,
    target: &Target,
    options: &GetOptions,
    sink: &mut W,
) -> Result<FetchSummary, FetchError>
where
    C: Read + Write,
    W: Write,
{
    write_request(&mut conn, target, &options.custom_headers)?;

    let (head, mut cursor) = read_head(BufReader::new(conn))?;
    let mode = options.display_mode();
    if mode.shows_headers() {
        sink.write_all(head.as_bytes()).map_err(FetchError::Sink)?;
    }

    let decoded = if mode.reads_body() {
        head.framing().decode(&mut cursor, sink).map(Some)
    } else {
        Ok(None)
    };
    let flushed = sink.flush().map_err(FetchError::Sink);
    let body_bytes = decoded?;
    flushed?;

    Ok(FetchSummary {
        chunked: head.is_chunked(),
        head_bytes: head.len(),
        body_bytes,
    })
}

/// Fetch `url` with a single GET and write the response to `sink`.
pub fn http_get<W: Write>(url: &str, options: &GetOptions, sink: &mut W) -> Result<FetchSummary, FetchError> {
    let target = Target::parse(url)?;
    let addr = target.addr();
    let conn = TcpStream::connect(addr.as_str()).map_err(|source| FetchError::Connect {
        addr: addr.clone(),
        source,
    })?;
    tracing::debug!(%addr, "connected");
    exchange(conn, &target, options, sink)
}
