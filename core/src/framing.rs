//! Response framing: header block, identity bodies and chunked bodies.
//!
//! # Design
//! The header block and the body share one byte stream, so the connection is
//! wrapped in a single `BufRead` cursor before the first read. `read_head`
//! takes that cursor by value and hands it back once the blank line has been
//! consumed; the body decoders continue from exactly where it stopped, with
//! any bytes it had already buffered still in place.
//!
//! Neither decoder looks at `Content-Length`. The request always asks for
//! `Connection: close`, so an identity body ends when the peer closes and a
//! chunked body ends at its zero-size chunk. Trailer fields after that chunk
//! are left unread.

use std::io::{self, BufRead, Read, Write};

use crate::error::FetchError;

const IDENTITY_BUF_SIZE: usize = 4096;
const MAX_CHUNK_PREALLOC: usize = 64 * 1024;
/// Compared against the start of each header line ignoring ASCII case, so
/// servers that send lowercase field names are still detected.
const CHUNKED_MARKER: &[u8] = b"transfer-encoding: chunked";

/// The raw response header block, status line and blank line included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    raw: Vec<u8>,
    chunked: bool,
}

impl ResponseHead {
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    pub fn framing(&self) -> BodyFraming {
        if self.chunked {
            BodyFraming::Chunked
        } else {
            BodyFraming::Identity
        }
    }
}

/// How the body following a header block is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// Raw bytes until the peer closes the connection.
    Identity,
    /// `Transfer-Encoding: chunked`.
    Chunked,
}

impl BodyFraming {
    /// Decode the body from `stream` into `sink`, returning the number of
    /// decoded bytes written.
    pub fn decode<R: BufRead, W: Write>(self, stream: &mut R, sink: &mut W) -> Result<u64, FetchError> {
        match self {
            BodyFraming::Identity => copy_identity(stream, sink),
            BodyFraming::Chunked => decode_chunked(stream, sink),
        }
    }
}

/// Read the header block line by line up to and including the blank line.
///
/// Returns the block together with the cursor, positioned on the first body
/// byte. End of stream before the blank line is an error; a block that is
/// only the blank line is not.
pub fn read_head<R: BufRead>(mut stream: R) -> Result<(ResponseHead, R), FetchError> {
    let mut raw = Vec::new();
    let mut chunked = false;
    loop {
        let start = raw.len();
        let n = stream
            .read_until(b'\n', &mut raw)
            .map_err(FetchError::HeadRead)?;
        let line = &raw[start..];
        if n == 0 || line.last() != Some(&b'\n') {
            return Err(FetchError::UnterminatedHead);
        }
        if line == b"\r\n" {
            break;
        }
        if is_chunked_marker(line) {
            chunked = true;
        }
    }
    tracing::debug!(bytes = raw.len(), chunked, "response head read");
    Ok((ResponseHead { raw, chunked }, stream))
}

fn is_chunked_marker(line: &[u8]) -> bool {
    line.len() >= CHUNKED_MARKER.len()
        && line[..CHUNKED_MARKER.len()].eq_ignore_ascii_case(CHUNKED_MARKER)
}

/// Copy bytes from `stream` to `sink` until end of stream.
///
/// A read error ends the copy; whatever was written stays written and the
/// error carries the count.
pub fn copy_identity<R: Read, W: Write>(stream: &mut R, sink: &mut W) -> Result<u64, FetchError> {
    let mut buf = [0u8; IDENTITY_BUF_SIZE];
    let mut written = 0u64;
    loop {
        match stream.read(&mut buf) {
            Ok(0) => return Ok(written),
            Ok(n) => {
                sink.write_all(&buf[..n]).map_err(FetchError::Sink)?;
                written += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                tracing::warn!(written, error = %source, "body read failed");
                return Err(FetchError::BodyRead { written, source });
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    ReadSize,
    ReadData(u64),
    ReadTrailer,
    Done,
}

/// Decode a chunked body from `stream` into `sink`.
///
/// Each chunk is written once it has been read in full. Decoding stops at a
/// zero-size chunk or at an empty size line.
pub fn decode_chunked<R: BufRead, W: Write>(stream: &mut R, sink: &mut W) -> Result<u64, FetchError> {
    let mut state = ChunkState::ReadSize;
    let mut line = Vec::new();
    let mut written = 0u64;
    loop {
        state = match state {
            ChunkState::ReadSize => match read_chunk_size(stream, &mut line)? {
                Some(size) => ChunkState::ReadData(size),
                None => ChunkState::Done,
            },
            ChunkState::ReadData(size) => {
                let chunk = read_chunk(stream, size)?;
                sink.write_all(&chunk).map_err(FetchError::Sink)?;
                written += size;
                ChunkState::ReadTrailer
            }
            ChunkState::ReadTrailer => {
                let mut crlf = [0u8; 2];
                stream
                    .read_exact(&mut crlf)
                    .map_err(FetchError::MissingChunkTerminator)?;
                ChunkState::ReadSize
            }
            ChunkState::Done => {
                tracing::debug!(bytes = written, "chunked body decoded");
                return Ok(written);
            }
        };
    }
}

/// `None` means the body is finished.
fn read_chunk_size<R: BufRead>(stream: &mut R, line: &mut Vec<u8>) -> Result<Option<u64>, FetchError> {
    line.clear();
    let n = stream.read_until(b'\n', line).map_err(FetchError::ChunkRead)?;
    if n == 0 || line.last() != Some(&b'\n') {
        return Err(FetchError::ChunkRead(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stream ended inside chunk size line",
        )));
    }
    let text = String::from_utf8_lossy(line.as_slice());
    let size_line = text.trim();
    if size_line.is_empty() {
        return Ok(None);
    }
    let size = u64::from_str_radix(size_line, 16).map_err(|_| FetchError::InvalidChunkSize {
        line: size_line.to_string(),
    })?;
    tracing::trace!(size, "chunk");
    Ok((size != 0).then_some(size))
}

fn read_chunk<R: Read>(stream: &mut R, size: u64) -> Result<Vec<u8>, FetchError> {
    let expected = usize::try_from(size).map_err(|_| FetchError::ChunkTooLarge(size))?;
    let mut chunk = Vec::with_capacity(expected.min(MAX_CHUNK_PREALLOC));
    stream
        .by_ref()
        .take(size)
        .read_to_end(&mut chunk)
        .map_err(FetchError::ChunkRead)?;
    if chunk.len() < expected {
        return Err(FetchError::ShortChunk {
            expected: size,
            received: chunk.len() as u64,
        });
    }
    Ok(chunk)
}
