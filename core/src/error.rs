//! Error types for the tinyhttp client.
//!
//! # Design
//! One enum covers setup, transport and framing failures so every layer can
//! propagate with `?`. Framing variants are split finely (size line, chunk
//! data, chunk terminator) because each corresponds to a different way a
//! peer can violate chunked encoding, and tests assert on the exact kind.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by request building, response framing and sink setup.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL yielded no host.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Dialing `host:port` failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write request: {0}")]
    WriteRequest(#[source] io::Error),

    /// A read inside the header block failed.
    #[error("failed to read response head: {0}")]
    HeadRead(#[source] io::Error),

    /// The stream ended before the blank line closing the header block.
    #[error("connection closed before end of response head")]
    UnterminatedHead,

    /// A chunk-size line was not a base-16 unsigned integer.
    #[error("invalid chunk size line {line:?}")]
    InvalidChunkSize { line: String },

    /// The declared chunk length cannot be addressed on this platform.
    #[error("chunk size {0:#x} too large")]
    ChunkTooLarge(u64),

    /// A transport error while reading a chunk-size line or chunk data,
    /// including end of stream on a size line.
    #[error("failed to read chunk: {0}")]
    ChunkRead(#[source] io::Error),

    /// The stream ended inside a chunk's data.
    #[error("short chunk: expected {expected} bytes, received {received}")]
    ShortChunk { expected: u64, received: u64 },

    /// The two bytes following chunk data could not be read.
    #[error("missing chunk terminator: {0}")]
    MissingChunkTerminator(#[source] io::Error),

    /// A non-EOF read error ended an identity-mode body. `written` bytes
    /// already reached the sink.
    #[error("body read failed after {written} bytes: {source}")]
    BodyRead {
        written: u64,
        #[source]
        source: io::Error,
    },

    /// Writing to or flushing the output sink failed.
    #[error("failed to write output: {0}")]
    Sink(#[source] io::Error),

    #[error("output file name is empty")]
    EmptyOutputPath,

    #[error("failed to create output file {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// True for errors raised while decoding the response framing, as
    /// opposed to setup, request or sink failures.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            FetchError::UnterminatedHead
                | FetchError::InvalidChunkSize { .. }
                | FetchError::ChunkTooLarge(_)
                | FetchError::ChunkRead(_)
                | FetchError::ShortChunk { .. }
                | FetchError::MissingChunkTerminator(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_line() {
        let err = FetchError::InvalidChunkSize {
            line: "zz".to_string(),
        };
        assert_eq!(err.to_string(), "invalid chunk size line \"zz\"");
    }

    #[test]
    fn short_chunk_display_reports_counts() {
        let err = FetchError::ShortChunk {
            expected: 10,
            received: 4,
        };
        assert_eq!(
            err.to_string(),
            "short chunk: expected 10 bytes, received 4"
        );
    }

    #[test]
    fn framing_classification() {
        assert!(FetchError::UnterminatedHead.is_framing());
        assert!(FetchError::ShortChunk {
            expected: 1,
            received: 0
        }
        .is_framing());
        assert!(!FetchError::EmptyOutputPath.is_framing());
        assert!(!FetchError::Sink(io::Error::other("disk full")).is_framing());
    }
}
