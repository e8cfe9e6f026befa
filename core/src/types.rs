//! Per-request options.
//!
//! # Design
//! `GetOptions` is plain data filled in by the command line layer. It derives
//! serde so test vectors can describe a request's options inline as JSON;
//! every field defaults, so `{}` means "body only, no extra headers, stdout".

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for a single GET.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetOptions {
    /// Print the response header block before the body.
    pub show_headers: bool,
    /// Print the response header block and stop. Takes precedence over
    /// `show_headers`.
    pub show_only_headers: bool,
    /// Literal `Name: Value` lines appended to the request.
    pub custom_headers: Vec<String>,
    /// Write output to this file instead of stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

/// What reaches the sink once the header block has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Body,
    HeadersAndBody,
    HeadersOnly,
}

impl GetOptions {
    pub fn display_mode(&self) -> DisplayMode {
        if self.show_only_headers {
            DisplayMode::HeadersOnly
        } else if self.show_headers {
            DisplayMode::HeadersAndBody
        } else {
            DisplayMode::Body
        }
    }
}

impl DisplayMode {
    pub fn shows_headers(self) -> bool {
        !matches!(self, DisplayMode::Body)
    }

    pub fn reads_body(self) -> bool {
        !matches!(self, DisplayMode::HeadersOnly)
    }
}
