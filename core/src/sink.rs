//! Output sinks: stdout or a file.

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::Path;

use crate::error::FetchError;
use crate::types::GetOptions;

/// Where decoded output goes. Anything implementing `Write` can be passed to
/// the client directly; this type covers the two targets the command line
/// offers.
#[derive(Debug)]
pub enum OutputSink {
    Console(Stdout),
    File(File),
}

impl OutputSink {
    pub fn console() -> Self {
        OutputSink::Console(io::stdout())
    }

    /// Create (or truncate) `path`.
    pub fn create_file(path: &Path) -> Result<Self, FetchError> {
        if path.as_os_str().is_empty() {
            return Err(FetchError::EmptyOutputPath);
        }
        let file = File::create(path).map_err(|source| FetchError::OutputFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(OutputSink::File(file))
    }

    /// The file named in `options`, or stdout when none is set.
    pub fn from_options(options: &GetOptions) -> Result<Self, FetchError> {
        match &options.output_file {
            Some(path) => Self::create_file(path),
            None => Ok(Self::console()),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Console(out) => out.write(buf),
            OutputSink::File(file) => file.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            OutputSink::Console(out) => out.write_all(buf),
            OutputSink::File(file) => file.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Console(out) => out.flush(),
            OutputSink::File(file) => file.flush(),
        }
    }
}
