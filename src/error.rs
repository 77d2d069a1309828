use thiserror::Error;

/// Rejected before any data is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}: unrecognized checksum (expected adler32, rabinkarp32, buzhash32 or buzhash64)")]
    UnsupportedAlgorithm(String),

    #[error("invalid byte size {input:?}: {reason}")]
    InvalidSize { input: String, reason: &'static str },

    #[error("window size must be at least 1 byte")]
    InvalidWindow,

    #[error("buffer of {buffer} bytes cannot hold a {window}-byte window")]
    BufferTooSmall { buffer: usize, window: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashError {
    #[error("window must be exactly {expected} bytes, got {actual}")]
    InvalidWindowSize { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The source ran dry; `filled` leading bytes of the buffer are valid.
    #[error("input exhausted after {filled} bytes of the current buffer")]
    EndOfSource { filled: usize },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),
}
