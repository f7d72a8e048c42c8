use std::path::PathBuf;

use thiserror::Error;

use crate::hex_bridge::pixel::PixelMode;

/// Errors raised by the pure codecs. None of these involve I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Hex record '{token}' has {actual} digits, expected {expected}")]
    InvalidLength {
        token: String,
        expected: usize,
        actual: usize,
    },

    #[error("Hex record '{token}' contains non-hex characters")]
    InvalidHex { token: String },

    #[error("Hex record '{token}' does not fit in {bits} bits")]
    OutOfRange { token: String, bits: u32 },

    #[error("Invalid fixed-point bit width: {0} (must be 2-32)")]
    InvalidBitWidth(u32),

    #[error("Coefficient set has {actual} phases, expected {expected}")]
    PhaseCount { expected: usize, actual: usize },

    #[error("Pixel with {channels} channel(s) cannot be encoded as {mode:?}")]
    ChannelMismatch { mode: PixelMode, channels: usize },

    #[error("{0:?} spreads one pixel over several records")]
    SplitRecord(PixelMode),
}

/// Errors raised by the transcoder pipelines.
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Malformed record on line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: CodecError,
    },

    #[error("Incomplete hex stream: expected {expected} records, got {actual}")]
    IncompleteStream { expected: usize, actual: usize },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
