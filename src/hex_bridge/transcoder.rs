//! Image ⇄ hex stream transcoding
//!
//! Encode path: raster → pixel records → stimulus file.
//! Decode path: response file → tokens → pixel records → raster → image.

mod hex_stream;
mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::ImageHexTranscoder;
pub use types::{
    DecodeReport,
    EncodeReport,
    ImageFormat,
    ReshapeAdjustment,
    TiffCompression,
    TranscodeConfig,
    TranscodeConfigBuilder,
};
