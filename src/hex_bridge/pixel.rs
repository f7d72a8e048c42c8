//! Pixel record codec
//!
//! Maps single pixels to and from the hex records of a pixel stream.

mod codec;
pub mod types;

pub use codec::PixelRecordCodec;
pub use types::{Decoded, Pixel, PixelMode};
