//! Raster module
//!
//! The in-memory pixel grid plus the reader and writer seams to the
//! general-purpose image codecs.

mod image_reader;
mod reader;
mod standard_writer;
pub mod types;
mod writer;

pub use image_reader::ImageCrateReader;
pub use reader::RasterReader;
pub use standard_writer::StandardRasterWriter;
pub use types::{ChannelLayout, Dimensions, Raster};
pub use writer::RasterWriter;
