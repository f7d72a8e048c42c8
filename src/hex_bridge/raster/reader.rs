use crate::hex_bridge::common::error::Result;
use crate::hex_bridge::raster::types::{ChannelLayout, Dimensions, Raster};

pub trait RasterReader {
    /// Decodes an encoded image file into a raster of exactly `target`
    /// dimensions with the requested channel layout.
    fn read_raster(&self, data: &[u8], target: Dimensions, layout: ChannelLayout) -> Result<Raster>;
}
