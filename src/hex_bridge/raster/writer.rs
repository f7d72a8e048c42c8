use std::io::Write;

use crate::hex_bridge::common::error::Result;
use crate::hex_bridge::raster::types::Raster;
use crate::hex_bridge::transcoder::types::TranscodeConfig;

pub trait RasterWriter {
    fn write_raster(&self, raster: &Raster, output: &mut dyn Write, config: &TranscodeConfig) -> Result<()>;
}
