//! Raster reader backed by the `image` crate.
//!
//! Accepts any format the crate was built with (PNG, BMP, JPEG, TIFF),
//! converts to 8-bit gray or RGB and resamples to the stimulus resolution.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::hex_bridge::common::error::{Result, TranscodeError};
use crate::hex_bridge::raster::reader::RasterReader;
use crate::hex_bridge::raster::types::{ChannelLayout, Dimensions, Raster};

pub struct ImageCrateReader;

impl RasterReader for ImageCrateReader {
    /// Decodes `data` and resizes it to `target` with a triangle (bilinear)
    /// filter when the sizes differ.
    ///
    /// Channel conversion happens before resampling, so a gray stimulus is
    /// filtered on luma values.
    fn read_raster(&self, data: &[u8], target: Dimensions, layout: ChannelLayout) -> Result<Raster> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| TranscodeError::DecodeError(e.to_string()))?;

        debug!("Decoded image: {}x{}", decoded.width(), decoded.height());

        let converted = match layout {
            ChannelLayout::Gray => DynamicImage::ImageLuma8(decoded.to_luma8()),
            ChannelLayout::Rgb => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        };

        let (width, height) = (target.width as u32, target.height as u32);
        let resized = if converted.width() != width || converted.height() != height {
            debug!("Resizing to {}x{}", width, height);
            converted.resize_exact(width, height, FilterType::Triangle)
        } else {
            converted
        };

        let raw = match layout {
            ChannelLayout::Gray => resized.into_luma8().into_raw(),
            ChannelLayout::Rgb => resized.into_rgb8().into_raw(),
        };
        Raster::new(target, layout, raw)
    }
}
