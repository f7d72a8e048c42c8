use std::io::Write;

use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::hex_bridge::common::error::{Result, TranscodeError};
use crate::hex_bridge::raster::types::{ChannelLayout, Raster};
use crate::hex_bridge::raster::writer::RasterWriter;
use crate::hex_bridge::transcoder::types::{ImageFormat, TiffCompression, TranscodeConfig};

/// Writes TIFF through the `tiff` crate and PNG through `image`.
pub struct StandardRasterWriter;

impl StandardRasterWriter {
    fn encode_tiff(raster: &Raster, buffer: &mut Vec<u8>, compression: TiffCompression) -> Result<()> {
        use tiff::encoder::{Compression, TiffEncoder, colortype, compression::DeflateLevel};

        let compression = match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(buffer))
            .map_err(|e| TranscodeError::EncodeError(e.to_string()))?
            .with_compression(compression);

        let (width, height) = (raster.width() as u32, raster.height() as u32);
        match raster.layout() {
            ChannelLayout::Gray => encoder.write_image::<colortype::Gray8>(width, height, raster.data()),
            ChannelLayout::Rgb => encoder.write_image::<colortype::RGB8>(width, height, raster.data()),
        }
        .map_err(|e| TranscodeError::EncodeError(e.to_string()))
    }

    fn encode_png(raster: &Raster, buffer: &mut Vec<u8>) -> Result<()> {
        let color = match raster.layout() {
            ChannelLayout::Gray => ExtendedColorType::L8,
            ChannelLayout::Rgb => ExtendedColorType::Rgb8,
        };
        image::codecs::png::PngEncoder::new(buffer)
            .write_image(raster.data(), raster.width() as u32, raster.height() as u32, color)
            .map_err(|e| TranscodeError::EncodeError(e.to_string()))
    }
}

impl RasterWriter for StandardRasterWriter {
    fn write_raster(&self, raster: &Raster, output: &mut dyn Write, config: &TranscodeConfig) -> Result<()> {
        debug!(
            "Encoding {:?} image: {}x{}",
            config.image_format,
            raster.width(),
            raster.height()
        );

        let mut buffer = Vec::new();
        match config.image_format {
            ImageFormat::Tiff => Self::encode_tiff(raster, &mut buffer, config.compression)?,
            ImageFormat::Png => Self::encode_png(raster, &mut buffer)?,
        }

        output.write_all(&buffer)?;

        debug!("Image encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
