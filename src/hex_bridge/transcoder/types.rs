//! Transcoder configuration and report types

use std::path::PathBuf;

use crate::hex_bridge::common::error::{Result, TranscodeError};
use crate::hex_bridge::common::timing::PipelineTimings;
use crate::hex_bridge::coefficients::TapFormat;
use crate::hex_bridge::fixed_point::BitWidth;
use crate::hex_bridge::pixel::PixelMode;
use crate::hex_bridge::raster::Dimensions;

/// Container format for reconstructed and reference images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Tiff,
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Settings shared with the hardware testbench. Resolution and record
/// layout are not stored in the hex files, so both sides must agree on them.
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// Image used as stimulus by [`encode_source_file`](crate::hex_bridge::ImageHexTranscoder::encode_source_file)
    pub source_image_path: Option<PathBuf>,
    /// Stimulus width, before upscaling
    pub target_width: usize,
    /// Stimulus height, before upscaling
    pub target_height: usize,
    pub pixel_mode: PixelMode,
    /// Signed width of the coefficient registers, sign bit included
    pub fixed_point_bit_width: u32,
    /// Tap quantization and record width for the coefficient table. When
    /// unset, taps use the full-width format of `fixed_point_bit_width`.
    pub tap_format: Option<TapFormat>,
    /// Upscale factor applied by the hardware; also the number of filter phases
    pub scale_factor: usize,
    pub image_format: ImageFormat,
    /// Only used when `image_format` is TIFF
    pub compression: TiffCompression,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            source_image_path: None,
            target_width: 128,
            target_height: 72,
            pixel_mode: PixelMode::Gray8,
            fixed_point_bit_width: 9,
            tap_format: None,
            scale_factor: 3,
            image_format: ImageFormat::Png,
            compression: TiffCompression::None,
        }
    }
}

impl TranscodeConfig {
    pub fn builder() -> TranscodeConfigBuilder {
        TranscodeConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(TranscodeError::InvalidDimensions(self.target_width, self.target_height));
        }
        if self.scale_factor == 0 {
            return Err(TranscodeError::InvalidConfig("scale factor must be at least 1".to_string()));
        }
        let channels = self.pixel_mode.channels();
        let fits = self
            .target_width
            .checked_mul(self.target_height)
            .and_then(|pixels| pixels.checked_mul(channels))
            .and_then(|bytes| bytes.checked_mul(self.scale_factor))
            .and_then(|bytes| bytes.checked_mul(self.scale_factor))
            .is_some();
        if !fits {
            return Err(TranscodeError::InvalidDimensions(self.target_width, self.target_height));
        }
        let width = self.bit_width()?;
        if let Some(format) = self.tap_format {
            TapFormat::new(format.frac_bits, format.record_bits)
                .map_err(|e| TranscodeError::InvalidConfig(e.to_string()))?;
            if format.record_bits != width.get() {
                return Err(TranscodeError::InvalidConfig(format!(
                    "tap records are {} bits but fixed point width is {}",
                    format.record_bits,
                    width.get()
                )));
            }
        }
        Ok(())
    }

    pub fn bit_width(&self) -> Result<BitWidth> {
        BitWidth::new(self.fixed_point_bit_width)
            .map_err(|e| TranscodeError::InvalidConfig(e.to_string()))
    }

    pub fn tap_format(&self) -> Result<TapFormat> {
        match self.tap_format {
            Some(format) => Ok(format),
            None => Ok(TapFormat::from_bit_width(self.bit_width()?)),
        }
    }

    /// Resolution of the stimulus stream.
    pub fn input_dimensions(&self) -> Dimensions {
        Dimensions::new(self.target_width, self.target_height)
    }

    /// Resolution of the response stream: the stimulus scaled by `scale_factor`.
    pub fn output_dimensions(&self) -> Dimensions {
        self.input_dimensions().scaled(self.scale_factor)
    }
}

/// Builder for TranscodeConfig
#[derive(Default)]
pub struct TranscodeConfigBuilder {
    source_image_path: Option<PathBuf>,
    target_width: Option<usize>,
    target_height: Option<usize>,
    pixel_mode: Option<PixelMode>,
    fixed_point_bit_width: Option<u32>,
    tap_format: Option<TapFormat>,
    scale_factor: Option<usize>,
    image_format: Option<ImageFormat>,
    compression: Option<TiffCompression>,
}

impl TranscodeConfigBuilder {
    pub fn source_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_image_path = Some(path.into());
        self
    }

    pub fn target_size(mut self, width: usize, height: usize) -> Self {
        self.target_width = Some(width);
        self.target_height = Some(height);
        self
    }

    pub fn pixel_mode(mut self, mode: PixelMode) -> Self {
        self.pixel_mode = Some(mode);
        self
    }

    pub fn fixed_point_bit_width(mut self, bits: u32) -> Self {
        self.fixed_point_bit_width = Some(bits);
        self
    }

    /// Sets the tap format and the matching register width.
    pub fn tap_format(mut self, format: TapFormat) -> Self {
        self.tap_format = Some(format);
        self.fixed_point_bit_width = Some(format.record_bits);
        self
    }

    pub fn scale_factor(mut self, factor: usize) -> Self {
        self.scale_factor = Some(factor);
        self
    }

    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> TranscodeConfig {
        let default = TranscodeConfig::default();
        TranscodeConfig {
            source_image_path: self.source_image_path.or(default.source_image_path),
            target_width: self.target_width.unwrap_or(default.target_width),
            target_height: self.target_height.unwrap_or(default.target_height),
            pixel_mode: self.pixel_mode.unwrap_or(default.pixel_mode),
            fixed_point_bit_width: self.fixed_point_bit_width.unwrap_or(default.fixed_point_bit_width),
            tap_format: self.tap_format,
            scale_factor: self.scale_factor.unwrap_or(default.scale_factor),
            image_format: self.image_format.unwrap_or(default.image_format),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

/// Outcome of one encode run.
#[derive(Debug, Clone)]
pub struct EncodeReport {
    pub dimensions: Dimensions,
    pub mode: PixelMode,
    /// Lines written; `pixel_count * records_per_pixel`
    pub records: usize,
    pub timings: PipelineTimings,
}

/// How a preview decode forced the token count to fit the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReshapeAdjustment {
    #[default]
    None,
    /// Records past the end of the raster were ignored.
    Truncated { dropped: usize },
    /// The stream was short by `added` records; missing pixels are black.
    Padded { added: usize },
}

/// Outcome of one decode run.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub dimensions: Dimensions,
    pub mode: PixelMode,
    /// Non-blank lines read from the stream
    pub tokens: usize,
    /// Records with non-hex content that were decoded as black
    pub substitutions: usize,
    pub adjustment: ReshapeAdjustment,
    pub timings: PipelineTimings,
}
