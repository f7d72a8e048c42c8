//! Raster data types

use crate::hex_bridge::common::error::{Result, TranscodeError};
use crate::hex_bridge::pixel::types::Pixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Both sides multiplied by `factor`: the output of a ×factor upscale.
    pub fn scaled(&self, factor: usize) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Gray,
    Rgb,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

/// Row-major 8-bit pixel grid, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    dimensions: Dimensions,
    layout: ChannelLayout,
    /// Interleaved channels: `[v, v, ...]` or `[R, G, B, R, G, B, ...]`.
    data: Vec<u8>,
}

impl Raster {
    pub fn new(dimensions: Dimensions, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(TranscodeError::InvalidDimensions(dimensions.width, dimensions.height));
        }
        let expected = dimensions.pixel_count() * layout.channels();
        if data.len() != expected {
            return Err(TranscodeError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dimensions, layout, data })
    }

    /// Builds a raster from row-major pixels, which must all share one layout.
    pub fn from_pixels(dimensions: Dimensions, pixels: &[Pixel]) -> Result<Self> {
        let layout = match pixels.first() {
            Some(Pixel::Rgb(_)) => ChannelLayout::Rgb,
            _ => ChannelLayout::Gray,
        };
        let expected = pixels.len() * layout.channels();
        let actual = pixels.iter().map(|p| p.channels().len()).sum::<usize>();
        if pixels.iter().any(|p| p.channels().len() != layout.channels()) {
            return Err(TranscodeError::BufferSize { expected, actual });
        }
        let data = pixels.iter().flat_map(|p| p.channels().iter().copied()).collect();
        Self::new(dimensions, layout, data)
    }

    /// Diagonal ramp, `(x + y) % 255` on every channel, used as stimulus
    /// when no source image is at hand.
    pub fn gradient(dimensions: Dimensions, layout: ChannelLayout) -> Result<Self> {
        let channels = layout.channels();
        let data = (0..dimensions.height)
            .flat_map(|y| (0..dimensions.width).map(move |x| ((x + y) % 255) as u8))
            .flat_map(|value| std::iter::repeat_n(value, channels))
            .collect();
        Self::new(dimensions, layout, data)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        let channels = self.layout.channels();
        let start = (y * self.dimensions.width + x) * channels;
        Some(to_pixel(&self.data[start..start + channels]))
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data.chunks_exact(self.layout.channels()).map(to_pixel)
    }

    /// Nearest-neighbour enlargement by `factor` on both axes.
    pub fn upscale_nearest(&self, factor: usize) -> Result<Self> {
        let target = self.dimensions.scaled(factor);
        let channels = self.layout.channels();
        let mut data = Vec::with_capacity(target.pixel_count() * channels);
        for y in 0..target.height {
            let row = y / factor;
            for x in 0..target.width {
                let start = (row * self.dimensions.width + x / factor) * channels;
                data.extend_from_slice(&self.data[start..start + channels]);
            }
        }
        Self::new(target, self.layout, data)
    }
}

fn to_pixel(channels: &[u8]) -> Pixel {
    match *channels {
        [r, g, b] => Pixel::Rgb([r, g, b]),
        [value, ..] => Pixel::Gray(value),
        [] => Pixel::Gray(0),
    }
}
