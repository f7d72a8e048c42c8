//! Pixel and record layout types

use crate::hex_bridge::raster::types::ChannelLayout;

/// How pixels are laid out as records in a hex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelMode {
    /// One intensity per record, two hex digits.
    #[default]
    Gray8,
    /// R, G and B concatenated MSB-first into one six-digit record.
    Rgb24Packed,
    /// Three two-digit records per pixel, in R, G, B order.
    Rgb24Planar,
}

impl PixelMode {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24Packed | Self::Rgb24Planar => 3,
        }
    }

    pub fn records_per_pixel(self) -> usize {
        match self {
            Self::Gray8 | Self::Rgb24Packed => 1,
            Self::Rgb24Planar => 3,
        }
    }

    /// Hex digits in each record of this mode.
    pub fn record_digits(self) -> usize {
        match self {
            Self::Gray8 | Self::Rgb24Planar => 2,
            Self::Rgb24Packed => 6,
        }
    }

    pub fn layout(self) -> ChannelLayout {
        match self {
            Self::Gray8 => ChannelLayout::Gray,
            Self::Rgb24Packed | Self::Rgb24Planar => ChannelLayout::Rgb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {
    Gray(u8),
    Rgb([u8; 3]),
}

impl Pixel {
    /// The black pixel of `mode`, substituted for unreadable records.
    pub fn zero(mode: PixelMode) -> Self {
        match mode.layout() {
            ChannelLayout::Gray => Self::Gray(0),
            ChannelLayout::Rgb => Self::Rgb([0; 3]),
        }
    }

    pub fn channels(&self) -> &[u8] {
        match self {
            Self::Gray(value) => std::slice::from_ref(value),
            Self::Rgb(rgb) => rgb,
        }
    }
}

/// Outcome of decoding one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub pixel: Pixel,
    /// The record held non-hex characters (an uninitialised memory cell in
    /// the simulation dump) and was replaced by [`Pixel::zero`].
    pub substituted: bool,
}
