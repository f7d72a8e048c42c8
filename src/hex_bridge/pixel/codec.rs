use crate::hex_bridge::common::error::CodecError;
use crate::hex_bridge::common::record::{HexRecord, format_hex, is_hex};
use crate::hex_bridge::pixel::types::{Decoded, Pixel, PixelMode};

pub struct PixelRecordCodec;

impl PixelRecordCodec {
    /// Two uppercase digits, zero-padded.
    pub fn encode_channel(value: u8) -> HexRecord {
        format_hex(value as u64, 8)
    }

    /// Encodes a pixel as the single record of a [`PixelMode::Gray8`] or
    /// [`PixelMode::Rgb24Packed`] stream.
    ///
    /// ```
    /// use bicubic_hex_rs::hex_bridge::{Pixel, PixelMode, PixelRecordCodec};
    ///
    /// let record = PixelRecordCodec::encode(Pixel::Rgb([0x12, 0x34, 0x56]), PixelMode::Rgb24Packed).unwrap();
    /// assert_eq!(record.as_str(), "123456");
    /// ```
    pub fn encode(pixel: Pixel, mode: PixelMode) -> Result<HexRecord, CodecError> {
        match (mode, pixel) {
            (PixelMode::Gray8, Pixel::Gray(value)) => Ok(Self::encode_channel(value)),
            (PixelMode::Rgb24Packed, Pixel::Rgb([r, g, b])) => {
                let packed = ((r as u64) << 16) | ((g as u64) << 8) | b as u64;
                Ok(format_hex(packed, 24))
            }
            (PixelMode::Rgb24Planar, _) => Err(CodecError::SplitRecord(mode)),
            _ => Err(CodecError::ChannelMismatch {
                mode,
                channels: pixel.channels().len(),
            }),
        }
    }

    /// Appends every record of `pixel` to `out`, for any mode.
    pub fn encode_into(pixel: Pixel, mode: PixelMode, out: &mut Vec<HexRecord>) -> Result<(), CodecError> {
        match (mode, pixel) {
            (PixelMode::Rgb24Planar, Pixel::Rgb(rgb)) => {
                out.extend(rgb.into_iter().map(Self::encode_channel));
                Ok(())
            }
            (PixelMode::Rgb24Planar, Pixel::Gray(_)) => Err(CodecError::ChannelMismatch {
                mode,
                channels: 1,
            }),
            _ => {
                out.push(Self::encode(pixel, mode)?);
                Ok(())
            }
        }
    }

    /// Decodes the single record of a [`PixelMode::Gray8`] or
    /// [`PixelMode::Rgb24Packed`] pixel.
    ///
    /// Fails only when the digit count is wrong for `mode`. A record of the
    /// right length with non-hex characters, such as `xx`, decodes to the
    /// zero pixel with `substituted` set.
    pub fn decode(token: &str, mode: PixelMode) -> Result<Decoded, CodecError> {
        if mode == PixelMode::Rgb24Planar {
            return Err(CodecError::SplitRecord(mode));
        }

        let Some(value) = parse_record(token, mode.record_digits())? else {
            return Ok(Decoded {
                pixel: Pixel::zero(mode),
                substituted: true,
            });
        };

        let pixel = match mode {
            PixelMode::Gray8 => Pixel::Gray(value as u8),
            _ => Pixel::Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8]),
        };
        Ok(Decoded {
            pixel,
            substituted: false,
        })
    }

    /// Decodes one channel record. `None` marks a substituted (non-hex) record.
    pub fn decode_channel(token: &str) -> Result<Option<u8>, CodecError> {
        Ok(parse_record(token, 2)?.map(|value| value as u8))
    }

    /// Decodes the three R, G, B records of a [`PixelMode::Rgb24Planar`] pixel.
    ///
    /// An unreadable channel blacks out the whole pixel so it stays
    /// distinguishable in the reconstructed image.
    pub fn decode_planar(tokens: [&str; 3]) -> Result<Decoded, CodecError> {
        let mut rgb = [0u8; 3];
        let mut substituted = false;
        for (channel, token) in rgb.iter_mut().zip(tokens) {
            match Self::decode_channel(token)? {
                Some(value) => *channel = value,
                None => substituted = true,
            }
        }
        if substituted {
            rgb = [0; 3];
        }
        Ok(Decoded {
            pixel: Pixel::Rgb(rgb),
            substituted,
        })
    }
}

/// Length-checks `token` and parses it. `Ok(None)` when it is not clean hex.
fn parse_record(token: &str, digits: usize) -> Result<Option<u32>, CodecError> {
    let token = token.trim();
    if token.len() != digits {
        return Err(CodecError::InvalidLength {
            token: token.to_string(),
            expected: digits,
            actual: token.len(),
        });
    }
    if !is_hex(token) {
        return Ok(None);
    }
    Ok(u32::from_str_radix(token, 16).ok())
}
