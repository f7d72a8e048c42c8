//! Fixed-point coefficient codec
//!
//! Coefficients are stored as signed two's-complement integers scaled by
//! `2^(width - 2)`: one sign bit, one integer bit for the overshoot of cubic
//! kernel taps, and `width - 2` fractional bits.

use crate::hex_bridge::common::error::CodecError;
use crate::hex_bridge::common::record::{HexRecord, format_hex, is_hex};

/// Smallest width that still leaves a sign bit and an integer bit.
pub const MIN_BIT_WIDTH: u32 = 2;

/// Largest width whose codes fit the 32-bit tap registers.
pub const MAX_BIT_WIDTH: u32 = 32;

/// Total signed width of a fixed-point tap, sign bit included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitWidth(u32);

impl BitWidth {
    pub fn new(bits: u32) -> Result<Self, CodecError> {
        if !(MIN_BIT_WIDTH..=MAX_BIT_WIDTH).contains(&bits) {
            return Err(CodecError::InvalidBitWidth(bits));
        }
        Ok(Self(bits))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn frac_bits(self) -> u32 {
        self.0 - 2
    }

    /// Number of hex digits in one record: `ceil(width / 4)`.
    pub fn digits(self) -> usize {
        self.0.div_ceil(4) as usize
    }

    pub fn min_code(self) -> i64 {
        -(1i64 << (self.0 - 1))
    }

    pub fn max_code(self) -> i64 {
        (1i64 << (self.0 - 1)) - 1
    }
}

pub struct FixedPointCodec;

impl FixedPointCodec {
    /// Scales `value` by `2^frac_bits`, rounds half away from zero and
    /// saturates to the signed range of a `frac_bits + 2` wide register.
    ///
    /// NaN quantizes to zero.
    pub fn quantize(value: f64, frac_bits: u32) -> i64 {
        let width = frac_bits + 2;
        let min = -(1i64 << (width - 1));
        let max = (1i64 << (width - 1)) - 1;

        let scaled = (value * (1u64 << frac_bits) as f64).round();
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(min as f64, max as f64) as i64
    }

    /// Renders the low `record_bits` bits of a two's-complement `code`.
    pub fn to_hex(code: i64, record_bits: u32) -> HexRecord {
        format_hex(code as u64, record_bits)
    }

    /// Encodes `value` at `width`. Total: out-of-range input saturates.
    ///
    /// ```
    /// use bicubic_hex_rs::hex_bridge::{BitWidth, FixedPointCodec};
    ///
    /// let width = BitWidth::new(9).unwrap();
    /// assert_eq!(FixedPointCodec::encode(1.0, width).as_str(), "080");
    /// assert_eq!(FixedPointCodec::encode(-4.0 / 128.0, width).as_str(), "1FC");
    /// ```
    pub fn encode(value: f64, width: BitWidth) -> HexRecord {
        Self::to_hex(Self::quantize(value, width.frac_bits()), width.get())
    }

    /// Parses a record back into its signed integer code.
    pub fn decode_code(record: &str, width: BitWidth) -> Result<i64, CodecError> {
        let token = record.trim();
        if token.len() != width.digits() {
            return Err(CodecError::InvalidLength {
                token: token.to_string(),
                expected: width.digits(),
                actual: token.len(),
            });
        }
        if !is_hex(token) {
            return Err(CodecError::InvalidHex { token: token.to_string() });
        }

        let raw = u64::from_str_radix(token, 16)
            .map_err(|_| CodecError::InvalidHex { token: token.to_string() })?;
        let bits = width.get();
        if raw >> bits != 0 {
            return Err(CodecError::OutOfRange { token: token.to_string(), bits });
        }

        let sign_bit = 1u64 << (bits - 1);
        let code = if raw & sign_bit != 0 {
            raw as i64 - (1i64 << bits)
        } else {
            raw as i64
        };
        Ok(code)
    }

    /// Inverse of [`FixedPointCodec::encode`], exact for every quantized value.
    pub fn decode(record: &str, width: BitWidth) -> Result<f64, CodecError> {
        let code = Self::decode_code(record, width)?;
        Ok(code as f64 / (1u64 << width.frac_bits()) as f64)
    }
}
