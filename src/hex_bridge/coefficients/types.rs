//! Coefficient set and tap format types

use crate::hex_bridge::common::error::CodecError;
use crate::hex_bridge::fixed_point::{BitWidth, MAX_BIT_WIDTH, MIN_BIT_WIDTH};

/// Taps per phase of a cubic kernel.
pub const TAPS_PER_PHASE: usize = 4;

/// Design-time weights for the ×3 bicubic upscaler, as S1.7 integer codes.
///
/// Phase 0 sits on the source pixel, phases 1 and 2 at 1/3 and 2/3 offsets
/// and mirror each other.
const BICUBIC_X3_CODES: [[i32; TAPS_PER_PHASE]; 3] = [
    [0, 128, 0, 0],
    [-4, 114, 23, -5],
    [-5, 23, 114, -4],
];

/// The same kernel as it was burned into the 8-bit tap ROM. The outer taps
/// of phases 1 and 2 hold -3 there, and the hardware is verified against it.
const BICUBIC_X3_REG8_CODES: [[i32; TAPS_PER_PHASE]; 3] = [
    [0, 128, 0, 0],
    [-3, 114, 23, -5],
    [-5, 23, 114, -3],
];

const BICUBIC_X3_FRAC_BITS: u32 = 7;

fn codes_to_phases(codes: &[[i32; TAPS_PER_PHASE]], frac_bits: u32) -> Vec<[f64; TAPS_PER_PHASE]> {
    let scale = (1u64 << frac_bits) as f64;
    codes
        .iter()
        .map(|phase| phase.map(|code| code as f64 / scale))
        .collect()
}

/// Real-valued filter weights grouped by phase, one phase per sub-pixel
/// offset of an upscale by `scale_factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    phases: Vec<[f64; TAPS_PER_PHASE]>,
}

impl CoefficientSet {
    pub fn new(scale_factor: usize, phases: Vec<[f64; TAPS_PER_PHASE]>) -> Result<Self, CodecError> {
        if scale_factor == 0 || phases.len() != scale_factor {
            return Err(CodecError::PhaseCount {
                expected: scale_factor,
                actual: phases.len(),
            });
        }
        Ok(Self { phases })
    }

    /// Builds a set from integer codes scaled by `2^frac_bits`.
    pub fn from_codes(
        scale_factor: usize,
        codes: &[[i32; TAPS_PER_PHASE]],
        frac_bits: u32,
    ) -> Result<Self, CodecError> {
        Self::new(scale_factor, codes_to_phases(codes, frac_bits))
    }

    /// The 3-phase cubic kernel the reference hardware is built around.
    pub fn bicubic_x3() -> Self {
        Self {
            phases: codes_to_phases(&BICUBIC_X3_CODES, BICUBIC_X3_FRAC_BITS),
        }
    }

    /// The ×3 kernel as loaded into the 8-bit tap ROM.
    pub fn bicubic_x3_reg8() -> Self {
        Self {
            phases: codes_to_phases(&BICUBIC_X3_REG8_CODES, BICUBIC_X3_FRAC_BITS),
        }
    }

    /// The ×3 kernel for a tap register format: the 8-bit ROM data for
    /// [`TapFormat::S1_7_REG8`], the design weights otherwise.
    pub fn bicubic_x3_for(format: TapFormat) -> Self {
        if format == TapFormat::S1_7_REG8 {
            Self::bicubic_x3_reg8()
        } else {
            Self::bicubic_x3()
        }
    }

    pub fn scale_factor(&self) -> usize {
        self.phases.len()
    }

    pub fn phases(&self) -> &[[f64; TAPS_PER_PHASE]] {
        &self.phases
    }

    /// Every tap in file order: phase-major, then tap order.
    pub fn taps(&self) -> impl Iterator<Item = f64> + '_ {
        self.phases.iter().flatten().copied()
    }
}

/// How taps are quantized and how wide each table record is.
///
/// Codes saturate to the signed range of `frac_bits + 2` bits and the low
/// `record_bits` bits are written. When `record_bits` equals
/// `frac_bits + 2` this is exactly [`FixedPointCodec::encode`]; the 8-bit
/// register variant keeps S1.7 scaling and drops the top bit, which the
/// hardware restores when it loads the ROM into its 9-bit tap registers.
///
/// [`FixedPointCodec::encode`]: crate::hex_bridge::fixed_point::FixedPointCodec::encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapFormat {
    pub frac_bits: u32,
    pub record_bits: u32,
}

impl TapFormat {
    /// S1.7 taps in 9-bit signed registers, three hex digits per record.
    pub const S1_7_REG9: Self = Self { frac_bits: 7, record_bits: 9 };

    /// S1.7 taps in 8-bit records, two hex digits per record.
    pub const S1_7_REG8: Self = Self { frac_bits: 7, record_bits: 8 };

    pub fn new(frac_bits: u32, record_bits: u32) -> Result<Self, CodecError> {
        if frac_bits.saturating_add(2) > MAX_BIT_WIDTH {
            return Err(CodecError::InvalidBitWidth(frac_bits.saturating_add(2)));
        }
        if !(MIN_BIT_WIDTH..=MAX_BIT_WIDTH).contains(&record_bits) {
            return Err(CodecError::InvalidBitWidth(record_bits));
        }
        Ok(Self { frac_bits, record_bits })
    }

    pub fn from_bit_width(width: BitWidth) -> Self {
        Self {
            frac_bits: width.frac_bits(),
            record_bits: width.get(),
        }
    }

    pub fn digits(&self) -> usize {
        self.record_bits.div_ceil(4) as usize
    }
}
