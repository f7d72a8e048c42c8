use std::io::Write;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::hex_bridge::common::error::{CodecError, Result, TranscodeError};
use crate::hex_bridge::common::record::HexRecord;
use crate::hex_bridge::coefficients::types::{CoefficientSet, TapFormat};
use crate::hex_bridge::fixed_point::{BitWidth, FixedPointCodec};

/// A coefficient set rendered as ROM records, in phase-major tap order.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    format: TapFormat,
    records: Vec<HexRecord>,
}

impl CoefficientTable {
    pub fn generate(set: &CoefficientSet, format: TapFormat) -> Self {
        let records = set
            .taps()
            .map(|tap| {
                let code = FixedPointCodec::quantize(tap, format.frac_bits);
                FixedPointCodec::to_hex(code, format.record_bits)
            })
            .collect::<Vec<_>>();

        debug!(
            phases = set.scale_factor(),
            records = records.len(),
            "Generated coefficient table"
        );

        Self { format, records }
    }

    pub fn format(&self) -> TapFormat {
        self.format
    }

    pub fn records(&self) -> &[HexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One record per line, each terminated by a newline.
    pub fn write_to(&self, output: &mut dyn Write) -> std::io::Result<()> {
        for record in &self.records {
            writeln!(output, "{}", record)?;
        }
        Ok(())
    }

    #[instrument(skip(self, path))]
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = std::fs::File::create(path).map_err(|e| {
            TranscodeError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        self.write_to(&mut file)?;

        info!(
            output = %path.display(),
            records = self.records.len(),
            digits = self.format.digits(),
            "Coefficient table saved"
        );
        Ok(())
    }

    /// Reads a table back into signed codes, sign-extended at the record width.
    /// Blank lines are skipped.
    pub fn parse_codes(text: &str, format: TapFormat) -> std::result::Result<Vec<i64>, CodecError> {
        let width = BitWidth::new(format.record_bits)?;
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| FixedPointCodec::decode_code(line, width))
            .collect()
    }
}
