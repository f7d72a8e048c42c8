use std::io::{BufRead, BufWriter, Write};

use crate::hex_bridge::common::record::HexRecord;

/// A non-blank line of a hex stream with its 1-based line number.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub line: usize,
    pub text: String,
}

/// Collects every non-blank line in order. Blank lines, including the one
/// after a trailing newline, are neither returned nor counted.
///
/// Bytes outside ASCII become `?`, one per byte, so a line that is not
/// valid UTF-8 keeps its length and decodes as a non-hex record.
pub(crate) fn read_tokens(input: &mut dyn BufRead) -> std::io::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for (index, line) in input.split(b'\n').enumerate() {
        let line = line?;
        let bytes = line.trim_ascii();
        if bytes.is_empty() {
            continue;
        }
        tokens.push(Token {
            line: index + 1,
            text: bytes
                .iter()
                .map(|&byte| if byte.is_ascii() { byte as char } else { '?' })
                .collect(),
        });
    }
    Ok(tokens)
}

/// Writes one record per line, each followed by `\n`.
pub(crate) fn write_records(records: &[HexRecord], output: &mut dyn Write) -> std::io::Result<()> {
    let mut writer = BufWriter::new(output);
    for record in records {
        writer.write_all(record.as_str().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
