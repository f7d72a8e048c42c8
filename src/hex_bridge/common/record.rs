use std::fmt;

/// One line of an uppercase hex stream, without its terminating newline.
///
/// Records are only produced by the codecs, so the digit count always
/// matches the mode or bit width they were encoded for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexRecord(String);

impl HexRecord {
    pub(crate) fn new(digits: String) -> Self {
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for HexRecord {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Formats the low `bits` bits of `value` as uppercase hex, zero-padded to
/// `ceil(bits / 4)` digits.
pub(crate) fn format_hex(value: u64, bits: u32) -> HexRecord {
    let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let digits = bits.div_ceil(4) as usize;
    HexRecord::new(format!("{:0digits$X}", value & mask))
}

/// True when every byte of `token` is an ASCII hex digit, in either case.
pub(crate) fn is_hex(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_hexdigit())
}
