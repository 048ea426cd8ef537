use std::fmt;

/// Width of a data word in bits.
pub const DATA_WORD_BITS: u32 = 24;

/// Mask selecting the valid bits of a data word.
pub const DATA_WORD_MASK: u32 = (1 << DATA_WORD_BITS) - 1;

/// Width of one sensor sample in bits.
pub const SAMPLE_BITS: u32 = 12;

const SAMPLE_MASK: u16 = (1 << SAMPLE_BITS) - 1;

/// A 24-bit payload value, the logical unit transferred per cycle.
///
/// The inner value is always masked to 24 bits; excess high bits of the
/// raw input are discarded at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DataWord(u32);

impl DataWord {
    /// Create a data word from a raw value, truncating to 24 bits.
    pub fn new(raw: u32) -> Self {
        Self(raw & DATA_WORD_MASK)
    }

    /// Compose a data word from two 12-bit sensor samples.
    ///
    /// `hi` occupies bits 23-12 and `lo` bits 11-0; excess sample bits are
    /// masked off.
    pub fn from_samples(hi: u16, lo: u16) -> Self {
        Self((u32::from(hi & SAMPLE_MASK) << SAMPLE_BITS) | u32::from(lo & SAMPLE_MASK))
    }

    /// The 24-bit value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Big-endian byte decomposition: bits 23-16, 15-8, 7-0.
    pub fn to_be_bytes(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Reassemble a data word from its big-endian byte decomposition.
    pub fn from_be_bytes(bytes: [u8; 3]) -> Self {
        Self((u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]))
    }
}

impl fmt::Display for DataWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

impl fmt::LowerHex for DataWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<DataWord> for u32 {
    fn from(word: DataWord) -> u32 {
        word.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_masks_to_24_bits() {
        assert_eq!(DataWord::new(0xFF_123456).value(), 0x123456);
        assert_eq!(DataWord::new(0x00_FFFFFF).value(), 0xFFFFFF);
    }

    #[test]
    fn sample_composition() {
        // The bench's stock sample pair.
        let word = DataWord::from_samples(0x0978, 0x0536);
        assert_eq!(word.value(), 0x978536);
    }

    #[test]
    fn sample_composition_masks_excess_bits() {
        assert_eq!(
            DataWord::from_samples(0xF978, 0xF536),
            DataWord::from_samples(0x0978, 0x0536)
        );
    }

    #[test]
    fn byte_decomposition_roundtrip() {
        let word = DataWord::new(0x123456);
        assert_eq!(word.to_be_bytes(), [0x12, 0x34, 0x56]);
        assert_eq!(DataWord::from_be_bytes([0x12, 0x34, 0x56]), word);
    }
}
