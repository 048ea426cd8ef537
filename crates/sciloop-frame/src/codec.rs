use crate::crc::{compute_crc, verify_crc, verify_crc_strict};
use crate::word::DataWord;

/// Payload bytes per frame (the 24-bit data word).
pub const PAYLOAD_SIZE: usize = 3;

/// Total frame size: payload plus check byte.
pub const FRAME_SIZE: usize = 4;

/// The fixed 4-byte unit exchanged per transfer cycle.
///
/// Wire layout:
/// ```text
/// ┌──────────────┬──────────────┬──────────────┬──────────────┐
/// │ byte 0       │ byte 1       │ byte 2       │ byte 3       │
/// │ word 23-16   │ word 15-8    │ word 7-0     │ CRC-8(word)  │
/// └──────────────┴──────────────┴──────────────┴──────────────┘
/// ```
///
/// The check byte is recomputed from the data word at encode time, every
/// time; a frame is never built from a stale check byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

impl Frame {
    /// Build the outbound frame for a data word.
    pub fn encode(word: DataWord) -> Self {
        let [b0, b1, b2] = word.to_be_bytes();
        Self {
            bytes: [b0, b1, b2, compute_crc(word)],
        }
    }

    /// Split a wire frame back into its data word and check byte.
    pub fn decode(bytes: [u8; FRAME_SIZE]) -> (DataWord, u8) {
        (
            DataWord::from_be_bytes([bytes[0], bytes[1], bytes[2]]),
            bytes[3],
        )
    }

    /// The full wire representation.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    /// The 3 payload bytes.
    pub fn payload(&self) -> [u8; PAYLOAD_SIZE] {
        [self.bytes[0], self.bytes[1], self.bytes[2]]
    }

    /// The check byte.
    pub fn check_byte(&self) -> u8 {
        self.bytes[3]
    }

    /// The data word carried by this frame.
    pub fn word(&self) -> DataWord {
        DataWord::from_be_bytes(self.payload())
    }

    /// Check the frame under the deployed unit's comparison policy.
    ///
    /// See [`verify_crc`](crate::crc::verify_crc) for what this does and
    /// does not guarantee.
    pub fn is_intact(&self) -> bool {
        verify_crc(self.word(), self.check_byte())
    }

    /// Check the frame by check-byte equality.
    pub fn is_intact_strict(&self) -> bool {
        verify_crc_strict(self.word(), self.check_byte())
    }
}
