//! 24-bit data word framing with a CRC-8 integrity check byte.
//!
//! This is the wire layer of sciloop. Every transfer cycle sends one frame:
//! - 3 payload bytes, the big-endian decomposition of a 24-bit data word
//! - 1 check byte, a bit-serial CRC-8 over the data word
//!    (generator polynomial 0x83: x^8 + x^7 + x + 1)
//!
//! The codec is pure and infallible: integrity outcomes are booleans,
//! never errors.

pub mod codec;
pub mod crc;
pub mod word;

pub use codec::{Frame, FRAME_SIZE, PAYLOAD_SIZE};
pub use crc::{compute_crc, verify_crc, verify_crc_strict, CRC_POLY};
pub use word::{DataWord, DATA_WORD_BITS, DATA_WORD_MASK, SAMPLE_BITS};
