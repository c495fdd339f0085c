//! # CRC8 Implementation
//!
//! CRC-8 checksum calculation for the ESP3 protocol.
//!
//! **Polynomial**: 0x07 (x^8 + x^2 + x + 1), MSB first, no reflection
//! **Initial Value**: 0x00
//!
//! Used for both the header CRC (length + type bytes) and the payload CRC
//! (data + optional data) of every ESP3 frame.

use crate::error::{CodecError, CodecResult};

/// CRC-8 polynomial used by ESP3
const CRC8_POLY: u8 = 0x07;

/// Precomputed CRC8 lookup table for fast calculation
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

/// Generate CRC8 lookup table at compile time
const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate the ESP3 CRC8 checksum using the lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for
///
/// # Returns
///
/// * `u8` - Calculated CRC8 checksum
///
/// # Examples
///
/// ```
/// use enocean_codec::esp3::crc::crc8;
///
/// // Header of a 7-byte RPS telegram with 7 bytes of optional data
/// assert_eq!(crc8(&[0x00, 0x07, 0x07, 0x01]), 0x7A);
/// ```
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc = CRC8_TABLE[(crc ^ byte) as usize];
    }

    crc
}

/// Calculate CRC8 over `length` bytes of `data` starting at `offset`
///
/// # Errors
///
/// Returns `OutOfRange` if the range does not lie within `data`
pub fn crc8_range(data: &[u8], offset: usize, length: usize) -> CodecResult<u8> {
    let end = offset.checked_add(length).filter(|&end| end <= data.len());

    match end {
        Some(end) => Ok(crc8(&data[offset..end])),
        None => Err(CodecError::OutOfRange {
            offset,
            length,
            available: data.len(),
        }),
    }
}

/// Check `data` against an expected CRC8
pub fn validate(data: &[u8], expected: u8) -> bool {
    crc8(data) == expected
}
