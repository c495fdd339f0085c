//! # ESP3 Packet Decoder
//!
//! Validates and decodes complete ESP3 frames into packets.

use super::crc::crc8;
use super::protocol::*;
use crate::error::{ChecksumSegment, CodecError, CodecResult};
use crate::packet::factory::build_packet;
use crate::packet::Packet;

/// Validate sync byte and header CRC, returning the parsed header
///
/// `bytes` must start at the sync byte and hold at least the 6 header bytes.
///
/// # Errors
///
/// Returns error if:
/// - Fewer than 6 bytes are supplied (`LengthMismatch`)
/// - The first byte is not 0x55 (`InvalidSync`)
/// - The header CRC does not match (`ChecksumInvalid`)
pub fn decode_header(bytes: &[u8]) -> CodecResult<Esp3Header> {
    if bytes.len() < ESP3_DATA_OFFSET {
        return Err(CodecError::LengthMismatch {
            required: ESP3_DATA_OFFSET,
            available: bytes.len(),
        });
    }

    if bytes[0] != ESP3_SYNC_BYTE {
        return Err(CodecError::InvalidSync(bytes[0]));
    }

    let header_bytes = [bytes[1], bytes[2], bytes[3], bytes[4]];
    let received_crc = bytes[5];
    let calculated_crc = crc8(&header_bytes);

    if calculated_crc != received_crc {
        return Err(CodecError::ChecksumInvalid {
            segment: ChecksumSegment::Header,
            expected: received_crc,
            computed: calculated_crc,
        });
    }

    Ok(Esp3Header::parse(header_bytes))
}

/// Decode a complete ESP3 frame
///
/// Both CRCs are checked before the packet factory sees the payload. Bytes
/// after the payload CRC are ignored.
///
/// # Arguments
///
/// * `frame` - Frame bytes starting at the sync byte
///
/// # Returns
///
/// * `CodecResult<Packet>` - Decoded packet, or error if invalid
///
/// # Errors
///
/// Returns error if:
/// - Sync byte or header CRC is invalid
/// - Frame is shorter than the declared lengths
/// - Payload CRC check fails
/// - The packet type (or command code) is not enumerated
pub fn decode(frame: &[u8]) -> CodecResult<Packet> {
    let header = decode_header(frame)?;

    let frame_length = header.frame_length();
    if frame.len() < frame_length {
        return Err(CodecError::LengthMismatch {
            required: frame_length,
            available: frame.len(),
        });
    }

    let payload = &frame[ESP3_DATA_OFFSET..frame_length - 1];
    let received_crc = frame[frame_length - 1];
    let calculated_crc = crc8(payload);

    if calculated_crc != received_crc {
        return Err(CodecError::ChecksumInvalid {
            segment: ChecksumSegment::Payload,
            expected: received_crc,
            computed: calculated_crc,
        });
    }

    build_packet(
        header.packet_type,
        header.data_length as usize,
        header.optional_length as usize,
        payload,
    )
}
