//! # ESP3 Packet Encoder
//!
//! Serializes packets into complete ESP3 frames.

use super::crc::crc8;
use super::protocol::*;
use crate::error::{CodecError, CodecResult};
use crate::packet::{Envelope, Packet};

/// Encode a packet into a complete ESP3 frame
///
/// # Arguments
///
/// * `packet` - Packet to serialize
///
/// # Returns
///
/// * `CodecResult<Vec<u8>>` - Sync + header + header CRC + data + optional data + payload CRC
///
/// # Errors
///
/// Returns `LengthMismatch` if a segment exceeds its length field
/// (65535 data bytes, 255 optional bytes)
///
/// # Examples
///
/// ```
/// use enocean_codec::esp3::encoder::encode;
/// use enocean_codec::packet::factory::co_rd_idbase;
///
/// let frame = encode(&co_rd_idbase()).unwrap();
/// assert_eq!(frame, vec![0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x08, 0x38]);
/// ```
pub fn encode(packet: &Packet) -> CodecResult<Vec<u8>> {
    encode_envelope(packet.envelope())
}

/// Encode a raw envelope into a complete ESP3 frame
pub fn encode_envelope(envelope: &Envelope) -> CodecResult<Vec<u8>> {
    let data = envelope.data();
    let optional = envelope.optional_data();

    let data_length = u16::try_from(data.len()).map_err(|_| CodecError::LengthMismatch {
        required: data.len(),
        available: ESP3_MAX_DATA_LENGTH,
    })?;
    let optional_length = u8::try_from(optional.len()).map_err(|_| CodecError::LengthMismatch {
        required: optional.len(),
        available: ESP3_MAX_OPTIONAL_LENGTH,
    })?;

    let header = Esp3Header {
        data_length,
        optional_length,
        packet_type: envelope.kind().code(),
    };
    let header_bytes = header.to_bytes();

    let mut frame = Vec::with_capacity(header.frame_length());
    frame.push(ESP3_SYNC_BYTE);
    frame.extend_from_slice(&header_bytes);
    frame.push(crc8(&header_bytes));

    // Payload CRC covers data and optional data as one run
    frame.extend_from_slice(data);
    frame.extend_from_slice(optional);
    let payload_crc = crc8(&frame[ESP3_DATA_OFFSET..]);
    frame.push(payload_crc);

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::factory::{co_rd_idbase, co_rd_version};
    use crate::packet::PacketType;

    #[test]
    fn test_encode_frame_length() {
        let envelope = Envelope::from_parts(PacketType::RadioErp1, vec![0u8; 7], vec![0u8; 7]);
        let frame = encode_envelope(&envelope).unwrap();

        // sync(1) + header(4) + hcrc(1) + data(7) + optional(7) + pcrc(1)
        assert_eq!(frame.len(), 21);
    }

    #[test]
    fn test_encode_known_rps_frame() {
        let envelope = Envelope::from_parts(
            PacketType::RadioErp1,
            vec![0xF6, 0x30, 0x00, 0x2E, 0xE1, 0xBD, 0x30],
            vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x2D, 0x00],
        );
        let frame = encode_envelope(&envelope).unwrap();

        assert_eq!(&frame[..6], &[0x55, 0x00, 0x07, 0x07, 0x01, 0x7A]);
        assert_eq!(frame[20], 0xF1);
    }

    #[test]
    fn test_encode_commands() {
        assert_eq!(
            encode(&co_rd_version()).unwrap(),
            vec![0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x03, 0x09]
        );
        assert_eq!(
            encode(&co_rd_idbase()).unwrap(),
            vec![0x55, 0x00, 0x01, 0x00, 0x05, 0x70, 0x08, 0x38]
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        let envelope = Envelope::from_parts(PacketType::Event, Vec::new(), Vec::new());
        let frame = encode_envelope(&envelope).unwrap();

        assert_eq!(frame.len(), ESP3_FRAME_OVERHEAD);
        assert_eq!(frame[6], 0x00);
    }

    #[test]
    fn test_encode_rejects_oversized_segments() {
        let envelope = Envelope::from_parts(PacketType::RadioErp1, vec![0u8; 4], vec![0u8; 256]);
        assert!(matches!(
            encode_envelope(&envelope),
            Err(CodecError::LengthMismatch { required: 256, available: 255 })
        ));

        let envelope = Envelope::from_parts(PacketType::CommonCommand, vec![0u8; 65_536], Vec::new());
        assert!(encode_envelope(&envelope).is_err());
    }

    #[test]
    fn test_different_data_different_crc() {
        let a = encode_envelope(&Envelope::from_parts(PacketType::Response, vec![0x00], Vec::new())).unwrap();
        let b = encode_envelope(&Envelope::from_parts(PacketType::Response, vec![0x01], Vec::new())).unwrap();

        assert_eq!(a[5], b[5]);
        assert_ne!(a[7], b[7]);
    }
}
