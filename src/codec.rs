//! # Wire Protocol Abstraction
//!
//! Common interface over the ESP3 and ESP2 framings so stream handling and the
//! monitor can be written once for both.

use crate::error::{CodecError, CodecResult};
use crate::esp2::protocol::{parse_header, ESP2_FRAME_SIZE, ESP2_SYNC_BYTE_1, ESP2_SYNC_BYTE_2};
use crate::esp3::decoder::decode_header;
use crate::esp3::protocol::{ESP3_DATA_OFFSET, ESP3_SYNC_BYTE};
use crate::packet::Packet;
use crate::{esp2, esp3};

/// A serial framing that carries EnOcean packets
pub trait WireProtocol {
    /// Short lower-case name used in logs and telegram records
    const NAME: &'static str;

    /// Marker every frame starts with
    const SYNC: &'static [u8];

    /// Bytes needed (sync included) before the frame length is known
    const HEADER_LENGTH: usize;

    /// Validate a header and return the total frame length
    ///
    /// `header` holds exactly `HEADER_LENGTH` bytes starting at the sync marker.
    fn frame_length(header: &[u8]) -> CodecResult<usize>;

    /// Decode one complete frame; `None` when it has no packet equivalent
    fn decode(frame: &[u8]) -> CodecResult<Option<Packet>>;

    /// Serialize a packet into one frame
    fn encode(packet: &Packet) -> CodecResult<Vec<u8>>;
}

/// EnOcean Serial Protocol 3
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp3;

/// EnOcean Serial Protocol 2 (legacy)
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp2;

impl WireProtocol for Esp3 {
    const NAME: &'static str = "esp3";
    const SYNC: &'static [u8] = &[ESP3_SYNC_BYTE];
    const HEADER_LENGTH: usize = ESP3_DATA_OFFSET;

    fn frame_length(header: &[u8]) -> CodecResult<usize> {
        decode_header(header).map(|header| header.frame_length())
    }

    fn decode(frame: &[u8]) -> CodecResult<Option<Packet>> {
        esp3::decoder::decode(frame).map(Some)
    }

    fn encode(packet: &Packet) -> CodecResult<Vec<u8>> {
        esp3::encoder::encode(packet)
    }
}

impl WireProtocol for Esp2 {
    const NAME: &'static str = "esp2";
    const SYNC: &'static [u8] = &[ESP2_SYNC_BYTE_1, ESP2_SYNC_BYTE_2];
    const HEADER_LENGTH: usize = 3;

    fn frame_length(header: &[u8]) -> CodecResult<usize> {
        let header_byte = *header.get(2).ok_or(CodecError::LengthMismatch {
            required: Self::HEADER_LENGTH,
            available: header.len(),
        })?;
        parse_header(header_byte).map(|_| ESP2_FRAME_SIZE)
    }

    fn decode(frame: &[u8]) -> CodecResult<Option<Packet>> {
        esp2::decode_legacy(frame)
    }

    fn encode(packet: &Packet) -> CodecResult<Vec<u8>> {
        esp2::encode_legacy(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::factory::{co_rd_idbase, co_wr_reset};

    #[test]
    fn test_esp3_frame_length() {
        let frame = Esp3::encode(&co_rd_idbase()).unwrap();
        assert_eq!(Esp3::frame_length(&frame[..Esp3::HEADER_LENGTH]), Ok(frame.len()));
        assert_eq!(Esp3::decode(&frame), Ok(Some(co_rd_idbase())));
    }

    #[test]
    fn test_esp2_frame_length() {
        let frame = Esp2::encode(&co_rd_idbase()).unwrap();
        assert_eq!(Esp2::frame_length(&frame[..Esp2::HEADER_LENGTH]), Ok(14));
        assert_eq!(Esp2::frame_length(&[0xA5, 0x5A, 0x0C]), Err(CodecError::InvalidHeader(0x0C)));
        assert_eq!(Esp2::decode(&frame), Ok(Some(co_rd_idbase())));
    }

    #[test]
    fn test_protocols_differ_on_unsupported_packets() {
        assert!(Esp3::encode(&co_wr_reset()).is_ok());
        assert!(Esp2::encode(&co_wr_reset()).unwrap_err().is_unsupported());
    }
}
