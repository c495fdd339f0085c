//! # Packet Envelope
//!
//! Owned data + optional data segments of one ESP3 packet, tagged with its
//! packet type.

use crate::error::{CodecError, CodecResult};
use crate::esp3::protocol::PacketType;

/// One wire-level telegram before any variant-specific interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    kind: PacketType,
    data: Vec<u8>,
    optional_data: Vec<u8>,
}

impl Envelope {
    /// Build an envelope from declared lengths and a raw payload buffer
    ///
    /// # Arguments
    ///
    /// * `data_length` - Declared length of the data segment
    /// * `optional_length` - Declared length of the optional data segment
    /// * `packet_type` - Raw packet type code
    /// * `payload` - Bytes holding data followed by optional data
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `packet_type` is not an enumerated code (`UnknownPacketType`)
    /// - the declared lengths exceed `payload` (`LengthMismatch`)
    pub fn new(
        data_length: usize,
        optional_length: usize,
        packet_type: u8,
        payload: &[u8],
    ) -> CodecResult<Self> {
        let kind = PacketType::try_from(packet_type)?;

        let required = data_length
            .checked_add(optional_length)
            .ok_or(CodecError::LengthMismatch {
                required: usize::MAX,
                available: payload.len(),
            })?;
        if required > payload.len() {
            return Err(CodecError::LengthMismatch {
                required,
                available: payload.len(),
            });
        }

        Ok(Self {
            kind,
            data: payload[..data_length].to_vec(),
            optional_data: payload[data_length..required].to_vec(),
        })
    }

    /// Build an envelope from already separated segments
    pub fn from_parts(kind: PacketType, data: Vec<u8>, optional_data: Vec<u8>) -> Self {
        Self {
            kind,
            data,
            optional_data,
        }
    }

    pub fn kind(&self) -> PacketType {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn optional_data(&self) -> &[u8] {
        &self.optional_data
    }

    /// Borrow `length` bytes of the data segment starting at `offset`
    pub fn payload(&self, offset: usize, length: usize) -> CodecResult<&[u8]> {
        slice_segment(&self.data, offset, length)
    }

    /// Borrow `length` bytes of the optional data segment starting at `offset`
    pub fn optional_payload(&self, offset: usize, length: usize) -> CodecResult<&[u8]> {
        slice_segment(&self.optional_data, offset, length)
    }

    /// Consume the envelope, returning its segments
    pub fn into_parts(self) -> (PacketType, Vec<u8>, Vec<u8>) {
        (self.kind, self.data, self.optional_data)
    }
}

fn slice_segment(segment: &[u8], offset: usize, length: usize) -> CodecResult<&[u8]> {
    offset
        .checked_add(length)
        .and_then(|end| segment.get(offset..end))
        .ok_or(CodecError::OutOfRange {
            offset,
            length,
            available: segment.len(),
        })
}
