//! # ESP3 Protocol Constants and Types
//!
//! Core frame layout definitions for the EnOcean Serial Protocol 3.

use std::fmt;

use crate::error::CodecError;

/// ESP3 frame sync byte (always 0x55)
pub const ESP3_SYNC_BYTE: u8 = 0x55;

/// Header size: data length (2) + optional length (1) + packet type (1)
pub const ESP3_HEADER_SIZE: usize = 4;

/// Bytes preceding the data segment: sync + header + header CRC
pub const ESP3_DATA_OFFSET: usize = 1 + ESP3_HEADER_SIZE + 1;

/// Framing overhead: sync + header + header CRC + payload CRC
pub const ESP3_FRAME_OVERHEAD: usize = ESP3_DATA_OFFSET + 1;

/// Maximum data length representable by the 16-bit length field
pub const ESP3_MAX_DATA_LENGTH: usize = u16::MAX as usize;

/// Maximum optional data length representable by the 8-bit length field
pub const ESP3_MAX_OPTIONAL_LENGTH: usize = u8::MAX as usize;

/// ESP3 packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    RadioErp1 = 0x01,
    Response = 0x02,
    RadioSubTelegram = 0x03,
    Event = 0x04,
    CommonCommand = 0x05,
    SmartAckCommand = 0x06,
    RemoteManCommand = 0x07,
    RadioMessage = 0x09,
    RadioErp2 = 0x0A,
}

impl PacketType {
    /// All enumerated packet types
    pub const ALL: [PacketType; 9] = [
        Self::RadioErp1,
        Self::Response,
        Self::RadioSubTelegram,
        Self::Event,
        Self::CommonCommand,
        Self::SmartAckCommand,
        Self::RemoteManCommand,
        Self::RadioMessage,
        Self::RadioErp2,
    ];

    /// Wire code of this packet type
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Name as used in the ESP3 documentation
    pub fn name(self) -> &'static str {
        match self {
            Self::RadioErp1 => "RADIO_ERP1",
            Self::Response => "RESPONSE",
            Self::RadioSubTelegram => "RADIO_SUB_TEL",
            Self::Event => "EVENT",
            Self::CommonCommand => "COMMON_COMMAND",
            Self::SmartAckCommand => "SMART_ACK_COMMAND",
            Self::RemoteManCommand => "REMOTE_MAN_COMMAND",
            Self::RadioMessage => "RADIO_MESSAGE",
            Self::RadioErp2 => "RADIO_ERP2",
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = CodecError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(CodecError::UnknownPacketType(code))
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded ESP3 header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Esp3Header {
    /// Length of the data segment
    pub data_length: u16,

    /// Length of the optional data segment
    pub optional_length: u8,

    /// Raw packet type code (validated later by the packet factory)
    pub packet_type: u8,
}

impl Esp3Header {
    /// Parse the 4 header bytes following the sync byte
    pub fn parse(bytes: [u8; ESP3_HEADER_SIZE]) -> Self {
        Self {
            data_length: u16::from_be_bytes([bytes[0], bytes[1]]),
            optional_length: bytes[2],
            packet_type: bytes[3],
        }
    }

    /// Serialize into the 4 header bytes
    pub fn to_bytes(self) -> [u8; ESP3_HEADER_SIZE] {
        let [hi, lo] = self.data_length.to_be_bytes();
        [hi, lo, self.optional_length, self.packet_type]
    }

    /// Total frame size including sync byte and both CRCs
    pub fn frame_length(self) -> usize {
        ESP3_FRAME_OVERHEAD + self.data_length as usize + self.optional_length as usize
    }
}
