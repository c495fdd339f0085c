//! # Error Types
//!
//! Custom error types for the EnOcean codec using `thiserror`.

use std::fmt;

use thiserror::Error;

use crate::esp3::protocol::PacketType;

/// Frame segment covered by a checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumSegment {
    /// ESP3 header CRC8 (length fields + packet type)
    Header,
    /// ESP3 payload CRC8 (data + optional data)
    Payload,
    /// ESP2 additive frame checksum
    Esp2Frame,
}

impl fmt::Display for ChecksumSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("ESP3 header"),
            Self::Payload => f.write_str("ESP3 payload"),
            Self::Esp2Frame => f.write_str("ESP2 frame"),
        }
    }
}

/// Errors reported by the wire codecs
///
/// None of these are fatal: the offending frame is dropped and the caller
/// moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Packet type code outside the enumerated set
    #[error("Unknown packet type: 0x{0:02X}")]
    UnknownPacketType(u8),

    /// Command code outside the enumerated set for its packet kind
    #[error("Unknown {kind} code: 0x{code:02X}")]
    UnknownCommand { kind: PacketType, code: u8 },

    /// Declared lengths do not fit the supplied bytes
    #[error("Length mismatch: {required} bytes required, {available} available")]
    LengthMismatch { required: usize, available: usize },

    /// Slice request beyond the end of a stored segment
    #[error("Range {offset}+{length} exceeds segment of {available} bytes")]
    OutOfRange {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// CRC8 (ESP3) or additive checksum (ESP2) mismatch
    #[error("{segment} checksum invalid: expected 0x{expected:02X}, computed 0x{computed:02X}")]
    ChecksumInvalid {
        segment: ChecksumSegment,
        expected: u8,
        computed: u8,
    },

    /// First byte of a frame is not the sync marker
    #[error("Invalid sync byte: 0x{0:02X}")]
    InvalidSync(u8),

    /// ESP2 header byte with an unknown direction or a wrong length field
    #[error("Invalid ESP2 header: 0x{0:02X}")]
    InvalidHeader(u8),

    /// RORG that ESP2 has no org for
    #[error("RORG 0x{0:02X} cannot be represented in ESP2")]
    UnsupportedRorg(u8),

    /// Common command that ESP2 has no command for
    #[error("Common command 0x{0:02X} cannot be represented in ESP2")]
    UnsupportedCommand(u8),

    /// Packet kind that ESP2 cannot transmit
    #[error("{0} packets cannot be sent over ESP2")]
    UnsupportedDirection(PacketType),
}

impl CodecError {
    /// True for ESP2/ESP3 conversion failures (the frame itself was fine)
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRorg(_) | Self::UnsupportedCommand(_) | Self::UnsupportedDirection(_)
        )
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Main error type for the monitor and configuration layer
#[derive(Debug, Error)]
pub enum EnoceanError {
    /// Wire codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telegram record serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed hex input line
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Result type alias for the EnOcean codec application layer
pub type Result<T> = std::result::Result<T, EnoceanError>;
