//! # ESP2 Protocol Constants and Types
//!
//! Fixed-length legacy frame used by TCM 1xx based transceivers.
//!
//! Frame structure (14 bytes):
//!
//! ```text
//! A5 5A | H_SEQ<<5 | LENGTH | ORG | D3 D2 D1 D0 | ID3 ID2 ID1 ID0 | STATUS | CHECKSUM
//! ```
//!
//! The checksum is the low byte of the sum of all bytes between the sync
//! bytes and the checksum itself. It is not a CRC.

use std::fmt;

use crate::error::{ChecksumSegment, CodecError, CodecResult};

/// First ESP2 sync byte
pub const ESP2_SYNC_BYTE_1: u8 = 0xA5;

/// Second ESP2 sync byte
pub const ESP2_SYNC_BYTE_2: u8 = 0x5A;

/// Value of the header length field: org + data + id + status + checksum
pub const ESP2_FRAME_LENGTH: u8 = 0x0B;

/// Header length field mask
pub const ESP2_LENGTH_MASK: u8 = 0x1F;

/// Complete frame size: sync (2) + header (1) + length field bytes (11)
pub const ESP2_FRAME_SIZE: usize = 3 + ESP2_FRAME_LENGTH as usize;

/// ESP2 data bytes per frame
pub const ESP2_DATA_LENGTH: usize = 4;

/// Packet direction/type (H_SEQ, upper 3 bits of the header byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Esp2PacketType {
    ReceiveRadioTelegram = 0x00,
    TransmitRadioTelegram = 0x03,
    ReceiveMessageTelegram = 0x04,
    TransmitCommandTelegram = 0x05,
}

impl Esp2PacketType {
    pub fn from_h_seq(h_seq: u8) -> Option<Self> {
        match h_seq {
            0x00 => Some(Self::ReceiveRadioTelegram),
            0x03 => Some(Self::TransmitRadioTelegram),
            0x04 => Some(Self::ReceiveMessageTelegram),
            0x05 => Some(Self::TransmitCommandTelegram),
            _ => None,
        }
    }

    /// Header byte for a standard 11-byte frame of this type
    pub fn header(self) -> u8 {
        ((self as u8) << 5) | ESP2_FRAME_LENGTH
    }
}

impl fmt::Display for Esp2PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReceiveRadioTelegram => "RRT",
            Self::TransmitRadioTelegram => "TRT",
            Self::ReceiveMessageTelegram => "RMT",
            Self::TransmitCommandTelegram => "TCT",
        };
        f.write_str(name)
    }
}

/// Radio organization byte of ESP2 radio telegrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Esp2Org {
    Rps = 0x05,
    OneBs = 0x06,
    FourBs = 0x07,
}

impl Esp2Org {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x05 => Some(Self::Rps),
            0x06 => Some(Self::OneBs),
            0x07 => Some(Self::FourBs),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Message codes carried in the org position of receive-message telegrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Esp2Response {
    Ok = 0x58,
    Err = 0x19,
    InfIdBase = 0x98,
    InfSwVersion = 0x8C,
    ErrIdRange = 0x1A,
    ErrTxIdRange = 0x22,
    ErrSyntaxHSeq = 0x08,
    ErrSyntaxLength = 0x09,
    ErrSyntaxChecksum = 0x0A,
    ErrSyntaxOrg = 0x0B,
}

impl Esp2Response {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x58 => Some(Self::Ok),
            0x19 => Some(Self::Err),
            0x98 => Some(Self::InfIdBase),
            0x8C => Some(Self::InfSwVersion),
            0x1A => Some(Self::ErrIdRange),
            0x22 => Some(Self::ErrTxIdRange),
            0x08 => Some(Self::ErrSyntaxHSeq),
            0x09 => Some(Self::ErrSyntaxLength),
            0x0A => Some(Self::ErrSyntaxChecksum),
            0x0B => Some(Self::ErrSyntaxOrg),
            _ => None,
        }
    }
}

/// Command codes carried in the org position of transmit-command telegrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Esp2Command {
    SetIdBase = 0x18,
    RdIdBase = 0x58,
    RdSwVersion = 0x4B,
}

impl Esp2Command {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x18 => Some(Self::SetIdBase),
            0x58 => Some(Self::RdIdBase),
            0x4B => Some(Self::RdSwVersion),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Additive ESP2 checksum: wrapping sum of `bytes`
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Decoded ESP2 frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Esp2Frame {
    pub packet_type: Esp2PacketType,

    /// Org (radio telegrams), message code or command code
    pub org: u8,

    /// Data bytes D3..D0 in wire order
    pub data: [u8; ESP2_DATA_LENGTH],

    /// Sender id ID3..ID0 in wire order
    pub sender_id: [u8; 4],

    pub status: u8,
}

impl Esp2Frame {
    /// Serialize into the 14-byte wire form
    pub fn encode(&self) -> [u8; ESP2_FRAME_SIZE] {
        let mut frame = [0u8; ESP2_FRAME_SIZE];
        frame[0] = ESP2_SYNC_BYTE_1;
        frame[1] = ESP2_SYNC_BYTE_2;
        frame[2] = self.packet_type.header();
        frame[3] = self.org;
        frame[4..8].copy_from_slice(&self.data);
        frame[8..12].copy_from_slice(&self.sender_id);
        frame[12] = self.status;
        frame[13] = checksum(&frame[2..13]);
        frame
    }

    /// Parse and validate a 14-byte ESP2 frame
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Fewer than 14 bytes are supplied
    /// - Either sync byte is wrong
    /// - The header has an unknown H_SEQ or a length other than 0x0B
    /// - The checksum does not match
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() < ESP2_FRAME_SIZE {
            return Err(CodecError::LengthMismatch {
                required: ESP2_FRAME_SIZE,
                available: bytes.len(),
            });
        }

        if bytes[0] != ESP2_SYNC_BYTE_1 {
            return Err(CodecError::InvalidSync(bytes[0]));
        }
        if bytes[1] != ESP2_SYNC_BYTE_2 {
            return Err(CodecError::InvalidSync(bytes[1]));
        }

        let header = bytes[2];
        let packet_type = parse_header(header)?;

        let received = bytes[13];
        let computed = checksum(&bytes[2..13]);
        if received != computed {
            return Err(CodecError::ChecksumInvalid {
                segment: ChecksumSegment::Esp2Frame,
                expected: received,
                computed,
            });
        }

        Ok(Self {
            packet_type,
            org: bytes[3],
            data: [bytes[4], bytes[5], bytes[6], bytes[7]],
            sender_id: [bytes[8], bytes[9], bytes[10], bytes[11]],
            status: bytes[12],
        })
    }
}

/// Validate a header byte and return its packet type
pub fn parse_header(header: u8) -> CodecResult<Esp2PacketType> {
    if header & ESP2_LENGTH_MASK != ESP2_FRAME_LENGTH {
        return Err(CodecError::InvalidHeader(header));
    }
    Esp2PacketType::from_h_seq(header >> 5).ok_or(CodecError::InvalidHeader(header))
}
