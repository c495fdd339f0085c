//! # RESPONSE Packets
//!
//! Return codes sent by the transceiver after every command.

use std::fmt;

use super::envelope::Envelope;
use super::radio::{SenderId, SENDER_ID_LENGTH};
use crate::esp3::protocol::PacketType;

/// Data length of a CO_RD_VERSION response
pub const VERSION_RESPONSE_LENGTH: usize = 33;

/// Length of the ASCII application description in a version response
pub const APP_DESCRIPTION_LENGTH: usize = 16;

/// ESP3 return code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseType {
    RetOk = 0x00,
    RetError = 0x01,
    RetNotSupported = 0x02,
    RetWrongParam = 0x03,
    RetOperationDenied = 0x04,
    RetLockSet = 0x05,
    RetBufferTooSmall = 0x06,
    RetNoFreeBuffer = 0x07,
    RetFlashHwError = 0x82,
    RetBaseIdOutOfRange = 0x90,
    RetBaseIdMaxReached = 0x91,
}

impl ResponseType {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a return code; unknown codes collapse to `RetError`
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::RetOk,
            0x02 => Self::RetNotSupported,
            0x03 => Self::RetWrongParam,
            0x04 => Self::RetOperationDenied,
            0x05 => Self::RetLockSet,
            0x06 => Self::RetBufferTooSmall,
            0x07 => Self::RetNoFreeBuffer,
            0x82 => Self::RetFlashHwError,
            0x90 => Self::RetBaseIdOutOfRange,
            0x91 => Self::RetBaseIdMaxReached,
            _ => Self::RetError,
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RetOk => "RET_OK",
            Self::RetError => "RET_ERROR",
            Self::RetNotSupported => "RET_NOT_SUPPORTED",
            Self::RetWrongParam => "RET_WRONG_PARAM",
            Self::RetOperationDenied => "RET_OPERATION_DENIED",
            Self::RetLockSet => "RET_LOCK_SET",
            Self::RetBufferTooSmall => "RET_BUFFER_TO_SMALL",
            Self::RetNoFreeBuffer => "RET_NO_FREE_BUFFER",
            Self::RetFlashHwError => "RET_FLASH_HW_ERROR",
            Self::RetBaseIdOutOfRange => "RET_BASEID_OUT_OF_RANGE",
            Self::RetBaseIdMaxReached => "RET_BASEID_MAX_REACHED",
        };
        f.write_str(name)
    }
}

/// Answer to CO_RD_IDBASE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseIdResponse {
    pub base_id: SenderId,

    /// Remaining base id write cycles, absent on transceivers that omit it
    pub remaining_write_cycles: Option<u8>,
}

/// Answer to CO_RD_VERSION
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResponse {
    pub app_version: [u8; 4],
    pub api_version: [u8; 4],
    pub chip_id: [u8; 4],
    pub chip_version: [u8; 4],

    /// Application description, trailing NULs removed
    pub description: String,
}

/// Classified RESPONSE packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTelegram {
    envelope: Envelope,
    response_type: ResponseType,
}

impl ResponseTelegram {
    /// Classify a received envelope; never fails
    pub fn classify(envelope: Envelope) -> Self {
        let response_type = envelope
            .data()
            .first()
            .map_or(ResponseType::RetError, |&code| ResponseType::from_code(code));

        Self {
            envelope,
            response_type,
        }
    }

    /// Build a response with a return code followed by `payload`
    pub fn new(response_type: ResponseType, payload: &[u8], optional_data: Vec<u8>) -> Self {
        let mut data = Vec::with_capacity(1 + payload.len());
        data.push(response_type.code());
        data.extend_from_slice(payload);

        Self {
            envelope: Envelope::from_parts(PacketType::Response, data, optional_data),
            response_type,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn is_ok(&self) -> bool {
        self.response_type == ResponseType::RetOk
    }

    /// Response data after the return code
    pub fn payload(&self) -> &[u8] {
        self.envelope.data().get(1..).unwrap_or_default()
    }

    /// Interpret as the answer to CO_RD_IDBASE
    ///
    /// Only meaningful when the caller knows this response follows that
    /// request; the response itself carries no reference to it.
    pub fn as_base_id(&self) -> Option<BaseIdResponse> {
        if !self.is_ok() {
            return None;
        }

        let base_id: SenderId = self
            .envelope
            .payload(1, SENDER_ID_LENGTH)
            .ok()?
            .try_into()
            .ok()?;

        Some(BaseIdResponse {
            base_id,
            remaining_write_cycles: self.envelope.optional_data().first().copied(),
        })
    }

    /// Interpret as the answer to CO_RD_VERSION
    pub fn as_version(&self) -> Option<VersionResponse> {
        if !self.is_ok() || self.envelope.data().len() < VERSION_RESPONSE_LENGTH {
            return None;
        }

        let data = self.envelope.data();
        let word = |offset: usize| [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
        let description = &data[17..17 + APP_DESCRIPTION_LENGTH];

        Some(VersionResponse {
            app_version: word(1),
            api_version: word(5),
            chip_id: word(9),
            chip_version: word(13),
            description: String::from_utf8_lossy(description)
                .trim_end_matches('\0')
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(data: &[u8], optional: &[u8]) -> ResponseTelegram {
        ResponseTelegram::classify(Envelope::from_parts(
            PacketType::Response,
            data.to_vec(),
            optional.to_vec(),
        ))
    }

    #[test]
    fn test_response_codes() {
        let known = [
            (0x00, ResponseType::RetOk),
            (0x01, ResponseType::RetError),
            (0x02, ResponseType::RetNotSupported),
            (0x03, ResponseType::RetWrongParam),
            (0x04, ResponseType::RetOperationDenied),
            (0x05, ResponseType::RetLockSet),
            (0x06, ResponseType::RetBufferTooSmall),
            (0x07, ResponseType::RetNoFreeBuffer),
            (0x82, ResponseType::RetFlashHwError),
            (0x90, ResponseType::RetBaseIdOutOfRange),
            (0x91, ResponseType::RetBaseIdMaxReached),
        ];

        for (code, expected) in known {
            assert_eq!(ResponseType::from_code(code), expected);
            assert_eq!(expected.code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_collapse_to_error() {
        assert_eq!(response(&[0x42], &[]).response_type(), ResponseType::RetError);
        assert_eq!(response(&[0xFF], &[]).response_type(), ResponseType::RetError);
        assert_eq!(response(&[], &[]).response_type(), ResponseType::RetError);
    }

    #[test]
    fn test_base_id_response() {
        let telegram = response(&[0x00, 0xFF, 0x80, 0x00, 0x00], &[0x0A]);

        assert!(telegram.is_ok());
        assert_eq!(
            telegram.as_base_id(),
            Some(BaseIdResponse {
                base_id: [0xFF, 0x80, 0x00, 0x00],
                remaining_write_cycles: Some(0x0A),
            })
        );

        assert_eq!(response(&[0x00, 0xFF], &[]).as_base_id(), None);
        assert_eq!(response(&[0x01, 0xFF, 0x80, 0x00, 0x00], &[]).as_base_id(), None);
    }

    #[test]
    fn test_version_response() {
        let mut data = vec![0x00, 2, 11, 1, 0, 2, 6, 3, 0, 0x01, 0x8A, 0x7B, 0x30, 0x45, 0x4F, 0x01, 0x03];
        let mut description = b"GATEWAYCTRL".to_vec();
        description.resize(APP_DESCRIPTION_LENGTH, 0);
        data.extend_from_slice(&description);
        assert_eq!(data.len(), VERSION_RESPONSE_LENGTH);

        let version = response(&data, &[]).as_version().unwrap();
        assert_eq!(version.app_version, [2, 11, 1, 0]);
        assert_eq!(version.api_version, [2, 6, 3, 0]);
        assert_eq!(version.chip_id, [0x01, 0x8A, 0x7B, 0x30]);
        assert_eq!(version.chip_version, [0x45, 0x4F, 0x01, 0x03]);
        assert_eq!(version.description, "GATEWAYCTRL");

        assert_eq!(response(&data[..32], &[]).as_version(), None);
    }

    #[test]
    fn test_new_response() {
        let telegram = ResponseTelegram::new(ResponseType::RetOk, &[0x01, 0x02], Vec::new());
        assert_eq!(telegram.envelope().kind(), PacketType::Response);
        assert_eq!(telegram.envelope().data(), &[0x00, 0x01, 0x02]);
        assert_eq!(telegram.payload(), &[0x01, 0x02]);
    }
}
