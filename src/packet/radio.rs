//! # ERP1 Radio Telegrams
//!
//! Classifies a RADIO_ERP1 envelope by its RORG byte and extracts the sender
//! id and teach-in flag from the RORG-specific layout.
//!
//! Data segment layout for every RORG:
//!
//! ```text
//! [RORG][user data (n bytes)][sender id (4 bytes)][status]
//! ```
//!
//! Malformed radio telegrams are ordinary noise on the shared 868 MHz band, so
//! classification never fails. A telegram whose fields cannot be extracted is
//! reported as `Rorg::Unknown` (unknown RORG byte) or without a sender id
//! (known RORG, too few bytes).

use std::fmt;

use super::envelope::Envelope;
use crate::error::{CodecError, CodecResult};
use crate::esp3::protocol::PacketType;

/// Length of an EnOcean device id
pub const SENDER_ID_LENGTH: usize = 4;

/// ERP1 optional data: subtel count (1) + destination id (4) + dBm (1) + security level (1)
pub const ERP1_OPTIONAL_LENGTH: usize = 7;

/// 1BS / 4BS learn bit: cleared for teach-in telegrams
const LRN_BIT_MASK: u8 = 0x08;

/// UTE command field in DB6
const UTE_REQUEST_MASK: u8 = 0x0C;

/// UTE command field value: teach-in request
const UTE_TEACH_IN_REQUEST: u8 = 0x00;

/// UTE command field value: teach-in or deletion, not specified
const UTE_NOT_SPECIFIED: u8 = 0x08;

/// 4-byte EnOcean device identifier
pub type SenderId = [u8; SENDER_ID_LENGTH];

/// Radio organization of an ERP1 telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rorg {
    Unknown = 0x00,
    Rps = 0xF6,
    OneBs = 0xD5,
    FourBs = 0xA5,
    Vld = 0xD2,
    Ute = 0xD4,
    Sig = 0xD0,
    Msc = 0xD1,
}

impl Rorg {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Number of user data bytes, `None` for variable-length RORGs
    pub fn data_length(self) -> Option<usize> {
        match self {
            Self::Unknown => Some(0),
            Self::Rps | Self::OneBs => Some(1),
            Self::FourBs => Some(4),
            Self::Vld | Self::Ute | Self::Sig | Self::Msc => None,
        }
    }

    /// Look up a RORG code, `None` if not enumerated
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0xF6 => Some(Self::Rps),
            0xD5 => Some(Self::OneBs),
            0xA5 => Some(Self::FourBs),
            0xD2 => Some(Self::Vld),
            0xD4 => Some(Self::Ute),
            0xD0 => Some(Self::Sig),
            0xD1 => Some(Self::Msc),
            _ => None,
        }
    }
}

impl fmt::Display for Rorg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Rps => "RPS",
            Self::OneBs => "1BS",
            Self::FourBs => "4BS",
            Self::Vld => "VLD",
            Self::Ute => "UTE",
            Self::Sig => "SIG",
            Self::Msc => "MSC",
        };
        f.write_str(name)
    }
}

/// Classified RADIO_ERP1 telegram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioTelegram {
    envelope: Envelope,
    rorg: Rorg,
    sender_offset: Option<usize>,
    teach_in: bool,
}

impl RadioTelegram {
    /// Classify a received envelope
    ///
    /// Never fails: see the module documentation for the degrade rules.
    pub fn classify(envelope: Envelope) -> Self {
        let (rorg, sender_offset, teach_in) = extract_fields(envelope.data());

        Self {
            envelope,
            rorg,
            sender_offset,
            teach_in,
        }
    }

    /// Assemble an outbound telegram
    ///
    /// # Arguments
    ///
    /// * `rorg` - Radio organization (must not be `Unknown`)
    /// * `user_data` - User data bytes between RORG and sender id
    /// * `sender_id` - Transmitting device id (usually the gateway base id)
    /// * `status` - Status byte (repeater count, T21/NU for RPS)
    /// * `optional_data` - ERP1 optional data, empty for defaults
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `user_data` does not match a fixed-length
    /// RORG, `UnsupportedRorg` for `Rorg::Unknown`
    pub fn new(
        rorg: Rorg,
        user_data: &[u8],
        sender_id: SenderId,
        status: u8,
        optional_data: Vec<u8>,
    ) -> CodecResult<Self> {
        if rorg == Rorg::Unknown {
            return Err(CodecError::UnsupportedRorg(rorg.code()));
        }
        if let Some(expected) = rorg.data_length() {
            if user_data.len() != expected {
                return Err(CodecError::LengthMismatch {
                    required: expected,
                    available: user_data.len(),
                });
            }
        }

        let mut data = Vec::with_capacity(1 + user_data.len() + SENDER_ID_LENGTH + 1);
        data.push(rorg.code());
        data.extend_from_slice(user_data);
        data.extend_from_slice(&sender_id);
        data.push(status);

        Ok(Self::classify(Envelope::from_parts(
            PacketType::RadioErp1,
            data,
            optional_data,
        )))
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    pub fn rorg(&self) -> Rorg {
        self.rorg
    }

    /// Sender id, `None` when the telegram is too short to carry one
    pub fn sender_id(&self) -> Option<SenderId> {
        let offset = self.sender_offset?;
        self.envelope
            .data()
            .get(offset..offset + SENDER_ID_LENGTH)?
            .try_into()
            .ok()
    }

    pub fn is_teach_in(&self) -> bool {
        self.teach_in
    }

    /// User data bytes between RORG and sender id
    pub fn user_data(&self) -> &[u8] {
        let data = self.envelope.data();
        let end = self.sender_offset.unwrap_or(data.len());
        data.get(1..end).unwrap_or_default()
    }

    /// Status byte following the sender id
    pub fn status(&self) -> Option<u8> {
        let offset = self.sender_offset?;
        self.envelope.data().get(offset + SENDER_ID_LENGTH).copied()
    }

    /// Number of subtelegrams (received) or to send (transmitted)
    pub fn subtelegram_count(&self) -> Option<u8> {
        self.erp1_optional().map(|opt| opt[0])
    }

    /// Destination id, FF FF FF FF for broadcast
    pub fn destination_id(&self) -> Option<SenderId> {
        self.erp1_optional().map(|opt| [opt[1], opt[2], opt[3], opt[4]])
    }

    /// Best RSSI of all received subtelegrams as a negative dBm value
    pub fn dbm(&self) -> Option<i16> {
        self.erp1_optional().map(|opt| -(opt[5] as i16))
    }

    pub fn security_level(&self) -> Option<u8> {
        self.erp1_optional().map(|opt| opt[6])
    }

    fn erp1_optional(&self) -> Option<&[u8]> {
        self.envelope
            .optional_payload(0, ERP1_OPTIONAL_LENGTH)
            .ok()
    }
}

/// Determine RORG, sender id offset and teach-in flag from a data segment
fn extract_fields(data: &[u8]) -> (Rorg, Option<usize>, bool) {
    let Some(rorg) = data.first().and_then(|&code| Rorg::from_code(code)) else {
        return (Rorg::Unknown, None, false);
    };
    let len = data.len();

    let (sender_offset, teach_in) = match rorg {
        Rorg::Rps if len >= 6 => (Some(2), false),
        Rorg::OneBs if len >= 6 => (Some(2), data[1] & LRN_BIT_MASK == 0),
        Rorg::FourBs if len >= 9 => (Some(5), data[4] & LRN_BIT_MASK == 0),
        Rorg::Ute if len >= 6 => {
            let request = data[1] & UTE_REQUEST_MASK;
            (
                Some(len - 5),
                request == UTE_TEACH_IN_REQUEST || request == UTE_NOT_SPECIFIED,
            )
        }
        Rorg::Vld | Rorg::Sig | Rorg::Msc if len >= 5 => (Some(len - 5), false),
        _ => (None, false),
    };

    (rorg, sender_offset, teach_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio(data: &[u8]) -> RadioTelegram {
        RadioTelegram::classify(Envelope::from_parts(
            PacketType::RadioErp1,
            data.to_vec(),
            Vec::new(),
        ))
    }

    #[test]
    fn test_rorg_codes() {
        assert_eq!(Rorg::from_code(0xF6), Some(Rorg::Rps));
        assert_eq!(Rorg::from_code(0xD5), Some(Rorg::OneBs));
        assert_eq!(Rorg::from_code(0xA5), Some(Rorg::FourBs));
        assert_eq!(Rorg::from_code(0xD2), Some(Rorg::Vld));
        assert_eq!(Rorg::from_code(0xD4), Some(Rorg::Ute));
        assert_eq!(Rorg::from_code(0xD0), Some(Rorg::Sig));
        assert_eq!(Rorg::from_code(0xD1), Some(Rorg::Msc));
        assert_eq!(Rorg::from_code(0x00), None);
        assert_eq!(Rorg::from_code(0xA6), None);
    }

    #[test]
    fn test_rorg_data_lengths() {
        assert_eq!(Rorg::Rps.data_length(), Some(1));
        assert_eq!(Rorg::OneBs.data_length(), Some(1));
        assert_eq!(Rorg::FourBs.data_length(), Some(4));
        assert_eq!(Rorg::Vld.data_length(), None);
        assert_eq!(Rorg::Ute.data_length(), None);
    }

    #[test]
    fn test_classify_rps() {
        let telegram = radio(&[0xF6, 0x30, 0x00, 0x2E, 0xE1, 0xBD, 0x30]);

        assert_eq!(telegram.rorg(), Rorg::Rps);
        assert_eq!(telegram.sender_id(), Some([0x00, 0x2E, 0xE1, 0xBD]));
        assert!(!telegram.is_teach_in());
        assert_eq!(telegram.user_data(), &[0x30]);
        assert_eq!(telegram.status(), Some(0x30));
    }

    #[test]
    fn test_classify_1bs_teach_in_bit() {
        let data_telegram = radio(&[0xD5, 0x09, 0x01, 0x02, 0x03, 0x04, 0x00]);
        assert_eq!(data_telegram.rorg(), Rorg::OneBs);
        assert_eq!(data_telegram.sender_id(), Some([0x01, 0x02, 0x03, 0x04]));
        assert!(!data_telegram.is_teach_in());

        // Clearing bit 0x08 turns the same telegram into a teach-in
        let teach_in = radio(&[0xD5, 0x01, 0x01, 0x02, 0x03, 0x04, 0x00]);
        assert!(teach_in.is_teach_in());
    }

    #[test]
    fn test_classify_4bs_boundary() {
        let nine = [0xA5, 0x00, 0x00, 0x00, 0x08, 0x11, 0x22, 0x33, 0x44];
        let telegram = radio(&nine);
        assert_eq!(telegram.rorg(), Rorg::FourBs);
        assert_eq!(telegram.sender_id(), Some([0x11, 0x22, 0x33, 0x44]));
        assert!(!telegram.is_teach_in());

        let eight = radio(&nine[..8]);
        assert_eq!(eight.sender_id(), None);
        assert!(!eight.is_teach_in());
        assert_eq!(eight.status(), None);
    }

    #[test]
    fn test_classify_4bs_teach_in() {
        let telegram = radio(&[0xA5, 0x08, 0x28, 0x46, 0x80, 0x01, 0x8A, 0x7B, 0x30, 0x00]);
        assert!(telegram.is_teach_in());
        assert_eq!(telegram.sender_id(), Some([0x01, 0x8A, 0x7B, 0x30]));
        assert_eq!(telegram.user_data(), &[0x08, 0x28, 0x46, 0x80]);
    }

    #[test]
    fn test_classify_ute_all_request_values() {
        let expected = [(0x00, true), (0x04, false), (0x08, true), (0x0C, false)];

        for (field, teach_in) in expected {
            let db6 = 0xA0 | field;
            let telegram = radio(&[0xD4, db6, 0x01, 0x46, 0x00, 0x12, 0x01, 0xD2, 0xAA, 0xBB, 0xCC, 0xDD, 0x00]);

            assert_eq!(telegram.rorg(), Rorg::Ute);
            assert_eq!(telegram.sender_id(), Some([0xAA, 0xBB, 0xCC, 0xDD]));
            assert_eq!(telegram.is_teach_in(), teach_in, "UTE field 0x{:02X}", field);
        }
    }

    #[test]
    fn test_classify_variable_length() {
        let vld = radio(&[0xD2, 0x04, 0x60, 0x80, 0x01, 0x02, 0x03, 0x04, 0x00]);
        assert_eq!(vld.rorg(), Rorg::Vld);
        assert_eq!(vld.sender_id(), Some([0x01, 0x02, 0x03, 0x04]));
        assert!(!vld.is_teach_in());
        assert_eq!(vld.user_data(), &[0x04, 0x60, 0x80]);

        // Shortest VLD: the id window starts at the RORG byte itself
        let short = radio(&[0xD2, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(short.sender_id(), Some([0xD2, 0x01, 0x02, 0x03]));
        assert_eq!(short.user_data(), &[] as &[u8]);
        assert_eq!(short.status(), Some(0x04));

        let sig = radio(&[0xD0, 0x06, 0x01, 0x02, 0x03, 0x04, 0x00]);
        assert_eq!(sig.rorg(), Rorg::Sig);
        assert_eq!(sig.sender_id(), Some([0x01, 0x02, 0x03, 0x04]));

        let msc = radio(&[0xD1, 0x07, 0xFF, 0x05, 0x06, 0x07, 0x08, 0x00]);
        assert_eq!(msc.rorg(), Rorg::Msc);
        assert_eq!(msc.sender_id(), Some([0x05, 0x06, 0x07, 0x08]));
    }

    #[test]
    fn test_classify_degrades_on_malformed_input() {
        let unknown = radio(&[0x42, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(unknown.rorg(), Rorg::Unknown);
        assert_eq!(unknown.sender_id(), None);
        assert!(!unknown.is_teach_in());

        let empty = radio(&[]);
        assert_eq!(empty.rorg(), Rorg::Unknown);
        assert_eq!(empty.user_data(), &[] as &[u8]);

        let short_ute = radio(&[0xD4, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(short_ute.rorg(), Rorg::Ute);
        assert_eq!(short_ute.sender_id(), None);
        assert!(!short_ute.is_teach_in());

        for len in 1..5 {
            let short_vld = radio(&[0xD2, 0x01, 0x02, 0x03, 0x04][..len]);
            assert_eq!(short_vld.sender_id(), None);
        }
    }

    #[test]
    fn test_optional_data_accessors() {
        let telegram = RadioTelegram::classify(Envelope::from_parts(
            PacketType::RadioErp1,
            vec![0xF6, 0x30, 0x00, 0x2E, 0xE1, 0xBD, 0x30],
            vec![0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x2D, 0x00],
        ));

        assert_eq!(telegram.subtelegram_count(), Some(1));
        assert_eq!(telegram.destination_id(), Some([0xFF; 4]));
        assert_eq!(telegram.dbm(), Some(-45));
        assert_eq!(telegram.security_level(), Some(0));

        let bare = radio(&[0xF6, 0x30, 0x00, 0x2E, 0xE1, 0xBD, 0x30]);
        assert_eq!(bare.dbm(), None);
        assert_eq!(bare.destination_id(), None);
    }

    #[test]
    fn test_new_outbound_telegram() {
        let telegram = RadioTelegram::new(Rorg::FourBs, &[0x00, 0x00, 0x64, 0x08], [0xFF, 0x80, 0x00, 0x01], 0x00, Vec::new()).unwrap();

        assert_eq!(
            telegram.envelope().data(),
            &[0xA5, 0x00, 0x00, 0x64, 0x08, 0xFF, 0x80, 0x00, 0x01, 0x00]
        );
        assert_eq!(telegram.sender_id(), Some([0xFF, 0x80, 0x00, 0x01]));
        assert!(!telegram.is_teach_in());
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = RadioTelegram::new(Rorg::Rps, &[0x10, 0x20], [0; 4], 0x30, Vec::new());
        assert_eq!(
            result,
            Err(CodecError::LengthMismatch {
                required: 1,
                available: 2
            })
        );

        let result = RadioTelegram::new(Rorg::Unknown, &[], [0; 4], 0x00, Vec::new());
        assert_eq!(result, Err(CodecError::UnsupportedRorg(0x00)));

        // Variable-length RORGs accept any user data length
        let vld = RadioTelegram::new(Rorg::Vld, &[0x01, 0x02, 0x03], [1, 2, 3, 4], 0x00, Vec::new()).unwrap();
        assert_eq!(vld.user_data(), &[0x01, 0x02, 0x03]);
    }
}
