//! # EVENT Packets
//!
//! Unsolicited notifications from the transceiver. Classified only.

use std::fmt;

use super::envelope::Envelope;

/// ESP3 event code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventType {
    Unknown = 0x00,
    SaReclaimNotSuccessful = 0x01,
    SaConfirmLearn = 0x02,
    SaLearnAck = 0x03,
    CoReady = 0x04,
    CoEventSecureDevices = 0x05,
    CoDutyCycleLimit = 0x06,
    CoTransmitFailed = 0x07,
}

impl EventType {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an event code; unknown codes map to `Unknown`
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::SaReclaimNotSuccessful,
            0x02 => Self::SaConfirmLearn,
            0x03 => Self::SaLearnAck,
            0x04 => Self::CoReady,
            0x05 => Self::CoEventSecureDevices,
            0x06 => Self::CoDutyCycleLimit,
            0x07 => Self::CoTransmitFailed,
            _ => Self::Unknown,
        }
    }

    /// Data length including the event code byte
    pub fn data_length(self) -> usize {
        match self {
            Self::Unknown => 0,
            Self::SaReclaimNotSuccessful => 1,
            Self::SaConfirmLearn => 17,
            Self::SaLearnAck => 4,
            Self::CoReady => 2,
            Self::CoEventSecureDevices => 6,
            Self::CoDutyCycleLimit => 2,
            Self::CoTransmitFailed => 2,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::SaReclaimNotSuccessful => "SA_RECLAIM_NOT_SUCCESSFUL",
            Self::SaConfirmLearn => "SA_CONFIRM_LEARN",
            Self::SaLearnAck => "SA_LEARN_ACK",
            Self::CoReady => "CO_READY",
            Self::CoEventSecureDevices => "CO_EVENT_SECUREDEVICES",
            Self::CoDutyCycleLimit => "CO_DUTYCYCLE_LIMIT",
            Self::CoTransmitFailed => "CO_TRANSMIT_FAILED",
        };
        f.write_str(name)
    }
}

/// Classified EVENT packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTelegram {
    envelope: Envelope,
    event_type: EventType,
}

impl EventTelegram {
    pub fn classify(envelope: Envelope) -> Self {
        let event_type = envelope
            .data()
            .first()
            .map_or(EventType::Unknown, |&code| EventType::from_code(code));

        Self {
            envelope,
            event_type,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }
}
