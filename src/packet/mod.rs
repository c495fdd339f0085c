//! # Packet Model
//!
//! Tagged-variant representation of decoded ESP3 packets.
//!
//! This module handles:
//! - Envelope construction with the length invariant
//! - RORG classification of ERP1 radio telegrams
//! - Response, event and command code classification
//! - Dispatch from packet type code to variant (packet factory)

pub mod command;
pub mod envelope;
pub mod event;
pub mod factory;
pub mod radio;
pub mod response;

pub use command::{CommandCode, CommonCommand, CommonCommandType, SmartAckCommand, SmartAckType};
pub use envelope::Envelope;
pub use event::{EventTelegram, EventType};
pub use radio::{RadioTelegram, Rorg, SenderId};
pub use response::{ResponseTelegram, ResponseType};

use crate::error::CodecResult;
pub use crate::esp3::protocol::PacketType;

/// One decoded ESP3 packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// RADIO_ERP1 telegram
    Radio(RadioTelegram),

    /// RESPONSE to a previously sent command
    Response(ResponseTelegram),

    /// EVENT notification
    Event(EventTelegram),

    /// COMMON_COMMAND
    CommonCommand(CommonCommand),

    /// SMART_ACK_COMMAND
    SmartAck(SmartAckCommand),

    /// Packet types without structured fields at this layer
    Other(Envelope),
}

impl Packet {
    /// Classify an envelope by its packet type
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` for command packets with an unenumerated
    /// command code. All other kinds always classify.
    pub fn from_envelope(envelope: Envelope) -> CodecResult<Self> {
        let packet = match envelope.kind() {
            PacketType::RadioErp1 => Self::Radio(RadioTelegram::classify(envelope)),
            PacketType::Response => Self::Response(ResponseTelegram::classify(envelope)),
            PacketType::Event => Self::Event(EventTelegram::classify(envelope)),
            PacketType::CommonCommand => Self::CommonCommand(CommonCommand::classify(envelope)?),
            PacketType::SmartAckCommand => Self::SmartAck(SmartAckCommand::classify(envelope)?),
            PacketType::RadioSubTelegram
            | PacketType::RemoteManCommand
            | PacketType::RadioMessage
            | PacketType::RadioErp2 => Self::Other(envelope),
        };

        Ok(packet)
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Self::Radio(telegram) => telegram.envelope(),
            Self::Response(telegram) => telegram.envelope(),
            Self::Event(telegram) => telegram.envelope(),
            Self::CommonCommand(command) => command.envelope(),
            Self::SmartAck(command) => command.envelope(),
            Self::Other(envelope) => envelope,
        }
    }

    pub fn into_envelope(self) -> Envelope {
        match self {
            Self::Radio(telegram) => telegram.into_envelope(),
            Self::Response(telegram) => telegram.into_envelope(),
            Self::Event(telegram) => telegram.into_envelope(),
            Self::CommonCommand(command) => command.into_envelope(),
            Self::SmartAck(command) => command.into_envelope(),
            Self::Other(envelope) => envelope,
        }
    }

    pub fn kind(&self) -> PacketType {
        self.envelope().kind()
    }
}

impl From<RadioTelegram> for Packet {
    fn from(telegram: RadioTelegram) -> Self {
        Self::Radio(telegram)
    }
}

impl From<ResponseTelegram> for Packet {
    fn from(telegram: ResponseTelegram) -> Self {
        Self::Response(telegram)
    }
}

impl From<CommonCommand> for Packet {
    fn from(command: CommonCommand) -> Self {
        Self::CommonCommand(command)
    }
}

impl From<SmartAckCommand> for Packet {
    fn from(command: SmartAckCommand) -> Self {
        Self::SmartAck(command)
    }
}
