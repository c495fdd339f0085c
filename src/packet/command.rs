//! # COMMON_COMMAND and SMART_ACK_COMMAND Packets
//!
//! Host-to-transceiver commands. The first data byte is the command code; each
//! code has a fixed data length (command byte included), except CO_WR_MEM.

use std::fmt;

use super::envelope::Envelope;
use crate::error::{CodecError, CodecResult};
use crate::esp3::protocol::PacketType;

/// A command code enumeration bound to its packet type
pub trait CommandCode: Copy + Eq + fmt::Debug + fmt::Display {
    /// Packet type carrying these commands
    const KIND: PacketType;

    fn code(self) -> u8;

    fn from_code(code: u8) -> Option<Self>;

    /// Data length including the command byte, `None` if variable
    fn data_length(self) -> Option<usize>;
}

/// Common command codes (packet type 0x05)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommonCommandType {
    CoWrSleep = 0x01,
    CoWrReset = 0x02,
    CoRdVersion = 0x03,
    CoRdSysLog = 0x04,
    CoWrSysLog = 0x05,
    CoWrBist = 0x06,
    CoWrIdBase = 0x07,
    CoRdIdBase = 0x08,
    CoWrRepeater = 0x09,
    CoRdRepeater = 0x0A,
    CoWrFilterAdd = 0x0B,
    CoWrFilterDel = 0x0C,
    CoWrFilterDelAll = 0x0D,
    CoWrFilterEnable = 0x0E,
    CoRdFilter = 0x0F,
    CoWrWaitMaturity = 0x10,
    CoWrSubtel = 0x11,
    CoWrMem = 0x12,
    CoRdMem = 0x13,
    CoRdMemAddress = 0x14,
    CoRdSecurity = 0x15,
    CoWrSecurity = 0x16,
    CoWrLearnMode = 0x17,
    CoRdLearnMode = 0x18,
    CoWrSecureDeviceAdd = 0x19,
    CoWrSecureDeviceDel = 0x1A,
    CoRdSecureDeviceByIndex = 0x1B,
    CoWrMode = 0x1C,
    CoRdNumSecureDevices = 0x1D,
    CoRdSecureDeviceById = 0x1E,
    CoRdDutyCycleLimit = 0x23,
    CoSetBaudrate = 0x24,
    CoGetFrequencyInfo = 0x25,
    CoGetStepCode = 0x27,
}

/// Code and data length of every common command
const COMMON_COMMANDS: [(CommonCommandType, Option<usize>); 34] = [
    (CommonCommandType::CoWrSleep, Some(5)),
    (CommonCommandType::CoWrReset, Some(1)),
    (CommonCommandType::CoRdVersion, Some(1)),
    (CommonCommandType::CoRdSysLog, Some(1)),
    (CommonCommandType::CoWrSysLog, Some(1)),
    (CommonCommandType::CoWrBist, Some(1)),
    (CommonCommandType::CoWrIdBase, Some(5)),
    (CommonCommandType::CoRdIdBase, Some(1)),
    (CommonCommandType::CoWrRepeater, Some(3)),
    (CommonCommandType::CoRdRepeater, Some(1)),
    (CommonCommandType::CoWrFilterAdd, Some(7)),
    (CommonCommandType::CoWrFilterDel, Some(6)),
    (CommonCommandType::CoWrFilterDelAll, Some(1)),
    (CommonCommandType::CoWrFilterEnable, Some(3)),
    (CommonCommandType::CoRdFilter, Some(1)),
    (CommonCommandType::CoWrWaitMaturity, Some(2)),
    (CommonCommandType::CoWrSubtel, Some(2)),
    (CommonCommandType::CoWrMem, None),
    (CommonCommandType::CoRdMem, Some(7)),
    (CommonCommandType::CoRdMemAddress, Some(2)),
    (CommonCommandType::CoRdSecurity, Some(1)),
    (CommonCommandType::CoWrSecurity, Some(10)),
    (CommonCommandType::CoWrLearnMode, Some(6)),
    (CommonCommandType::CoRdLearnMode, Some(1)),
    (CommonCommandType::CoWrSecureDeviceAdd, Some(25)),
    (CommonCommandType::CoWrSecureDeviceDel, Some(5)),
    (CommonCommandType::CoRdSecureDeviceByIndex, Some(2)),
    (CommonCommandType::CoWrMode, Some(2)),
    (CommonCommandType::CoRdNumSecureDevices, Some(1)),
    (CommonCommandType::CoRdSecureDeviceById, Some(5)),
    (CommonCommandType::CoRdDutyCycleLimit, Some(1)),
    (CommonCommandType::CoSetBaudrate, Some(2)),
    (CommonCommandType::CoGetFrequencyInfo, Some(1)),
    (CommonCommandType::CoGetStepCode, Some(1)),
];

impl CommandCode for CommonCommandType {
    const KIND: PacketType = PacketType::CommonCommand;

    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Option<Self> {
        COMMON_COMMANDS
            .iter()
            .find(|(command, _)| command.code() == code)
            .map(|&(command, _)| command)
    }

    fn data_length(self) -> Option<usize> {
        COMMON_COMMANDS
            .iter()
            .find(|(command, _)| *command == self)
            .and_then(|&(_, length)| length)
    }
}

impl fmt::Display for CommonCommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CoWrSleep => "CO_WR_SLEEP",
            Self::CoWrReset => "CO_WR_RESET",
            Self::CoRdVersion => "CO_RD_VERSION",
            Self::CoRdSysLog => "CO_RD_SYS_LOG",
            Self::CoWrSysLog => "CO_WR_SYS_LOG",
            Self::CoWrBist => "CO_WR_BIST",
            Self::CoWrIdBase => "CO_WR_IDBASE",
            Self::CoRdIdBase => "CO_RD_IDBASE",
            Self::CoWrRepeater => "CO_WR_REPEATER",
            Self::CoRdRepeater => "CO_RD_REPEATER",
            Self::CoWrFilterAdd => "CO_WR_FILTER_ADD",
            Self::CoWrFilterDel => "CO_WR_FILTER_DEL",
            Self::CoWrFilterDelAll => "CO_WR_FILTER_DEL_ALL",
            Self::CoWrFilterEnable => "CO_WR_FILTER_ENABLE",
            Self::CoRdFilter => "CO_RD_FILTER",
            Self::CoWrWaitMaturity => "CO_WR_WAIT_MATURITY",
            Self::CoWrSubtel => "CO_WR_SUBTEL",
            Self::CoWrMem => "CO_WR_MEM",
            Self::CoRdMem => "CO_RD_MEM",
            Self::CoRdMemAddress => "CO_RD_MEM_ADDRESS",
            Self::CoRdSecurity => "CO_RD_SECURITY",
            Self::CoWrSecurity => "CO_WR_SECURITY",
            Self::CoWrLearnMode => "CO_WR_LEARNMODE",
            Self::CoRdLearnMode => "CO_RD_LEARNMODE",
            Self::CoWrSecureDeviceAdd => "CO_WR_SECUREDEVICE_ADD",
            Self::CoWrSecureDeviceDel => "CO_WR_SECUREDEVICE_DEL",
            Self::CoRdSecureDeviceByIndex => "CO_RD_SECUREDEVICE_BY_INDEX",
            Self::CoWrMode => "CO_WR_MODE",
            Self::CoRdNumSecureDevices => "CO_RD_NUMSECUREDEVICES",
            Self::CoRdSecureDeviceById => "CO_RD_SECUREDEVICE_BY_ID",
            Self::CoRdDutyCycleLimit => "CO_RD_DUTYCYCLE_LIMIT",
            Self::CoSetBaudrate => "CO_SET_BAUDRATE",
            Self::CoGetFrequencyInfo => "CO_GET_FREQUENCY_INFO",
            Self::CoGetStepCode => "CO_GET_STEPCODE",
        };
        f.write_str(name)
    }
}

/// Smart Ack command codes (packet type 0x06)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SmartAckType {
    SaWrLearnMode = 0x01,
    SaRdLearnMode = 0x02,
    SaWrLearnConfirm = 0x03,
    SaWrClientLearnRq = 0x04,
    SaWrReset = 0x05,
    SaRdLearnedClients = 0x06,
    SaWrReclaims = 0x07,
    SaWrPostmaster = 0x08,
}

impl CommandCode for SmartAckType {
    const KIND: PacketType = PacketType::SmartAckCommand;

    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::SaWrLearnMode),
            0x02 => Some(Self::SaRdLearnMode),
            0x03 => Some(Self::SaWrLearnConfirm),
            0x04 => Some(Self::SaWrClientLearnRq),
            0x05 => Some(Self::SaWrReset),
            0x06 => Some(Self::SaRdLearnedClients),
            0x07 => Some(Self::SaWrReclaims),
            0x08 => Some(Self::SaWrPostmaster),
            _ => None,
        }
    }

    fn data_length(self) -> Option<usize> {
        let length = match self {
            Self::SaWrLearnMode => 7,
            Self::SaRdLearnMode => 1,
            Self::SaWrLearnConfirm => 12,
            Self::SaWrClientLearnRq => 6,
            Self::SaWrReset => 5,
            Self::SaRdLearnedClients => 1,
            Self::SaWrReclaims => 2,
            Self::SaWrPostmaster => 2,
        };
        Some(length)
    }
}

impl fmt::Display for SmartAckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SaWrLearnMode => "SA_WR_LEARNMODE",
            Self::SaRdLearnMode => "SA_RD_LEARNMODE",
            Self::SaWrLearnConfirm => "SA_WR_LEARNCONFIRM",
            Self::SaWrClientLearnRq => "SA_WR_CLIENTLEARNRQ",
            Self::SaWrReset => "SA_WR_RESET",
            Self::SaRdLearnedClients => "SA_RD_LEARNEDCLIENTS",
            Self::SaWrReclaims => "SA_WR_RECLAIMS",
            Self::SaWrPostmaster => "SA_WR_POSTMASTER",
        };
        f.write_str(name)
    }
}

/// Classified command packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<C> {
    envelope: Envelope,
    command: C,
}

/// COMMON_COMMAND packet
pub type CommonCommand = Command<CommonCommandType>;

/// SMART_ACK_COMMAND packet
pub type SmartAckCommand = Command<SmartAckType>;

impl<C: CommandCode> Command<C> {
    /// Classify a decoded envelope by its command byte
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` if the data segment is empty or the command
    /// code is not enumerated
    pub fn classify(envelope: Envelope) -> CodecResult<Self> {
        let code = envelope.data().first().copied().unwrap_or(0x00);
        let command = C::from_code(code).ok_or(CodecError::UnknownCommand { kind: C::KIND, code })?;

        Ok(Self {
            envelope,
            command,
        })
    }

    /// Assemble a command from its code and parameter bytes
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the parameters do not add up to the
    /// command's fixed data length
    pub fn new(command: C, params: &[u8], optional_data: Vec<u8>) -> CodecResult<Self> {
        if let Some(expected) = command.data_length() {
            if 1 + params.len() != expected {
                return Err(CodecError::LengthMismatch {
                    required: expected,
                    available: 1 + params.len(),
                });
            }
        }

        Ok(Self::assemble(command, params, optional_data))
    }

    /// Assemble without the length check, for builders with fixed parameters
    pub(crate) fn assemble(command: C, params: &[u8], optional_data: Vec<u8>) -> Self {
        let mut data = Vec::with_capacity(1 + params.len());
        data.push(command.code());
        data.extend_from_slice(params);

        Self {
            envelope: Envelope::from_parts(C::KIND, data, optional_data),
            command,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    pub fn command(&self) -> C {
        self.command
    }

    /// Parameter bytes after the command code
    pub fn params(&self) -> &[u8] {
        self.envelope.data().get(1..).unwrap_or_default()
    }
}
