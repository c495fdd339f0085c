//! # ESP2 ↔ ESP3 Conversion
//!
//! Maps legacy ESP2 frames onto ESP3-shaped packets and back.
//!
//! Only the subset both protocols share survives the trip: RPS, 1BS and 4BS
//! radio telegrams plus the base id and version commands. Telegrams ESP2
//! cannot express fail with an `Unsupported*` error; ESP2 frames with no ESP3
//! counterpart decode to `None`.

use tracing::{debug, warn};

use super::protocol::*;
use crate::error::{CodecError, CodecResult};
use crate::packet::factory::{co_rd_idbase, co_rd_version, co_wr_idbase};
use crate::packet::response::{APP_DESCRIPTION_LENGTH, VERSION_RESPONSE_LENGTH};
use crate::packet::{
    CommandCode, CommonCommand, CommonCommandType, Packet, PacketType, RadioTelegram,
    ResponseTelegram, ResponseType, Rorg, SenderId,
};

/// Description reported for ESP2 transceivers in synthetic version responses
pub const ESP2_APP_DESCRIPTION: &[u8; APP_DESCRIPTION_LENGTH] = b"ESP2 Transceiver";

/// Decode an ESP2 frame into an ESP3-shaped packet
///
/// # Returns
///
/// * `Ok(Some(packet))` - Frame has an ESP3 equivalent
/// * `Ok(None)` - Frame is valid but carries nothing ESP3 can express
///
/// # Errors
///
/// Returns error if the frame fails sync, header or checksum validation
pub fn decode_legacy(bytes: &[u8]) -> CodecResult<Option<Packet>> {
    let frame = Esp2Frame::decode(bytes)?;

    let packet = match frame.packet_type {
        Esp2PacketType::ReceiveRadioTelegram | Esp2PacketType::TransmitRadioTelegram => {
            radio_from_frame(&frame)?
        }
        Esp2PacketType::ReceiveMessageTelegram => match response_from_frame(&frame) {
            Some(response) => Some(response.into()),
            None => {
                // Some transceivers report telegrams on the message channel
                debug!("ESP2 message code 0x{:02X} unknown, trying radio", frame.org);
                radio_from_frame(&frame)?
            }
        },
        Esp2PacketType::TransmitCommandTelegram => command_from_frame(&frame),
    };

    Ok(packet)
}

/// Encode an ESP3-shaped packet as a 14-byte ESP2 frame
///
/// Radio telegrams always leave as Transmit-Radio frames, so a received
/// frame comes back with the transmit header and a recomputed checksum.
///
/// # Errors
///
/// Returns error if:
/// - The packet kind has no outbound ESP2 form (`UnsupportedDirection`)
/// - The RORG is not RPS, 1BS or 4BS (`UnsupportedRorg`); for ERP2 the error
///   carries the ERP2 header byte
/// - The command is not a base id or version command (`UnsupportedCommand`)
/// - The radio telegram is too short to carry a sender id (`LengthMismatch`)
pub fn encode_legacy(packet: &Packet) -> CodecResult<Vec<u8>> {
    let frame = match packet {
        Packet::Radio(telegram) => radio_to_frame(telegram)?,
        Packet::CommonCommand(command) => command_to_frame(command)?,
        Packet::Other(envelope) if envelope.kind() == PacketType::RadioErp2 => {
            radio_to_frame(&radio_from_erp2(envelope.data())?)?
        }
        other => return Err(CodecError::UnsupportedDirection(other.kind())),
    };

    Ok(frame.encode().to_vec())
}

fn rorg_for_org(org: Esp2Org) -> Rorg {
    match org {
        Esp2Org::Rps => Rorg::Rps,
        Esp2Org::OneBs => Rorg::OneBs,
        Esp2Org::FourBs => Rorg::FourBs,
    }
}

fn org_for_rorg(rorg: Rorg) -> Option<Esp2Org> {
    match rorg {
        Rorg::Rps => Some(Esp2Org::Rps),
        Rorg::OneBs => Some(Esp2Org::OneBs),
        Rorg::FourBs => Some(Esp2Org::FourBs),
        _ => None,
    }
}

fn radio_from_frame(frame: &Esp2Frame) -> CodecResult<Option<Packet>> {
    let Some(org) = Esp2Org::from_code(frame.org) else {
        warn!(
            "Dropping ESP2 {} frame with unknown org 0x{:02X}",
            frame.packet_type, frame.org
        );
        return Ok(None);
    };

    let rorg = rorg_for_org(org);
    // RPS and 1BS carry their single data byte in D3
    let user_data = match org {
        Esp2Org::Rps | Esp2Org::OneBs => &frame.data[..1],
        Esp2Org::FourBs => &frame.data[..],
    };

    let telegram = RadioTelegram::new(rorg, user_data, frame.sender_id, frame.status, Vec::new())?;
    Ok(Some(telegram.into()))
}

fn response_from_frame(frame: &Esp2Frame) -> Option<ResponseTelegram> {
    let response = Esp2Response::from_code(frame.org)?;

    let telegram = match response {
        Esp2Response::Ok => ResponseTelegram::new(ResponseType::RetOk, &[], Vec::new()),
        Esp2Response::Err
        | Esp2Response::ErrSyntaxHSeq
        | Esp2Response::ErrSyntaxLength
        | Esp2Response::ErrSyntaxChecksum
        | Esp2Response::ErrSyntaxOrg => ResponseTelegram::new(ResponseType::RetError, &[], Vec::new()),
        Esp2Response::ErrIdRange | Esp2Response::ErrTxIdRange => {
            ResponseTelegram::new(ResponseType::RetBaseIdOutOfRange, &[], Vec::new())
        }
        Esp2Response::InfIdBase => ResponseTelegram::new(ResponseType::RetOk, &frame.data, Vec::new()),
        Esp2Response::InfSwVersion => {
            ResponseTelegram::new(ResponseType::RetOk, &version_payload(frame.data), Vec::new())
        }
    };

    Some(telegram)
}

/// Synthetic CO_RD_VERSION payload: app version, zeroed api/chip fields, description
fn version_payload(firmware: [u8; ESP2_DATA_LENGTH]) -> Vec<u8> {
    let mut payload = vec![0u8; VERSION_RESPONSE_LENGTH - 1];
    payload[..ESP2_DATA_LENGTH].copy_from_slice(&firmware);

    let description_offset = payload.len() - APP_DESCRIPTION_LENGTH;
    payload[description_offset..].copy_from_slice(ESP2_APP_DESCRIPTION);
    payload
}

fn command_from_frame(frame: &Esp2Frame) -> Option<Packet> {
    match Esp2Command::from_code(frame.org) {
        Some(Esp2Command::RdIdBase) => Some(co_rd_idbase()),
        Some(Esp2Command::RdSwVersion) => Some(co_rd_version()),
        Some(Esp2Command::SetIdBase) => Some(co_wr_idbase(frame.data)),
        None => {
            warn!("Dropping ESP2 command frame with unknown code 0x{:02X}", frame.org);
            None
        }
    }
}

fn radio_to_frame(telegram: &RadioTelegram) -> CodecResult<Esp2Frame> {
    let rorg = telegram.rorg();
    let org = org_for_rorg(rorg).ok_or(CodecError::UnsupportedRorg(rorg.code()))?;

    let (sender_id, status) = match (telegram.sender_id(), telegram.status()) {
        (Some(sender_id), Some(status)) => (sender_id, status),
        _ => {
            return Err(CodecError::LengthMismatch {
                required: fixed_radio_length(rorg),
                available: telegram.envelope().data().len(),
            })
        }
    };

    let mut data = [0u8; ESP2_DATA_LENGTH];
    let user_data = telegram.user_data();
    let copied = user_data.len().min(ESP2_DATA_LENGTH);
    data[..copied].copy_from_slice(&user_data[..copied]);

    Ok(Esp2Frame {
        packet_type: Esp2PacketType::TransmitRadioTelegram,
        org: org.code(),
        data,
        sender_id,
        status,
    })
}

/// ERP2 header: address control (bits 7..5), extended header (bit 4), telegram type (bits 3..0)
const ERP2_ADDRESS_SHIFT: u8 = 5;
const ERP2_EXTENDED_HEADER: u8 = 0x10;
const ERP2_TELEGRAM_TYPE_MASK: u8 = 0x0F;

/// Rebuild an ERP2 telegram as the equivalent ERP1 radio telegram
///
/// Only telegrams without extended header or destination id map onto ESP2:
/// a 24 or 32-bit originator followed by RPS, 1BS or 4BS user data. ERP2 has
/// no status byte, so the status is zero. Trailing bytes (the ERP2 CRC) are ignored.
fn radio_from_erp2(data: &[u8]) -> CodecResult<RadioTelegram> {
    let header = *data.first().ok_or(CodecError::LengthMismatch {
        required: 1,
        available: 0,
    })?;

    let id_length = match header >> ERP2_ADDRESS_SHIFT {
        0b000 => 3,
        0b001 => 4,
        _ => return Err(CodecError::UnsupportedRorg(header)),
    };
    if header & ERP2_EXTENDED_HEADER != 0 {
        return Err(CodecError::UnsupportedRorg(header));
    }
    let rorg = match header & ERP2_TELEGRAM_TYPE_MASK {
        0x00 => Rorg::Rps,
        0x01 => Rorg::OneBs,
        0x02 => Rorg::FourBs,
        _ => return Err(CodecError::UnsupportedRorg(header)),
    };

    let data_length = rorg.data_length().unwrap_or_default();
    let required = 1 + id_length + data_length;
    if data.len() < required {
        return Err(CodecError::LengthMismatch {
            required,
            available: data.len(),
        });
    }

    // 24-bit originators are zero-extended
    let mut sender_id: SenderId = [0u8; 4];
    sender_id[4 - id_length..].copy_from_slice(&data[1..1 + id_length]);
    let user_data = &data[1 + id_length..required];

    RadioTelegram::new(rorg, user_data, sender_id, 0, Vec::new())
}

/// RORG byte + user data + sender id + status
fn fixed_radio_length(rorg: Rorg) -> usize {
    1 + rorg.data_length().unwrap_or_default() + 4 + 1
}

fn command_to_frame(command: &CommonCommand) -> CodecResult<Esp2Frame> {
    let (code, data) = match command.command() {
        CommonCommandType::CoRdIdBase => (Esp2Command::RdIdBase, [0u8; ESP2_DATA_LENGTH]),
        CommonCommandType::CoRdVersion => (Esp2Command::RdSwVersion, [0u8; ESP2_DATA_LENGTH]),
        CommonCommandType::CoWrIdBase => {
            let base_id: SenderId = command
                .params()
                .get(..ESP2_DATA_LENGTH)
                .and_then(|params| params.try_into().ok())
                .ok_or(CodecError::LengthMismatch {
                    required: ESP2_DATA_LENGTH,
                    available: command.params().len(),
                })?;
            (Esp2Command::SetIdBase, base_id)
        }
        other => return Err(CodecError::UnsupportedCommand(other.code())),
    };

    Ok(Esp2Frame {
        packet_type: Esp2PacketType::TransmitCommandTelegram,
        org: code.code(),
        data,
        sender_id: [0u8; 4],
        status: 0,
    })
}
