//! # Packet Factory
//!
//! Builds packets from a raw packet type code and payload bytes, and
//! assembles the outbound commands a gateway sends most often.

use super::command::{CommonCommand, CommonCommandType, SmartAckCommand, SmartAckType};
use super::envelope::Envelope;
use super::radio::SenderId;
use super::Packet;
use crate::error::CodecResult;

/// Build a packet from declared lengths and a payload buffer
///
/// # Arguments
///
/// * `packet_type` - Raw packet type code from the ESP3 header
/// * `data_length` - Declared data length
/// * `optional_length` - Declared optional data length
/// * `payload` - Data followed by optional data
///
/// # Returns
///
/// * `CodecResult<Packet>` - Classified packet
///
/// # Errors
///
/// Returns error if:
/// - The packet type code is not enumerated
/// - The declared lengths exceed the payload
/// - A command packet carries an unknown command code
pub fn build_packet(
    packet_type: u8,
    data_length: usize,
    optional_length: usize,
    payload: &[u8],
) -> CodecResult<Packet> {
    let envelope = Envelope::new(data_length, optional_length, packet_type, payload)?;
    Packet::from_envelope(envelope)
}

/// CO_RD_VERSION: read transceiver firmware version
pub fn co_rd_version() -> Packet {
    fixed(CommonCommandType::CoRdVersion, &[])
}

/// CO_RD_IDBASE: read the transceiver's base id
pub fn co_rd_idbase() -> Packet {
    fixed(CommonCommandType::CoRdIdBase, &[])
}

/// CO_WR_IDBASE: write a new base id (limited number of write cycles)
pub fn co_wr_idbase(base_id: SenderId) -> Packet {
    fixed(CommonCommandType::CoWrIdBase, &base_id)
}

/// CO_WR_RESET: reset the transceiver
pub fn co_wr_reset() -> Packet {
    fixed(CommonCommandType::CoWrReset, &[])
}

/// CO_WR_SLEEP: enter sleep mode for `period` × 10 ms
pub fn co_wr_sleep(period: u32) -> Packet {
    fixed(CommonCommandType::CoWrSleep, &period.to_be_bytes())
}

/// CO_WR_REPEATER: configure the built-in repeater
///
/// `level` is 1 or 2; it is ignored by the transceiver when disabled.
pub fn co_wr_repeater(enable: bool, level: u8) -> Packet {
    fixed(CommonCommandType::CoWrRepeater, &[enable as u8, level])
}

/// SA_WR_LEARNMODE: enable or disable Smart Ack learn mode
pub fn sa_wr_learnmode(enable: bool, extended: bool, timeout_ms: u32) -> Packet {
    let [t0, t1, t2, t3] = timeout_ms.to_be_bytes();
    smart_ack(
        SmartAckType::SaWrLearnMode,
        &[enable as u8, extended as u8, t0, t1, t2, t3],
    )
}

/// SA_RD_LEARNEDCLIENTS: list the Smart Ack clients in the mailbox table
pub fn sa_rd_learnedclients() -> Packet {
    smart_ack(SmartAckType::SaRdLearnedClients, &[])
}

/// SA_WR_RECLAIMS: number of reclaim attempts per client
pub fn sa_wr_reclaims(count: u8) -> Packet {
    smart_ack(SmartAckType::SaWrReclaims, &[count])
}

/// SA_WR_POSTMASTER: number of postmaster mailboxes (0 disables)
pub fn sa_wr_postmaster(mailboxes: u8) -> Packet {
    smart_ack(SmartAckType::SaWrPostmaster, &[mailboxes])
}

fn fixed(command: CommonCommandType, params: &[u8]) -> Packet {
    Packet::CommonCommand(CommonCommand::assemble(command, params, Vec::new()))
}

fn smart_ack(command: SmartAckType, params: &[u8]) -> Packet {
    Packet::SmartAck(SmartAckCommand::assemble(command, params, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::packet::command::CommandCode;
    use crate::esp3::protocol::PacketType;

    #[test]
    fn test_build_packet_dispatch() {
        let payload = [0xF6, 0x30, 0x00, 0x2E, 0xE1, 0xBD, 0x30, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x2D, 0x00];
        let packet = build_packet(0x01, 7, 7, &payload).unwrap();

        match packet {
            Packet::Radio(telegram) => {
                assert_eq!(telegram.sender_id(), Some([0x00, 0x2E, 0xE1, 0xBD]));
                assert_eq!(telegram.dbm(), Some(-45));
            }
            other => panic!("expected radio telegram, got {:?}", other),
        }
    }

    #[test]
    fn test_build_packet_errors() {
        assert_eq!(build_packet(0xFF, 1, 0, &[0x00]), Err(CodecError::UnknownPacketType(0xFF)));
        assert_eq!(
            build_packet(0x02, 2, 0, &[0x00]),
            Err(CodecError::LengthMismatch {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_command_builders_match_fixed_lengths() {
        let commands = [
            co_rd_version(),
            co_rd_idbase(),
            co_wr_idbase([0xFF, 0x80, 0x00, 0x00]),
            co_wr_reset(),
            co_wr_sleep(1000),
            co_wr_repeater(true, 1),
        ];

        for packet in commands {
            let Packet::CommonCommand(command) = &packet else {
                panic!("expected common command, got {:?}", packet);
            };
            assert_eq!(
                Some(command.envelope().data().len()),
                command.command().data_length(),
                "{}",
                command.command()
            );
        }

        let smart_acks = [
            sa_wr_learnmode(true, false, 60_000),
            sa_rd_learnedclients(),
            sa_wr_reclaims(5),
            sa_wr_postmaster(20),
        ];

        for packet in smart_acks {
            let Packet::SmartAck(command) = &packet else {
                panic!("expected smart ack command, got {:?}", packet);
            };
            assert_eq!(packet.kind(), PacketType::SmartAckCommand);
            assert_eq!(Some(command.envelope().data().len()), command.command().data_length());
        }
    }

    #[test]
    fn test_command_builder_bytes() {
        assert_eq!(co_wr_idbase([0xFF, 0x80, 0x00, 0x00]).envelope().data(), &[0x07, 0xFF, 0x80, 0x00, 0x00]);
        assert_eq!(co_wr_sleep(0x0102_0304).envelope().data(), &[0x01, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(
            sa_wr_learnmode(true, false, 60_000).envelope().data(),
            &[0x01, 0x01, 0x00, 0x00, 0x00, 0xEA, 0x60]
        );
    }
}
