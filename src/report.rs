//! # Telegram Records
//!
//! One JSON line per decoded telegram, with byte fields as upper-case hex.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::packet::Packet;

/// Serializable summary of one decoded packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramRecord {
    /// RFC 3339 receive time, millisecond precision
    pub timestamp: String,

    /// Wire protocol the frame arrived on ("esp3" or "esp2")
    pub protocol: &'static str,

    pub packet_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rorg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teach_in: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbm: Option<i16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    pub data: String,

    pub optional_data: String,

    /// Complete wire frame, omitted when disabled in the output config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl TelegramRecord {
    /// Summarize a packet received at `timestamp`
    ///
    /// # Arguments
    ///
    /// * `packet` - Decoded packet
    /// * `protocol` - Wire protocol name
    /// * `raw` - Frame bytes to include, `None` to omit
    /// * `timestamp` - Receive time
    pub fn new(packet: &Packet, protocol: &'static str, raw: Option<&[u8]>, timestamp: DateTime<Utc>) -> Self {
        let envelope = packet.envelope();

        let mut record = Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            protocol,
            packet_type: envelope.kind().name().to_string(),
            rorg: None,
            sender_id: None,
            teach_in: None,
            dbm: None,
            response: None,
            event: None,
            command: None,
            data: hex::encode_upper(envelope.data()),
            optional_data: hex::encode_upper(envelope.optional_data()),
            raw: raw.map(hex::encode_upper),
        };

        match packet {
            Packet::Radio(telegram) => {
                record.rorg = Some(telegram.rorg().to_string());
                record.sender_id = telegram.sender_id().map(hex::encode_upper);
                record.teach_in = Some(telegram.is_teach_in());
                record.dbm = telegram.dbm();
            }
            Packet::Response(telegram) => record.response = Some(telegram.response_type().to_string()),
            Packet::Event(telegram) => record.event = Some(telegram.event_type().to_string()),
            Packet::CommonCommand(command) => record.command = Some(command.command().to_string()),
            Packet::SmartAck(command) => record.command = Some(command.command().to_string()),
            Packet::Other(_) => {}
        }

        record
    }

    /// Summarize a packet received now
    pub fn now(packet: &Packet, protocol: &'static str, raw: Option<&[u8]>) -> Self {
        Self::new(packet, protocol, raw, Utc::now())
    }

    /// Serialize as a single JSON line without the trailing newline
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
