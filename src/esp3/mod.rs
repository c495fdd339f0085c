//! # ESP3 Protocol Module
//!
//! Implementation of the EnOcean Serial Protocol 3 framing.
//!
//! This module handles:
//! - Frame serialization (sync, header, header CRC, payload, payload CRC)
//! - Frame validation and decoding into packets
//! - CRC8 checksum calculation

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod protocol;
