//! # ESP2 Protocol Module
//!
//! Legacy EnOcean Serial Protocol 2 support.
//!
//! This module handles:
//! - Fixed 14-byte frame encoding and validation (additive checksum)
//! - Conversion between ESP2 frames and ESP3-shaped packets

pub mod converter;
pub mod protocol;

pub use converter::{decode_legacy, encode_legacy};
