//! # EnOcean Codec Library
//!
//! Byte-exact codec for the EnOcean Serial Protocol 3 with a bridge to the
//! legacy ESP2 framing.
//!
//! This library turns raw transceiver bytes into classified packets (radio
//! telegrams, responses, events, commands) and serializes packets back into
//! frames. It performs no I/O apart from the optional monitor loop.

pub mod codec;
pub mod config;
pub mod error;
pub mod esp2;
pub mod esp3;
pub mod monitor;
pub mod packet;
pub mod report;
pub mod stream;

pub use codec::{Esp2, Esp3, WireProtocol};
pub use error::{CodecError, CodecResult};
pub use esp2::{decode_legacy, encode_legacy};
pub use esp3::decoder::decode;
pub use esp3::encoder::encode;
pub use packet::Packet;
