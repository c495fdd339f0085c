//! # Telegram Monitor
//!
//! Reads a transceiver byte stream, splits it into frames, decodes them and
//! writes one JSON line per packet.
//!
//! This module handles:
//! - Binary and hex-line input encodings
//! - Framing through [`FrameBuffer`]
//! - Dropping (and counting) frames that fail to decode

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::codec::{Esp2, Esp3, WireProtocol};
use crate::config::{Config, InputEncoding, Protocol};
use crate::error::{EnoceanError, Result};
use crate::report::TelegramRecord;
use crate::stream::{FrameBuffer, FrameBufferStats};

/// Read size for binary input
const READ_CHUNK_SIZE: usize = 1024;

/// Counters reported when the monitor stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Complete frames extracted from the stream
    pub frames: u64,

    /// Frames decoded and written as records
    pub packets: u64,

    /// Valid frames without a packet equivalent
    pub skipped: u64,

    /// Frames (or hex lines) rejected with an error
    pub errors: u64,

    pub buffer: FrameBufferStats,
}

/// Run the monitor with the protocol selected in `config`
pub async fn run_configured<R, W>(reader: R, writer: W, config: &Config) -> Result<MonitorStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match config.input.protocol {
        Protocol::Esp3 => run::<Esp3, R, W>(reader, writer, config).await,
        Protocol::Esp2 => run::<Esp2, R, W>(reader, writer, config).await,
    }
}

/// Run the monitor until `reader` reaches end of stream
///
/// # Errors
///
/// Returns error on I/O failures of the reader or writer. Frames that fail to
/// decode are logged and counted, never returned.
pub async fn run<P, R, W>(reader: R, mut writer: W, config: &Config) -> Result<MonitorStats>
where
    P: WireProtocol,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut frames = FrameBuffer::<P>::with_max_buffer(config.input.max_buffer_bytes);
    let mut stats = MonitorStats::default();
    let include_raw = config.output.include_raw;

    match config.input.encoding {
        InputEncoding::Binary => {
            let mut reader = reader;
            let mut chunk = [0u8; READ_CHUNK_SIZE];
            loop {
                let read = reader.read(&mut chunk).await?;
                if read == 0 {
                    break;
                }
                for frame in frames.push(&chunk[..read]) {
                    handle_frame::<P, W>(&frame, &mut writer, include_raw, &mut stats).await?;
                }
            }
        }
        InputEncoding::Hex => {
            let mut lines = BufReader::new(reader).lines();
            while let Some(line) = lines.next_line().await? {
                let bytes = match parse_hex_line(&line) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Skipping input line: {}", e);
                        stats.errors += 1;
                        continue;
                    }
                };
                for frame in frames.push(&bytes) {
                    handle_frame::<P, W>(&frame, &mut writer, include_raw, &mut stats).await?;
                }
            }
        }
    }

    if !frames.is_empty() {
        debug!("{} bytes of incomplete frame left at end of input", frames.len());
    }

    writer.flush().await?;
    stats.buffer = frames.stats();
    Ok(stats)
}

/// Decode a hex line, ignoring whitespace
fn parse_hex_line(line: &str) -> Result<Vec<u8>> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(compact).map_err(EnoceanError::from)
}

async fn handle_frame<P, W>(frame: &[u8], writer: &mut W, include_raw: bool, stats: &mut MonitorStats) -> Result<()>
where
    P: WireProtocol,
    W: AsyncWrite + Unpin,
{
    stats.frames += 1;

    let packet = match P::decode(frame) {
        Ok(Some(packet)) => packet,
        Ok(None) => {
            stats.skipped += 1;
            return Ok(());
        }
        Err(e) => {
            warn!("Dropping {} frame: {}", P::NAME, e);
            stats.errors += 1;
            return Ok(());
        }
    };

    let raw = include_raw.then_some(frame);
    let line = TelegramRecord::now(&packet, P::NAME, raw).to_json_line()?;

    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    stats.packets += 1;

    Ok(())
}
