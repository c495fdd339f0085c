//! Frame buffer for splitting a serial byte stream into frames.
//!
//! Uses `bytes::BytesMut` for buffer management. Bytes before a sync marker
//! are discarded; a header that fails validation costs one byte and the scan
//! resumes from there. The buffer never holds more than `max_buffer_bytes`.

use std::marker::PhantomData;

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::codec::WireProtocol;

/// Default upper bound on buffered bytes
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 4096;

/// Counters for bytes the buffer had to throw away
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameBufferStats {
    /// Bytes skipped while looking for a sync marker
    pub discarded_bytes: u64,

    /// Headers rejected after a sync marker was found
    pub resyncs: u64,

    /// Bytes dropped because the buffer was full
    pub overflow_bytes: u64,
}

/// Accumulates incoming bytes and extracts complete frames
pub struct FrameBuffer<P> {
    buffer: BytesMut,
    max_buffer_bytes: usize,
    stats: FrameBufferStats,
    _protocol: PhantomData<P>,
}

impl<P: WireProtocol> FrameBuffer<P> {
    pub fn new() -> Self {
        Self::with_max_buffer(DEFAULT_MAX_BUFFER_BYTES)
    }

    pub fn with_max_buffer(max_buffer_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_buffer_bytes),
            max_buffer_bytes,
            stats: FrameBufferStats::default(),
            _protocol: PhantomData,
        }
    }

    /// Push data into the buffer and extract all complete frames
    ///
    /// Partial frames stay buffered for the next push.
    pub fn push(&mut self, data: &[u8]) -> Vec<Bytes> {
        self.extend(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }

    /// Append data without extracting frames, dropping the oldest bytes on overflow
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        if self.buffer.len() > self.max_buffer_bytes {
            let excess = self.buffer.len() - self.max_buffer_bytes;
            warn!("{} buffer full, dropping {} oldest bytes", P::NAME, excess);
            self.buffer.advance(excess);
            self.stats.overflow_bytes += excess as u64;
        }
    }

    /// Extract the next complete frame, `None` if more data is needed
    pub fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            self.skip_to_sync();

            if self.buffer.len() < P::HEADER_LENGTH {
                return None;
            }

            match P::frame_length(&self.buffer[..P::HEADER_LENGTH]) {
                Ok(length) if length > self.max_buffer_bytes => {
                    warn!(
                        "{} frame of {} bytes exceeds buffer limit {}, resyncing",
                        P::NAME,
                        length,
                        self.max_buffer_bytes
                    );
                    self.resync();
                }
                Ok(length) => {
                    if self.buffer.len() < length {
                        return None;
                    }
                    return Some(self.buffer.split_to(length).freeze());
                }
                Err(e) => {
                    debug!("{} header rejected ({}), resyncing", P::NAME, e);
                    self.resync();
                }
            }
        }
    }

    /// Get the number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn stats(&self) -> FrameBufferStats {
        self.stats
    }

    /// Clear the buffer, keeping the counters
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn resync(&mut self) {
        self.buffer.advance(1);
        self.stats.resyncs += 1;
    }

    /// Drop everything before the first (possibly partial) sync marker
    fn skip_to_sync(&mut self) {
        let sync = P::SYNC;
        let position = (0..self.buffer.len())
            .find(|&i| {
                let rest = &self.buffer[i..];
                if rest.len() >= sync.len() {
                    rest.starts_with(sync)
                } else {
                    sync.starts_with(rest)
                }
            })
            .unwrap_or(self.buffer.len());

        if position > 0 {
            debug!("{} skipping {} bytes before sync", P::NAME, position);
            self.buffer.advance(position);
            self.stats.discarded_bytes += position as u64;
        }
    }
}

impl<P: WireProtocol> Default for FrameBuffer<P> {
    fn default() -> Self {
        Self::new()
    }
}
