use std::collections::VecDeque;

use bytes::Bytes;
use tracing::debug;

use slotstream_frame::{xor_checksum, Command, Frame};

use crate::error::{Result, StreamError};

/// The outbound sequence field is a single decimal digit.
const SEQ_MODULUS: u8 = 10;

/// Hard ceiling on chunks per logical message; the remaining-chunk field
/// counts down from `MAX_CHUNKS - 1`.
const MAX_CHUNKS: usize = 999;

/// Pre-encoded frames waiting for their slot on the wire, plus the
/// sequence counter that stamps every encoded frame.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    frames: VecDeque<Bytes>,
    waiting_for_reply: bool,
    seq: u8,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp for the next encoded frame. Advances by one on every call,
    /// wrapping 9 -> 0.
    pub fn next_seq(&mut self) -> u8 {
        let seq = self.seq;
        self.seq = (self.seq + 1) % SEQ_MODULUS;
        seq
    }

    /// Split a serialized message into Data frames and queue them in send
    /// order.
    ///
    /// The checksum covers the whole message and rides on the first chunk
    /// only; `remaining` counts down to 0 on the last chunk. An empty
    /// message queues a single empty chunk.
    pub fn enqueue_message(&mut self, message: &[u8], chunk_size: usize) -> Result<()> {
        let chunk_count = if message.is_empty() {
            1
        } else {
            message.len().div_ceil(chunk_size)
        };
        if chunk_count > MAX_CHUNKS {
            return Err(StreamError::TooLargeData);
        }

        let checksum = xor_checksum(message);
        for index in 0..chunk_count {
            let start = index * chunk_size;
            let end = message.len().min(start + chunk_size);
            let first = index == 0;
            let frame = Frame {
                first,
                checksum: if first { checksum } else { 0 },
                remaining: (chunk_count - 1 - index) as u16,
                seq: self.next_seq(),
                command: Command::Data,
                payload: Bytes::copy_from_slice(&message[start..end]),
            };
            self.frames.push_back(frame.encode()?);
        }

        debug!(
            chunks = chunk_count,
            bytes = message.len(),
            "message queued"
        );
        Ok(())
    }

    /// Queue a single pre-encoded frame behind any waiting chunks.
    pub fn push_frame(&mut self, frame: Bytes) {
        self.frames.push_back(frame);
    }

    /// Dequeue the next frame to transmit.
    pub fn pop_frame(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }

    /// Number of frames still queued.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Controller flag: a frame is in flight and no reply has been seen.
    pub fn waiting_for_reply(&self) -> bool {
        self.waiting_for_reply
    }

    pub fn set_waiting_for_reply(&mut self, waiting: bool) {
        self.waiting_for_reply = waiting;
    }

    /// Drop queued frames and the reply flag. The sequence counter is
    /// kept: frames encoded after a reset must not alias the peer's
    /// duplicate filter.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.waiting_for_reply = false;
    }
}
