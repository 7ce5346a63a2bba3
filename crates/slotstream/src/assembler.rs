use bytes::Bytes;
use tracing::debug;

use slotstream_frame::xor_checksum;

/// Accumulates payload chunks for the logical message currently being
/// received.
///
/// At most one message is under assembly at a time; the first chunk of a
/// new message discards any partial state.
#[derive(Debug, Default)]
pub struct InboundAssembler {
    chunks: Vec<Bytes>,
    expected_checksum: u8,
}

impl InboundAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new logical message, discarding any partial assembly and
    /// capturing the checksum the sender computed over the whole message.
    pub fn begin(&mut self, checksum: u8) {
        self.chunks.clear();
        self.expected_checksum = checksum;
    }

    /// Append one chunk at the tail.
    pub fn push(&mut self, chunk: Bytes) {
        self.chunks.push(chunk);
    }

    /// Attempt completion.
    ///
    /// With `remaining > 0` this is a no-op. At `remaining == 0` the
    /// chunks are concatenated and the message is returned only when its
    /// XOR matches the captured checksum; the chunk list is cleared either
    /// way. A mismatch drops the message silently — the sender is never
    /// told.
    pub fn try_complete(&mut self, remaining: u16) -> Option<Bytes> {
        if remaining > 0 {
            return None;
        }

        let total: usize = self.chunks.iter().map(Bytes::len).sum();
        let mut message = Vec::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            message.extend_from_slice(&chunk);
        }

        let actual = xor_checksum(&message);
        if actual != self.expected_checksum {
            debug!(
                expected = self.expected_checksum,
                actual, "checksum mismatch, dropping assembled message"
            );
            return None;
        }
        Some(Bytes::from(message))
    }

    /// Discard any partial assembly.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.expected_checksum = 0;
    }

    /// Whether no chunks are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
