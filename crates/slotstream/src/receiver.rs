use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique handle identifying a stream to its receiver.
///
/// Handed out exactly once at construction so application code can route
/// callbacks from multiple streams without holding a reference back into
/// an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    pub(crate) fn next() -> Self {
        Self(NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

/// Upward-facing callbacks the application implements.
///
/// The engine owns its receiver; callbacks run synchronously inside
/// [`crate::MessageStream::tick`].
pub trait StreamReceiver {
    /// Called once at engine construction with the stream's handle.
    fn register_stream(&mut self, stream: StreamId);

    /// Called exactly once per successfully assembled, checksum-valid
    /// logical message.
    fn on_data(&mut self, value: Value);

    /// Called with `false` on every tick that accepts a frame and with
    /// `true` on every timeout expiry.
    fn on_timeout(&mut self, timed_out: bool, stream: StreamId);
}
