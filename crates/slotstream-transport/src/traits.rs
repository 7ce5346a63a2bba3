use bytes::Bytes;

/// A half-duplex slot transport: one frame-sized message in each direction.
///
/// `read` is idempotent and non-destructive — successive calls may return
/// the same frame, and callers must never rely on reads draining the
/// channel. Duplicate suppression is the protocol engine's job.
pub trait SlotTransport {
    /// Atomically replace the outbound slot with `frame`.
    fn send(&mut self, frame: Bytes);

    /// The current inbound slot, if any. May return the same frame on
    /// successive calls.
    fn read(&mut self) -> Option<Bytes>;

    /// Best-effort drain of the outbound slot. May be a no-op.
    fn clear(&mut self);

    /// Maximum frame size this transport transmits intact.
    fn block_size(&self) -> usize;

    /// The role this endpoint plays in the conversation.
    fn is_controller(&self) -> bool;
}
