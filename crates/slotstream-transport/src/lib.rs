//! Transport capability layer for slotstream.
//!
//! A slot transport carries at most one frame in each direction: `send`
//! atomically replaces the outbound slot, `read` observes the current
//! inbound slot without draining it, and neither side can tell whether the
//! peer has looked at a slot yet. Real hosts supply thin shims over a
//! screen surface or a radio emitter/receiver pair; the in-memory loopback
//! here backs the test harness.

pub mod loopback;
pub mod traits;

pub use loopback::LoopbackTransport;
pub use traits::SlotTransport;
