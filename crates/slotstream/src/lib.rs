//! Reliable, chunked, half-duplex messaging over slot transports.
//!
//! Two peers — an initiating controller and a reactive worker — exchange
//! structured values across a transport whose only primitives are
//! "replace the outbound slot" and "observe the inbound slot". Neither
//! side can tell whether the peer has read a slot, and reads never drain
//! it. The engine splits serialized messages into frame-sized chunks,
//! suppresses the duplicates a non-destructive read produces, verifies
//! reassembled messages with an XOR checksum, and recovers from dead
//! peers by timeout.
//!
//! The controller drives the conversation: it keeps exactly one frame in
//! flight and polls whenever it has nothing to say; the worker only ever
//! replies. Both sides run the same [`MessageStream`] engine, configured
//! by the role their transport reports.

pub mod assembler;
pub mod error;
pub mod outbound;
pub mod receiver;
pub mod serializer;
pub mod stream;

pub use error::{Result, StreamError};
pub use receiver::{StreamId, StreamReceiver};
pub use serializer::{JsonSerializer, Serializer};
pub use stream::{MessageStream, Role, StreamStats};
