use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use slotstream_frame::{Command, Frame, HEADER_LEN};
use slotstream_transport::SlotTransport;

use crate::assembler::InboundAssembler;
use crate::error::Result;
use crate::outbound::OutboundQueue;
use crate::receiver::{StreamId, StreamReceiver};
use crate::serializer::{JsonSerializer, Serializer};

/// Which side of the half-duplex conversation this engine plays.
///
/// The controller is the sole initiator; the worker speaks only in reply
/// to a Poll or Data frame. The behavior difference is a branch inside
/// [`MessageStream::tick`], not a type distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Controller,
    Worker,
}

/// Monotonic counters describing a stream's life so far. Snapshot via
/// [`MessageStream::stats`]; serializable for telemetry export.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StreamStats {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub duplicates_dropped: u64,
    pub messages_queued: u64,
    pub messages_delivered: u64,
    pub timeouts: u64,
}

/// Reliable chunked message stream over a slot transport.
///
/// The transport holds at most one frame per direction and its reads are
/// non-destructive, so the engine emulates request/response on top of it:
/// the controller keeps exactly one frame in flight and polls whenever it
/// has nothing to say, the worker only ever replies, and a single-digit
/// sequence counter resolves the duplicates that repeated reads produce.
/// Logical messages are split into frame-sized chunks on the way out and
/// reassembled behind an XOR integrity check on the way in.
///
/// Drive the engine from the host's per-frame callback: one [`tick`]
/// per scheduler round, [`write`] at any point in between. All state
/// mutation happens inside those two calls; nothing blocks and nothing
/// runs in the background.
///
/// [`tick`]: MessageStream::tick
/// [`write`]: MessageStream::write
pub struct MessageStream<T, R, S = JsonSerializer> {
    transport: T,
    receiver: R,
    serializer: S,
    id: StreamId,
    role: Role,
    timeout: Duration,
    chunk_size: usize,
    last_received: Instant,
    last_seq: Option<u8>,
    outbound: OutboundQueue,
    assembler: InboundAssembler,
    stats: StreamStats,
}

impl<T: SlotTransport, R: StreamReceiver> MessageStream<T, R> {
    /// Create a stream with the default JSON serializer.
    pub fn new(transport: T, receiver: R, timeout: Duration) -> Self {
        Self::with_serializer(transport, receiver, timeout, JsonSerializer)
    }
}

impl<T: SlotTransport, R: StreamReceiver, S: Serializer> MessageStream<T, R, S> {
    /// Create a stream bound to `transport`, delivering upward through
    /// `receiver`, with an explicit serializer.
    ///
    /// The transport's outbound slot is cleared immediately and the
    /// receiver is handed the stream's id exactly once. The per-chunk
    /// payload budget is derived from the transport's block size.
    ///
    /// # Panics
    ///
    /// Panics if the transport's block size cannot fit the frame header.
    pub fn with_serializer(
        mut transport: T,
        mut receiver: R,
        timeout: Duration,
        serializer: S,
    ) -> Self {
        let block_size = transport.block_size();
        assert!(
            block_size > HEADER_LEN,
            "block size {block_size} cannot fit a {HEADER_LEN}-byte frame header"
        );

        transport.clear();
        let role = if transport.is_controller() {
            Role::Controller
        } else {
            Role::Worker
        };
        let id = StreamId::next();
        receiver.register_stream(id);
        debug!(id = %id, ?role, block_size, "stream created");

        Self {
            transport,
            receiver,
            serializer,
            id,
            role,
            timeout,
            chunk_size: block_size - HEADER_LEN,
            last_received: Instant::now(),
            last_seq: None,
            outbound: OutboundQueue::new(),
            assembler: InboundAssembler::new(),
            stats: StreamStats::default(),
        }
    }

    /// Queue a structured value for transmission.
    ///
    /// Frames are encoded up front and drained over subsequent ticks;
    /// messages reach the peer's receiver in `write` order. Fails only
    /// when the serialized form needs more chunks than the wire format can
    /// count — nothing is enqueued in that case.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        let message = self.serializer.serialize(value)?;
        self.outbound.enqueue_message(&message, self.chunk_size)?;
        self.stats.messages_queued += 1;
        Ok(())
    }

    /// Drop all queued output and instruct the peer to do the same.
    ///
    /// The Reset frame rides the normal send path, so on a controller it
    /// goes out on the next free tick and on a worker it is handed over
    /// as the next poll reply.
    pub fn reset(&mut self) -> Result<()> {
        debug!(id = %self.id, "local reset, dropping queues");
        self.outbound.clear();
        self.assembler.reset();
        let seq = self.outbound.next_seq();
        let frame = Frame::control(Command::Reset, seq).encode()?;
        self.outbound.push_frame(frame);
        Ok(())
    }

    /// Whether encoded frames are still waiting to go out.
    pub fn waiting_to_send(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Advance the protocol by one scheduler tick.
    ///
    /// Reads at most one frame, dispatches it by role, fires timeout
    /// recovery when the peer has gone quiet, and on the controller keeps
    /// exactly one frame in flight, polling when the queue is empty.
    /// Non-blocking; the only errors that escape are application
    /// serialization failures raised after a message has already passed
    /// its integrity check.
    pub fn tick(&mut self) -> Result<()> {
        let now = Instant::now();

        if let Some(frame) = self.read_fresh_frame() {
            self.receiver.on_timeout(false, self.id);
            self.last_received = now;
            self.stats.frames_received += 1;
            trace!(
                seq = frame.seq,
                command = frame.command.name(),
                remaining = frame.remaining,
                "frame accepted"
            );
            if frame.first {
                self.assembler.begin(frame.checksum);
            }
            match self.role {
                Role::Controller => self.dispatch_controller(frame)?,
                Role::Worker => self.dispatch_worker(frame)?,
            }
        }

        if now.duration_since(self.last_received) >= self.timeout {
            debug!(
                id = %self.id,
                dropped = self.outbound.len(),
                "peer timed out, dropping queued output"
            );
            self.receiver.on_timeout(true, self.id);
            // Restarting the window rate-limits the signal to once per
            // timeout interval.
            self.last_received = now;
            self.outbound.clear();
            self.assembler.reset();
            self.stats.timeouts += 1;
        }

        if self.role == Role::Controller && !self.outbound.waiting_for_reply() {
            let frame = match self.outbound.pop_frame() {
                Some(frame) => frame,
                None => Frame::control(Command::Poll, self.outbound.next_seq()).encode()?,
            };
            self.send(frame);
            self.outbound.set_waiting_for_reply(true);
        }

        Ok(())
    }

    /// Read and decode the inbound slot, suppressing the duplicates a
    /// non-destructive read produces. Unparseable input is "no frame".
    fn read_fresh_frame(&mut self) -> Option<Frame> {
        let raw = self.transport.read()?;
        let frame = Frame::decode(&raw)?;
        if self.last_seq == Some(frame.seq) {
            trace!(seq = frame.seq, "duplicate frame suppressed");
            self.stats.duplicates_dropped += 1;
            return None;
        }
        self.last_seq = Some(frame.seq);
        Some(frame)
    }

    fn dispatch_controller(&mut self, frame: Frame) -> Result<()> {
        // Any reply releases the in-flight slot.
        self.outbound.set_waiting_for_reply(false);
        if frame.command == Command::Data {
            self.assembler.push(frame.payload);
            self.deliver_if_complete(frame.remaining)?;
        }
        Ok(())
    }

    fn dispatch_worker(&mut self, frame: Frame) -> Result<()> {
        match frame.command {
            Command::Data => {
                self.assembler.push(frame.payload);
                self.deliver_if_complete(frame.remaining)?;
                self.reply()?;
            }
            Command::Poll => self.reply()?,
            Command::Reset => {
                debug!(id = %self.id, "peer requested reset, dropping queues");
                self.outbound.clear();
                self.assembler.reset();
                let ack = Frame::control(Command::Ack, self.outbound.next_seq()).encode()?;
                self.send(ack);
            }
            // A worker never solicits anything, so an Ack carries no
            // information beyond liveness.
            Command::Ack => {}
        }
        Ok(())
    }

    /// Worker response to a Poll or Data frame: the head of the output
    /// queue if one is waiting, an Ack otherwise.
    fn reply(&mut self) -> Result<()> {
        let frame = match self.outbound.pop_frame() {
            Some(frame) => frame,
            None => Frame::control(Command::Ack, self.outbound.next_seq()).encode()?,
        };
        self.send(frame);
        Ok(())
    }

    fn deliver_if_complete(&mut self, remaining: u16) -> Result<()> {
        if let Some(message) = self.assembler.try_complete(remaining) {
            let value = self.serializer.deserialize(&message)?;
            self.stats.messages_delivered += 1;
            self.receiver.on_data(value);
        }
        Ok(())
    }

    fn send(&mut self, frame: Bytes) {
        self.stats.frames_sent += 1;
        self.transport.send(frame);
    }

    /// This stream's handle, as given to the receiver at construction.
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// The role derived from the transport.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Snapshot of the stream's counters.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Borrow the receiver.
    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    /// Mutably borrow the receiver.
    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
