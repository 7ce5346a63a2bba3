// Shared between the integration binaries; not every helper is used by
// every binary.
#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use slotstream::{MessageStream, StreamId, StreamReceiver};
use slotstream_transport::LoopbackTransport;

/// Records every callback for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    pub registered: Vec<StreamId>,
    pub data: Vec<Value>,
    pub timeouts: Vec<bool>,
}

impl StreamReceiver for RecordingReceiver {
    fn register_stream(&mut self, stream: StreamId) {
        self.registered.push(stream);
    }

    fn on_data(&mut self, value: Value) {
        self.data.push(value);
    }

    fn on_timeout(&mut self, timed_out: bool, _stream: StreamId) {
        self.timeouts.push(timed_out);
    }
}

pub type TestStream = MessageStream<LoopbackTransport, RecordingReceiver>;

/// Connected controller/worker engines over an in-memory loopback.
pub fn stream_pair(block_size: usize, timeout: Duration) -> (TestStream, TestStream) {
    let (controller, worker) = LoopbackTransport::pair(block_size);
    (
        MessageStream::new(controller, RecordingReceiver::default(), timeout),
        MessageStream::new(worker, RecordingReceiver::default(), timeout),
    )
}

/// Tick both sides in lockstep, controller first.
pub fn tick_both(controller: &mut TestStream, worker: &mut TestStream, rounds: usize) {
    for _ in 0..rounds {
        controller.tick().expect("controller tick");
        worker.tick().expect("worker tick");
    }
}

/// Whether any timeout expiry was signalled.
pub fn saw_timeout(receiver: &RecordingReceiver) -> bool {
    receiver.timeouts.iter().any(|&timed_out| timed_out)
}

/// Deterministic printable-ASCII payload of the requested length.
pub fn printable_payload(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            // Printable ASCII, quotes and backslash excluded so the JSON
            // form stays close to the raw length.
            let span = b'~' - b' ' - 2;
            let mut byte = b' ' + ((state >> 33) % u64::from(span)) as u8;
            if byte >= b'"' {
                byte += 1;
            }
            if byte >= b'\\' {
                byte += 1;
            }
            byte as char
        })
        .collect()
}
