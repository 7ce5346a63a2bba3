use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::trace;

use crate::traits::SlotTransport;

#[derive(Debug, Default)]
struct Slots {
    to_worker: Option<Bytes>,
    to_controller: Option<Bytes>,
}

/// In-memory slot pair connecting a controller endpoint to a worker
/// endpoint.
///
/// Reads are non-destructive and writes overwrite, matching the host
/// surfaces this library targets. Endpoint handles are cloneable so a test
/// harness can keep a tap on either side to inspect or tamper with
/// in-flight frames while the engine owns the endpoint.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    slots: Arc<Mutex<Slots>>,
    controller: bool,
    block_size: usize,
}

impl LoopbackTransport {
    /// Create a connected `(controller, worker)` endpoint pair.
    pub fn pair(block_size: usize) -> (Self, Self) {
        let slots = Arc::new(Mutex::new(Slots::default()));
        let controller = Self {
            slots: Arc::clone(&slots),
            controller: true,
            block_size,
        };
        let worker = Self {
            slots,
            controller: false,
            block_size,
        };
        (controller, worker)
    }

    /// The frame currently sitting in this endpoint's outbound slot.
    pub fn outbound_slot(&self) -> Option<Bytes> {
        let slots = self.lock();
        if self.controller {
            slots.to_worker.clone()
        } else {
            slots.to_controller.clone()
        }
    }

    /// Overwrite this endpoint's outbound slot in place, bypassing the
    /// engine. Harness hook for corruption and duplication scenarios.
    pub fn force_outbound(&self, frame: Bytes) {
        let mut slots = self.lock();
        if self.controller {
            slots.to_worker = Some(frame);
        } else {
            slots.to_controller = Some(frame);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        // A poisoned lock only means a peer panicked mid-write; the slot
        // contents are still a whole frame.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotTransport for LoopbackTransport {
    fn send(&mut self, frame: Bytes) {
        trace!(
            controller = self.controller,
            len = frame.len(),
            "slot write"
        );
        let mut slots = self.lock();
        if self.controller {
            slots.to_worker = Some(frame);
        } else {
            slots.to_controller = Some(frame);
        }
    }

    fn read(&mut self) -> Option<Bytes> {
        let slots = self.lock();
        if self.controller {
            slots.to_controller.clone()
        } else {
            slots.to_worker.clone()
        }
    }

    fn clear(&mut self) {
        let mut slots = self.lock();
        if self.controller {
            slots.to_worker = None;
        } else {
            slots.to_controller = None;
        }
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn is_controller(&self) -> bool {
        self.controller
    }
}
