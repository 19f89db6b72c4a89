//! Serialized event dispatch.
//!
//! All registry events flow through one unbounded queue drained by a single
//! dispatcher, so delegates observe create/update/delete in exactly the
//! order the changes were applied, decoupled from the transport callbacks
//! that caused them. Emission never blocks radio I/O.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::domain::DeviceEvent;
use crate::ports::DeviceDelegate;

/// Receiving end of the registry's event queue.
///
/// Register delegates, then either hand the dispatcher to the async runtime
/// with [`run`](Self::run) or drain synchronously in tests with
/// [`process_available`](Self::process_available).
pub struct EventDispatcher {
    receiver: UnboundedReceiver<DeviceEvent>,
    delegates: Vec<Arc<dyn DeviceDelegate>>,
}

impl EventDispatcher {
    pub(crate) fn new(receiver: UnboundedReceiver<DeviceEvent>) -> Self {
        Self {
            receiver,
            delegates: Vec::new(),
        }
    }

    /// Register a delegate. Delegates are notified in registration order.
    pub fn add_delegate(&mut self, delegate: Arc<dyn DeviceDelegate>) {
        self.delegates.push(delegate);
    }

    /// Number of registered delegates.
    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    /// Drain the queue until the registry (all senders) is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            dispatch(&self.delegates, &event);
        }
        debug!("event dispatcher stopped");
    }

    /// Synchronously dispatch every event currently queued; returns the
    /// number dispatched. Useful for deterministic tests.
    pub fn process_available(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            dispatch(&self.delegates, &event);
            count += 1;
        }
        count
    }
}

fn dispatch(delegates: &[Arc<dyn DeviceDelegate>], event: &DeviceEvent) {
    match event {
        DeviceEvent::Created(device) => {
            debug!(device = %device.target_id(), "create");
            for delegate in delegates {
                delegate.device_created(device);
            }
        }
        DeviceEvent::Updated(device, attribute) => {
            debug!(device = %device.target_id(), attribute = %attribute, "update");
            for delegate in delegates {
                delegate.device_updated(device, *attribute);
            }
        }
        DeviceEvent::Deleted(device) => {
            debug!(device = %device.target_id(), "delete");
            for delegate in delegates {
                delegate.device_deleted(device);
            }
        }
    }
}
