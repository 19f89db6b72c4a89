//! In-memory delegate recording events for inspection.

use std::sync::Arc;

use parking_lot::Mutex;

use shared_types::TargetIdentifier;

use crate::domain::{Device, DeviceAttribute};
use crate::ports::DeviceDelegate;

/// What kind of event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggedEventKind {
    Created,
    Updated(DeviceAttribute),
    Deleted,
}

/// One observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub kind: LoggedEventKind,
    pub target_id: TargetIdentifier,
}

/// Delegate that records every notification in arrival order.
///
/// Used by tests to assert on event ordering; a host could equally use it
/// as a ring-buffer-less debug tap.
#[derive(Debug, Default)]
pub struct InMemoryDeviceLog {
    events: Mutex<Vec<LoggedEvent>>,
}

impl InMemoryDeviceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events observed so far, in delivery order.
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.events.lock().clone()
    }

    /// Number of events observed so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    fn push(&self, kind: LoggedEventKind, device: &Arc<Device>) {
        self.events.lock().push(LoggedEvent {
            kind,
            target_id: device.target_id().clone(),
        });
    }
}

impl DeviceDelegate for InMemoryDeviceLog {
    fn device_created(&self, device: &Arc<Device>) {
        self.push(LoggedEventKind::Created, device);
    }

    fn device_updated(&self, device: &Arc<Device>, attribute: DeviceAttribute) {
        self.push(LoggedEventKind::Updated(attribute), device);
    }

    fn device_deleted(&self, device: &Arc<Device>) {
        self.push(LoggedEventKind::Deleted, device);
    }
}
