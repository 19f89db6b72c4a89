//! # Ports Layer
//!
//! Trait boundaries between the registry and its host:
//!
//! - **Driven (required):** [`TimeSource`] - all registry timing flows
//!   through it so staleness, backoff, and expiry behavior is deterministic
//!   under test.
//! - **Driving (offered):** [`DeviceDelegate`] - lifecycle and
//!   attribute-change notifications, delivered in application order by the
//!   dispatch queue; [`SensorConfigProvider`] - configuration loading.

use std::sync::Arc;

use shared_types::Timestamp;

use crate::config::SensorConfig;
use crate::domain::{Device, DeviceAttribute};

/// Abstract interface for time.
///
/// Production implementations use system time; tests inject fixed or
/// controllable sources.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Listener for registry lifecycle and attribute-change events.
///
/// Callbacks run on the dispatcher, never on the transport thread that
/// caused the change, and observe events in the order they were applied to
/// the registry. Default implementations ignore the event so delegates
/// implement only what they need.
pub trait DeviceDelegate: Send + Sync {
    /// A record was created.
    fn device_created(&self, device: &Arc<Device>) {
        let _ = device;
    }

    /// An attribute of a record changed.
    fn device_updated(&self, device: &Arc<Device>, attribute: DeviceAttribute) {
        let _ = (device, attribute);
    }

    /// A record was removed following transport-level deletion.
    fn device_deleted(&self, device: &Arc<Device>) {
        let _ = device;
    }
}

/// Abstract interface for configuration loading.
pub trait SensorConfigProvider: Send + Sync {
    /// Get the sensor configuration.
    fn sensor_config(&self) -> SensorConfig;
}
