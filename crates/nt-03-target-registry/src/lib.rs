//! # Target Registry Subsystem
//!
//! The stateful device database at the root of the sensor core. It creates,
//! merges, and expires device records, re-identifies devices across radio
//! address rotation using the broadcast pseudo address, and selects which
//! previously-seen identities to share with a peer within the channel
//! transfer limit.
//!
//! ## Architecture
//!
//! The crate follows the workspace's hexagonal layout:
//!
//! - **Domain:** [`domain`] - device records, attribute mutators, the
//!   platform-guess state machine with its ignore backoff.
//! - **Ports:** [`ports`] - traits the host must provide ([`TimeSource`])
//!   or may consume ([`DeviceDelegate`], [`SensorConfigProvider`]).
//! - **Service:** [`service`] - the registry itself plus the serialized
//!   event dispatch queue and maintenance sweeps.
//! - **Adapters:** [`adapters`] - system time, static/TOML config
//!   providers, and an in-memory event log for tests.
//!
//! ## Concurrency
//!
//! Observations and attribute updates arrive from concurrent transport
//! callbacks. The device map is concurrent-read/serialized-write; outward
//! delegate notifications flow through a single ordered queue so listeners
//! observe create/update/delete events in the order they were applied,
//! decoupled from the transport threads.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (fixed and controllable time sources).
/// Requires feature: `test-utils`
#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{default_feature_patterns, ConfigError, SensorConfig};
pub use domain::{Device, DeviceAttribute, DeviceEvent, DeviceState, PlatformGuess};
pub use ports::{DeviceDelegate, SensorConfigProvider, TimeSource};
pub use service::{ChannelWrite, EventDispatcher, TargetRegistry};

pub use adapters::{InMemoryDeviceLog, StaticConfigProvider, SystemTimeSource, TomlConfigProvider};

#[cfg(feature = "test-utils")]
pub use test_utils::{ControllableTimeSource, FixedTimeSource};
