//! # Shared Types Crate
//!
//! Datatypes shared across the sensor subsystems: raw byte buffers,
//! target identifiers, timestamps, and measurement values.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque payloads**: Identity payloads are carried as opaque bytes; no
//!   crate in this workspace interprets or verifies their content.
//! - **Millisecond timestamps**: Ignore-backoff and write rate-limit windows
//!   need sub-second resolution, so [`Timestamp`] counts milliseconds.

pub mod data;
pub mod identifiers;
pub mod measurements;
pub mod time;

pub use data::Data;
pub use identifiers::TargetIdentifier;
pub use measurements::{IdentityPayload, PayloadSharingData, Proximity, TxPower};
pub use time::Timestamp;
