//! # NearTrace Test Suite
//!
//! Unified test crate for cross-subsystem scenarios:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── advert_pipeline.rs    # raw advert bytes → messages → filter verdict
//!     ├── reidentification.rs   # observation → rotation → propagation → events
//!     └── identity_sharing.rs   # sharing selection → wire → peer ingestion
//! ```
//!
//! Per-module behavior is unit-tested inside each crate; everything here
//! crosses at least one crate boundary.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p nt-tests
//! cargo test -p nt-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

/// Install a fmt subscriber once for debugging test runs with
/// `RUST_LOG=debug cargo test -p nt-tests -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
