//! Periodic registry maintenance.

use tracing::debug;

use crate::service::registry::TargetRegistry;

impl TargetRegistry {
    /// Remove records not updated within the configured expiry window.
    ///
    /// Call from a host timer task at scan-cycle intervals. Deletion events
    /// are emitted for every removed record, exactly as for transport-level
    /// loss. Returns the number of records removed.
    pub fn remove_expired(&self) -> usize {
        let expiry = self.config().device_expiry();
        let expired: Vec<_> = self
            .devices()
            .into_iter()
            .filter(|device| device.time_since_last_update() > expiry)
            .collect();
        for device in &expired {
            debug!(device = %device.target_id(), "removing expired device");
            self.delete(device.target_id());
        }
        expired.len()
    }
}
