//! Identity sharing selection.
//!
//! When a peer is connected, self can forward identities of *other* devices
//! it has seen recently - the bridge that lets two peers learn of each
//! other through an intermediary even when one of them cannot scan. The
//! bundle is hard-capped below the channel's practical transfer limit.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use shared_types::{Data, PayloadSharingData};

use crate::domain::{Device, PlatformGuess};
use crate::service::registry::TargetRegistry;

impl TargetRegistry {
    /// Select identities to share with `peer`.
    ///
    /// Without a proximity reading for the peer the sentinel bundle
    /// (proximity 127, no data) is returned. Otherwise eligible records -
    /// updated within the sharing expiry window, carrying a payload,
    /// platform `Ios` or receive-only, payload different from the peer's
    /// own - are walked most-recently-updated first, those the peer has
    /// not yet been told about ahead of those it has. Exact duplicate
    /// payloads are skipped, each append is bounded by the transfer cap,
    /// and every included identity is marked as told to the peer.
    pub fn payload_sharing_data(&self, peer: &Arc<Device>) -> PayloadSharingData {
        let Some(proximity) = peer.proximity() else {
            return PayloadSharingData::empty();
        };

        let expiry = self.config().payload_sharing_expiry();
        let peer_payload = peer.identity_payload();
        let mut untold: Vec<Arc<Device>> = Vec::new();
        let mut told: Vec<Arc<Device>> = Vec::new();
        for device in self.devices() {
            if device.time_since_last_update() >= expiry {
                continue;
            }
            let Some(payload) = device.identity_payload() else {
                continue;
            };
            if !(device.platform() == PlatformGuess::Ios || device.receive_only()) {
                continue;
            }
            if peer_payload.as_ref() == Some(&payload) {
                continue;
            }
            if peer.has_been_told(&payload) {
                told.push(device);
            } else {
                untold.push(device);
            }
        }
        untold.sort_by(|a, b| b.last_updated_at().cmp(&a.last_updated_at()));
        told.sort_by(|a, b| b.last_updated_at().cmp(&a.last_updated_at()));

        let cap = self.config().max_transfer_bytes;
        let mut queued = HashSet::new();
        let mut bundle: Vec<u8> = Vec::new();
        for device in untold.into_iter().chain(told) {
            let Some(payload) = device.identity_payload() else {
                continue;
            };
            // The same identity appears on several records while an old
            // address rotation has not expired yet.
            if queued.contains(&payload) {
                continue;
            }
            if bundle.len() + payload.len() > cap {
                debug!(
                    peer = %peer.target_id(),
                    bundled = bundle.len(),
                    cap,
                    "identity sharing truncated at transfer cap"
                );
                break;
            }
            bundle.extend_from_slice(payload.as_bytes());
            peer.mark_told(payload.clone());
            queued.insert(payload);
        }

        PayloadSharingData::new(proximity, Data(bundle))
    }
}
