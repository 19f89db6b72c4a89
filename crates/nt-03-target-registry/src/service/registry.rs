//! The target registry: device lookup, merge, and re-identification.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use nt_01_advert_filter::{extract_manufacturer_data, extract_segments, extract_tx_power};
use nt_02_signal_codec::{
    decode_write_identity, decode_write_identity_sharing, decode_write_proximity, detect,
    PseudoAddress, SignalDataKind,
};
use shared_types::{Data, IdentityPayload, PayloadSharingData, Proximity, TargetIdentifier};

use crate::config::SensorConfig;
use crate::domain::{Device, DeviceEvent, DeviceState, PlatformGuess};
use crate::ports::TimeSource;
use crate::service::events::EventDispatcher;

/// A decoded channel write applied to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelWrite {
    /// Peer reported a proximity reading.
    Proximity(Proximity),
    /// Peer reported its own identity payload.
    Identity(IdentityPayload),
    /// Peer reported a proximity value plus a bundle of identities it has
    /// seen on behalf of third parties. The bundle is opaque here; payload
    /// boundaries are the identity supplier's concern.
    IdentitySharing(PayloadSharingData),
}

/// The stateful device database.
///
/// Exactly one record exists per live target identifier. Records are
/// removed, not merely marked, on transport-level deletion; a deleted
/// record is invisible to subsequent lookups even while propagation work
/// referencing it is still queued (propagation re-checks liveness before
/// mutating).
pub struct TargetRegistry {
    config: SensorConfig,
    clock: Arc<dyn TimeSource>,
    devices: RwLock<HashMap<TargetIdentifier, Arc<Device>>>,
    events: UnboundedSender<DeviceEvent>,
}

impl TargetRegistry {
    /// Create a registry and the dispatcher draining its event queue.
    pub fn new(config: SensorConfig, clock: Arc<dyn TimeSource>) -> (Self, EventDispatcher) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                config,
                clock,
                devices: RwLock::new(HashMap::new()),
                events,
            },
            EventDispatcher::new(receiver),
        )
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Snapshot of all live records.
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.devices.read().values().cloned().collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    // ── Observation ingestion ───────────────────────────────────────────

    /// Ingest one broadcast observation from the transport.
    ///
    /// Resolves the record (re-identifying across address rotation when a
    /// pseudo address is present), retains the raw advert, and merges the
    /// tx power found in the advert and the proximity reading supplied by
    /// the transport. When the transport did not hand over pseudo address
    /// bytes they are looked up in the advert's vendor blocks under the
    /// configured sensor vendor id.
    pub fn observe(
        &self,
        handle: &str,
        raw_advert: &[u8],
        pseudo_address_bytes: Option<&[u8]>,
        proximity: Option<Proximity>,
    ) -> Arc<Device> {
        let segments = extract_segments(raw_advert, 0);
        let pseudo_address = pseudo_address_bytes
            .map(PseudoAddress::from_bytes)
            .or_else(|| {
                extract_manufacturer_data(&segments)
                    .iter()
                    .find(|block| block.vendor_id == self.config.sensor_vendor_id)
                    .map(|block| PseudoAddress::from_bytes(&block.data))
            });

        let device = self.device_for_observation(handle, pseudo_address);
        device.register_discovery();
        if !raw_advert.is_empty() {
            device.set_last_advert(Data::from(raw_advert));
        }
        if let Some(tx_power) = extract_tx_power(&segments) {
            device.set_tx_power(tx_power);
        }
        if let Some(proximity) = proximity {
            device.set_proximity(proximity);
        }
        device
    }

    /// Resolve the record for an observation.
    ///
    /// Without a pseudo address resolution is purely by handle
    /// (create-on-miss). With one: no record sharing the address means a
    /// fresh record tagged with it; a record already bound to this handle
    /// is updated in place; otherwise the address rotated, and the
    /// most-recently-updated record sharing the address is forked onto the
    /// new handle. Cross-record propagation runs after either merge.
    pub fn device_for_observation(
        &self,
        handle: &str,
        pseudo_address: Option<PseudoAddress>,
    ) -> Arc<Device> {
        let Some(pseudo_address) = pseudo_address else {
            return self.device_for_handle(handle);
        };

        let mut candidates = self.devices_sharing(pseudo_address);
        if candidates.is_empty() {
            let device = self.device_for_handle(handle);
            device.set_pseudo_address(pseudo_address);
            return device;
        }

        let target_id = TargetIdentifier::from_handle(handle);
        let existing = self.devices.read().get(&target_id).cloned();
        if let Some(existing) = existing {
            existing.set_pseudo_address(pseudo_address);
            self.share_data_across_devices(pseudo_address);
            return existing;
        }

        // Address rotated: fork the freshest record sharing the address.
        candidates.sort_by(|a, b| b.last_updated_at().cmp(&a.last_updated_at()));
        let source = &candidates[0];
        let device = Device::clone_forward(
            source,
            target_id.clone(),
            self.clock.clone(),
            self.events.clone(),
        );
        self.devices.write().insert(target_id, device.clone());
        debug!(
            device = %device.target_id(),
            source = %source.target_id(),
            pseudo_address = %pseudo_address,
            "re-identified device across address rotation"
        );
        let _ = self.events.send(DeviceEvent::Created(device.clone()));
        if let Some(payload) = self.share_data_across_devices(pseudo_address) {
            device.set_identity_payload(payload);
        }
        device
    }

    /// Resolve a record purely by logical handle, creating it on miss.
    pub fn device_for_handle(&self, handle: &str) -> Arc<Device> {
        let target_id = TargetIdentifier::from_handle(handle);
        if let Some(device) = self.devices.read().get(&target_id) {
            return device.clone();
        }
        let mut devices = self.devices.write();
        // Lost the race between read and write lock: someone else created it.
        if let Some(device) = devices.get(&target_id) {
            return device.clone();
        }
        let device = Device::new(target_id.clone(), self.clock.clone(), self.events.clone());
        devices.insert(target_id, device.clone());
        drop(devices);
        let _ = self.events.send(DeviceEvent::Created(device.clone()));
        device
    }

    /// Resolve a record by identity payload, creating one with a synthetic
    /// target identifier on miss. Used when a peer announces itself only by
    /// writing its identity over a channel.
    pub fn device_for_identity(&self, payload: &IdentityPayload) -> Arc<Device> {
        let existing = self
            .devices
            .read()
            .values()
            .find(|device| device.identity_payload().as_ref() == Some(payload))
            .cloned();
        let device = match existing {
            Some(device) => device,
            None => {
                let target_id = TargetIdentifier::random();
                let device =
                    Device::new(target_id.clone(), self.clock.clone(), self.events.clone());
                self.devices.write().insert(target_id, device.clone());
                let _ = self.events.send(DeviceEvent::Created(device.clone()));
                device
            }
        };
        device.set_identity_payload(payload.clone());
        device
    }

    // ── Channel lifecycle and writes ────────────────────────────────────

    /// A two-way channel to the device was opened.
    pub fn channel_opened(&self, handle: &str) -> Arc<Device> {
        let device = self.device_for_handle(handle);
        device.set_state(DeviceState::Connected);
        device
    }

    /// The channel to the device was closed.
    pub fn channel_closed(&self, handle: &str) -> Arc<Device> {
        let device = self.device_for_handle(handle);
        device.set_state(DeviceState::Disconnected);
        device
    }

    /// Ingest bytes a peer wrote over an opened channel.
    ///
    /// Detects and decodes the signal bundle, merges it into the peer's
    /// record, and stamps the matching write timestamp. Corrupted or
    /// partially received writes return `None`; they are routine input.
    pub fn channel_write(&self, handle: &str, data: &[u8]) -> Option<ChannelWrite> {
        let device = self.device_for_handle(handle);
        match detect(data) {
            SignalDataKind::Proximity => {
                let proximity = decode_write_proximity(data)?;
                device.set_proximity(proximity);
                device.register_write_proximity();
                Some(ChannelWrite::Proximity(proximity))
            }
            SignalDataKind::Identity => {
                let payload = decode_write_identity(data)?;
                device.set_identity_payload(payload.clone());
                device.register_write_identity();
                Some(ChannelWrite::Identity(payload))
            }
            SignalDataKind::IdentitySharing => {
                let sharing = decode_write_identity_sharing(data)?;
                device.set_proximity(sharing.proximity);
                device.register_write_identity_sharing();
                Some(ChannelWrite::IdentitySharing(sharing))
            }
            SignalDataKind::Unknown => {
                debug!(device = %device.target_id(), len = data.len(), "unrecognised channel write");
                None
            }
        }
    }

    // ── Deletion ────────────────────────────────────────────────────────

    /// The transport lost the logical handle; remove its record.
    pub fn handle_lost(&self, handle: &str) {
        self.delete(&TargetIdentifier::from_handle(handle));
    }

    /// Remove a record and notify delegates.
    pub fn delete(&self, target_id: &TargetIdentifier) {
        let removed = self.devices.write().remove(target_id);
        if let Some(device) = removed {
            let _ = self.events.send(DeviceEvent::Deleted(device));
        }
    }

    // ── Cross-record propagation ────────────────────────────────────────

    /// Propagate observed attributes among records sharing a pseudo
    /// address.
    ///
    /// The freshest non-absent identity payload is pushed onto every
    /// same-address record created within the advert refresh window that
    /// has none; independently, the first definitive platform guess
    /// (most-recent-first) is pushed onto records still provisional or
    /// unknown. Re-running on a stable record set changes nothing: only
    /// records actually gaining a value are written.
    ///
    /// Returns the propagated identity payload, if any.
    pub fn share_data_across_devices(
        &self,
        pseudo_address: PseudoAddress,
    ) -> Option<IdentityPayload> {
        let mut devices = self.devices_sharing(pseudo_address);
        devices.sort_by(|a, b| b.last_updated_at().cmp(&a.last_updated_at()));

        let payload = devices.iter().find_map(|device| device.identity_payload());
        if let Some(ref payload) = payload {
            let now = self.clock.now();
            let window = self.config.advert_refresh_interval();
            for device in &devices {
                if device.identity_payload().is_none()
                    && now.duration_since(device.created_at()) <= window
                    && self.is_live(device)
                {
                    device.set_identity_payload(payload.clone());
                }
            }
        }

        let platform = devices
            .iter()
            .map(|device| device.platform())
            .find(PlatformGuess::is_definitive);
        if let Some(platform) = platform {
            for device in &devices {
                if device.platform().is_provisional_or_unknown() && self.is_live(device) {
                    device.set_platform(platform);
                }
            }
        }

        payload
    }

    /// All live records tagged with `pseudo_address`.
    fn devices_sharing(&self, pseudo_address: PseudoAddress) -> Vec<Arc<Device>> {
        self.devices
            .read()
            .values()
            .filter(|device| device.pseudo_address() == Some(pseudo_address))
            .cloned()
            .collect()
    }

    /// Liveness re-check before propagation mutates a record: a record
    /// deleted after the candidate scan must not be revived by queued work.
    fn is_live(&self, device: &Arc<Device>) -> bool {
        self.devices.read().contains_key(device.target_id())
    }
}
