//! Device records.
//!
//! One record exists per live target identifier. The registry exclusively
//! owns the record collection; `Arc<Device>` references held elsewhere are
//! read-side back-references between update cycles. Attribute mutators
//! stamp `last_updated_at` and emit attribute-change events into the
//! registry's serialized dispatch queue.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc::UnboundedSender;

use nt_02_signal_codec::PseudoAddress;
use shared_types::{Data, IdentityPayload, Proximity, TargetIdentifier, Timestamp, TxPower};

use crate::domain::platform::{
    next_ignore_backoff, PlatformGuess, IGNORE_BACKOFF_CAP, INITIAL_IGNORE_BACKOFF,
};
use crate::ports::TimeSource;

/// Channel connection state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Connecting,
    Connected,
    Disconnected,
}

/// Attributes whose changes are reported to delegates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAttribute {
    PseudoAddress,
    State,
    Platform,
    IdentityPayload,
    Proximity,
    TxPower,
}

impl fmt::Display for DeviceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PseudoAddress => "pseudo_address",
            Self::State => "state",
            Self::Platform => "platform",
            Self::IdentityPayload => "identity_payload",
            Self::Proximity => "proximity",
            Self::TxPower => "tx_power",
        };
        write!(f, "{label}")
    }
}

/// Registry lifecycle and attribute-change events, delivered to delegates
/// in application order through the dispatch queue.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    Created(Arc<Device>),
    Updated(Arc<Device>, DeviceAttribute),
    Deleted(Arc<Device>),
}

/// Mutable attribute block, guarded by one lock per record.
#[derive(Debug)]
struct Attributes {
    last_updated_at: Timestamp,
    pseudo_address: Option<PseudoAddress>,
    state: DeviceState,
    platform: PlatformGuess,
    identity_payload: Option<IdentityPayload>,
    identity_payload_updated_at: Option<Timestamp>,
    proximity: Option<Proximity>,
    tx_power: Option<TxPower>,
    receive_only: bool,
    ignore_backoff: Option<Duration>,
    ignore_until: Option<Timestamp>,
    last_advert: Option<Data>,
    last_connected_at: Option<Timestamp>,
    /// Identities already shared *to* this peer (not *by* it).
    told_identities: Vec<IdentityPayload>,
    last_write_proximity_at: Option<Timestamp>,
    last_write_identity_at: Option<Timestamp>,
    last_write_identity_sharing_at: Option<Timestamp>,
}

impl Attributes {
    fn new(now: Timestamp) -> Self {
        Self {
            last_updated_at: now,
            pseudo_address: None,
            state: DeviceState::Disconnected,
            platform: PlatformGuess::Unknown,
            identity_payload: None,
            identity_payload_updated_at: None,
            proximity: None,
            tx_power: None,
            receive_only: false,
            ignore_backoff: None,
            ignore_until: None,
            last_advert: None,
            last_connected_at: None,
            told_identities: Vec::new(),
            last_write_proximity_at: None,
            last_write_identity_at: None,
            last_write_identity_sharing_at: None,
        }
    }
}

/// One observed device.
pub struct Device {
    /// Stable handle assigned at creation.
    target_id: TargetIdentifier,
    created_at: Timestamp,
    clock: Arc<dyn TimeSource>,
    events: UnboundedSender<DeviceEvent>,
    /// Back-reference for attaching the record to emitted events.
    weak_self: Weak<Device>,
    attrs: RwLock<Attributes>,
}

impl Device {
    /// Create a fresh record.
    pub(crate) fn new(
        target_id: TargetIdentifier,
        clock: Arc<dyn TimeSource>,
        events: UnboundedSender<DeviceEvent>,
    ) -> Arc<Self> {
        let now = clock.now();
        Arc::new_cyclic(|weak_self| Self {
            target_id,
            created_at: now,
            clock,
            events,
            weak_self: weak_self.clone(),
            attrs: RwLock::new(Attributes::new(now)),
        })
    }

    /// Fork a record for a rotated address: scalar and collection fields
    /// are copied by value from `source` (collections never aliased), the
    /// creation time is inherited, and the update time is stamped fresh.
    pub(crate) fn clone_forward(
        source: &Device,
        target_id: TargetIdentifier,
        clock: Arc<dyn TimeSource>,
        events: UnboundedSender<DeviceEvent>,
    ) -> Arc<Self> {
        let now = clock.now();
        let copied = {
            let attrs = source.attrs.read();
            Attributes {
                last_updated_at: now,
                pseudo_address: attrs.pseudo_address,
                state: attrs.state,
                platform: attrs.platform,
                identity_payload: attrs.identity_payload.clone(),
                identity_payload_updated_at: attrs.identity_payload_updated_at,
                proximity: attrs.proximity,
                tx_power: attrs.tx_power,
                receive_only: attrs.receive_only,
                ignore_backoff: attrs.ignore_backoff,
                ignore_until: attrs.ignore_until,
                last_advert: attrs.last_advert.clone(),
                last_connected_at: attrs.last_connected_at,
                told_identities: attrs.told_identities.clone(),
                last_write_proximity_at: attrs.last_write_proximity_at,
                last_write_identity_at: attrs.last_write_identity_at,
                last_write_identity_sharing_at: attrs.last_write_identity_sharing_at,
            }
        };
        Arc::new_cyclic(|weak_self| Self {
            target_id,
            created_at: source.created_at,
            clock,
            events,
            weak_self: weak_self.clone(),
            attrs: RwLock::new(copied),
        })
    }

    fn emit(&self, attribute: DeviceAttribute) {
        if let Some(device) = self.weak_self.upgrade() {
            // Send failures mean the dispatcher is gone; events are
            // best-effort notifications, never part of record state.
            let _ = self.events.send(DeviceEvent::Updated(device, attribute));
        }
    }

    // ── Identity and timestamps ─────────────────────────────────────────

    pub fn target_id(&self) -> &TargetIdentifier {
        &self.target_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_updated_at(&self) -> Timestamp {
        self.attrs.read().last_updated_at
    }

    /// Time since any attribute last changed; identifies records that may
    /// have expired and should be swept.
    pub fn time_since_last_update(&self) -> Duration {
        self.clock.now().duration_since(self.last_updated_at())
    }

    /// Stamp an observation that carried no new attribute values.
    pub fn register_discovery(&self) {
        self.attrs.write().last_updated_at = self.clock.now();
    }

    // ── Pseudo address ──────────────────────────────────────────────────

    pub fn pseudo_address(&self) -> Option<PseudoAddress> {
        self.attrs.read().pseudo_address
    }

    pub fn set_pseudo_address(&self, pseudo_address: PseudoAddress) {
        let changed = {
            let mut attrs = self.attrs.write();
            if attrs.pseudo_address != Some(pseudo_address) {
                attrs.pseudo_address = Some(pseudo_address);
                attrs.last_updated_at = self.clock.now();
                true
            } else {
                false
            }
        };
        if changed {
            self.emit(DeviceAttribute::PseudoAddress);
        }
    }

    // ── Connection state ────────────────────────────────────────────────

    pub fn state(&self) -> DeviceState {
        self.attrs.read().state
    }

    pub fn set_state(&self, state: DeviceState) {
        {
            let mut attrs = self.attrs.write();
            let now = self.clock.now();
            attrs.state = state;
            attrs.last_updated_at = now;
            if state == DeviceState::Connected {
                attrs.last_connected_at = Some(now);
            }
        }
        self.emit(DeviceAttribute::State);
    }

    /// Duration of the current connection; zero when not connected.
    pub fn time_since_connected(&self) -> Duration {
        let attrs = self.attrs.read();
        if attrs.state != DeviceState::Connected {
            return Duration::ZERO;
        }
        match attrs.last_connected_at {
            Some(connected_at) => self.clock.now().duration_since(connected_at),
            None => Duration::ZERO,
        }
    }

    // ── Platform guess and ignore backoff ───────────────────────────────

    pub fn platform(&self) -> PlatformGuess {
        self.attrs.read().platform
    }

    /// Update the platform guess.
    ///
    /// Entering `Ignore` arms or extends the backoff window: 60s on first
    /// entry, then ×1.2 (rounded) per entry while below the cap. Any other
    /// state clears the window. The change event fires only when the guess
    /// actually changed; the update timestamp is stamped regardless.
    pub fn set_platform(&self, platform: PlatformGuess) {
        let changed = {
            let mut attrs = self.attrs.write();
            let now = self.clock.now();
            attrs.last_updated_at = now;
            if platform == PlatformGuess::Ignore {
                let backoff = match attrs.ignore_backoff {
                    None => INITIAL_IGNORE_BACKOFF,
                    Some(current) if current < IGNORE_BACKOFF_CAP => next_ignore_backoff(current),
                    Some(current) => current,
                };
                attrs.ignore_backoff = Some(backoff);
                attrs.ignore_until = Some(now.add(backoff));
            } else {
                attrs.ignore_backoff = None;
                attrs.ignore_until = None;
            }
            if attrs.platform != platform {
                attrs.platform = platform;
                true
            } else {
                false
            }
        };
        if changed {
            self.emit(DeviceAttribute::Platform);
        }
    }

    /// Whether interaction with this device is currently suppressed.
    pub fn should_ignore(&self) -> bool {
        match self.attrs.read().ignore_until {
            Some(ignore_until) => self.clock.now() < ignore_until,
            None => false,
        }
    }

    // ── Identity payload ────────────────────────────────────────────────

    pub fn identity_payload(&self) -> Option<IdentityPayload> {
        self.attrs.read().identity_payload.clone()
    }

    pub fn set_identity_payload(&self, payload: IdentityPayload) {
        {
            let mut attrs = self.attrs.write();
            let now = self.clock.now();
            attrs.identity_payload = Some(payload);
            attrs.last_updated_at = now;
            attrs.identity_payload_updated_at = Some(now);
        }
        self.emit(DeviceAttribute::IdentityPayload);
    }

    pub fn time_since_payload_update(&self) -> Option<Duration> {
        let updated_at = self.attrs.read().identity_payload_updated_at?;
        Some(self.clock.now().duration_since(updated_at))
    }

    // ── Proximity and tx power ──────────────────────────────────────────

    pub fn proximity(&self) -> Option<Proximity> {
        self.attrs.read().proximity
    }

    pub fn set_proximity(&self, proximity: Proximity) {
        {
            let mut attrs = self.attrs.write();
            attrs.proximity = Some(proximity);
            attrs.last_updated_at = self.clock.now();
        }
        self.emit(DeviceAttribute::Proximity);
    }

    pub fn tx_power(&self) -> Option<TxPower> {
        self.attrs.read().tx_power
    }

    pub fn set_tx_power(&self, tx_power: TxPower) {
        {
            let mut attrs = self.attrs.write();
            attrs.tx_power = Some(tx_power);
            attrs.last_updated_at = self.clock.now();
        }
        self.emit(DeviceAttribute::TxPower);
    }

    // ── Receive-only flag ───────────────────────────────────────────────

    pub fn receive_only(&self) -> bool {
        self.attrs.read().receive_only
    }

    /// Mark a device that can be read but never connects outward. Not a
    /// delegate-visible attribute.
    pub fn set_receive_only(&self, receive_only: bool) {
        let mut attrs = self.attrs.write();
        attrs.receive_only = receive_only;
        attrs.last_updated_at = self.clock.now();
    }

    // ── Raw advert ──────────────────────────────────────────────────────

    pub fn last_advert(&self) -> Option<Data> {
        self.attrs.read().last_advert.clone()
    }

    /// Retain the most recent raw advert so the filter can re-match a known
    /// device. Does not count as an attribute update.
    pub fn set_last_advert(&self, advert: Data) {
        self.attrs.write().last_advert = Some(advert);
    }

    // ── Shared-identity bookkeeping ─────────────────────────────────────

    /// Whether `payload` has already been shared to this peer.
    pub fn has_been_told(&self, payload: &IdentityPayload) -> bool {
        self.attrs.read().told_identities.contains(payload)
    }

    /// Record that `payload` has now been shared to this peer.
    pub fn mark_told(&self, payload: IdentityPayload) {
        self.attrs.write().told_identities.push(payload);
    }

    // ── Channel write stamps (for rate limiting by the transport) ───────

    pub fn register_write_proximity(&self) {
        let mut attrs = self.attrs.write();
        let now = self.clock.now();
        attrs.last_updated_at = now;
        attrs.last_write_proximity_at = Some(now);
    }

    pub fn time_since_write_proximity(&self) -> Option<Duration> {
        let at = self.attrs.read().last_write_proximity_at?;
        Some(self.clock.now().duration_since(at))
    }

    pub fn register_write_identity(&self) {
        let mut attrs = self.attrs.write();
        let now = self.clock.now();
        attrs.last_updated_at = now;
        attrs.last_write_identity_at = Some(now);
    }

    pub fn time_since_write_identity(&self) -> Option<Duration> {
        let at = self.attrs.read().last_write_identity_at?;
        Some(self.clock.now().duration_since(at))
    }

    pub fn register_write_identity_sharing(&self) {
        let mut attrs = self.attrs.write();
        let now = self.clock.now();
        attrs.last_updated_at = now;
        attrs.last_write_identity_sharing_at = Some(now);
    }

    pub fn time_since_write_identity_sharing(&self) -> Option<Duration> {
        let at = self.attrs.read().last_write_identity_sharing_at?;
        Some(self.clock.now().duration_since(at))
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("target_id", &self.target_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = self.attrs.read();
        write!(
            f,
            "Device[id={},platform={},payload={},address={}]",
            self.target_id,
            attrs.platform,
            attrs
                .identity_payload
                .as_ref()
                .map(|payload| payload.to_string())
                .unwrap_or_else(|| "-".to_string()),
            attrs
                .pseudo_address
                .map(|address| address.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}
