//! Identity sharing from selection through the wire to peer ingestion.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nt_02_signal_codec::{decode_write_identity_sharing, encode_write_identity_sharing};
    use nt_03_target_registry::{
        ChannelWrite, ControllableTimeSource, PlatformGuess, SensorConfig, TargetRegistry,
    };
    use shared_types::{IdentityPayload, Proximity};

    use crate::init_tracing;

    fn make_registry(config: SensorConfig) -> TargetRegistry {
        let clock = Arc::new(ControllableTimeSource::new(1_000_000));
        let (registry, _dispatcher) = TargetRegistry::new(config, clock);
        registry
    }

    fn add_sharable(registry: &TargetRegistry, handle: &str, byte: u8) -> IdentityPayload {
        let payload = IdentityPayload::new(vec![byte; 16]);
        let device = registry.device_for_handle(handle);
        device.set_identity_payload(payload.clone());
        device.set_platform(PlatformGuess::Ios);
        payload
    }

    /// The bundle never exceeds the configured transfer cap, no matter how
    /// many identities are eligible.
    #[test]
    fn test_bundle_bounded_regardless_of_eligible_count() {
        init_tracing();
        let registry = make_registry(SensorConfig::for_testing());
        for index in 0..200u8 {
            add_sharable(&registry, &format!("BB:{index:02X}"), index);
        }
        let peer = registry.device_for_handle("AA:01");
        peer.set_proximity(Proximity(-60));

        let sharing = registry.payload_sharing_data(&peer);

        let cap = registry.config().max_transfer_bytes;
        assert!(sharing.data.len() <= cap, "{} > {cap}", sharing.data.len());
        // 31 payloads of 16 bytes fit under 510; the 32nd would not.
        assert_eq!(sharing.data.len(), 31 * 16);
    }

    /// Sharing ships disabled: the default expiry window of zero makes
    /// every record stale for sharing purposes.
    #[test]
    fn test_default_config_shares_nothing() {
        let registry = make_registry(SensorConfig::default());
        add_sharable(&registry, "BB:02", 1);
        let peer = registry.device_for_handle("AA:01");
        peer.set_proximity(Proximity(-60));

        let sharing = registry.payload_sharing_data(&peer);

        assert!(sharing.data.is_empty());
        assert_eq!(sharing.proximity, Proximity(-60));
    }

    /// Full loop: selection on one side, wire encoding, ingestion by the
    /// peer's registry on the other side.
    #[test]
    fn test_sharing_round_trip_between_registries() {
        let sender = make_registry(SensorConfig::for_testing());
        let shared_identity = add_sharable(&sender, "BB:02", 7);
        let peer_record = sender.device_for_handle("AA:01");
        peer_record.set_proximity(Proximity(-55));

        // Sender packs its bundle and writes it over the channel.
        let sharing = sender.payload_sharing_data(&peer_record);
        let wire = encode_write_identity_sharing(&sharing);

        // The peer decodes the same bytes and merges them into its own
        // record of the sender.
        let receiver = make_registry(SensorConfig::for_testing());
        receiver.channel_opened("CC:09");
        let applied = receiver.channel_write("CC:09", wire.as_bytes());

        match applied {
            Some(ChannelWrite::IdentitySharing(received)) => {
                assert_eq!(received.proximity, Proximity(-55));
                assert_eq!(received.data.as_bytes(), shared_identity.as_bytes());
            }
            other => panic!("expected identity sharing write, got {other:?}"),
        }
        let sender_record = receiver.device_for_handle("CC:09");
        assert_eq!(sender_record.proximity(), Some(Proximity(-55)));

        // A decoder on its own sees the identical bundle.
        assert_eq!(
            decode_write_identity_sharing(wire.as_bytes()),
            Some(sharing)
        );
    }

    /// Identities already told to a peer are re-eligible only after the
    /// untold ones, so repeated exchanges converge instead of repeating
    /// the same bundle forever.
    #[test]
    fn test_repeat_exchange_marks_identities_told() {
        let registry = make_registry(SensorConfig::for_testing());
        let identity = add_sharable(&registry, "BB:02", 3);
        let peer = registry.device_for_handle("AA:01");
        peer.set_proximity(Proximity(-61));

        let first = registry.payload_sharing_data(&peer);
        assert_eq!(first.data.as_bytes(), identity.as_bytes());
        assert!(peer.has_been_told(&identity));

        // Nothing new appeared; the told identity is still within the cap
        // and is resent from the told partition.
        let second = registry.payload_sharing_data(&peer);
        assert_eq!(second.data.as_bytes(), identity.as_bytes());
    }
}
