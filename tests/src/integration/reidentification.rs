//! Device re-identification across address rotation, end to end:
//! observations enter through real advert bytes, identity arrives over a
//! channel write, and delegates observe the record lifecycle in order.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use nt_02_signal_codec::{encode_write_identity, encode_write_proximity};
    use nt_03_target_registry::{
        ControllableTimeSource, InMemoryDeviceLog, SensorConfig, TargetRegistry,
    };
    use shared_types::{IdentityPayload, Proximity};

    use crate::init_tracing;

    /// Advert carrying a pseudo address under the sensor vendor id (65530).
    fn sensor_advert(address: &[u8; 6]) -> Vec<u8> {
        let mut advert = vec![0x02, 0x01, 0x06, 0x09, 0xFF, 0xFA, 0xFF];
        advert.extend_from_slice(address);
        advert
    }

    fn make_registry() -> (
        TargetRegistry,
        nt_03_target_registry::EventDispatcher,
        Arc<ControllableTimeSource>,
    ) {
        let clock = Arc::new(ControllableTimeSource::new(1_000_000));
        let (registry, dispatcher) =
            TargetRegistry::new(SensorConfig::for_testing(), clock.clone());
        (registry, dispatcher, clock)
    }

    #[test]
    fn test_identity_follows_device_across_rotation() {
        init_tracing();
        let (registry, _dispatcher, clock) = make_registry();
        let pseudo = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let identity = IdentityPayload::new(vec![0xAB; 32]);

        // Scan the device, open a channel, and let it write its identity.
        registry.observe("AA:01", &sensor_advert(&pseudo), None, Some(Proximity(-48)));
        registry.channel_opened("AA:01");
        registry.channel_write("AA:01", encode_write_identity(&identity).as_bytes());
        registry.channel_closed("AA:01");

        // The platform rotates its radio address: a brand-new logical
        // handle broadcasting the same pseudo address.
        clock.advance(Duration::from_secs(90));
        let rotated = registry.observe("FE:99", &sensor_advert(&pseudo), None, None);

        assert_eq!(rotated.identity_payload(), Some(identity));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rotation_chain_preserves_identity_through_generations() {
        let (registry, _dispatcher, clock) = make_registry();
        let pseudo = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let identity = IdentityPayload::new(vec![0xCD; 32]);

        let first = registry.observe("AA:01", &sensor_advert(&pseudo), None, None);
        first.set_identity_payload(identity.clone());

        for (generation, handle) in ["BB:02", "CC:03", "DD:04"].iter().enumerate() {
            clock.advance(Duration::from_secs(60));
            let device = registry.observe(handle, &sensor_advert(&pseudo), None, None);
            assert_eq!(
                device.identity_payload(),
                Some(identity.clone()),
                "generation {generation} lost the identity"
            );
        }
    }

    #[test]
    fn test_channel_writes_update_proximity_between_scans() {
        let (registry, _dispatcher, _clock) = make_registry();

        let device = registry.observe("AA:01", &[0x02, 0x01, 0x06], None, Some(Proximity(-40)));
        registry.channel_opened("AA:01");
        registry.channel_write("AA:01", encode_write_proximity(Proximity(-62)).as_bytes());

        assert_eq!(device.proximity(), Some(Proximity(-62)));
    }

    #[tokio::test]
    async fn test_delegates_see_lifecycle_in_application_order() {
        init_tracing();
        let (registry, mut dispatcher, _clock) = make_registry();
        let log = Arc::new(InMemoryDeviceLog::new());
        dispatcher.add_delegate(log.clone());
        let dispatcher_task = tokio::spawn(dispatcher.run());

        let pseudo = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        registry.observe("AA:01", &sensor_advert(&pseudo), None, Some(Proximity(-50)));
        registry.observe("BB:02", &sensor_advert(&pseudo), None, None);
        registry.handle_lost("AA:01");
        registry.handle_lost("BB:02");
        drop(registry);
        dispatcher_task.await.expect("dispatcher completes");

        let events = log.events();
        assert!(events.len() >= 4);
        // The first event is the first record's creation, the last is the
        // second record's deletion: application order survives the queue.
        assert_eq!(
            events.first().map(|event| event.target_id.as_str()),
            Some("AA:01")
        );
        assert_eq!(
            events.last().map(|event| event.target_id.as_str()),
            Some("BB:02")
        );
    }

    #[test]
    fn test_expiry_sweep_forgets_rotated_out_records() {
        let (registry, _dispatcher, clock) = make_registry();
        let pseudo = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

        registry.observe("AA:01", &sensor_advert(&pseudo), None, None);
        clock.advance(Duration::from_secs(45));
        let fresh = registry.observe("BB:02", &sensor_advert(&pseudo), None, None);
        clock.advance(Duration::from_secs(30)); // old handle now 75s stale

        assert_eq!(registry.remove_expired(), 1);
        let remaining = registry.devices();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].target_id(), fresh.target_id());
    }
}
