//! # Telemetry Integration
//!
//! Bus snapshots exported through `heartbeat-telemetry` metrics.

#[cfg(test)]
mod tests {
    use heartbeat_bus::{BusConfig, HeartbeatBus, HeartbeatEvent};
    use heartbeat_telemetry::{encode_metrics, BusMetrics};
    use prometheus::Registry;

    #[test]
    fn test_snapshot_exported_as_metrics() {
        let registry = Registry::new();
        let metrics = BusMetrics::register(&registry, "agents").unwrap();
        let bus = HeartbeatBus::new(BusConfig::new(3, 1)).unwrap();
        let _slow = bus.subscribe("chat");

        for _ in 0..4 {
            bus.report(HeartbeatEvent::new("chat", "processing"));
        }
        metrics.observe(&bus.snapshot());

        assert_eq!(metrics.published_total(), 4);
        assert_eq!(metrics.dropped_total(), 3);

        let text = encode_metrics(&registry).unwrap();
        assert!(text.contains("heartbeat_bus_buffered_events{bus=\"agents\"} 3"));
        assert!(text.contains("heartbeat_bus_active_subscriptions{bus=\"agents\"} 1"));
        assert!(text.contains("heartbeat_bus_delivered_total{bus=\"agents\"} 1"));
    }

    #[test]
    fn test_repeated_observation_counts_each_event_once() {
        let registry = Registry::new();
        let metrics = BusMetrics::register(&registry, "agents").unwrap();
        let bus = HeartbeatBus::with_defaults();

        bus.report(HeartbeatEvent::new("chat", "idle"));
        metrics.observe(&bus.snapshot());
        metrics.observe(&bus.snapshot());
        bus.report(HeartbeatEvent::new("chat", "idle"));
        metrics.observe(&bus.snapshot());

        assert_eq!(metrics.published_total(), 2);
    }
}
