//! # Subscription Streams
//!
//! `Subscription::into_stream` driven with `tokio_stream::StreamExt`
//! combinators, the way monitors consume the bus.

#[cfg(test)]
mod tests {
    use heartbeat_bus::HeartbeatBus;
    use heartbeat_types::{is_wildcard, AgentStatus, HeartbeatEvent, WILDCARD_KEY};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    const STREAM_BOUND: Duration = Duration::from_millis(500);

    #[tokio::test]
    async fn test_wildcard_stream_yields_publish_order() {
        let bus = HeartbeatBus::with_defaults();
        let stream = bus.subscribe(WILDCARD_KEY).into_stream();
        assert!(is_wildcard(stream.subscription().key()));

        bus.report(HeartbeatEvent::with_status("chat", AgentStatus::Processing).with_job("job-1"));
        bus.report(
            HeartbeatEvent::with_status("worker", AgentStatus::Waiting)
                .with_metadata("queue_depth", json!(3)),
        );
        bus.report(HeartbeatEvent::with_status("chat", AgentStatus::Idle));

        let events: Vec<Arc<HeartbeatEvent>> = timeout(STREAM_BOUND, stream.take(3).collect())
            .await
            .expect("three events within bound");

        let seen: Vec<_> = events
            .iter()
            .map(|e| (e.agent_key.as_str(), e.agent_status()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("chat", Some(AgentStatus::Processing)),
                ("worker", Some(AgentStatus::Waiting)),
                ("chat", Some(AgentStatus::Idle)),
            ]
        );
        assert_eq!(events[1].metadata.get("queue_depth"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_stream_ends_after_unsubscribe_drains() {
        let bus = HeartbeatBus::with_defaults();
        let stream = bus.subscribe("chat").into_stream();
        let id = stream.subscription().id();

        bus.report(HeartbeatEvent::new("chat", "processing").with_job("job-1"));
        bus.report(HeartbeatEvent::new("chat", "idle").with_job("job-1"));
        bus.unsubscribe("chat", id);
        bus.report(HeartbeatEvent::new("chat", "processing").with_job("job-2"));

        let jobs: Vec<String> = timeout(
            STREAM_BOUND,
            stream.map(|e| format!("{}:{}", e.job_id, e.status)).collect(),
        )
        .await
        .expect("stream must end once drained");

        assert_eq!(jobs, vec!["job-1:processing", "job-1:idle"]);
        assert_eq!(bus.subscriber_count("chat"), 0);
    }

    #[tokio::test]
    async fn test_filtered_stream_sees_only_idle() {
        let bus = HeartbeatBus::with_defaults();
        let stream = bus
            .subscribe("worker")
            .into_stream()
            .filter(|e| e.agent_status() == Some(AgentStatus::Idle));

        for status in [
            AgentStatus::Processing,
            AgentStatus::Idle,
            AgentStatus::Waiting,
            AgentStatus::Idle,
        ] {
            bus.report(HeartbeatEvent::with_status("worker", status));
        }
        drop(bus);

        let idle: Vec<Arc<HeartbeatEvent>> = timeout(STREAM_BOUND, stream.collect())
            .await
            .expect("stream must end with the bus");
        assert_eq!(idle.len(), 2);
        assert!(idle.iter().all(|e| e.status == "idle"));
    }
}
