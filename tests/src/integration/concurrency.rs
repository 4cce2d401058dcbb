//! # Concurrency Tests
//!
//! Producers, consumers and subscription churn running at the same time.
//! Checks that history stays bounded, per-subscriber order holds, closed
//! queues end cleanly, and a stalled consumer never stalls a producer.

#[cfg(test)]
mod tests {
    use heartbeat_bus::{BusConfig, HeartbeatBus, HeartbeatEvent, SubscriptionError};
    use rand::Rng;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};
    use tokio::time::timeout;

    const PRODUCERS: usize = 8;
    const EVENTS_PER_PRODUCER: usize = 500;

    fn agent(p: usize) -> String {
        format!("agent-{p}")
    }

    #[test]
    fn test_concurrent_reports_keep_history_bounded() {
        let bus = HeartbeatBus::new(BusConfig::new(32, 4)).unwrap();

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let bus = bus.clone();
                thread::spawn(move || {
                    for seq in 0..EVENTS_PER_PRODUCER {
                        // Two producers share each key.
                        let key = agent(p % (PRODUCERS / 2));
                        bus.report(HeartbeatEvent::new(key, "processing").with_job(seq.to_string()));
                        assert!(bus.recent(&agent(p % (PRODUCERS / 2)), 1000).len() <= 32);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = bus.snapshot();
        assert_eq!(snapshot.events_published, (PRODUCERS * EVENTS_PER_PRODUCER) as u64);
        assert_eq!(snapshot.keys, PRODUCERS / 2);
        for key in bus.list_keys() {
            assert_eq!(bus.history(&key).len(), 32);
        }
    }

    #[test]
    fn test_per_subscriber_fifo_across_producers() {
        let total = PRODUCERS * EVENTS_PER_PRODUCER;
        let bus = HeartbeatBus::new(BusConfig::new(10, total)).unwrap();
        let mut sub = bus.subscribe("*");

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let bus = bus.clone();
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for seq in 0..EVENTS_PER_PRODUCER {
                        bus.report(HeartbeatEvent::new(agent(p), "processing").with_job(seq.to_string()));
                        if rng.gen_ratio(1, 50) {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut last_seq: HashMap<String, usize> = HashMap::new();
        let mut received = 0;
        while let Ok(Some(event)) = sub.try_recv() {
            let seq: usize = event.job_id.parse().unwrap();
            if let Some(prev) = last_seq.insert(event.agent_key.clone(), seq) {
                assert!(seq > prev, "{} went from {prev} to {seq}", event.agent_key);
            }
            received += 1;
        }

        assert_eq!(received, total);
        assert_eq!(sub.dropped(), 0);
    }

    #[test]
    fn test_subscription_churn_during_publish() {
        let bus = HeartbeatBus::new(BusConfig::new(16, 8)).unwrap();
        let stop = Arc::new(AtomicBool::new(false));

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let bus = bus.clone();
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        bus.report(HeartbeatEvent::new(agent(p), "idle"));
                    }
                })
            })
            .collect();

        let churners: Vec<_> = (0..4)
            .map(|c| {
                let bus = bus.clone();
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for _ in 0..200 {
                        let key = if rng.gen_bool(0.3) {
                            "*".to_string()
                        } else {
                            agent(c)
                        };
                        let mut sub = bus.subscribe(&key);
                        if rng.gen_bool(0.5) {
                            thread::sleep(Duration::from_micros(rng.gen_range(0..200)));
                        }
                        bus.unsubscribe(&key, sub.id());
                        // Racing duplicate unsubscribe is harmless.
                        bus.unsubscribe(&key, sub.id());

                        // Whatever was enqueued drains, then the queue reports closed.
                        let mut drained = 0;
                        loop {
                            match sub.try_recv() {
                                Ok(Some(_)) => drained += 1,
                                Ok(None) => panic!("unsubscribed queue must not look open"),
                                Err(SubscriptionError::Closed) => break,
                            }
                        }
                        assert!(drained <= 8);
                    }
                })
            })
            .collect();

        for churner in churners {
            churner.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(bus.snapshot().active_subscriptions, 0);
        for key in bus.list_keys() {
            assert!(bus.history(&key).len() <= 16);
        }
    }

    #[test]
    fn test_stalled_consumer_never_blocks_producers() {
        let bus = HeartbeatBus::new(BusConfig::new(100, 1)).unwrap();
        let _stalled_exact = bus.subscribe("agent-0");
        let _stalled_all = bus.subscribe("*");

        let started = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bus = bus.clone();
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        bus.report(HeartbeatEvent::new(agent(0), "waiting"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(started.elapsed() < Duration::from_secs(30));
        let snapshot = bus.snapshot();
        assert_eq!(snapshot.events_published, 20_000);
        assert_eq!(snapshot.deliveries, 2);
        assert_eq!(snapshot.drops, 2 * 20_000 - 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_async_consumers_with_dropping_subscriptions() {
        let bus = HeartbeatBus::new(BusConfig::new(50, 64)).unwrap();

        let mut watchers = Vec::new();
        for _ in 0..4 {
            let mut sub = bus.subscribe("*");
            watchers.push(tokio::spawn(async move {
                let mut count = 0usize;
                while let Ok(Some(_)) = timeout(Duration::from_millis(200), sub.recv()).await {
                    count += 1;
                }
                count
            }));
        }

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let bus = bus.clone();
                tokio::spawn(async move {
                    for seq in 0..250 {
                        bus.report(HeartbeatEvent::new(agent(p), "processing").with_job(seq.to_string()));
                        if seq % 25 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();

        // Short-lived subscriptions that are dropped instead of unsubscribed.
        for p in 0..20 {
            let sub = bus.subscribe(&agent(p % 4));
            tokio::task::yield_now().await;
            drop(sub);
        }

        for producer in producers {
            producer.await.unwrap();
        }

        let mut total = 0;
        for watcher in watchers {
            total += watcher.await.unwrap();
        }

        let snapshot = bus.snapshot();
        assert_eq!(snapshot.events_published, 1_000);
        // Short-lived subscriptions also took deliveries.
        assert!(total as u64 <= snapshot.deliveries);
        assert!(total > 0);
        assert_eq!(bus.subscriber_count("*"), 0);
    }
}
