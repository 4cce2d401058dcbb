//! # Heartbeat Bus Benchmarks
//!
//! Cost of `publish` as the number of matching subscribers grows, with
//! queues that have room and queues that are full (drop path).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heartbeat_bus::{BusConfig, HeartbeatBus, HeartbeatEvent};
use std::time::Duration;

fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("heartbeat-bus-publish");
    group.measurement_time(Duration::from_secs(5));

    for subscribers in [0usize, 1, 8, 64] {
        // Queues are full after the first event, so steady state is the drop path.
        let bus = HeartbeatBus::new(BusConfig::new(100, 1)).unwrap();
        let _subs: Vec<_> = (0..subscribers)
            .map(|i| {
                if i % 2 == 0 {
                    bus.subscribe("chat")
                } else {
                    bus.subscribe("*")
                }
            })
            .collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("full_queues", subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| black_box(bus.publish(HeartbeatEvent::new("chat", "processing"))));
            },
        );
    }

    group.finish();
}

fn bench_publish_with_draining_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("heartbeat-bus-deliver");

    let bus = HeartbeatBus::new(BusConfig::new(100, 1024)).unwrap();
    let mut sub = bus.subscribe("*");

    group.bench_function("publish_and_drain", |b| {
        b.iter(|| {
            bus.report(HeartbeatEvent::new("chat", "idle"));
            black_box(sub.try_recv().ok());
        });
    });

    group.finish();
}

fn bench_recent(c: &mut Criterion) {
    let bus = HeartbeatBus::with_defaults();
    for i in 0..100 {
        bus.report(HeartbeatEvent::new("chat", "idle").with_job(i.to_string()));
    }

    c.bench_function("heartbeat-bus-recent-10", |b| {
        b.iter(|| black_box(bus.recent("chat", 10)));
    });
}

criterion_group!(
    benches,
    bench_publish_fan_out,
    bench_publish_with_draining_reader,
    bench_recent
);
criterion_main!(benches);
