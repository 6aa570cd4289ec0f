use criterion::{criterion_group, criterion_main, Criterion};
use roomcast_server::metrics::ServerMetrics;
use std::hint::black_box;
use std::time::Duration;

fn bench_dispatch_latency_recording(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("record_dispatch_latency", |b| {
        let metrics = ServerMetrics::new();
        b.to_async(&rt).iter(|| async {
            for sample in 0..512u64 {
                let duration = Duration::from_micros(500 + (sample % 250));
                metrics.record_dispatch_latency(duration).await;
            }
        });
    });

    c.bench_function("dispatch_latency_snapshot", |b| {
        let metrics = ServerMetrics::new();
        rt.block_on(async {
            for sample in 0..5000u64 {
                let duration = Duration::from_micros(300 + (sample % 200));
                metrics.record_dispatch_latency(duration).await;
            }
        });

        b.to_async(&rt).iter(|| async {
            black_box(metrics.dispatch_latency_snapshot().await);
        });
    });
}

criterion_group!(dispatch_latency, bench_dispatch_latency_recording);
criterion_main!(dispatch_latency);
