use crate::metrics::MetricsSnapshot;

/// Render a metrics snapshot into Prometheus text exposition format.
pub(crate) fn render_prometheus_metrics(snapshot: &MetricsSnapshot) -> String {
    use std::fmt::Write;

    fn write_metric(buf: &mut String, name: &str, help: &str, metric_type: &str, value: f64) {
        let _ = writeln!(buf, "# HELP {name} {help}");
        let _ = writeln!(buf, "# TYPE {name} {metric_type}");
        let _ = writeln!(buf, "{name} {value}");
    }

    fn counter(buf: &mut String, name: &str, help: &str, value: u64) {
        write_metric(buf, name, help, "counter", value as f64);
    }

    fn gauge(buf: &mut String, name: &str, help: &str, value: u64) {
        write_metric(buf, name, help, "gauge", value as f64);
    }

    let mut buf = String::new();

    counter(
        &mut buf,
        "roomcast_connections_total",
        "Total connections accepted since startup",
        snapshot.total_connections,
    );
    gauge(
        &mut buf,
        "roomcast_connections_active",
        "Number of currently active connections",
        snapshot.active_connections,
    );
    counter(
        &mut buf,
        "roomcast_disconnections_total",
        "Total connection closures observed since startup",
        snapshot.disconnections,
    );

    counter(
        &mut buf,
        "roomcast_rooms_created_total",
        "Total rooms created since startup",
        snapshot.rooms_created,
    );
    counter(
        &mut buf,
        "roomcast_rooms_deleted_total",
        "Total rooms deleted since startup",
        snapshot.rooms_deleted,
    );
    counter(
        &mut buf,
        "roomcast_members_joined_total",
        "Total member joins processed since startup",
        snapshot.members_joined,
    );
    counter(
        &mut buf,
        "roomcast_members_left_total",
        "Total member departures processed since startup",
        snapshot.members_left,
    );
    counter(
        &mut buf,
        "roomcast_name_conflicts_rejected_total",
        "Total join attempts rejected for a duplicate display name",
        snapshot.name_conflicts_rejected,
    );

    counter(
        &mut buf,
        "roomcast_grace_timers_armed_total",
        "Total reconnection grace timers armed since startup",
        snapshot.grace_timers_armed,
    );
    counter(
        &mut buf,
        "roomcast_grace_timers_expired_total",
        "Total reconnection grace timers that fired without a reconnect",
        snapshot.grace_timers_expired,
    );

    counter(
        &mut buf,
        "roomcast_chat_messages_sent_total",
        "Total chat messages broadcast since startup",
        snapshot.chat_messages_sent,
    );
    counter(
        &mut buf,
        "roomcast_chat_persistence_failures_total",
        "Total chat messages that failed to persist",
        snapshot.chat_persistence_failures,
    );
    counter(
        &mut buf,
        "roomcast_reactions_toggled_total",
        "Total chat message reaction toggles processed",
        snapshot.reactions_toggled,
    );

    counter(
        &mut buf,
        "roomcast_media_routers_created_total",
        "Total SFU routers created since startup",
        snapshot.media_routers_created,
    );
    counter(
        &mut buf,
        "roomcast_media_routers_closed_total",
        "Total SFU routers closed since startup",
        snapshot.media_routers_closed,
    );
    counter(
        &mut buf,
        "roomcast_producers_created_total",
        "Total media producers created since startup",
        snapshot.producers_created,
    );
    counter(
        &mut buf,
        "roomcast_producers_closed_total",
        "Total media producers closed since startup",
        snapshot.producers_closed,
    );
    gauge(
        &mut buf,
        "roomcast_worker_pool_size",
        "Current size of the media engine worker pool",
        snapshot.worker_pool_size,
    );
    counter(
        &mut buf,
        "roomcast_autoscale_events_total",
        "Total worker pool auto-scale events since startup",
        snapshot.autoscale_events,
    );

    gauge(
        &mut buf,
        "roomcast_dispatch_latency_p50_micros",
        "p50 inbound message dispatch latency in microseconds",
        snapshot.dispatch_latency.p50_micros,
    );
    gauge(
        &mut buf,
        "roomcast_dispatch_latency_p95_micros",
        "p95 inbound message dispatch latency in microseconds",
        snapshot.dispatch_latency.p95_micros,
    );
    gauge(
        &mut buf,
        "roomcast_dispatch_latency_p99_micros",
        "p99 inbound message dispatch latency in microseconds",
        snapshot.dispatch_latency.p99_micros,
    );
    gauge(
        &mut buf,
        "roomcast_dispatch_latency_max_micros",
        "Maximum observed inbound message dispatch latency in microseconds",
        snapshot.dispatch_latency.max_micros,
    );
    counter(
        &mut buf,
        "roomcast_dispatch_latency_samples_total",
        "Total dispatch latency samples recorded since startup",
        snapshot.dispatch_latency.count,
    );

    buf
}
