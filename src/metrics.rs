//! Prometheus counters for the feed and publisher paths

use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};
use std::sync::LazyLock;

pub static DELTAS_APPLIED: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("l3_deltas_applied_total", "Depth deltas applied to the book").unwrap()
});

pub static SNAPSHOTS_LOADED: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("l3_snapshots_loaded_total", "REST depth snapshots loaded").unwrap()
});

pub static RECONNECTS: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("l3_ws_reconnects_total", "Upstream WebSocket reconnect attempts").unwrap()
});

pub static FRAMES_PUBLISHED: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("l3_frames_published_total", "L3 update frames sent to subscribers")
        .unwrap()
});

/// Render all registered metrics in the Prometheus text exposition format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
