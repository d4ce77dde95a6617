//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics behind `DashMap` series maps and rendered in
//! Prometheus text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::{
    CounterVec, GatewayMetrics, GaugeVec, HistogramVec, MetricKind, MetricsRegistry,
    HTTP_REQUEST_BUCKETS_SECS, MODEL_RESPONSE_BUCKETS_SECS,
};
