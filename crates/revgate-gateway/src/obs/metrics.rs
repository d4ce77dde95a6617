//! Metrics registry for the gateway.
//!
//! Counter/gauge/histogram families with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Histograms count in integer microseconds and only convert to
//! seconds when rendering.

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use dashmap::DashMap;
use revgate_core::error::{GatewayError, Result};

/// Bucket bounds for `model_response_time_seconds`.
pub const MODEL_RESPONSE_BUCKETS_SECS: [f64; 6] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Bucket bounds for `http_request_duration_seconds`.
pub const HTTP_REQUEST_BUCKETS_SECS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn sample_name(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{}{{{}}}", name, labels)
    }
}

/// Render seconds the way Prometheus clients do (`1` not `1.0`, `0.1` stays `0.1`).
fn fmt_secs(v: f64) -> String {
    format!("{}", v)
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value, 0 if the series was never touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn samples(&self, name: &str, out: &mut Vec<String>) {
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            out.push(format!("{} {}", sample_name(name, &label_str(&key)), val));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }
    /// Decrement by 1.
    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(label_key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    /// Overwrite the value.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(label_key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn samples(&self, name: &str, out: &mut Vec<String>) {
        let mut rows: Vec<(LabelKey, i64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            out.push(format!("{} {}", sample_name(name, &label_str(&key)), val));
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Cumulative counts, one per bucket bound (overflow is `count`).
    pub buckets: Vec<u64>,
    pub count: u64,
    pub sum: Duration,
}

pub struct HistogramVec {
    bounds_secs: Vec<f64>,
    bounds_micros: Vec<u64>,
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(bounds_secs: &[f64]) -> Self {
        let mut bounds_secs = bounds_secs.to_vec();
        bounds_secs.sort_by(|a, b| a.total_cmp(b));
        bounds_secs.dedup();
        let bounds_micros = bounds_secs.iter().map(|s| (s * 1_000_000.0).round() as u64).collect();
        Self { bounds_secs, bounds_micros, map: DashMap::new() }
    }

    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let n = self.bounds_micros.len();
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicHistogram::new(n));
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // Cumulative: every bucket whose bound covers the value.
        for (i, &b) in self.bounds_micros.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        self.map.get(&label_key(labels)).map(|h| HistogramSnapshot {
            buckets: h.buckets.iter().map(|b| b.load(Ordering::Relaxed)).collect(),
            count: h.count.load(Ordering::Relaxed),
            sum: Duration::from_micros(h.sum_micros.load(Ordering::Relaxed)),
        })
    }

    fn samples(&self, name: &str, out: &mut Vec<String>) {
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(hist) = self.map.get(&key) else { continue };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, le) in self.bounds_secs.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                out.push(format!("{}_bucket{{{}le=\"{}\"}} {}", name, prefix, fmt_secs(*le), count));
            }
            let count = hist.count.load(Ordering::Relaxed);
            out.push(format!("{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count));

            let sum = hist.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
            out.push(format!("{} {}", sample_name(&format!("{}_sum", name), &labels), sum));
            out.push(format!("{} {}", sample_name(&format!("{}_count", name), &labels), count));
        }
    }
}

/// Type of a registered family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

#[derive(Clone)]
enum Handle {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
}

impl Handle {
    fn kind(&self) -> MetricKind {
        match self {
            Handle::Counter(_) => MetricKind::Counter,
            Handle::Gauge(_) => MetricKind::Gauge,
            Handle::Histogram(_) => MetricKind::Histogram,
        }
    }
}

struct Family {
    name: String,
    help: String,
    handle: Handle,
}

impl Family {
    fn lines(&self) -> Vec<String> {
        let mut out = vec![
            format!("# HELP {} {}", self.name, escape_help(&self.help)),
            format!("# TYPE {} {}", self.name, self.handle.kind().as_str()),
        ];
        match &self.handle {
            Handle::Counter(c) => c.samples(&self.name, &mut out),
            Handle::Gauge(g) => g.samples(&self.name, &mut out),
            Handle::Histogram(h) => h.samples(&self.name, &mut out),
        }
        out
    }
}

/// Named metric families in registration order.
///
/// Registration happens at startup; the hot path only touches the returned
/// `Arc` handles and never takes the family lock.
#[derive(Default)]
pub struct MetricsRegistry {
    families: RwLock<Vec<Arc<Family>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str, help: &str) -> Result<Arc<CounterVec>> {
        match self.register(name, help, MetricKind::Counter, || {
            Handle::Counter(Arc::new(CounterVec::default()))
        })? {
            Handle::Counter(c) => Ok(c),
            other => Err(kind_mismatch(name, other.kind(), MetricKind::Counter)),
        }
    }

    pub fn gauge(&self, name: &str, help: &str) -> Result<Arc<GaugeVec>> {
        match self.register(name, help, MetricKind::Gauge, || {
            Handle::Gauge(Arc::new(GaugeVec::default()))
        })? {
            Handle::Gauge(g) => Ok(g),
            other => Err(kind_mismatch(name, other.kind(), MetricKind::Gauge)),
        }
    }

    pub fn histogram(&self, name: &str, help: &str, bounds_secs: &[f64]) -> Result<Arc<HistogramVec>> {
        match self.register(name, help, MetricKind::Histogram, || {
            Handle::Histogram(Arc::new(HistogramVec::new(bounds_secs)))
        })? {
            Handle::Histogram(h) => Ok(h),
            other => Err(kind_mismatch(name, other.kind(), MetricKind::Histogram)),
        }
    }

    fn register<F>(&self, name: &str, help: &str, kind: MetricKind, make: F) -> Result<Handle>
    where
        F: FnOnce() -> Handle,
    {
        if !valid_metric_name(name) {
            return Err(GatewayError::Config(format!("invalid metric name: {name:?}")));
        }

        let mut families = self
            .families
            .write()
            .map_err(|_| GatewayError::Internal("metrics registry lock poisoned".into()))?;

        if let Some(existing) = families.iter().find(|f| f.name == name) {
            let found = existing.handle.kind();
            if found != kind {
                return Err(kind_mismatch(name, found, kind));
            }
            return Ok(existing.handle.clone());
        }

        let handle = make();
        families.push(Arc::new(Family {
            name: name.to_string(),
            help: help.to_string(),
            handle: handle.clone(),
        }));
        Ok(handle)
    }

    /// Exposition lines, family by family.
    ///
    /// The family list is copied under a short read lock; series values are
    /// read lazily as the iterator advances, so writers are never blocked for
    /// the whole render.
    pub fn render(&self) -> impl Iterator<Item = String> {
        let families: Vec<Arc<Family>> = match self.families.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        families.into_iter().flat_map(|f| f.lines())
    }

    /// Full exposition body with a trailing newline.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for line in self.render() {
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

fn kind_mismatch(name: &str, existing: MetricKind, requested: MetricKind) -> GatewayError {
    GatewayError::Config(format!(
        "metric {name} already registered as {}, cannot register as {}",
        existing.as_str(),
        requested.as_str()
    ))
}

fn valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Typed handles to every family the gateway exports.
pub struct GatewayMetrics {
    registry: MetricsRegistry,
    pub review_length: Arc<CounterVec>,
    pub review_count: Arc<CounterVec>,
    pub short_review_warnings: Arc<CounterVec>,
    /// Running count of positive predictions. Never normalized, never decremented.
    pub sentiment_ratio: Arc<GaugeVec>,
    pub sentiment_predictions: Arc<CounterVec>,
    pub model_response_time: Arc<HistogramVec>,
    pub api_calls_version: Arc<CounterVec>,
    pub api_calls_analyze: Arc<CounterVec>,
    pub api_calls_feedback: Arc<CounterVec>,
    /// Every routed request, by method, matched path, and status.
    pub http_request_duration: Arc<HistogramVec>,
    pub app_info: Arc<GaugeVec>,
    draining_gauge: Arc<GaugeVec>,
    draining: AtomicBool,
}

impl GatewayMetrics {
    /// Register all gateway families. Fails only on conflicting registrations.
    pub fn register(app_version: &str) -> Result<Self> {
        let registry = MetricsRegistry::new();

        let app_info = registry.gauge("app_info", "Application info")?;
        let review_length = registry.counter("review_length_total", "Total number of words in reviews")?;
        let review_count = registry.counter("review_count_total", "Total number of reviews submitted")?;
        let short_review_warnings = registry.counter(
            "short_review_warnings_total",
            "Number of short review warnings shown",
        )?;
        let sentiment_ratio = registry.gauge("sentiment_ratio", "Ratio of positive to total reviews")?;
        let sentiment_predictions = registry.counter(
            "sentiment_predictions_total",
            "Number of sentiment predictions",
        )?;
        let model_response_time = registry.histogram(
            "model_response_time_seconds",
            "Model service response time in seconds",
            &MODEL_RESPONSE_BUCKETS_SECS,
        )?;
        let api_calls_version = registry.counter(
            "api_calls_version_total",
            "Number of calls to version endpoint",
        )?;
        let api_calls_analyze = registry.counter(
            "api_calls_analyze_total",
            "Number of calls to analyze endpoint",
        )?;
        let api_calls_feedback = registry.counter(
            "api_calls_feedback_total",
            "Number of calls to feedback endpoint",
        )?;
        let http_request_duration = registry.histogram(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            &HTTP_REQUEST_BUCKETS_SECS,
        )?;
        let draining_gauge = registry.gauge("revgate_draining", "1 while the gateway is shutting down")?;

        app_info.set(&[("version", app_version)], 1);
        sentiment_ratio.set(&[], 0);
        short_review_warnings.add(&[], 0);
        for c in [&api_calls_version, &api_calls_analyze, &api_calls_feedback] {
            c.add(&[], 0);
        }
        draining_gauge.set(&[], 0);

        Ok(Self {
            registry,
            review_length,
            review_count,
            short_review_warnings,
            sentiment_ratio,
            sentiment_predictions,
            model_response_time,
            api_calls_version,
            api_calls_analyze,
            api_calls_feedback,
            http_request_duration,
            app_info,
            draining_gauge,
            draining: AtomicBool::new(false),
        })
    }

    /// Call counter for a matched route, `None` for routes without one.
    pub fn api_calls_for(&self, matched_path: &str) -> Option<&CounterVec> {
        match matched_path {
            "/api/version" => Some(self.api_calls_version.as_ref()),
            "/api/analyze" => Some(self.api_calls_analyze.as_ref()),
            "/api/feedback" => Some(self.api_calls_feedback.as_ref()),
            _ => None,
        }
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
        self.draining_gauge.set(&[], 1);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    pub fn render(&self) -> String {
        self.registry.render_text()
    }
}
