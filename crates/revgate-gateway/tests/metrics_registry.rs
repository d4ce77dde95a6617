#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use revgate_gateway::obs::{GatewayMetrics, MetricsRegistry, MODEL_RESPONSE_BUCKETS_SECS};

#[test]
fn same_name_same_kind_returns_shared_handle() {
    let reg = MetricsRegistry::new();
    let a = reg.counter("hits_total", "hits").unwrap();
    let b = reg.counter("hits_total", "hits").unwrap();
    a.inc(&[]);
    b.inc(&[]);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.get(&[]), 2);
}

#[test]
fn same_name_different_kind_is_a_config_error() {
    let reg = MetricsRegistry::new();
    reg.counter("hits_total", "hits").unwrap();
    let err = reg.gauge("hits_total", "hits").err().expect("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert!(reg.histogram("hits_total", "hits", &[1.0]).is_err());
}

#[test]
fn invalid_names_are_rejected() {
    let reg = MetricsRegistry::new();
    assert!(reg.counter("", "x").is_err());
    assert!(reg.counter("9lives", "x").is_err());
    assert!(reg.counter("has-dash", "x").is_err());
}

#[test]
fn label_order_does_not_split_series() {
    let reg = MetricsRegistry::new();
    let c = reg.counter("req_total", "r").unwrap();
    c.inc(&[("a", "1"), ("b", "2")]);
    c.inc(&[("b", "2"), ("a", "1")]);
    assert_eq!(c.get(&[("a", "1"), ("b", "2")]), 2);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let reg = MetricsRegistry::new();
    let c = reg.counter("words_total", "w").unwrap();
    let g = reg.gauge("level", "l").unwrap();

    std::thread::scope(|s| {
        for t in 0..8 {
            let c = Arc::clone(&c);
            let g = Arc::clone(&g);
            s.spawn(move || {
                let label = if t % 2 == 0 { "control" } else { "treatment" };
                for _ in 0..1_000 {
                    c.add(&[("version", label)], 3);
                    g.inc(&[]);
                }
            });
        }
    });

    assert_eq!(c.get(&[("version", "control")]), 12_000);
    assert_eq!(c.get(&[("version", "treatment")]), 12_000);
    assert_eq!(g.get(&[]), 8_000);
}

#[test]
fn gauge_moves_both_ways() {
    let reg = MetricsRegistry::new();
    let g = reg.gauge("inflight", "i").unwrap();
    g.inc(&[]);
    g.inc(&[]);
    g.dec(&[]);
    assert_eq!(g.get(&[]), 1);
    g.set(&[], -4);
    assert_eq!(g.get(&[]), -4);
}

#[test]
fn histogram_buckets_are_cumulative_with_overflow() {
    let reg = MetricsRegistry::new();
    let h = reg.histogram("latency_seconds", "l", &MODEL_RESPONSE_BUCKETS_SECS).unwrap();

    h.observe(&[], Duration::from_millis(50));
    h.observe(&[], Duration::from_millis(700));
    h.observe(&[], Duration::from_secs(12));

    let snap = h.snapshot(&[]).unwrap();
    assert_eq!(snap.count, 3);
    assert_eq!(snap.buckets, vec![1, 1, 2, 2, 2, 2]);
    assert_eq!(snap.sum, Duration::from_millis(12_750));
}

#[test]
fn render_emits_help_type_and_samples() {
    let reg = MetricsRegistry::new();
    let c = reg.counter("review_count_total", "Total number of reviews submitted").unwrap();
    let h = reg.histogram("rt_seconds", "Response time", &[0.1, 1.0]).unwrap();
    c.inc(&[("version", "control")]);
    h.observe(&[], Duration::from_millis(250));

    let lines: Vec<String> = reg.render().collect();
    assert_eq!(
        lines,
        vec![
            "# HELP review_count_total Total number of reviews submitted",
            "# TYPE review_count_total counter",
            "review_count_total{version=\"control\"} 1",
            "# HELP rt_seconds Response time",
            "# TYPE rt_seconds histogram",
            "rt_seconds_bucket{le=\"0.1\"} 0",
            "rt_seconds_bucket{le=\"1\"} 1",
            "rt_seconds_bucket{le=\"+Inf\"} 1",
            "rt_seconds_sum 0.25",
            "rt_seconds_count 1",
        ]
    );
    assert!(reg.render_text().ends_with("rt_seconds_count 1\n"));
}

#[test]
fn label_values_are_escaped() {
    let reg = MetricsRegistry::new();
    let c = reg.counter("odd_total", "o").unwrap();
    c.inc(&[("version", "a\"b\\c")]);
    assert!(reg.render_text().contains(r#"odd_total{version="a\"b\\c"} 1"#));
}

#[test]
fn gateway_families_are_registered_up_front() {
    let m = GatewayMetrics::register("2.0.1").unwrap();
    let text = m.render();

    for family in [
        "app_info",
        "review_length_total",
        "review_count_total",
        "short_review_warnings_total",
        "sentiment_ratio",
        "sentiment_predictions_total",
        "model_response_time_seconds",
        "api_calls_version_total",
        "api_calls_analyze_total",
        "api_calls_feedback_total",
        "http_request_duration_seconds",
        "revgate_draining",
    ] {
        assert!(text.contains(&format!("# TYPE {family} ")), "missing {family}");
    }
    assert!(text.contains("app_info{version=\"2.0.1\"} 1"));
    assert!(text.contains("short_review_warnings_total 0"));
    assert!(text.contains("revgate_draining 0"));
}

#[test]
fn draining_flips_gauge() {
    let m = GatewayMetrics::register("x").unwrap();
    assert!(!m.is_draining());
    m.set_draining();
    assert!(m.is_draining());
    assert!(m.render().contains("revgate_draining 1"));
}

#[test]
fn api_call_families_keep_per_endpoint_names() {
    let m = GatewayMetrics::register("x").unwrap();
    m.api_calls_for("/api/analyze").unwrap().inc(&[]);
    m.api_calls_for("/api/version").unwrap().inc(&[]);
    assert!(m.api_calls_for("/metrics").is_none());

    let text = m.render();
    assert!(text.contains("# HELP api_calls_analyze_total Number of calls to analyze endpoint"));
    assert!(text.contains("# TYPE api_calls_analyze_total counter"));
    assert!(text.contains("api_calls_analyze_total 1"));
    assert!(text.contains("api_calls_version_total 1"));
    assert!(text.contains("api_calls_feedback_total 0"));
}

#[test]
fn fractional_bucket_bounds_are_exact() {
    let reg = MetricsRegistry::new();
    let h = reg.histogram("d_seconds", "d", &[0.075]).unwrap();
    h.observe(&[], Duration::from_micros(75_000));
    assert_eq!(h.snapshot(&[]).unwrap().buckets, vec![1]);
}
