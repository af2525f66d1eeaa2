//! Prometheus metrics for the notifier.
//!
//! - Dispatch metrics (attempts by outcome, mails sent and failed)
//! - Audit metrics (entries written)
//! - Action endpoint metrics (rejected requests by reason)

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "notifier";

lazy_static! {
    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Dispatch calls by outcome (dispatched, skipped_disabled, skipped_ineligible, error)
    pub static ref DISPATCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_total", METRIC_PREFIX),
        "Total dispatch calls by outcome",
        &["outcome"]
    ).unwrap();

    /// Mails accepted by the transport
    pub static ref MAILS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_mails_sent_total", METRIC_PREFIX),
        "Total mails accepted by the transport"
    ).unwrap();

    /// Mails the transport failed to send
    pub static ref MAILS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_mails_failed_total", METRIC_PREFIX),
        "Total mails the transport failed to send"
    ).unwrap();

    /// Recipients per fan-out
    pub static ref FANOUT_RECIPIENTS: Histogram = register_histogram!(
        format!("{}_fanout_recipients", METRIC_PREFIX),
        "Distribution of recipients per dispatch",
        vec![0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0]
    ).unwrap();

    // ============================================================================
    // Audit Metrics
    // ============================================================================

    /// Audit entries written
    pub static ref AUDIT_ENTRIES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_audit_entries_total", METRIC_PREFIX),
        "Total audit entries appended"
    ).unwrap();

    /// Entries currently retained in the audit log, refreshed on scrape
    pub static ref AUDIT_LOG_SIZE: IntGauge = register_int_gauge!(
        format!("{}_audit_log_size", METRIC_PREFIX),
        "Entries currently retained in the audit log"
    ).unwrap();

    // ============================================================================
    // Action Endpoint Metrics
    // ============================================================================

    /// Rejected trigger requests by error code
    pub static ref ACTION_REJECTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_action_rejected_total", METRIC_PREFIX),
        "Total rejected trigger requests by error code",
        &["code"]
    ).unwrap();
}

/// Dispatch metric helpers
pub struct DispatchMetrics;

impl DispatchMetrics {
    pub fn record_outcome(outcome: &str) {
        DISPATCH_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn record_fanout(recipients: usize, sent: usize, failed: usize) {
        FANOUT_RECIPIENTS.observe(recipients as f64);
        MAILS_SENT_TOTAL.inc_by(sent as u64);
        MAILS_FAILED_TOTAL.inc_by(failed as u64);
    }

    pub fn record_audit_entry() {
        AUDIT_ENTRIES_TOTAL.inc();
    }
}

/// Action endpoint metric helpers
pub struct ActionMetrics;

impl ActionMetrics {
    pub fn record_rejected(code: &str) {
        ACTION_REJECTED_TOTAL.with_label_values(&[code]).inc();
    }
}

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_dispatch_metrics() {
        DispatchMetrics::record_outcome("dispatched");
        DispatchMetrics::record_fanout(2, 1, 1);
        ActionMetrics::record_rejected("VALIDATION_ERROR");

        let output = encode_metrics().unwrap();
        assert!(output.contains("notifier_dispatch_total"));
        assert!(output.contains("notifier_mails_sent_total"));
        assert!(output.contains("notifier_action_rejected_total"));
    }
}
