//! # Indexer Metrics
//!
//! Prometheus counters for event ingestion and chain reads.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! tournament-indexer = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dispute_events_applied_total` - Events committed (by kind)
//! - `dispute_events_skipped_total` - Events rejected by the level resolver (by kind)
//! - `dispute_engine_faults_total` - Events aborted with an error (by error)
//! - `dispute_chain_reads_total` - Resolution reads (by method and outcome)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Events committed, labeled by kind
    pub static ref EVENTS_APPLIED: IntCounterVec = register_int_counter_vec!(
        "dispute_events_applied_total",
        "Total number of events applied",
        &["kind"]
    )
    .expect("Failed to create EVENTS_APPLIED metric");

    /// Events skipped, labeled by kind
    pub static ref EVENTS_SKIPPED: IntCounterVec = register_int_counter_vec!(
        "dispute_events_skipped_total",
        "Total number of events skipped by the level resolver",
        &["kind"]
    )
    .expect("Failed to create EVENTS_SKIPPED metric");

    /// Faults, labeled by error
    pub static ref ENGINE_FAULTS: IntCounterVec = register_int_counter_vec!(
        "dispute_engine_faults_total",
        "Total number of events aborted with an error",
        &["error"]
    )
    .expect("Failed to create ENGINE_FAULTS metric");

    /// Chain reads, labeled by method and outcome
    pub static ref CHAIN_READS: IntCounterVec = register_int_counter_vec!(
        "dispute_chain_reads_total",
        "Total number of resolution reads against the chain",
        &["method", "outcome"]
    )
    .expect("Failed to create CHAIN_READS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an applied event
#[cfg(feature = "metrics")]
pub fn record_event_applied(kind: &str) {
    EVENTS_APPLIED.with_label_values(&[kind]).inc();
}

/// Record a skipped event
#[cfg(feature = "metrics")]
pub fn record_event_skipped(kind: &str) {
    EVENTS_SKIPPED.with_label_values(&[kind]).inc();
}

/// Record an aborted event
#[cfg(feature = "metrics")]
pub fn record_fault(error: &str) {
    ENGINE_FAULTS.with_label_values(&[error]).inc();
}

/// Record a chain read (`outcome` is `decisive`, `undecided` or `failed`)
#[cfg(feature = "metrics")]
pub fn record_chain_read(method: &str, outcome: &str) {
    CHAIN_READS.with_label_values(&[method, outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_event_applied(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_event_skipped(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_fault(_error: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_chain_read(_method: &str, _outcome: &str) {}
