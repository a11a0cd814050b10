//! # Metrics Traits
//!
//! Recording and snapshotting are split into two small traits so the ranking
//! only writes counters and consumers only read plain-data snapshots.
//!
//! ```text
//!   ┌───────────────────────────────┐      ┌──────────────────────────────┐
//!   │ RankingMetricsRecorder        │      │ MetricsSnapshotProvider<S>   │
//!   │ add_call / member_added /     │      │ snapshot() -> S              │
//!   │ duplicate / bucket churn      │      │ (bench/test/CLI)             │
//!   └───────────────────────────────┘      └──────────────────────────────┘
//! ```

/// Counters recorded by the mutating ranking paths.
pub trait RankingMetricsRecorder {
    fn record_add_call(&mut self);
    fn record_member_added(&mut self);
    fn record_duplicate_member(&mut self);
    fn record_rejected_identifier(&mut self);
    fn record_group_created(&mut self);
    fn record_bucket_created(&mut self);
    fn record_bucket_removed(&mut self);
    fn record_clear(&mut self);
}

/// Counters recorded from `&self` read paths.
pub trait RankingMetricsReadRecorder {
    fn record_snapshot_call(&self);
}

/// Produces a point-in-time copy of metric counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
