#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankingMetricsSnapshot {
    pub add_calls: u64,
    pub members_added: u64,
    pub duplicate_members: u64,
    pub rejected_identifiers: u64,
    pub groups_created: u64,
    pub buckets_created: u64,
    pub buckets_removed: u64,
    pub clear_calls: u64,
    pub snapshot_calls: u64,

    // gauges captured at snapshot time
    pub groups: usize,
    pub buckets: usize,
    pub total_members: usize,
}
