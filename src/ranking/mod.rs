//! Grouped cardinality ranking.
//!
//! Counts distinct members per group and keeps groups ranked by that count
//! without re-sorting. Groups are stored in cardinality buckets; adding a new
//! member to a group moves it one bucket up the chain, so every insert is O(1)
//! amortized and a ranked snapshot is a single walk down the chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                      CardinalityRanking<G, M> Layout                        │
//! │                                                                             │
//! │   ┌──────────────────────────────┐                                          │
//! │   │  index: GroupIndex<G>        │                                          │
//! │   │                              │                                          │
//! │   │  "a.com" ──► id_1 ───────────┼──────────┐                               │
//! │   │  "b.com" ──► id_2 ───────────┼──────┐   │                               │
//! │   │  "c.com" ──► id_0 ───────┐   │      │   │                               │
//! │   └──────────────────────────┼───┘      │   │                               │
//! │                              ▼          ▼   ▼                               │
//! │   chain: BucketChain<G, M>                                                  │
//! │     head ──► [id_0: c=1 {c.com}] ◄──► [id_1: c=4 {a.com}] ◄──►              │
//! │              [id_2: c=6 {b.com}] ◄── tail                                   │
//! │                                                                             │
//! │   Each bucket owns the membership sets of its groups.                       │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! add_member("a.com", "a5@a.com")
//! ───────────────────────────────
//!   1. index: "a.com" → id_1 (c=4)
//!   2. a5 already in the set? → return Ok(false), nothing changes
//!   3. successor id_2 has c=6 ≠ 5 → link new bucket c=5 after id_1
//!   4. transfer a.com's set id_1 → new bucket, insert a5
//!   5. index: "a.com" → new bucket
//!   6. id_1 now empty → unlink it
//!
//! snapshot()
//! ──────────
//!   walk tail → head: [(b.com, 6), (a.com, 5), (c.com, 1)]
//! ```
//!
//! ## Operations
//!
//! | Operation          | Time          | Notes                                  |
//! |--------------------|---------------|----------------------------------------|
//! | `add_member`       | O(1) amortized| Idempotent per `(group, member)`       |
//! | `cardinality`      | O(1)          | Distinct members of one group          |
//! | `contains_member`  | O(1)          |                                        |
//! | `remove_group`     | O(1)          | Drops a group and its members          |
//! | `snapshot`         | O(groups)     | Descending; ties in hash order         |
//! | `snapshot_sorted`  | O(g log g)    | Ties broken by group (`G: Ord`)        |
//! | `top(n)`           | O(n + b)      | Stops after `n` entries                |
//!
//! ## Example Usage
//!
//! ```
//! use rankkit::ranking::{CardinalityRanking, GroupCount};
//!
//! let mut ranking = CardinalityRanking::new();
//! for member in ["a1", "a2", "a3", "a4"] {
//!     ranking.add_member("A", member).unwrap();
//! }
//! for member in ["b1", "b2", "b3", "b4", "b5", "b6"] {
//!     ranking.add_member("B", member).unwrap();
//! }
//! ranking.add_member("C", "c1").unwrap();
//!
//! // Re-adding a member is a no-op.
//! assert_eq!(ranking.add_member("C", "c1"), Ok(false));
//!
//! assert_eq!(
//!     ranking.snapshot(),
//!     vec![
//!         GroupCount { group: "B", cardinality: 6 },
//!         GroupCount { group: "A", cardinality: 4 },
//!         GroupCount { group: "C", cardinality: 1 },
//!     ]
//! );
//! ```
//!
//! ## Thread Safety
//!
//! - [`CardinalityRanking`]: Not thread-safe; callers serialize `add_member`.
//! - [`SharedRanking`]: `RwLock` wrapper (feature `concurrency`).
//!
//! ## Implementation Notes
//!
//! - Groups with zero members are never stored; a group appears on its
//!   first member, directly in the cardinality-1 bucket
//! - Buckets are addressed by generational [`SlotId`]s, so the index never
//!   holds a reference into the chain
//! - `check_invariants()` verifies the structure after any operation

pub mod identifier;
#[cfg(feature = "concurrency")]
pub mod shared;

pub use identifier::Identifier;
#[cfg(feature = "concurrency")]
pub use shared::SharedRanking;

use log::trace;

use crate::ds::bucket_chain::{Bucket, BucketChain, MembershipSet};
use crate::ds::group_index::GroupIndex;
use crate::ds::slot_arena::SlotId;
use crate::error::{IdentifierError, IdentifierKind, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{
    MetricsSnapshotProvider, RankingMetrics, RankingMetricsReadRecorder, RankingMetricsRecorder,
    RankingMetricsSnapshot,
};

const LIVE_BUCKET: &str = "group index points at a live bucket";

/// Upper bound on buckets reserved up front by [`CardinalityRanking::with_capacity`].
pub const BUCKET_RESERVE_LIMIT: usize = 1024;

/// One entry of a ranked snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupCount<G> {
    pub group: G,
    pub cardinality: usize,
}

/// Distinct-member counter that keeps groups ranked by cardinality.
///
/// # Type Parameters
///
/// - `G`: Group identifier, `Identifier + Clone` (cloned once per new group
///   and once per snapshot entry)
/// - `M`: Member identifier, `Identifier`
///
/// # Example
///
/// ```
/// use rankkit::ranking::CardinalityRanking;
///
/// let mut ranking: CardinalityRanking<String, String> = CardinalityRanking::new();
/// ranking.add_member("d.com".into(), "x@d.com".into()).unwrap();
/// ranking.add_member("d.com".into(), "x@d.com".into()).unwrap();
///
/// assert_eq!(ranking.cardinality_borrowed("d.com"), Some(1));
/// assert_eq!(ranking.len(), 1);
/// ```
#[derive(Debug)]
pub struct CardinalityRanking<G, M> {
    chain: BucketChain<G, M>,
    index: GroupIndex<G>,
    total_members: usize,
    #[cfg(feature = "metrics")]
    metrics: RankingMetrics,
}

impl<G, M> CardinalityRanking<G, M>
where
    G: Identifier + Clone,
    M: Identifier,
{
    /// Creates an empty ranking.
    pub fn new() -> Self {
        Self {
            chain: BucketChain::new(),
            index: GroupIndex::new(),
            total_members: 0,
            #[cfg(feature = "metrics")]
            metrics: RankingMetrics::default(),
        }
    }

    /// Creates an empty ranking with space reserved for `groups` groups.
    ///
    /// The chain holds at most one bucket per distinct cardinality, so its
    /// reservation is capped at [`BUCKET_RESERVE_LIMIT`].
    pub fn with_capacity(groups: usize) -> Self {
        Self {
            chain: BucketChain::with_capacity(groups.min(BUCKET_RESERVE_LIMIT)),
            index: GroupIndex::with_capacity(groups),
            total_members: 0,
            #[cfg(feature = "metrics")]
            metrics: RankingMetrics::default(),
        }
    }

    /// Records that `member` belongs to `group`.
    ///
    /// Returns `Ok(true)` if the member was new to the group, `Ok(false)` if it
    /// was already counted (nothing changes). Unseen groups are created on
    /// their first member.
    ///
    /// # Errors
    ///
    /// [`IdentifierError`] if either identifier is empty. The ranking is left
    /// untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ranking::CardinalityRanking;
    ///
    /// let mut ranking = CardinalityRanking::new();
    /// assert_eq!(ranking.add_member("d.com", "x@d.com"), Ok(true));
    /// assert_eq!(ranking.add_member("d.com", "x@d.com"), Ok(false));
    /// assert!(ranking.add_member("d.com", "").is_err());
    /// assert_eq!(ranking.cardinality(&"d.com"), Some(1));
    /// ```
    pub fn add_member(&mut self, group: G, member: M) -> Result<bool, IdentifierError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_add_call();

        if !group.is_well_formed() {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_identifier();
            return Err(IdentifierError::new(IdentifierKind::Group));
        }
        if !member.is_well_formed() {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_identifier();
            return Err(IdentifierError::new(IdentifierKind::Member));
        }

        let added = match self.index.lookup(&group) {
            None => {
                self.insert_new_group(group, member);
                true
            }
            Some(current) => self.grow_group(current, &group, member),
        };

        if added {
            self.total_members += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_member_added();
        }
        Ok(added)
    }

    /// Adds several members to one group; returns how many were new.
    ///
    /// Stops at the first malformed member. Members before it stay applied.
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ranking::CardinalityRanking;
    ///
    /// let mut ranking = CardinalityRanking::new();
    /// let added = ranking.add_members("a.com", ["x", "y", "x"]).unwrap();
    /// assert_eq!(added, 2);
    /// ```
    pub fn add_members<I>(&mut self, group: G, members: I) -> Result<usize, IdentifierError>
    where
        I: IntoIterator<Item = M>,
    {
        let mut added = 0;
        for member in members {
            if self.add_member(group.clone(), member)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Number of groups with at least one member.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Sum of all groups' cardinalities.
    pub fn total_members(&self) -> usize {
        self.total_members
    }

    /// Number of distinct cardinality values currently present.
    pub fn bucket_count(&self) -> usize {
        self.chain.len()
    }

    pub fn max_cardinality(&self) -> Option<usize> {
        self.chain.back().and_then(|id| self.chain.cardinality(id))
    }

    pub fn min_cardinality(&self) -> Option<usize> {
        self.chain.front().and_then(|id| self.chain.cardinality(id))
    }

    pub fn contains_group(&self, group: &G) -> bool {
        self.index.contains(group)
    }

    /// Distinct members recorded for `group`.
    #[inline]
    pub fn cardinality(&self, group: &G) -> Option<usize> {
        let id = self.index.lookup(group)?;
        self.chain.cardinality(id)
    }

    /// Like [`cardinality`](Self::cardinality) but with a borrowed key (avoids cloning).
    pub fn cardinality_borrowed<Q>(&self, group: &Q) -> Option<usize>
    where
        G: std::borrow::Borrow<Q>,
        Q: Eq + std::hash::Hash + ?Sized,
    {
        let id = self.index.lookup_borrowed(group)?;
        self.chain.cardinality(id)
    }

    pub fn contains_member(&self, group: &G, member: &M) -> bool {
        self.membership(group)
            .is_some_and(|set| set.contains(member))
    }

    /// Iterates the members of `group` in unspecified order.
    pub fn members(&self, group: &G) -> Option<impl Iterator<Item = &M>> {
        self.membership(group).map(MembershipSet::iter)
    }

    /// Groups from highest to lowest cardinality, without allocating.
    ///
    /// Groups with equal cardinality come out in hash order.
    pub fn iter_ranked(&self) -> impl Iterator<Item = (&G, usize)> + '_ {
        self.chain.iter_descending().flat_map(|(_, bucket)| {
            let cardinality = bucket.cardinality();
            bucket.groups().map(move |group| (group, cardinality))
        })
    }

    /// Ranked view of every group, highest cardinality first.
    ///
    /// Ties have no defined order. Use [`snapshot_sorted`](Self::snapshot_sorted)
    /// for a deterministic tie-break.
    pub fn snapshot(&self) -> Vec<GroupCount<G>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_snapshot_call();

        let mut ranked = Vec::with_capacity(self.len());
        ranked.extend(self.iter_ranked().map(|(group, cardinality)| GroupCount {
            group: group.clone(),
            cardinality,
        }));
        ranked
    }

    /// Ranked view with ties ordered by group.
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ranking::CardinalityRanking;
    ///
    /// let mut ranking = CardinalityRanking::new();
    /// ranking.add_member("c", 1u32).unwrap();
    /// ranking.add_member("a", 1u32).unwrap();
    /// ranking.add_member("b", 1u32).unwrap();
    /// ranking.add_member("b", 2u32).unwrap();
    ///
    /// let groups: Vec<_> = ranking.snapshot_sorted().into_iter().map(|e| e.group).collect();
    /// assert_eq!(groups, vec!["b", "a", "c"]);
    /// ```
    pub fn snapshot_sorted(&self) -> Vec<GroupCount<G>>
    where
        G: Ord,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_snapshot_call();

        let mut ranked = Vec::with_capacity(self.len());
        for (_, bucket) in self.chain.iter_descending() {
            let start = ranked.len();
            let cardinality = bucket.cardinality();
            ranked.extend(bucket.groups().map(|group| GroupCount {
                group: group.clone(),
                cardinality,
            }));
            ranked[start..].sort_unstable_by(|a, b| a.group.cmp(&b.group));
        }
        ranked
    }

    /// The `n` highest-ranked groups (ties in hash order).
    pub fn top(&self, n: usize) -> Vec<GroupCount<G>> {
        self.iter_ranked()
            .take(n)
            .map(|(group, cardinality)| GroupCount {
                group: group.clone(),
                cardinality,
            })
            .collect()
    }

    /// Drops `group` and all of its members; returns its cardinality.
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ranking::CardinalityRanking;
    ///
    /// let mut ranking = CardinalityRanking::new();
    /// ranking.add_member("a", "x").unwrap();
    /// assert_eq!(ranking.remove_group(&"a"), Some(1));
    /// assert!(ranking.is_empty());
    /// assert_eq!(ranking.remove_group(&"a"), None);
    /// ```
    pub fn remove_group(&mut self, group: &G) -> Option<usize> {
        let id = self.index.remove(group)?;
        let bucket = self.chain.get_mut(id)?;
        let cardinality = bucket.cardinality();
        let (_, set) = bucket.take_group(group)?;
        let now_empty = bucket.is_empty();
        if now_empty {
            self.chain.remove(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_removed();
        }
        self.total_members -= set.len();
        Some(cardinality)
    }

    /// Removes every group.
    pub fn clear(&mut self) {
        self.chain.clear();
        self.index.clear();
        self.total_members = 0;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Verifies the structural invariants of the ranking.
    ///
    /// Checks that bucket cardinalities strictly increase along the chain,
    /// that no bucket is empty, that every group's membership size equals its
    /// bucket's cardinality, that each group is indexed to the bucket holding
    /// it, and that the chain links are symmetric.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut last: Option<(SlotId, usize)> = None;
        let mut buckets = 0usize;
        let mut groups = 0usize;
        let mut members = 0usize;

        for (id, bucket) in self.chain.iter_ascending() {
            let cardinality = bucket.cardinality();
            if bucket.prev() != last.map(|(prev, _)| prev) {
                return Err(InvariantError::new(format!(
                    "bucket {cardinality} has a broken prev link"
                )));
            }
            if cardinality == 0 {
                return Err(InvariantError::new("bucket with cardinality 0 in chain"));
            }
            if let Some((_, prev_cardinality)) = last {
                if prev_cardinality >= cardinality {
                    return Err(InvariantError::new(format!(
                        "bucket cardinalities not strictly increasing: {prev_cardinality} then {cardinality}"
                    )));
                }
            }
            if bucket.is_empty() {
                return Err(InvariantError::new(format!(
                    "empty bucket with cardinality {cardinality} left in chain"
                )));
            }
            for (group, set) in bucket.memberships() {
                if set.len() != cardinality {
                    return Err(InvariantError::new(format!(
                        "group {group:?} has {} members but sits in bucket {cardinality}",
                        set.len()
                    )));
                }
                if self.index.lookup(group) != Some(id) {
                    return Err(InvariantError::new(format!(
                        "group {group:?} is not indexed to its bucket {cardinality}"
                    )));
                }
                groups += 1;
                members += set.len();
            }
            buckets += 1;
            last = Some((id, cardinality));
        }

        if self.chain.back() != last.map(|(id, _)| id) {
            return Err(InvariantError::new("chain tail does not match last bucket"));
        }
        if buckets != self.chain.len() {
            return Err(InvariantError::new(format!(
                "chain walk reached {buckets} of {} buckets",
                self.chain.len()
            )));
        }
        if groups != self.index.len() {
            return Err(InvariantError::new(format!(
                "{groups} groups in buckets but {} in index",
                self.index.len()
            )));
        }
        if members != self.total_members {
            return Err(InvariantError::new(format!(
                "member total {} does not match {members} stored members",
                self.total_members
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("ranking invariant violated: {err}");
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> RankingMetricsSnapshot {
        RankingMetricsSnapshot {
            add_calls: self.metrics.add_calls,
            members_added: self.metrics.members_added,
            duplicate_members: self.metrics.duplicate_members,
            rejected_identifiers: self.metrics.rejected_identifiers,
            groups_created: self.metrics.groups_created,
            buckets_created: self.metrics.buckets_created,
            buckets_removed: self.metrics.buckets_removed,
            clear_calls: self.metrics.clear_calls,
            snapshot_calls: self.metrics.snapshot_calls.get(),
            groups: self.len(),
            buckets: self.bucket_count(),
            total_members: self.total_members,
        }
    }

    fn membership(&self, group: &G) -> Option<&MembershipSet<M>> {
        let id = self.index.lookup(group)?;
        self.chain.get(id)?.membership(group)
    }

    fn insert_new_group(&mut self, group: G, member: M) {
        let target = match self.chain.front() {
            Some(front) if self.chain.cardinality(front) == Some(1) => front,
            _ => {
                #[cfg(feature = "metrics")]
                self.metrics.record_bucket_created();
                self.chain.insert_after(None, 1)
            }
        };
        self.chain
            .get_mut(target)
            .expect(LIVE_BUCKET)
            .insert_group(group.clone(), MembershipSet::with_member(member));
        self.index.set(group, target);
        #[cfg(feature = "metrics")]
        self.metrics.record_group_created();
    }

    fn grow_group(&mut self, current: SlotId, group: &G, member: M) -> bool {
        let (cardinality, successor) = {
            let bucket = self.chain.get(current).expect(LIVE_BUCKET);
            let set = bucket.membership(group).expect(LIVE_BUCKET);
            if set.contains(&member) {
                trace!("member {member:?} already counted for group {group:?}; skipping");
                #[cfg(feature = "metrics")]
                self.metrics.record_duplicate_member();
                return false;
            }
            (bucket.cardinality(), bucket.next())
        };

        let next_cardinality = cardinality + 1;
        let target = match successor {
            Some(next) if self.chain.cardinality(next) == Some(next_cardinality) => next,
            _ => {
                #[cfg(feature = "metrics")]
                self.metrics.record_bucket_created();
                self.chain.insert_after(Some(current), next_cardinality)
            }
        };

        self.chain
            .transfer(current, target, group)
            .expect(LIVE_BUCKET)
            .insert(member);
        self.index.relocate(group, target);

        if self.chain.get(current).is_some_and(Bucket::is_empty) {
            self.chain.remove(current);
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_removed();
        }
        true
    }
}

impl<G, M> Default for CardinalityRanking<G, M>
where
    G: Identifier + Clone,
    M: Identifier,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "metrics")]
impl<G, M> MetricsSnapshotProvider<RankingMetricsSnapshot> for CardinalityRanking<G, M>
where
    G: Identifier + Clone,
    M: Identifier,
{
    fn snapshot(&self) -> RankingMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(snapshot: &[GroupCount<&'static str>]) -> Vec<(&'static str, usize)> {
        snapshot.iter().map(|e| (e.group, e.cardinality)).collect()
    }

    #[test]
    fn with_capacity_reserves_chain_and_index() {
        let mut ranking: CardinalityRanking<u32, u32> = CardinalityRanking::with_capacity(16);
        assert!(ranking.chain.capacity() >= 16);
        let huge: CardinalityRanking<u32, u32> = CardinalityRanking::with_capacity(1 << 20);
        assert!(huge.chain.capacity() >= BUCKET_RESERVE_LIMIT);
        assert!(huge.chain.capacity() < 1 << 20);

        for g in 0..16 {
            ranking.add_members(g, 0..=g).unwrap();
        }
        assert_eq!(ranking.bucket_count(), 16);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn ranking_basic_flow() {
        let mut ranking = CardinalityRanking::new();
        assert_eq!(ranking.add_member("a", "a1"), Ok(true));
        assert_eq!(ranking.add_member("a", "a2"), Ok(true));
        assert_eq!(ranking.add_member("b", "b1"), Ok(true));

        assert_eq!(ranking.cardinality(&"a"), Some(2));
        assert_eq!(ranking.cardinality(&"b"), Some(1));
        assert_eq!(ranking.cardinality(&"missing"), None);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.total_members(), 3);
        assert_eq!(ranking.bucket_count(), 2);
        assert_eq!(pairs(&ranking.snapshot()), vec![("a", 2), ("b", 1)]);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn duplicate_member_is_noop() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("d.com", "x@d.com").unwrap();
        assert_eq!(ranking.add_member("d.com", "x@d.com"), Ok(false));
        assert_eq!(ranking.total_members(), 1);
        assert_eq!(pairs(&ranking.snapshot()), vec![("d.com", 1)]);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn same_member_in_different_groups_counts_twice() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", "x").unwrap();
        ranking.add_member("b", "x").unwrap();
        assert_eq!(ranking.cardinality(&"a"), Some(1));
        assert_eq!(ranking.cardinality(&"b"), Some(1));
        assert_eq!(ranking.bucket_count(), 1);
    }

    #[test]
    fn empty_identifiers_are_rejected_without_mutation() {
        let mut ranking: CardinalityRanking<&str, &str> = CardinalityRanking::new();
        assert_eq!(
            ranking.add_member("", "x"),
            Err(IdentifierError::new(IdentifierKind::Group))
        );
        assert_eq!(
            ranking.add_member("a", ""),
            Err(IdentifierError::new(IdentifierKind::Member))
        );
        assert!(ranking.is_empty());
        assert_eq!(ranking.bucket_count(), 0);
        assert!(ranking.snapshot().is_empty());
    }

    #[test]
    fn empty_ranking_snapshot_is_empty() {
        let ranking: CardinalityRanking<String, String> = CardinalityRanking::new();
        assert!(ranking.snapshot().is_empty());
        assert!(ranking.top(3).is_empty());
        assert_eq!(ranking.max_cardinality(), None);
        assert_eq!(ranking.min_cardinality(), None);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn new_group_reuses_cardinality_one_bucket() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("b", 1u32).unwrap();
        ranking.add_member("c", 1u32).unwrap();
        assert_eq!(ranking.bucket_count(), 1);
        assert_eq!(ranking.min_cardinality(), Some(1));
    }

    #[test]
    fn new_group_creates_front_bucket_when_front_is_higher() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("a", 2u32).unwrap();
        assert_eq!(ranking.bucket_count(), 1);
        assert_eq!(ranking.min_cardinality(), Some(2));

        ranking.add_member("b", 1u32).unwrap();
        assert_eq!(ranking.bucket_count(), 2);
        assert_eq!(ranking.min_cardinality(), Some(1));
        assert_eq!(ranking.max_cardinality(), Some(2));
        ranking.debug_validate_invariants();
    }

    #[test]
    fn growth_reuses_successor_bucket() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("a", 2u32).unwrap();
        ranking.add_member("b", 1u32).unwrap();
        assert_eq!(ranking.bucket_count(), 2);

        // b moves into a's bucket (c=2); the c=1 bucket empties and goes away.
        ranking.add_member("b", 2u32).unwrap();
        assert_eq!(ranking.bucket_count(), 1);
        assert_eq!(ranking.min_cardinality(), Some(2));
        ranking.debug_validate_invariants();
    }

    #[test]
    fn growth_links_bucket_between_gapped_neighbors() {
        let mut ranking = CardinalityRanking::new();
        for m in 0..5u32 {
            ranking.add_member("big", m).unwrap();
        }
        ranking.add_member("small", 0u32).unwrap();
        ranking.add_member("other", 0u32).unwrap();
        ranking.add_member("small", 1u32).unwrap();

        let ladder: Vec<_> = ranking
            .snapshot_sorted()
            .into_iter()
            .map(|e| (e.group, e.cardinality))
            .collect();
        assert_eq!(ladder, vec![("big", 5), ("small", 2), ("other", 1)]);
        assert_eq!(ranking.bucket_count(), 3);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn interleaved_growth_orders_ties_after_leader() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("A", "a1").unwrap();
        ranking.add_member("B", "b1").unwrap();
        ranking.add_member("C", "c1").unwrap();
        ranking.add_member("B", "b2").unwrap();

        let snapshot = ranking.snapshot();
        assert_eq!(snapshot[0], GroupCount { group: "B", cardinality: 2 });
        let mut tail = pairs(&snapshot[1..]);
        tail.sort();
        assert_eq!(tail, vec![("A", 1), ("C", 1)]);
        assert_eq!(
            pairs(&ranking.snapshot_sorted()),
            vec![("B", 2), ("A", 1), ("C", 1)]
        );
    }

    #[test]
    fn top_stops_early() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_members("a", [1u32, 2, 3]).unwrap();
        ranking.add_members("b", [1u32, 2]).unwrap();
        ranking.add_members("c", [1u32]).unwrap();

        let top: Vec<_> = ranking.top(2).into_iter().map(|e| e.group).collect();
        assert_eq!(top, vec!["a", "b"]);
        assert_eq!(ranking.top(10).len(), 3);
        assert!(ranking.top(0).is_empty());
    }

    #[test]
    fn add_members_counts_only_new() {
        let mut ranking = CardinalityRanking::new();
        assert_eq!(ranking.add_members("a", ["x", "y", "x", "z"]), Ok(3));
        assert_eq!(ranking.add_members("a", ["x", "w"]), Ok(1));
        assert_eq!(ranking.cardinality(&"a"), Some(4));
    }

    #[test]
    fn add_members_stops_at_first_bad_member() {
        let mut ranking = CardinalityRanking::new();
        let err = ranking.add_members("a", ["x", "", "y"]).unwrap_err();
        assert_eq!(err.kind(), IdentifierKind::Member);
        assert_eq!(ranking.cardinality(&"a"), Some(1));
    }

    #[test]
    fn contains_member_and_members() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_members("a", ["x", "y"]).unwrap();
        assert!(ranking.contains_member(&"a", &"x"));
        assert!(!ranking.contains_member(&"a", &"z"));
        assert!(!ranking.contains_member(&"b", &"x"));

        let mut members: Vec<_> = ranking.members(&"a").unwrap().copied().collect();
        members.sort();
        assert_eq!(members, vec!["x", "y"]);
        assert!(ranking.members(&"b").is_none());
    }

    #[test]
    fn remove_group_drops_empty_bucket() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_members("a", [1u32, 2]).unwrap();
        ranking.add_members("b", [1u32]).unwrap();

        assert_eq!(ranking.remove_group(&"a"), Some(2));
        assert_eq!(ranking.bucket_count(), 1);
        assert_eq!(ranking.total_members(), 1);
        assert!(!ranking.contains_group(&"a"));
        ranking.debug_validate_invariants();

        // A removed group starts over at cardinality 1.
        ranking.add_member("a", 9u32).unwrap();
        assert_eq!(ranking.cardinality(&"a"), Some(1));
        ranking.debug_validate_invariants();
    }

    #[test]
    fn remove_group_keeps_shared_bucket() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("b", 1u32).unwrap();
        assert_eq!(ranking.remove_group(&"a"), Some(1));
        assert_eq!(ranking.bucket_count(), 1);
        ranking.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_state() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_members("a", [1u32, 2, 3]).unwrap();
        ranking.clear();
        assert!(ranking.is_empty());
        assert_eq!(ranking.total_members(), 0);
        assert_eq!(ranking.bucket_count(), 0);
        ranking.debug_validate_invariants();

        ranking.add_member("a", 1u32).unwrap();
        assert_eq!(ranking.cardinality(&"a"), Some(1));
    }

    #[test]
    fn iter_ranked_is_descending() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_members("x", 0..3u32).unwrap();
        ranking.add_members("y", 0..7u32).unwrap();
        ranking.add_members("z", 0..5u32).unwrap();
        let cards: Vec<_> = ranking.iter_ranked().map(|(_, c)| c).collect();
        assert_eq!(cards, vec![7, 5, 3]);
    }

    #[test]
    fn borrowed_group_lookup() {
        let mut ranking: CardinalityRanking<String, String> = CardinalityRanking::new();
        ranking
            .add_member("a.com".to_string(), "x@a.com".to_string())
            .unwrap();
        assert_eq!(ranking.cardinality_borrowed("a.com"), Some(1));
        assert_eq!(ranking.cardinality_borrowed("b.com"), None);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_bucket_churn() {
        let mut ranking = CardinalityRanking::new();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("a", 1u32).unwrap();
        ranking.add_member("a", 2u32).unwrap();
        let _ = ranking.add_member("", 3u32);
        let _ = ranking.snapshot();

        let m = ranking.metrics_snapshot();
        assert_eq!(m.add_calls, 4);
        assert_eq!(m.members_added, 2);
        assert_eq!(m.duplicate_members, 1);
        assert_eq!(m.rejected_identifiers, 1);
        assert_eq!(m.groups_created, 1);
        assert_eq!(m.buckets_created, 2);
        assert_eq!(m.buckets_removed, 1);
        assert_eq!(m.snapshot_calls, 1);
        assert_eq!(m.groups, 1);
        assert_eq!(m.buckets, 1);
        assert_eq!(m.total_members, 2);
    }
}
