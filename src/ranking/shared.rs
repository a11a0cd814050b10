//! Lock-guarded ranking for multi-threaded ingestion.
//!
//! `add_member` holds the write lock for the whole structural update, so a
//! reader never walks a half-moved bucket chain. Snapshots and point queries
//! take the read lock and may run alongside each other.

use parking_lot::RwLock;

use crate::error::IdentifierError;
use crate::ranking::{CardinalityRanking, GroupCount, Identifier};

/// Thread-safe [`CardinalityRanking`] behind a `parking_lot::RwLock`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use rankkit::ranking::SharedRanking;
///
/// let ranking = Arc::new(SharedRanking::new());
///
/// let handles: Vec<_> = (0..4u32).map(|t| {
///     let ranking = Arc::clone(&ranking);
///     thread::spawn(move || {
///         for m in 0..25u32 {
///             ranking.add_member(t, m).unwrap();
///         }
///     })
/// }).collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(ranking.len(), 4);
/// assert!(ranking.snapshot().iter().all(|e| e.cardinality == 25));
/// ```
#[derive(Debug)]
pub struct SharedRanking<G, M> {
    inner: RwLock<CardinalityRanking<G, M>>,
}

impl<G, M> SharedRanking<G, M>
where
    G: Identifier + Clone,
    M: Identifier,
{
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CardinalityRanking::new()),
        }
    }

    pub fn with_capacity(groups: usize) -> Self {
        Self {
            inner: RwLock::new(CardinalityRanking::with_capacity(groups)),
        }
    }

    /// Wraps an existing ranking.
    pub fn from_ranking(ranking: CardinalityRanking<G, M>) -> Self {
        Self {
            inner: RwLock::new(ranking),
        }
    }

    pub fn add_member(&self, group: G, member: M) -> Result<bool, IdentifierError> {
        let mut ranking = self.inner.write();
        ranking.add_member(group, member)
    }

    /// Adds a batch of pairs under a single write lock; returns how many were new.
    ///
    /// Stops at the first malformed pair; pairs before it stay applied.
    pub fn add_members_batch<I>(&self, pairs: I) -> Result<usize, IdentifierError>
    where
        I: IntoIterator<Item = (G, M)>,
    {
        let mut ranking = self.inner.write();
        let mut added = 0;
        for (group, member) in pairs {
            if ranking.add_member(group, member)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn snapshot(&self) -> Vec<GroupCount<G>> {
        let ranking = self.inner.read();
        ranking.snapshot()
    }

    pub fn snapshot_sorted(&self) -> Vec<GroupCount<G>>
    where
        G: Ord,
    {
        let ranking = self.inner.read();
        ranking.snapshot_sorted()
    }

    pub fn top(&self, n: usize) -> Vec<GroupCount<G>> {
        let ranking = self.inner.read();
        ranking.top(n)
    }

    pub fn cardinality(&self, group: &G) -> Option<usize> {
        let ranking = self.inner.read();
        ranking.cardinality(group)
    }

    pub fn len(&self) -> usize {
        let ranking = self.inner.read();
        ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        let ranking = self.inner.read();
        ranking.is_empty()
    }

    pub fn total_members(&self) -> usize {
        let ranking = self.inner.read();
        ranking.total_members()
    }

    pub fn clear(&self) {
        let mut ranking = self.inner.write();
        ranking.clear();
    }

    /// Runs `f` with shared access to the underlying ranking.
    pub fn read_with<R>(&self, f: impl FnOnce(&CardinalityRanking<G, M>) -> R) -> R {
        let ranking = self.inner.read();
        f(&ranking)
    }

    pub fn into_inner(self) -> CardinalityRanking<G, M> {
        self.inner.into_inner()
    }
}

impl<G, M> Default for SharedRanking<G, M>
where
    G: Identifier + Clone,
    M: Identifier,
{
    fn default() -> Self {
        Self::new()
    }
}
