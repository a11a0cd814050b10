//! Group → bucket handle index.
//!
//! The index only locates buckets; the [`BucketChain`](crate::ds::BucketChain)
//! owns them. Entries are plain [`SlotId`]s, so a lookup never borrows the
//! chain and a handle outliving its bucket simply fails to resolve.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
pub struct GroupIndex<G> {
    index: FxHashMap<G, SlotId>,
}

impl<G> GroupIndex<G>
where
    G: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the bucket currently holding `group`.
    #[inline]
    pub fn lookup(&self, group: &G) -> Option<SlotId> {
        self.index.get(group).copied()
    }

    pub fn lookup_borrowed<Q>(&self, group: &Q) -> Option<SlotId>
    where
        G: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(group).copied()
    }

    /// Points `group` at `bucket`; returns the previous handle.
    #[inline]
    pub fn set(&mut self, group: G, bucket: SlotId) -> Option<SlotId> {
        self.index.insert(group, bucket)
    }

    /// Repoints an existing entry without taking ownership of the key.
    ///
    /// Returns `false` if `group` is not indexed.
    #[inline]
    pub fn relocate(&mut self, group: &G, bucket: SlotId) -> bool {
        match self.index.get_mut(group) {
            Some(slot) => {
                *slot = bucket;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, group: &G) -> Option<SlotId> {
        self.index.remove(group)
    }

    pub fn contains(&self, group: &G) -> bool {
        self.index.contains_key(group)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }
}

impl<G> Default for GroupIndex<G>
where
    G: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
