//! Cardinality-ordered chain of buckets.
//!
//! Each [`Bucket`] holds every group that currently has exactly one
//! cardinality value. Buckets live in a [`SlotArena`] and are doubly linked by
//! [`SlotId`], ascending from `head` (lowest cardinality) to `tail` (highest).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                        BucketChain<G, M> Layout                          │
//! │                                                                          │
//! │   arena: SlotArena<Bucket<G, M>>                                         │
//! │                                                                          │
//! │   head                                                         tail      │
//! │    │                                                             │       │
//! │    ▼                                                             ▼       │
//! │  ┌─────────────┐      ┌─────────────────┐      ┌─────────────────────┐   │
//! │  │ c = 1       │ ◄──► │ c = 4           │ ◄──► │ c = 6               │   │
//! │  │ "c.com":{c1}│      │ "a.com":{a1..a4}│      │ "b.com":{b1..b6}    │   │
//! │  └─────────────┘      └─────────────────┘      └─────────────────────┘   │
//! │                                                                          │
//! │   Cardinalities strictly increase head → tail; gaps are allowed,         │
//! │   duplicates and empty buckets are not (the ranking enforces both).      │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation        | Time | Notes                                        |
//! |------------------|------|----------------------------------------------|
//! | `insert_after`   | O(1) | `None` anchor inserts at the head            |
//! | `insert_before`  | O(1) | `None` anchor inserts at the tail            |
//! | `remove`         | O(1) | Bucket must be empty                         |
//! | `next` / `prev`  | O(1) | Neighbor navigation                          |
//! | `transfer`       | O(1) | Moves one group's membership set             |
//! | `iter_*`         | O(b) | Ascending / descending bucket walks          |
//!
//! The chain does not re-validate cardinality ordering on insert; callers
//! pick cardinalities that fit between the neighbors. Debug builds assert it.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map;
use std::hash::Hash;

use crate::ds::slot_arena::{SlotArena, SlotId};

/// Distinct members recorded for one group.
#[derive(Debug, Clone)]
pub struct MembershipSet<M> {
    members: FxHashSet<M>,
}

impl<M> MembershipSet<M>
where
    M: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            members: FxHashSet::default(),
        }
    }

    /// Creates a set holding a single member.
    pub fn with_member(member: M) -> Self {
        let mut set = Self::new();
        set.members.insert(member);
        set
    }

    /// Inserts `member`; returns `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, member: M) -> bool {
        self.members.insert(member)
    }

    #[inline]
    pub fn contains(&self, member: &M) -> bool {
        self.members.contains(member)
    }

    pub fn contains_borrowed<Q>(&self, member: &Q) -> bool
    where
        M: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.members.contains(member)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.members.iter()
    }
}

impl<M> Default for MembershipSet<M>
where
    M: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// All groups sharing one cardinality value.
#[derive(Debug)]
pub struct Bucket<G, M> {
    cardinality: usize,
    groups: FxHashMap<G, MembershipSet<M>>,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl<G, M> Bucket<G, M>
where
    G: Eq + Hash,
    M: Eq + Hash,
{
    fn new(cardinality: usize) -> Self {
        Self {
            cardinality,
            groups: FxHashMap::default(),
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Number of groups in this bucket.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains_group(&self, group: &G) -> bool {
        self.groups.contains_key(group)
    }

    pub fn membership(&self, group: &G) -> Option<&MembershipSet<M>> {
        self.groups.get(group)
    }

    /// Iterates the groups of this bucket in hash order.
    pub fn groups(&self) -> hash_map::Keys<'_, G, MembershipSet<M>> {
        self.groups.keys()
    }

    pub fn memberships(&self) -> hash_map::Iter<'_, G, MembershipSet<M>> {
        self.groups.iter()
    }

    /// Places a group's membership set into this bucket.
    pub fn insert_group(&mut self, group: G, set: MembershipSet<M>) {
        debug_assert_eq!(set.len(), self.cardinality, "membership size must match bucket");
        let previous = self.groups.insert(group, set);
        debug_assert!(previous.is_none(), "group already present in bucket");
    }

    /// Detaches a group's membership set from this bucket.
    pub fn take_group(&mut self, group: &G) -> Option<(G, MembershipSet<M>)> {
        self.groups.remove_entry(group)
    }

    pub fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    pub fn next(&self) -> Option<SlotId> {
        self.next
    }
}

/// Doubly-linked chain of [`Bucket`]s, ascending by cardinality.
#[derive(Debug)]
pub struct BucketChain<G, M> {
    arena: SlotArena<Bucket<G, M>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<G, M> BucketChain<G, M>
where
    G: Eq + Hash,
    M: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty chain with room for `buckets` buckets.
    pub fn with_capacity(buckets: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(buckets),
            head: None,
            tail: None,
        }
    }

    /// Number of buckets in the chain.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Buckets the chain can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Lowest-cardinality bucket.
    #[inline]
    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Highest-cardinality bucket.
    #[inline]
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&Bucket<G, M>> {
        self.arena.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Bucket<G, M>> {
        self.arena.get_mut(id)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    #[inline]
    pub fn next(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id)?.next
    }

    #[inline]
    pub fn prev(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id)?.prev
    }

    /// Cardinality of the bucket at `id`.
    #[inline]
    pub fn cardinality(&self, id: SlotId) -> Option<usize> {
        self.arena.get(id).map(Bucket::cardinality)
    }

    /// Links a new empty bucket right after `at`, or at the head when `at` is `None`.
    pub fn insert_after(&mut self, at: Option<SlotId>, cardinality: usize) -> SlotId {
        let next = match at {
            Some(at) => self.next(at),
            None => self.head,
        };
        self.link(at, next, cardinality)
    }

    /// Links a new empty bucket right before `at`, or at the tail when `at` is `None`.
    pub fn insert_before(&mut self, at: Option<SlotId>, cardinality: usize) -> SlotId {
        let prev = match at {
            Some(at) => self.prev(at),
            None => self.tail,
        };
        self.link(prev, at, cardinality)
    }

    /// Unlinks and drops the bucket at `id`. Only empty buckets may be removed.
    pub fn remove(&mut self, id: SlotId) -> Option<Bucket<G, M>> {
        let (prev, next) = {
            let bucket = self.arena.get(id)?;
            debug_assert!(bucket.is_empty(), "removing a non-empty bucket");
            (bucket.prev, bucket.next)
        };

        match prev.and_then(|prev| self.arena.get_mut(prev)) {
            Some(prev_bucket) => prev_bucket.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.arena.get_mut(next)) {
            Some(next_bucket) => next_bucket.prev = prev,
            None => self.tail = prev,
        }

        let mut bucket = self.arena.remove(id)?;
        bucket.prev = None;
        bucket.next = None;
        Some(bucket)
    }

    /// Moves `group`'s membership set from bucket `from` to bucket `to`.
    ///
    /// Returns the moved set so the caller can grow it in place. Returns `None`
    /// (and leaves both buckets untouched) if either handle is stale, the two
    /// handles are equal, or `from` does not hold `group`.
    pub fn transfer(
        &mut self,
        from: SlotId,
        to: SlotId,
        group: &G,
    ) -> Option<&mut MembershipSet<M>> {
        let (src, dst) = self.arena.get2_mut(from, to)?;
        if !src.groups.contains_key(group) {
            return None;
        }
        debug_assert!(!dst.groups.contains_key(group), "group already in target bucket");
        let (key, set) = src.groups.remove_entry(group)?;
        Some(dst.groups.entry(key).or_insert(set))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walks buckets from lowest to highest cardinality.
    pub fn iter_ascending(&self) -> BucketIter<'_, G, M> {
        BucketIter {
            chain: self,
            current: self.head,
            forward: true,
        }
    }

    /// Walks buckets from highest to lowest cardinality.
    pub fn iter_descending(&self) -> BucketIter<'_, G, M> {
        BucketIter {
            chain: self,
            current: self.tail,
            forward: false,
        }
    }

    fn link(&mut self, prev: Option<SlotId>, next: Option<SlotId>, cardinality: usize) -> SlotId {
        debug_assert!(
            prev.and_then(|id| self.cardinality(id))
                .is_none_or(|c| c < cardinality),
            "new bucket must sort after its predecessor"
        );
        debug_assert!(
            next.and_then(|id| self.cardinality(id))
                .is_none_or(|c| c > cardinality),
            "new bucket must sort before its successor"
        );

        let mut bucket = Bucket::new(cardinality);
        bucket.prev = prev;
        bucket.next = next;
        let id = self.arena.insert(bucket);

        match prev.and_then(|prev| self.arena.get_mut(prev)) {
            Some(prev_bucket) => prev_bucket.next = Some(id),
            None => self.head = Some(id),
        }
        match next.and_then(|next| self.arena.get_mut(next)) {
            Some(next_bucket) => next_bucket.prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }
}

impl<G, M> Default for BucketChain<G, M>
where
    G: Eq + Hash,
    M: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket walk in either direction.
pub struct BucketIter<'a, G, M> {
    chain: &'a BucketChain<G, M>,
    current: Option<SlotId>,
    forward: bool,
}

impl<'a, G, M> Iterator for BucketIter<'a, G, M> {
    type Item = (SlotId, &'a Bucket<G, M>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let bucket = self.chain.arena.get(id)?;
        self.current = if self.forward { bucket.next } else { bucket.prev };
        Some((id, bucket))
    }
}
