//! Generational slot arena with stable handles.
//!
//! Values live in a `Vec` of slots and are addressed by [`SlotId`]. Removing a
//! value bumps the slot's generation, so a handle kept past removal never
//! resolves to whatever is stored in the reused slot later.
//!
//! ```text
//!   slots: Vec<Slot<T>>
//!   ┌───────┬────────────┬──────────────────┐
//!   │ index │ generation │ value            │
//!   ├───────┼────────────┼──────────────────┤
//!   │   0   │     0      │ Some(bucket c=1) │
//!   │   1   │     1      │ None  ◄─ free    │
//!   │   2   │     0      │ Some(bucket c=3) │
//!   └───────┴────────────┴──────────────────┘
//!   free_list: [1]
//! ```

/// Stable handle into a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    /// Slot position inside the arena.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            SlotId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).expect("slot arena exceeded u32::MAX slots");
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            SlotId {
                index,
                generation: 0,
            }
        };
        self.len += 1;
        id
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns mutable references to two distinct live slots.
    pub fn get2_mut(&mut self, a: SlotId, b: SlotId) -> Option<(&mut T, &mut T)> {
        if a.index == b.index {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi.index());
        let lo_slot = head.get_mut(lo.index())?;
        let hi_slot = tail.first_mut()?;
        if lo_slot.generation != lo.generation || hi_slot.generation != hi.generation {
            return None;
        }
        let lo_value = lo_slot.value.as_mut()?;
        let hi_value = hi_slot.value.as_mut()?;
        if swapped {
            Some((hi_value, lo_value))
        } else {
            Some((lo_value, hi_value))
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every value. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index as u32);
        }
        self.free_list.reverse();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arena_insert_remove_reuse() {
        let mut arena = SlotArena::new();
        let id1 = arena.insert("a");
        let id2 = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id1), Some(&"a"));
        assert_eq!(arena.get(id2), Some(&"b"));

        assert_eq!(arena.remove(id1), Some("a"));
        assert_eq!(arena.len(), 1);

        let id3 = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id3), Some(&"c"));
        assert_eq!(id1.index(), id3.index());
        assert_ne!(id1.generation(), id3.generation());
    }

    #[test]
    fn stale_handle_does_not_resolve_after_reuse() {
        let mut arena = SlotArena::new();
        let old = arena.insert(1);
        arena.remove(old);
        let new = arena.insert(2);

        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get_mut(old), None);
        assert_eq!(arena.remove(old), None);
        assert!(!arena.contains(old));
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = SlotArena::new();
        let id = arena.insert(7);
        assert_eq!(arena.remove(id), Some(7));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn get2_mut_returns_both_in_argument_order() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);

        let (x, y) = arena.get2_mut(b, a).unwrap();
        assert_eq!((*x, *y), (2, 1));
        *x += 10;
        *y += 20;
        assert_eq!(arena.get(a), Some(&21));
        assert_eq!(arena.get(b), Some(&12));

        assert!(arena.get2_mut(a, a).is_none());
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let _b = arena.insert("b");
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(a), None);

        let c = arena.insert("c");
        assert_eq!(c.index(), 0);
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(arena.iter().count(), 1);
    }
}
