pub mod bucket_chain;
pub mod group_index;
pub mod slot_arena;

pub use bucket_chain::{Bucket, BucketChain, BucketIter, MembershipSet};
pub use group_index::GroupIndex;
pub use slot_arena::{SlotArena, SlotId};
