//! Entity identifiers and allocation.
//!
//! An [`EntityId`] is a plain 32-bit sequence number handed out by the
//! [`EntityAllocator`] of the owning [`World`](crate::world::World). Entities
//! are never destroyed individually -- a world is torn down as a whole -- so
//! ids are never recycled and need no generation counter.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// An entity identifier, unique within the world that allocated it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Construct an `EntityId` from its raw index.
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Hands out sequential [`EntityId`]s.
///
/// The counter survives [`World::clear`](crate::world::World::clear) so a
/// stale id from before a teardown can never alias a new entity.
#[derive(Debug, Default, Clone)]
pub struct EntityAllocator {
    next_index: u32,
}

impl EntityAllocator {
    /// Create a new allocator starting at index 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh [`EntityId`].
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_index);
        self.next_index = self
            .next_index
            .checked_add(1)
            .expect("entity index space exhausted");
        id
    }

    /// The index the next allocation will use.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Rebuild an allocator that continues from `next_index`.
    pub fn resume_from(next_index: u32) -> Self {
        Self { next_index }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
