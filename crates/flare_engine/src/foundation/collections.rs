//! Specialized collection types

use std::sync::atomic::{AtomicU32, Ordering};

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational key of a node inside its owning graph's arena
    pub struct NodeKey;
}

/// Handle-based map for graph nodes with stable, generation-checked keys
pub type NodeMap<T> = SlotMap<NodeKey, T>;

/// Identity of a graph instance.
///
/// Keys from two different arenas can collide, so every external handle also
/// records which graph issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u32);

impl GraphId {
    /// Allocate a process-unique graph id
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics
    pub const fn raw(self) -> u32 {
        self.0
    }
}
