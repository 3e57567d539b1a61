//! Graph-local connection table
//!
//! Both directions of every edge live here: each input slot maps to at most
//! one producing node, and each producing node keeps the ordered set of input
//! slots it feeds. Every mutation updates both sides, so an input points at a
//! producer exactly when the producer lists that input.

use std::collections::{BTreeSet, HashMap};

use crate::foundation::collections::NodeKey;

/// Input pin identity inside one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct InputSlot {
    pub node: NodeKey,
    pub index: usize,
}

impl InputSlot {
    pub const fn new(node: NodeKey, index: usize) -> Self {
        Self { node, index }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConnectionTable {
    incoming: HashMap<InputSlot, NodeKey>,
    outgoing: HashMap<NodeKey, BTreeSet<InputSlot>>,
}

impl ConnectionTable {
    /// Connect `input` to the output of `producer`, replacing any previous
    /// connection. Returns the previous producer.
    pub fn connect(&mut self, input: InputSlot, producer: NodeKey) -> Option<NodeKey> {
        let previous = self.disconnect(input);
        self.incoming.insert(input, producer);
        self.outgoing.entry(producer).or_default().insert(input);
        previous
    }

    /// Disconnect `input`; no-op when it is not connected
    pub fn disconnect(&mut self, input: InputSlot) -> Option<NodeKey> {
        let producer = self.incoming.remove(&input)?;
        if let Some(consumers) = self.outgoing.get_mut(&producer) {
            consumers.remove(&input);
            if consumers.is_empty() {
                self.outgoing.remove(&producer);
            }
        }
        Some(producer)
    }

    /// Disconnect `input` only if it is fed by `producer`
    pub fn disconnect_from(&mut self, producer: NodeKey, input: InputSlot) -> bool {
        if self.incoming.get(&input) == Some(&producer) {
            self.disconnect(input);
            true
        } else {
            false
        }
    }

    /// Disconnect every input fed by `producer`, returning how many were cut
    pub fn disconnect_all(&mut self, producer: NodeKey) -> usize {
        let Some(consumers) = self.outgoing.remove(&producer) else {
            return 0;
        };
        for input in &consumers {
            self.incoming.remove(input);
        }
        consumers.len()
    }

    /// Cut every edge touching `node`
    pub fn detach_node(&mut self, node: NodeKey, input_count: usize) {
        for index in 0..input_count {
            self.disconnect(InputSlot::new(node, index));
        }
        self.disconnect_all(node);
    }

    pub fn source(&self, input: InputSlot) -> Option<NodeKey> {
        self.incoming.get(&input).copied()
    }

    /// Inputs fed by `producer`, ordered by node then pin index
    pub fn consumers(&self, producer: NodeKey) -> impl Iterator<Item = InputSlot> + '_ {
        self.outgoing
            .get(&producer)
            .into_iter()
            .flat_map(|consumers| consumers.iter().copied())
    }

    pub fn consumer_count(&self, producer: NodeKey) -> usize {
        self.outgoing.get(&producer).map_or(0, BTreeSet::len)
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.incoming.len()
    }

    pub fn clear(&mut self) {
        self.incoming.clear();
        self.outgoing.clear();
    }
}
