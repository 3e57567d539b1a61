//! Typed pin handles
//!
//! Pins are addressed by small `Copy` handles carrying their value type.
//! All pin operations go through [`MaterialGraph`](super::MaterialGraph),
//! which owns the pin state and the connection table.

use super::node::NodeId;
use super::value::MaterialValue;

/// Identity of an input pin: owning node and pin index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PinRef {
    pub node: NodeId,
    pub index: usize,
}

typed_handle!(
    /// Input pin of value type `V`; holds a default value and at most one connection
    InputPin(PinRef)
);

typed_handle!(
    /// Output pin of value type `V`; feeds any number of input pins
    OutputPin(NodeId)
);

impl<V> InputPin<V> {
    pub(crate) const fn new(node: NodeId, index: usize) -> Self {
        Self::from_raw(PinRef { node, index })
    }

    /// Node owning this pin
    pub const fn node(&self) -> NodeId {
        self.raw.node
    }

    /// Position of this pin among the node's inputs
    pub const fn index(&self) -> usize {
        self.raw.index
    }
}

impl<V> OutputPin<V> {
    pub(crate) const fn new(node: NodeId) -> Self {
        Self::from_raw(node)
    }

    /// Node owning this pin
    pub const fn node(&self) -> NodeId {
        self.raw
    }
}

/// Anything that designates a single input pin
pub trait AsInputPin {
    /// Value type of the pin
    type Value: MaterialValue;

    /// The designated pin
    fn input_pin(&self) -> InputPin<Self::Value>;
}

/// Anything that designates a single output pin
pub trait AsOutputPin {
    /// Value type of the pin
    type Value: MaterialValue;

    /// The designated pin
    fn output_pin(&self) -> OutputPin<Self::Value>;
}

impl<V: MaterialValue> AsInputPin for InputPin<V> {
    type Value = V;

    fn input_pin(&self) -> InputPin<V> {
        *self
    }
}

impl<V: MaterialValue> AsOutputPin for OutputPin<V> {
    type Value = V;

    fn output_pin(&self) -> OutputPin<V> {
        *self
    }
}
