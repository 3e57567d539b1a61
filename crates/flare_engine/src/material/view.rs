//! Read-only views of graph nodes
//!
//! Views give uniform, non-generic access to any node: kind, data type, named
//! inputs with their defaults and connections, and the output's consumers.

use super::connection::InputSlot;
use super::data_type::DataType;
use super::error::MaterialError;
use super::graph::MaterialGraph;
use super::node::{NodeData, NodeId, NodeKind, TypedNode, OUTPUT_PIN_NAME};
use super::value::Value;
use crate::foundation::collections::NodeKey;

/// Borrowed view of one node
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g MaterialGraph,
    key: NodeKey,
    data: &'g NodeData,
}

impl<'g> NodeRef<'g> {
    pub(crate) const fn new(graph: &'g MaterialGraph, key: NodeKey, data: &'g NodeData) -> Self {
        Self { graph, key, data }
    }

    /// Node identity
    pub fn id(&self) -> NodeId {
        NodeId::new(self.graph.id(), self.key)
    }

    /// Node kind
    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }

    /// Value type: the output pin's type, or the input type of output nodes
    pub fn data_type(&self) -> DataType {
        self.data.data_type
    }

    /// Graph owning this node
    pub const fn graph(&self) -> &'g MaterialGraph {
        self.graph
    }

    /// Whether this node is a shader output
    pub fn is_output(&self) -> bool {
        self.data.kind == NodeKind::Output
    }

    /// Number of input pins
    pub fn input_count(&self) -> usize {
        self.data.inputs.len()
    }

    /// Input pin by index
    pub fn input(&self, index: usize) -> Option<InputRef<'g>> {
        let input = self.data.inputs.get(index)?;
        Some(InputRef {
            graph: self.graph,
            slot: InputSlot::new(self.key, index),
            name: input.name,
            value: &input.value,
        })
    }

    /// Input pin by name
    pub fn input_named(&self, name: &str) -> Option<InputRef<'g>> {
        let index = self.data.inputs.iter().position(|input| input.name == name)?;
        self.input(index)
    }

    /// All input pins in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = InputRef<'g>> + 'g {
        let this = *self;
        (0..self.data.inputs.len()).filter_map(move |index| this.input(index))
    }

    /// Output pin; `None` for output nodes
    pub fn output(&self) -> Option<OutputRef<'g>> {
        self.data.output_type().map(|data_type| OutputRef {
            graph: self.graph,
            key: self.key,
            data_type,
        })
    }

    /// Typed handle for this node, checked against kind and data type
    pub fn downcast<N: TypedNode>(&self) -> Result<N, MaterialError> {
        self.graph.downcast(self.id())
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id())
            .field("kind", &self.data.kind)
            .field("data_type", &self.data.data_type)
            .finish()
    }
}

/// Borrowed view of one input pin
#[derive(Debug, Clone, Copy)]
pub struct InputRef<'g> {
    graph: &'g MaterialGraph,
    slot: InputSlot,
    name: &'static str,
    value: &'g Value,
}

impl<'g> InputRef<'g> {
    /// Pin name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Position among the node's inputs
    pub const fn index(&self) -> usize {
        self.slot.index
    }

    /// Pin data type
    pub const fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Default value used when unconnected
    pub const fn value(&self) -> &'g Value {
        self.value
    }

    /// Producing node, if connected
    pub fn connection(&self) -> Option<NodeRef<'g>> {
        let source = self.graph.connection_table().source(self.slot)?;
        self.graph.node_ref(source)
    }

    /// Whether an output feeds this pin
    pub fn is_connected(&self) -> bool {
        self.graph.connection_table().source(self.slot).is_some()
    }
}

/// Borrowed view of a node's output pin
#[derive(Debug, Clone, Copy)]
pub struct OutputRef<'g> {
    graph: &'g MaterialGraph,
    key: NodeKey,
    data_type: DataType,
}

impl<'g> OutputRef<'g> {
    /// Pin name
    pub const fn name(&self) -> &'static str {
        OUTPUT_PIN_NAME
    }

    /// Pin data type
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of connected input pins
    pub fn connection_count(&self) -> usize {
        self.graph.connection_table().consumer_count(self.key)
    }

    /// Connected input pins as (consumer node, input index), ordered
    pub fn connections(&self) -> impl Iterator<Item = (NodeId, usize)> + 'g {
        let graph = self.graph;
        graph
            .connection_table()
            .consumers(self.key)
            .map(move |slot| (NodeId::new(graph.id(), slot.node), slot.index))
    }
}
