//! Material graph
//!
//! The graph owns every node it creates. Nodes live in a generational arena,
//! the output nodes are kept in creation order, and all connections are kept
//! in one table. Handles returned to callers never own anything: once a node
//! is deleted its handles are reported as stale instead of dangling.

use super::connection::{ConnectionTable, InputSlot};
use super::debug_print::DebugPrinter;
use super::error::MaterialError;
use super::glsl::GlslGenerator;
use super::node::{
    cast_handle, InputData, MultVec4ScalarNode, MultVec4Vec4Node, NodeData, NodeId, NodeKind,
    OutputNode, ScalarNode, TypedNode, Vec4Node,
};
use super::pin::{AsInputPin, AsOutputPin, InputPin, OutputPin};
use super::value::{MaterialValue, NumericValue, ScalarValue};
use super::view::NodeRef;
use crate::config::GlslConfig;
use crate::foundation::collections::{GraphId, NodeKey, NodeMap};
use crate::foundation::math::Vector4;

/// Material graph: owner of all material nodes and their connections
#[derive(Debug)]
pub struct MaterialGraph {
    id: GraphId,
    nodes: NodeMap<NodeData>,
    output_nodes: Vec<NodeKey>,
    connections: ConnectionTable,
}

impl MaterialGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            nodes: NodeMap::default(),
            output_nodes: Vec::new(),
            connections: ConnectionTable::default(),
        }
    }

    /// Identity stamped into every handle this graph issues
    pub const fn id(&self) -> GraphId {
        self.id
    }

    // ------------------------------------------------------------------
    // Node factory
    // ------------------------------------------------------------------

    /// Create an output node whose input defaults to zero
    pub fn create_output_node<V: MaterialValue>(&mut self) -> OutputNode<V> {
        self.create_output_node_with(V::zero())
    }

    /// Create an output node with the given default input value
    pub fn create_output_node_with<V: MaterialValue>(&mut self, default: V) -> OutputNode<V> {
        let id = self.insert(NodeData::output(default));
        self.output_nodes.push(id.key);
        OutputNode::from_raw(id)
    }

    /// Create a scalar constant node
    pub fn create_scalar_node<T: ScalarValue>(&mut self, value: T) -> ScalarNode<T> {
        ScalarNode::from_raw(self.insert(NodeData::scalar(value)))
    }

    /// Create a vector constructor with all components zero
    pub fn create_vec4_node<T: ScalarValue>(&mut self) -> Vec4Node<T> {
        self.create_vec4_node_splat(T::zero())
    }

    /// Create a vector constructor with every component set to `scalar`
    pub fn create_vec4_node_splat<T: ScalarValue>(&mut self, scalar: T) -> Vec4Node<T> {
        self.create_vec4_node_from(scalar, scalar, scalar, scalar)
    }

    /// Create a vector constructor from four component defaults
    pub fn create_vec4_node_from<T: ScalarValue>(
        &mut self,
        x: T,
        y: T,
        z: T,
        w: T,
    ) -> Vec4Node<T> {
        Vec4Node::from_raw(self.insert(NodeData::vec4(x, y, z, w)))
    }

    /// Create a vec4 × vec4 node wired to the two given outputs
    pub fn create_mult_vec4_vec4_node<T: NumericValue>(
        &mut self,
        a: impl AsOutputPin<Value = T::Vec4>,
        b: impl AsOutputPin<Value = T::Vec4>,
    ) -> Result<MultVec4Vec4Node<T>, MaterialError> {
        let (a, b) = (a.output_pin(), b.output_pin());
        self.resolve_output(a)?;
        self.resolve_output(b)?;

        let node = MultVec4Vec4Node::<T>::from_raw(self.insert(NodeData::mult_vec4_vec4::<T>()));
        self.connect(node.input_a(), a)?;
        self.connect(node.input_b(), b)?;
        Ok(node)
    }

    /// Create a vec4 × scalar node wired to the two given outputs
    pub fn create_mult_vec4_scalar_node<T: NumericValue>(
        &mut self,
        a: impl AsOutputPin<Value = T::Vec4>,
        b: impl AsOutputPin<Value = T>,
    ) -> Result<MultVec4ScalarNode<T>, MaterialError> {
        let (a, b) = (a.output_pin(), b.output_pin());
        self.resolve_output(a)?;
        self.resolve_output(b)?;

        let node =
            MultVec4ScalarNode::<T>::from_raw(self.insert(NodeData::mult_vec4_scalar::<T>()));
        self.connect(node.input_a(), a)?;
        self.connect(node.input_b(), b)?;
        Ok(node)
    }

    /// Multiply two single-output nodes or pins, creating the matching
    /// multiplication node and wiring both operands.
    ///
    /// Vec4 × Vec4 creates a [`MultVec4Vec4Node`], Vec4 × scalar creates a
    /// [`MultVec4ScalarNode`]. Other pairings do not compile.
    pub fn multiply<L, R>(
        &mut self,
        lhs: L,
        rhs: R,
    ) -> Result<<L::Value as Multiply<R::Value>>::Node, MaterialError>
    where
        L: AsOutputPin,
        R: AsOutputPin,
        L::Value: Multiply<R::Value>,
    {
        <L::Value as Multiply<R::Value>>::create_node(self, lhs.output_pin(), rhs.output_pin())
    }

    pub(crate) fn insert(&mut self, data: NodeData) -> NodeId {
        let kind = data.kind;
        let data_type = data.data_type;
        let key = self.nodes.insert(data);
        log::debug!("Created {kind:?} node {key:?} ({data_type:?})");
        NodeId::new(self.id, key)
    }

    pub(crate) fn push_output(&mut self, key: NodeKey) {
        self.output_nodes.push(key);
    }

    // ------------------------------------------------------------------
    // Node lifetime and lookup
    // ------------------------------------------------------------------

    /// Delete a node, disconnecting all of its pins first.
    ///
    /// Returns `false` without touching the graph when the node is not present.
    pub fn delete_node(&mut self, node: impl Into<NodeId>) -> bool {
        let id = node.into();
        if id.graph != self.id {
            log::warn!("Ignoring delete of node {id:?} owned by another material");
            return false;
        }
        let Some(input_count) = self.nodes.get(id.key).map(|data| data.inputs.len()) else {
            log::debug!("Ignoring delete of missing node {id:?}");
            return false;
        };

        self.connections.detach_node(id.key, input_count);
        if let Some(data) = self.nodes.remove(id.key) {
            if data.kind == NodeKind::Output {
                self.output_nodes.retain(|key| *key != id.key);
            }
            log::debug!("Deleted {:?} node {:?}", data.kind, id.key);
        }
        true
    }

    /// Delete every node; returns how many were destroyed
    pub fn clear(&mut self) -> usize {
        let count = self.nodes.len();
        self.connections.clear();
        self.output_nodes.clear();
        self.nodes.clear();
        log::debug!("Cleared material {:?}: {count} nodes destroyed", self.id);
        count
    }

    /// Whether the node is alive in this graph
    pub fn contains(&self, node: impl Into<NodeId>) -> bool {
        let id = node.into();
        id.graph == self.id && self.nodes.contains_key(id.key)
    }

    /// Number of live nodes, output nodes included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of output nodes
    pub fn output_count(&self) -> usize {
        self.output_nodes.len()
    }

    /// Number of pin connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// View of a live node
    pub fn node(&self, node: impl Into<NodeId>) -> Result<NodeRef<'_>, MaterialError> {
        let id = node.into();
        let data = self.resolve(id)?;
        Ok(NodeRef::new(self, id.key, data))
    }

    /// All live nodes, in arena order
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.nodes
            .iter()
            .map(move |(key, data)| NodeRef::new(self, key, data))
    }

    /// Output nodes, in creation order
    pub fn output_nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.output_nodes
            .iter()
            .filter_map(move |key| self.node_ref(*key))
    }

    /// Call `visitor` for every node, output nodes included
    pub fn for_each_node(&self, mut visitor: impl FnMut(NodeRef<'_>)) {
        for node in self.nodes() {
            visitor(node);
        }
    }

    /// Call `visitor` for every output node, in creation order
    pub fn for_each_output_node(&self, mut visitor: impl FnMut(NodeRef<'_>)) {
        for node in self.output_nodes() {
            visitor(node);
        }
    }

    /// Recover a typed handle from an untyped id.
    ///
    /// Fails when the node is gone, has another kind, or has another value type.
    pub fn downcast<N: TypedNode>(&self, id: NodeId) -> Result<N, MaterialError> {
        let data = self.resolve(id)?;
        if data.kind != N::KIND {
            return Err(MaterialError::KindMismatch {
                expected: N::KIND,
                found: data.kind,
            });
        }
        if data.data_type != N::data_type() {
            return Err(MaterialError::TypeMismatch {
                expected: N::data_type(),
                found: data.data_type,
            });
        }
        Ok(cast_handle(id))
    }

    // ------------------------------------------------------------------
    // Pins
    // ------------------------------------------------------------------

    /// Connect `input` to `output`, replacing any previous connection of `input`
    pub fn connect<I, O>(&mut self, input: I, output: O) -> Result<(), MaterialError>
    where
        I: AsInputPin,
        O: AsOutputPin<Value = I::Value>,
    {
        let slot = self.resolve_input(input.input_pin())?;
        let producer = self.resolve_output(output.output_pin())?;
        self.connect_slot(slot, producer)
    }

    /// Output-side form of [`connect`](Self::connect)
    pub fn connect_output<O, I>(&mut self, output: O, input: I) -> Result<(), MaterialError>
    where
        O: AsOutputPin,
        I: AsInputPin<Value = O::Value>,
    {
        self.connect(input, output)
    }

    /// Connect with a runtime type check; the typed API cannot fail it
    pub(crate) fn connect_slot(
        &mut self,
        input: InputSlot,
        producer: NodeKey,
    ) -> Result<(), MaterialError> {
        let source = self
            .nodes
            .get(producer)
            .ok_or(MaterialError::StaleNode(NodeId::new(self.id, producer)))?;
        let source_type = source
            .output_type()
            .ok_or(MaterialError::NoOutputPin(source.kind))?;

        let target = self.input_data(input)?;
        let (name, target_type) = (target.name, target.value.data_type());
        if target_type != source_type {
            return Err(MaterialError::TypeMismatch {
                expected: target_type,
                found: source_type,
            });
        }

        let previous = self.connections.connect(input, producer);
        log::trace!(
            "Connected {:?}.{} <- {:?} (replaced {:?})",
            input.node,
            name,
            producer,
            previous
        );
        Ok(())
    }

    /// Disconnect `input`; returns whether it was connected
    pub fn disconnect(&mut self, input: impl AsInputPin) -> Result<bool, MaterialError> {
        let slot = self.resolve_input(input.input_pin())?;
        let removed = self.connections.disconnect(slot).is_some();
        if removed {
            log::trace!("Disconnected {:?}#{}", slot.node, slot.index);
        }
        Ok(removed)
    }

    /// Disconnect `input` from `output` only; no-op when they are not connected
    pub fn disconnect_output<O, I>(&mut self, output: O, input: I) -> Result<bool, MaterialError>
    where
        O: AsOutputPin,
        I: AsInputPin<Value = O::Value>,
    {
        let producer = self.resolve_output(output.output_pin())?;
        let slot = self.resolve_input(input.input_pin())?;
        Ok(self.connections.disconnect_from(producer, slot))
    }

    /// Disconnect every input fed by `output`; returns how many were cut
    pub fn disconnect_all(&mut self, output: impl AsOutputPin) -> Result<usize, MaterialError> {
        let producer = self.resolve_output(output.output_pin())?;
        let count = self.connections.disconnect_all(producer);
        log::trace!("Disconnected {count} inputs from {producer:?}");
        Ok(count)
    }

    /// Output feeding `input`, if any
    pub fn connection<V: MaterialValue>(
        &self,
        input: InputPin<V>,
    ) -> Result<Option<OutputPin<V>>, MaterialError> {
        let slot = self.resolve_input(input)?;
        Ok(self
            .connections
            .source(slot)
            .map(|producer| OutputPin::new(NodeId::new(self.id, producer))))
    }

    /// Inputs fed by `output`, ordered by node then pin index
    pub fn connections<V: MaterialValue>(
        &self,
        output: OutputPin<V>,
    ) -> Result<Vec<InputPin<V>>, MaterialError> {
        let producer = self.resolve_output(output)?;
        Ok(self
            .connections
            .consumers(producer)
            .map(|slot| InputPin::new(NodeId::new(self.id, slot.node), slot.index))
            .collect())
    }

    /// Default value of `input`; never resolves the connected producer
    pub fn value<V: MaterialValue>(&self, input: InputPin<V>) -> Result<V, MaterialError> {
        let data = self.input_data(self.resolve_input(input)?)?;
        V::from_value(&data.value).ok_or(MaterialError::TypeMismatch {
            expected: V::DATA_TYPE,
            found: data.value.data_type(),
        })
    }

    /// Replace the default value of `input`
    pub fn set_value<V: MaterialValue>(
        &mut self,
        input: InputPin<V>,
        value: V,
    ) -> Result<(), MaterialError> {
        let slot = self.resolve_input(input)?;
        let data = self
            .nodes
            .get_mut(slot.node)
            .and_then(|node| node.inputs.get_mut(slot.index))
            .ok_or(MaterialError::InvalidPin {
                node: input.node(),
                index: slot.index,
            })?;

        let current = data.value.data_type();
        if current != V::DATA_TYPE {
            return Err(MaterialError::TypeMismatch {
                expected: current,
                found: V::DATA_TYPE,
            });
        }
        data.value = value.into_value();
        Ok(())
    }

    /// Name of `input`
    pub fn pin_name(&self, input: impl AsInputPin) -> Result<&'static str, MaterialError> {
        Ok(self.input_data(self.resolve_input(input.input_pin())?)?.name)
    }

    // ------------------------------------------------------------------
    // Passes
    // ------------------------------------------------------------------

    /// Generate GLSL fragment source with default settings
    pub fn generate_glsl(&self) -> Result<String, MaterialError> {
        self.generate_glsl_with(&GlslConfig::default())
    }

    /// Generate GLSL fragment source
    pub fn generate_glsl_with(&self, config: &GlslConfig) -> Result<String, MaterialError> {
        GlslGenerator::new(config).generate(self)
    }

    /// Debug tree of every output node
    pub fn debug_string(&self) -> Result<String, MaterialError> {
        let mut tree = String::new();
        DebugPrinter::new(self).write(&mut tree)?;
        Ok(tree)
    }

    /// Print the debug tree to stdout
    pub fn debug_print(&self) -> Result<(), MaterialError> {
        print!("{}", self.debug_string()?);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Crate internals
    // ------------------------------------------------------------------

    pub(crate) const fn connection_table(&self) -> &ConnectionTable {
        &self.connections
    }

    pub(crate) fn node_data(&self, key: NodeKey) -> Option<&NodeData> {
        self.nodes.get(key)
    }

    pub(crate) fn node_ref(&self, key: NodeKey) -> Option<NodeRef<'_>> {
        self.nodes.get(key).map(|data| NodeRef::new(self, key, data))
    }

    pub(crate) fn output_keys(&self) -> &[NodeKey] {
        &self.output_nodes
    }

    pub(crate) fn node_entries(&self) -> impl Iterator<Item = (NodeKey, &NodeData)> + '_ {
        self.nodes.iter()
    }

    fn resolve(&self, id: NodeId) -> Result<&NodeData, MaterialError> {
        if id.graph != self.id {
            log::warn!("Rejected node {id:?} from material {:?}", id.graph);
            return Err(MaterialError::ForeignNode {
                node: id,
                owner: id.graph,
                material: self.id,
            });
        }
        self.nodes.get(id.key).ok_or_else(|| {
            log::warn!("Rejected stale node {id:?}");
            MaterialError::StaleNode(id)
        })
    }

    fn resolve_input<V>(&self, pin: InputPin<V>) -> Result<InputSlot, MaterialError> {
        let node = self.resolve(pin.node())?;
        if pin.index() >= node.inputs.len() {
            return Err(MaterialError::InvalidPin {
                node: pin.node(),
                index: pin.index(),
            });
        }
        Ok(InputSlot::new(pin.node().key, pin.index()))
    }

    fn resolve_output<V>(&self, pin: OutputPin<V>) -> Result<NodeKey, MaterialError> {
        let node = self.resolve(pin.node())?;
        if !node.kind.has_output() {
            return Err(MaterialError::NoOutputPin(node.kind));
        }
        Ok(pin.node().key)
    }

    fn input_data(&self, slot: InputSlot) -> Result<&InputData, MaterialError> {
        self.nodes
            .get(slot.node)
            .and_then(|node| node.inputs.get(slot.index))
            .ok_or(MaterialError::InvalidPin {
                node: NodeId::new(self.id, slot.node),
                index: slot.index,
            })
    }
}

impl Default for MaterialGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MaterialGraph {
    fn drop(&mut self) {
        if !self.nodes.is_empty() {
            log::trace!(
                "Releasing material {:?} with {} nodes",
                self.id,
                self.nodes.len()
            );
        }
    }
}

/// Multiplication between two pin value types, used by
/// [`MaterialGraph::multiply`] to pick the node kind
pub trait Multiply<Rhs: MaterialValue>: MaterialValue {
    /// Node created for this pairing
    type Node: TypedNode + AsOutputPin;

    /// Create the node and wire both operands
    fn create_node(
        graph: &mut MaterialGraph,
        lhs: OutputPin<Self>,
        rhs: OutputPin<Rhs>,
    ) -> Result<Self::Node, MaterialError>;
}

macro_rules! impl_multiply {
    ($($scalar:ty),*) => {$(
        impl Multiply<Vector4<$scalar>> for Vector4<$scalar> {
            type Node = MultVec4Vec4Node<$scalar>;

            fn create_node(
                graph: &mut MaterialGraph,
                lhs: OutputPin<Self>,
                rhs: OutputPin<Self>,
            ) -> Result<Self::Node, MaterialError> {
                graph.create_mult_vec4_vec4_node::<$scalar>(lhs, rhs)
            }
        }

        impl Multiply<$scalar> for Vector4<$scalar> {
            type Node = MultVec4ScalarNode<$scalar>;

            fn create_node(
                graph: &mut MaterialGraph,
                lhs: OutputPin<Self>,
                rhs: OutputPin<$scalar>,
            ) -> Result<Self::Node, MaterialError> {
                graph.create_mult_vec4_scalar_node::<$scalar>(lhs, rhs)
            }
        }
    )*};
}

impl_multiply!(i32, f32);
