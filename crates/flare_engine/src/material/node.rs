//! Material nodes
//!
//! Every node is stored in the graph as one [`NodeData`] record tagged with its
//! [`NodeKind`]. Callers hold typed handles such as [`Vec4Node<f32>`] that
//! expose the node's pins with their value types; an untyped [`NodeId`] can be
//! turned back into a typed handle with
//! [`MaterialGraph::downcast`](super::MaterialGraph::downcast), which checks
//! both the kind and the data type.

use serde::{Deserialize, Serialize};

use super::data_type::DataType;
use super::pin::{AsInputPin, AsOutputPin, InputPin, OutputPin};
use super::value::{MaterialValue, NumericValue, ScalarValue, Value};
use crate::foundation::collections::{GraphId, NodeKey};

/// Name of the single output pin of every non-output node
pub const OUTPUT_PIN_NAME: &str = "out";

const SCALAR_INPUTS: [&str; 1] = ["value"];
const VEC4_INPUTS: [&str; 4] = ["x", "y", "z", "w"];
const MULT_INPUTS: [&str; 2] = ["a", "b"];
const OUTPUT_INPUTS: [&str; 1] = ["in"];

/// Enumerator of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// Scalar constant with one input
    Scalar,
    /// Four component vector built from four scalars
    Vec4,
    /// Componentwise product of two vec4s
    MultVec4Vec4,
    /// Product of a vec4 and a scalar
    MultVec4Scalar,
    /// Shader output variable
    Output,
}

impl NodeKind {
    /// Human readable name used in diagnostics
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Vec4 => "Vec4",
            Self::MultVec4Vec4 => "MultVec4Vec4",
            Self::MultVec4Scalar => "MultVec4Scalar",
            Self::Output => "Output",
        }
    }

    /// Whether nodes of this kind have an output pin
    pub const fn has_output(self) -> bool {
        !matches!(self, Self::Output)
    }

    /// Input pin names and data types for a node of this kind whose value type
    /// is `data_type`; `None` when the kind cannot carry that type.
    ///
    /// The value type is the output pin's type, or the input type for
    /// [`NodeKind::Output`].
    pub fn input_layout(self, data_type: DataType) -> Option<Vec<(&'static str, DataType)>> {
        let scalar = data_type.scalar();
        let is_vec4 = data_type.components() == 4;

        match self {
            Self::Scalar if data_type.is_scalar() => Some(vec![(SCALAR_INPUTS[0], data_type)]),
            Self::Vec4 if is_vec4 => Some(VEC4_INPUTS.iter().map(|name| (*name, scalar)).collect()),
            Self::MultVec4Vec4 if is_vec4 && data_type.is_numeric() => {
                Some(vec![(MULT_INPUTS[0], data_type), (MULT_INPUTS[1], data_type)])
            }
            Self::MultVec4Scalar if is_vec4 && data_type.is_numeric() => {
                Some(vec![(MULT_INPUTS[0], data_type), (MULT_INPUTS[1], scalar)])
            }
            Self::Output => Some(vec![(OUTPUT_INPUTS[0], data_type)]),
            _ => None,
        }
    }
}

/// Untyped node identity: the issuing graph plus the arena key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: GraphId,
    pub(crate) key: NodeKey,
}

impl NodeId {
    pub(crate) const fn new(graph: GraphId, key: NodeKey) -> Self {
        Self { graph, key }
    }

    /// Graph that created this node
    pub const fn graph(&self) -> GraphId {
        self.graph
    }
}

/// Stored state of one input pin
#[derive(Debug, Clone)]
pub(crate) struct InputData {
    pub name: &'static str,
    pub value: Value,
}

impl InputData {
    pub fn new(name: &'static str, value: impl MaterialValue) -> Self {
        Self {
            name,
            value: value.into_value(),
        }
    }
}

/// Stored state of one node
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub data_type: DataType,
    pub inputs: Vec<InputData>,
}

impl NodeData {
    pub fn scalar<T: ScalarValue>(value: T) -> Self {
        Self {
            kind: NodeKind::Scalar,
            data_type: T::DATA_TYPE,
            inputs: vec![InputData::new(SCALAR_INPUTS[0], value)],
        }
    }

    pub fn vec4<T: ScalarValue>(x: T, y: T, z: T, w: T) -> Self {
        let [nx, ny, nz, nw] = VEC4_INPUTS;
        Self {
            kind: NodeKind::Vec4,
            data_type: T::Vec4::DATA_TYPE,
            inputs: vec![
                InputData::new(nx, x),
                InputData::new(ny, y),
                InputData::new(nz, z),
                InputData::new(nw, w),
            ],
        }
    }

    pub fn mult_vec4_vec4<T: NumericValue>() -> Self {
        Self {
            kind: NodeKind::MultVec4Vec4,
            data_type: T::Vec4::DATA_TYPE,
            inputs: vec![
                InputData::new(MULT_INPUTS[0], T::Vec4::zero()),
                InputData::new(MULT_INPUTS[1], T::Vec4::zero()),
            ],
        }
    }

    pub fn mult_vec4_scalar<T: NumericValue>() -> Self {
        Self {
            kind: NodeKind::MultVec4Scalar,
            data_type: T::Vec4::DATA_TYPE,
            inputs: vec![
                InputData::new(MULT_INPUTS[0], T::Vec4::zero()),
                InputData::new(MULT_INPUTS[1], T::zero()),
            ],
        }
    }

    pub fn output<V: MaterialValue>(default: V) -> Self {
        Self {
            kind: NodeKind::Output,
            data_type: V::DATA_TYPE,
            inputs: vec![InputData::new(OUTPUT_INPUTS[0], default)],
        }
    }

    /// Build a node from a kind, value type and input defaults, checking them
    /// against the kind's layout
    pub fn from_parts(
        kind: NodeKind,
        data_type: DataType,
        values: &[Value],
    ) -> Result<Self, LayoutError> {
        let layout = kind
            .input_layout(data_type)
            .ok_or(LayoutError::UnsupportedType)?;
        if layout.len() != values.len() {
            return Err(LayoutError::Arity {
                expected: layout.len(),
                found: values.len(),
            });
        }

        let inputs = layout
            .iter()
            .zip(values)
            .map(|(&(name, expected), value)| {
                if value.data_type() == expected {
                    Ok(InputData {
                        name,
                        value: *value,
                    })
                } else {
                    Err(LayoutError::Value {
                        name,
                        expected,
                        found: value.data_type(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind,
            data_type,
            inputs,
        })
    }

    /// Data type of the output pin, `None` for output nodes
    pub fn output_type(&self) -> Option<DataType> {
        self.kind.has_output().then_some(self.data_type)
    }
}

/// Reasons [`NodeData::from_parts`] rejects a node description
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LayoutError {
    UnsupportedType,
    Arity {
        expected: usize,
        found: usize,
    },
    Value {
        name: &'static str,
        expected: DataType,
        found: DataType,
    },
}

mod sealed {
    pub trait FromNodeId {
        fn from_id(id: super::NodeId) -> Self;
    }
}

/// Typed node handle with a statically known kind and value type
pub trait TypedNode: sealed::FromNodeId + Copy + Into<NodeId> {
    /// Kind of every node behind this handle type
    const KIND: NodeKind;

    /// Value type of nodes behind this handle type
    fn data_type() -> DataType;

    /// Untyped identity
    fn id(&self) -> NodeId {
        (*self).into()
    }
}

/// Wrap an id in a typed handle; the caller has checked kind and data type
pub(crate) fn cast_handle<N: TypedNode>(id: NodeId) -> N {
    <N as sealed::FromNodeId>::from_id(id)
}

macro_rules! node_handle {
    ($(#[$meta:meta])* $name:ident<$param:ident: $bound:ident>, $kind:ident, $value:ty) => {
        typed_handle!($(#[$meta])* $name(NodeId));

        impl<$param: $bound> sealed::FromNodeId for $name<$param> {
            fn from_id(id: NodeId) -> Self {
                Self::from_raw(id)
            }
        }

        impl<$param: $bound> TypedNode for $name<$param> {
            const KIND: NodeKind = NodeKind::$kind;

            fn data_type() -> DataType {
                <$value as MaterialValue>::DATA_TYPE
            }
        }

        impl<$param> From<$name<$param>> for NodeId {
            fn from(node: $name<$param>) -> Self {
                node.raw
            }
        }
    };
}

node_handle!(
    /// Scalar constant node: input `value`, output `out`
    ScalarNode<T: ScalarValue>, Scalar, T
);
node_handle!(
    /// Vector constructor node: inputs `x`, `y`, `z`, `w`, output `out`
    Vec4Node<T: ScalarValue>, Vec4, T::Vec4
);
node_handle!(
    /// Vec4 × Vec4 componentwise multiplication: inputs `a`, `b`, output `out`
    MultVec4Vec4Node<T: NumericValue>, MultVec4Vec4, T::Vec4
);
node_handle!(
    /// Vec4 × scalar multiplication: inputs `a` (vec4), `b` (scalar), output `out`
    MultVec4ScalarNode<T: NumericValue>, MultVec4Scalar, T::Vec4
);
node_handle!(
    /// Shader output node: input `in`, no output pin
    OutputNode<V: MaterialValue>, Output, V
);

impl<T: ScalarValue> ScalarNode<T> {
    /// Input pin `value`
    pub const fn input(&self) -> InputPin<T> {
        InputPin::new(self.raw, 0)
    }

    /// Output pin
    pub const fn output(&self) -> OutputPin<T> {
        OutputPin::new(self.raw)
    }
}

impl<T: ScalarValue> Vec4Node<T> {
    /// Input pin `x`
    pub const fn input_x(&self) -> InputPin<T> {
        InputPin::new(self.raw, 0)
    }

    /// Input pin `y`
    pub const fn input_y(&self) -> InputPin<T> {
        InputPin::new(self.raw, 1)
    }

    /// Input pin `z`
    pub const fn input_z(&self) -> InputPin<T> {
        InputPin::new(self.raw, 2)
    }

    /// Input pin `w`
    pub const fn input_w(&self) -> InputPin<T> {
        InputPin::new(self.raw, 3)
    }

    /// Component input pins in `x, y, z, w` order
    pub const fn inputs(&self) -> [InputPin<T>; 4] {
        [self.input_x(), self.input_y(), self.input_z(), self.input_w()]
    }

    /// Output pin
    pub const fn output(&self) -> OutputPin<T::Vec4> {
        OutputPin::new(self.raw)
    }
}

impl<T: NumericValue> MultVec4Vec4Node<T> {
    /// Left operand
    pub const fn input_a(&self) -> InputPin<T::Vec4> {
        InputPin::new(self.raw, 0)
    }

    /// Right operand
    pub const fn input_b(&self) -> InputPin<T::Vec4> {
        InputPin::new(self.raw, 1)
    }

    /// Output pin
    pub const fn output(&self) -> OutputPin<T::Vec4> {
        OutputPin::new(self.raw)
    }
}

impl<T: NumericValue> MultVec4ScalarNode<T> {
    /// Vector operand
    pub const fn input_a(&self) -> InputPin<T::Vec4> {
        InputPin::new(self.raw, 0)
    }

    /// Scalar operand
    pub const fn input_b(&self) -> InputPin<T> {
        InputPin::new(self.raw, 1)
    }

    /// Output pin
    pub const fn output(&self) -> OutputPin<T::Vec4> {
        OutputPin::new(self.raw)
    }
}

impl<V: MaterialValue> OutputNode<V> {
    /// Input pin `in`
    pub const fn input(&self) -> InputPin<V> {
        InputPin::new(self.raw, 0)
    }
}

impl<T: ScalarValue> AsInputPin for ScalarNode<T> {
    type Value = T;

    fn input_pin(&self) -> InputPin<T> {
        self.input()
    }
}

impl<V: MaterialValue> AsInputPin for OutputNode<V> {
    type Value = V;

    fn input_pin(&self) -> InputPin<V> {
        self.input()
    }
}

impl<T: ScalarValue> AsOutputPin for ScalarNode<T> {
    type Value = T;

    fn output_pin(&self) -> OutputPin<T> {
        self.output()
    }
}

impl<T: ScalarValue> AsOutputPin for Vec4Node<T> {
    type Value = T::Vec4;

    fn output_pin(&self) -> OutputPin<T::Vec4> {
        self.output()
    }
}

impl<T: NumericValue> AsOutputPin for MultVec4Vec4Node<T> {
    type Value = T::Vec4;

    fn output_pin(&self) -> OutputPin<T::Vec4> {
        self.output()
    }
}

impl<T: NumericValue> AsOutputPin for MultVec4ScalarNode<T> {
    type Value = T::Vec4;

    fn output_pin(&self) -> OutputPin<T::Vec4> {
        self.output()
    }
}
