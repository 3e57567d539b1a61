//! Material node graphs
//!
//! A material is a directed graph of nodes connected through typed pins.
//! Output nodes are the roots; the GLSL generator walks backwards from each of
//! them to produce fragment shader source.
//!
//! # Architecture
//!
//! - [`MaterialGraph`] owns every node in a generational arena and keeps the
//!   ordered list of output nodes.
//! - Nodes are addressed through small `Copy` handles ([`Vec4Node`],
//!   [`OutputNode`], ...) that carry their value type, so pins of different
//!   types cannot be connected.
//! - Connections live in a graph-local table rather than inside the pins.
//! - [`GlslGenerator`] and [`DebugPrinter`] are read-only passes.
//! - [`MaterialDocument`] is a serializable snapshot of a graph.

/// Declares a typed handle: a `Copy` id plus a phantom value type.
///
/// Trait impls are written by hand so they do not require the phantom type to
/// implement them (`f32` is not `Hash`).
macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident($raw:ty)) => {
        $(#[$meta])*
        pub struct $name<T> {
            raw: $raw,
            _marker: std::marker::PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            pub(crate) const fn from_raw(raw: $raw) -> Self {
                Self {
                    raw,
                    _marker: std::marker::PhantomData,
                }
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.raw == other.raw
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> std::hash::Hash for $name<T> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.raw.hash(state);
            }
        }

        impl<T> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.raw).finish()
            }
        }
    };
}

mod connection;
pub mod data_type;
pub mod debug_print;
pub mod document;
pub mod error;
pub mod glsl;
pub mod graph;
pub mod node;
pub mod pin;
pub mod value;
pub mod view;

pub use data_type::{data_type_of, DataType};
pub use debug_print::DebugPrinter;
pub use document::{LinkRecord, MaterialDocument, NodeRecord};
pub use error::MaterialError;
pub use glsl::GlslGenerator;
pub use graph::{MaterialGraph, Multiply};
pub use node::{
    MultVec4ScalarNode, MultVec4Vec4Node, NodeId, NodeKind, OutputNode, ScalarNode, TypedNode,
    Vec4Node,
};
pub use pin::{AsInputPin, AsOutputPin, InputPin, OutputPin};
pub use value::{MaterialValue, NumericValue, ScalarValue, Value};
pub use view::{InputRef, NodeRef, OutputRef};
