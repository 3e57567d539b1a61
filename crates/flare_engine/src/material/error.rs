//! Material graph errors

use thiserror::Error;

use super::data_type::DataType;
use super::node::{NodeId, NodeKind};
use crate::config::ConfigError;
use crate::foundation::collections::GraphId;

/// Errors raised by graph editing, code generation and document loading
#[derive(Error, Debug)]
pub enum MaterialError {
    /// The node was deleted (or the graph cleared) after the handle was issued
    #[error("Node {0:?} no longer exists")]
    StaleNode(NodeId),

    /// The handle was issued by another graph
    #[error("Node {node:?} belongs to material {owner:?}, not {material:?}")]
    ForeignNode {
        /// Offending handle
        node: NodeId,
        /// Graph that issued the handle
        owner: GraphId,
        /// Graph the handle was used on
        material: GraphId,
    },

    /// The node exists but has another kind than requested
    #[error("Expected a {expected:?} node, found {found:?}")]
    KindMismatch {
        /// Requested kind
        expected: NodeKind,
        /// Actual kind
        found: NodeKind,
    },

    /// Value or pin types disagree
    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Required data type
        expected: DataType,
        /// Offered data type
        found: DataType,
    },

    /// Output nodes cannot feed other nodes
    #[error("{0:?} nodes have no output pin")]
    NoOutputPin(NodeKind),

    /// Pin index out of range for the node
    #[error("Node {node:?} has no input pin #{index}")]
    InvalidPin {
        /// Node addressed
        node: NodeId,
        /// Requested input index
        index: usize,
    },

    /// Traversal came back to a node it was still expanding
    #[error("Connection cycle through node {0:?}")]
    CycleDetected(NodeId),

    /// GLSL has no literal for NaN or infinities
    #[error("Cannot express {0} as a GLSL literal")]
    NonFiniteLiteral(f32),

    /// A document cannot be turned into a graph
    #[error("Invalid material document: {0}")]
    InvalidDocument(String),

    /// Generator settings are unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing generated text failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}
