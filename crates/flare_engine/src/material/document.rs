//! Serializable material documents
//!
//! A [`MaterialDocument`] is a flat snapshot of a graph: node records in
//! arena order, the output list as node indices, and one link record per
//! connected input. Documents load and save through [`Config`], so both RON
//! and TOML files work.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::connection::InputSlot;
use super::data_type::DataType;
use super::error::MaterialError;
use super::graph::MaterialGraph;
use super::node::{LayoutError, NodeData, NodeKind};
use super::value::Value;
use crate::config::Config;
use crate::foundation::collections::NodeKey;

/// One node: kind, value type and input defaults in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node kind
    pub kind: NodeKind,
    /// Output type, or input type for output nodes
    pub data_type: DataType,
    /// Default value of every input pin
    pub inputs: Vec<Value>,
}

/// One connection: `nodes[node].inputs[input]` is fed by `nodes[source]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Consumer node index
    pub node: usize,
    /// Input pin index on the consumer
    pub input: usize,
    /// Producer node index
    pub source: usize,
}

/// Flat, serializable form of a [`MaterialGraph`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDocument {
    /// Node records
    pub nodes: Vec<NodeRecord>,
    /// Indices of the output nodes, in output order
    pub outputs: Vec<usize>,
    /// Connections
    pub links: Vec<LinkRecord>,
}

impl Config for MaterialDocument {}

impl MaterialGraph {
    /// Snapshot this graph
    pub fn to_document(&self) -> MaterialDocument {
        let mut indices: HashMap<NodeKey, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.node_count());
        for (index, (key, data)) in self.node_entries().enumerate() {
            indices.insert(key, index);
            nodes.push(NodeRecord {
                kind: data.kind,
                data_type: data.data_type,
                inputs: data.inputs.iter().map(|input| input.value).collect(),
            });
        }

        let outputs = self
            .output_keys()
            .iter()
            .filter_map(|key| indices.get(key).copied())
            .collect();

        let mut links = Vec::new();
        for (key, data) in self.node_entries() {
            for input in 0..data.inputs.len() {
                let source = self
                    .connection_table()
                    .source(InputSlot::new(key, input))
                    .and_then(|source| indices.get(&source));
                if let (Some(&node), Some(&source)) = (indices.get(&key), source) {
                    links.push(LinkRecord {
                        node,
                        input,
                        source,
                    });
                }
            }
        }

        MaterialDocument {
            nodes,
            outputs,
            links,
        }
    }

    /// Build a graph from a document, validating every record
    pub fn from_document(document: &MaterialDocument) -> Result<Self, MaterialError> {
        let mut graph = Self::new();

        let mut keys = Vec::with_capacity(document.nodes.len());
        for (index, record) in document.nodes.iter().enumerate() {
            let data = NodeData::from_parts(record.kind, record.data_type, &record.inputs)
                .map_err(|err| layout_error(index, record, err))?;
            keys.push(graph.insert(data).key);
        }

        let mut listed = vec![false; keys.len()];
        for &index in &document.outputs {
            let record = document
                .nodes
                .get(index)
                .ok_or_else(|| invalid(format!("output index {index} out of range")))?;
            if record.kind != NodeKind::Output {
                return Err(invalid(format!(
                    "node {index} is a {:?} node, not an output",
                    record.kind
                )));
            }
            if std::mem::replace(&mut listed[index], true) {
                return Err(invalid(format!("output {index} listed twice")));
            }
            graph.push_output(keys[index]);
        }
        if let Some(index) = document
            .nodes
            .iter()
            .enumerate()
            .position(|(i, record)| record.kind == NodeKind::Output && !listed[i])
        {
            return Err(invalid(format!("output node {index} missing from output list")));
        }

        for link in &document.links {
            let (Some(&node), Some(&source)) = (keys.get(link.node), keys.get(link.source)) else {
                return Err(invalid(format!(
                    "link {} <- {} references a missing node",
                    link.node, link.source
                )));
            };
            let slot = InputSlot::new(node, link.input);
            if graph.connection_table().source(slot).is_some() {
                return Err(invalid(format!(
                    "input {} of node {} is linked twice",
                    link.input, link.node
                )));
            }
            graph.connect_slot(slot, source)?;
        }

        log::debug!(
            "Loaded material {:?}: {} nodes, {} outputs, {} links",
            graph.id(),
            graph.node_count(),
            graph.output_count(),
            graph.connection_count()
        );
        Ok(graph)
    }
}

fn invalid(message: String) -> MaterialError {
    MaterialError::InvalidDocument(message)
}

fn layout_error(index: usize, record: &NodeRecord, err: LayoutError) -> MaterialError {
    match err {
        LayoutError::UnsupportedType => invalid(format!(
            "node {index}: {:?} nodes cannot carry {:?}",
            record.kind, record.data_type
        )),
        LayoutError::Arity { expected, found } => invalid(format!(
            "node {index}: expected {expected} inputs, found {found}"
        )),
        LayoutError::Value {
            expected, found, ..
        } => MaterialError::TypeMismatch { expected, found },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;

    fn sample_graph() -> MaterialGraph {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node_with(Vec4::new(1.0, 1.0, 1.0, 1.0));
        graph.create_output_node::<i32>();
        let a = graph.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
        let b = graph.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
        let s = graph.create_scalar_node(0.5f32);
        graph.connect(a.input_w(), s).unwrap();
        let product = graph.multiply(a, b).unwrap();
        graph.connect(out, product).unwrap();
        graph
    }

    #[test]
    fn test_document_shape() {
        let document = sample_graph().to_document();
        assert_eq!(document.nodes.len(), 6);
        assert_eq!(document.outputs, [0, 1]);
        assert_eq!(document.links.len(), 4);
        assert_eq!(document.nodes[2].inputs[2], Value::Float(3.0));
        assert!(document.links.contains(&LinkRecord {
            node: 2,
            input: 3,
            source: 4
        }));
    }

    #[test]
    fn test_rebuilt_graph_matches() {
        let graph = sample_graph();
        let rebuilt = MaterialGraph::from_document(&graph.to_document()).unwrap();

        assert_eq!(rebuilt.to_document(), graph.to_document());
        assert_eq!(rebuilt.generate_glsl().unwrap(), graph.generate_glsl().unwrap());
        assert_eq!(rebuilt.debug_string().unwrap(), graph.debug_string().unwrap());
    }

    #[test]
    fn test_ron_text_roundtrip() {
        let document = sample_graph().to_document();
        let text = document.to_ron_string().unwrap();
        assert_eq!(MaterialDocument::from_ron_str(&text).unwrap(), document);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let document = sample_graph().to_document();

        for name in ["material.ron", "material.toml"] {
            let path = dir.path().join(name);
            document.save_to_file(&path).unwrap();
            assert_eq!(MaterialDocument::load_from_file(&path).unwrap(), document);
        }
    }

    #[test]
    fn test_deleted_nodes_are_compacted() {
        let mut graph = sample_graph();
        let first = graph.nodes().next().unwrap().id();
        graph.delete_node(first);

        let document = graph.to_document();
        assert_eq!(document.nodes.len(), 5);
        assert_eq!(document.outputs, [0]);
        let rebuilt = MaterialGraph::from_document(&document).unwrap();
        assert_eq!(rebuilt.to_document(), document);
    }

    #[test]
    fn test_bad_link_types_are_rejected() {
        let mut document = sample_graph().to_document();
        // Float scalar into the int output node.
        document.links.push(LinkRecord {
            node: 1,
            input: 0,
            source: 4,
        });
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_structural_errors_are_rejected() {
        let base = sample_graph().to_document();

        let mut document = base.clone();
        document.links.push(LinkRecord {
            node: 9,
            input: 0,
            source: 2,
        });
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::InvalidDocument(_))
        ));

        let mut document = base.clone();
        document.links.push(document.links[0]);
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::InvalidDocument(_))
        ));

        let mut document = base.clone();
        document.outputs = vec![0];
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::InvalidDocument(_))
        ));

        let mut document = base.clone();
        document.outputs.push(2);
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::InvalidDocument(_))
        ));

        let mut document = base;
        document.nodes[2].inputs.pop();
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_wrong_default_type_is_rejected() {
        let mut document = sample_graph().to_document();
        document.nodes[4].inputs[0] = Value::Integer(1);
        assert!(matches!(
            MaterialGraph::from_document(&document),
            Err(MaterialError::TypeMismatch {
                expected: DataType::Float,
                found: DataType::Integer
            })
        ));
    }
}
