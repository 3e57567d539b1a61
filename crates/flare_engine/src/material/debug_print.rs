//! Debug tree dump of a material graph

use std::collections::HashSet;
use std::fmt::Write;

use super::connection::InputSlot;
use super::error::MaterialError;
use super::graph::MaterialGraph;
use super::node::{NodeData, NodeId, NodeKind};
use crate::foundation::collections::NodeKey;

/// Spaces added per tree level
const INDENT: usize = 3;

/// Writes one indented tree per output node.
///
/// Vector constructors and scalars show their default literals; every
/// connected input is expanded under a label naming the pin. Nodes reachable
/// along several paths are printed once per path.
#[derive(Debug, Clone, Copy)]
pub struct DebugPrinter<'g> {
    graph: &'g MaterialGraph,
}

impl<'g> DebugPrinter<'g> {
    /// Create a printer for `graph`
    pub const fn new(graph: &'g MaterialGraph) -> Self {
        Self { graph }
    }

    /// Write the tree of every output node, in creation order
    pub fn write(&self, out: &mut impl Write) -> Result<(), MaterialError> {
        let mut path = HashSet::new();
        for &key in self.graph.output_keys() {
            self.write_node(out, key, 0, &mut path)?;
        }
        Ok(())
    }

    fn write_node(
        &self,
        out: &mut impl Write,
        key: NodeKey,
        level: usize,
        path: &mut HashSet<NodeKey>,
    ) -> Result<(), MaterialError> {
        let id = NodeId::new(self.graph.id(), key);
        if !path.insert(key) {
            return Err(MaterialError::CycleDetected(id));
        }
        let data = self
            .graph
            .node_data(key)
            .ok_or(MaterialError::StaleNode(id))?;

        write!(out, "{} node:", data.kind.label())?;
        if matches!(data.kind, NodeKind::Scalar | NodeKind::Vec4) {
            write_defaults(out, data)?;
        }
        writeln!(out)?;

        for (index, input) in data.inputs.iter().enumerate() {
            let source = self
                .graph
                .connection_table()
                .source(InputSlot::new(key, index));
            if let Some(source) = source {
                let pad = " ".repeat((level + 1) * INDENT);
                if data.inputs.len() == 1 {
                    write!(out, "{pad}Input: ")?;
                } else {
                    write!(out, "{pad}Input {}: ", input.name.to_uppercase())?;
                }
                self.write_node(out, source, level + 1, path)?;
            }
        }

        path.remove(&key);
        Ok(())
    }
}

fn write_defaults(out: &mut impl Write, data: &NodeData) -> Result<(), MaterialError> {
    out.write_str(" (")?;
    for (index, input) in data.inputs.iter().enumerate() {
        if index > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{}", input.value)?;
    }
    out.write_str(")")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{IVec4, Vec4};

    #[test]
    fn test_scenario_a_tree() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node_with(Vec4::new(1.0, 1.0, 1.0, 1.0));
        let a = graph.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
        let b = graph.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
        let product = graph.multiply(a, b).unwrap();
        graph.connect(out, product).unwrap();

        let expected = "\
Output node:
   Input: MultVec4Vec4 node:
      Input A: Vec4 node: (1, 2, 3, 4)
      Input B: Vec4 node: (5, 6, 7, 8)
";
        assert_eq!(graph.debug_string().unwrap(), expected);
    }

    #[test]
    fn test_scenario_b_tree() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<IVec4>();
        let v = graph.create_vec4_node_from(11, 22, 33, 44);
        graph.connect(out, v).unwrap();

        assert_eq!(
            graph.debug_string().unwrap(),
            "Output node:\n   Input: Vec4 node: (11, 22, 33, 44)\n"
        );
        assert!(!graph.debug_string().unwrap().contains("Mult"));
    }

    #[test]
    fn test_connected_components_and_scalar_operand() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<Vec4>();
        let v = graph.create_vec4_node_from(1.0f32, 0.0, 0.0, 1.0);
        let s = graph.create_scalar_node(0.5f32);
        graph.connect(v.input_y(), s).unwrap();
        let product = graph.multiply(v, s).unwrap();
        graph.connect(out, product).unwrap();

        let expected = "\
Output node:
   Input: MultVec4Scalar node:
      Input A: Vec4 node: (1, 0, 0, 1)
         Input Y: Scalar node: (0.5)
      Input B: Scalar node: (0.5)
";
        assert_eq!(graph.debug_string().unwrap(), expected);
    }

    #[test]
    fn test_unconnected_output_and_order() {
        let mut graph = MaterialGraph::new();
        graph.create_output_node::<f32>();
        graph.create_output_node::<bool>();
        assert_eq!(graph.debug_string().unwrap(), "Output node:\nOutput node:\n");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<i32>();
        let s = graph.create_scalar_node(1);
        graph.connect(s.input(), s).unwrap();
        graph.connect(out, s).unwrap();

        assert!(matches!(
            graph.debug_string(),
            Err(MaterialError::CycleDetected(id)) if id == NodeId::from(s)
        ));
    }
}
