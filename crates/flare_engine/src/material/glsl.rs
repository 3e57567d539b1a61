//! GLSL fragment shader generation
//!
//! The generator walks backwards from every output node, depth first, and
//! emits one local variable per reachable node in post-order so producers are
//! always declared before their consumers. Nodes shared by several consumers
//! are declared once.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use super::connection::InputSlot;
use super::error::MaterialError;
use super::graph::MaterialGraph;
use super::node::{NodeData, NodeId, NodeKind};
use crate::config::GlslConfig;
use crate::foundation::collections::NodeKey;

/// Compiles a [`MaterialGraph`] to GLSL source text
#[derive(Debug, Clone, Copy)]
pub struct GlslGenerator<'c> {
    config: &'c GlslConfig,
}

impl<'c> GlslGenerator<'c> {
    /// Create a generator using `config`
    pub const fn new(config: &'c GlslConfig) -> Self {
        Self { config }
    }

    /// Generate the complete fragment shader source for `graph`.
    ///
    /// Output variables are numbered in output node creation order. The pass
    /// either returns the whole text or an error; there is no partial output.
    pub fn generate(&self, graph: &MaterialGraph) -> Result<String, MaterialError> {
        self.config.validate()?;

        let mut emitter = Emitter::new(graph, self.config);
        let mut outputs = Vec::with_capacity(graph.output_count());
        for (index, &key) in graph.output_keys().iter().enumerate() {
            emitter.visit(key)?;
            let data = emitter.data(key)?;
            let name = format!("{}{}", self.config.output_prefix, index + 1);
            outputs.push((name, data.data_type, emitter.expression(key, data)?));
        }

        let mut source = String::new();
        if let Some(version) = self.config.version {
            writeln!(source, "#version {version}")?;
            writeln!(source)?;
        }

        for (location, (name, data_type, _)) in outputs.iter().enumerate() {
            if self.config.output_locations {
                write!(source, "layout(location = {location}) ")?;
            }
            writeln!(source, "out {} {name};", data_type.glsl_name())?;
        }
        if !outputs.is_empty() {
            writeln!(source)?;
        }

        let indent = self.config.indent();
        writeln!(source, "void main(void)")?;
        writeln!(source, "{{")?;
        for line in &emitter.locals {
            writeln!(source, "{indent}{line}")?;
        }
        for (name, _, expression) in &outputs {
            writeln!(source, "{indent}{name} = {expression};")?;
        }
        writeln!(source, "}}")?;

        log::debug!(
            "Generated GLSL for material {:?}: {} outputs, {} locals",
            graph.id(),
            outputs.len(),
            emitter.locals.len()
        );
        Ok(source)
    }
}

/// Traversal state of one generation pass
struct Emitter<'g> {
    graph: &'g MaterialGraph,
    variable_prefix: &'g str,
    /// Declared nodes and their variable names; doubles as the visited set
    variables: HashMap<NodeKey, String>,
    /// Nodes whose producers are still being expanded
    in_progress: HashSet<NodeKey>,
    locals: Vec<String>,
}

impl<'g> Emitter<'g> {
    fn new(graph: &'g MaterialGraph, config: &'g GlslConfig) -> Self {
        Self {
            graph,
            variable_prefix: &config.variable_prefix,
            variables: HashMap::new(),
            in_progress: HashSet::new(),
            locals: Vec::new(),
        }
    }

    fn data(&self, key: NodeKey) -> Result<&'g NodeData, MaterialError> {
        self.graph
            .node_data(key)
            .ok_or_else(|| MaterialError::StaleNode(NodeId::new(self.graph.id(), key)))
    }

    fn visit(&mut self, key: NodeKey) -> Result<(), MaterialError> {
        if self.variables.contains_key(&key) {
            return Ok(());
        }
        if !self.in_progress.insert(key) {
            return Err(MaterialError::CycleDetected(NodeId::new(self.graph.id(), key)));
        }

        let data = self.data(key)?;
        for index in 0..data.inputs.len() {
            if let Some(producer) = self.source(key, index) {
                self.visit(producer)?;
            }
        }

        // Output nodes become assignments, not locals.
        if data.kind != NodeKind::Output {
            let expression = self.expression(key, data)?;
            let name = format!("{}{}", self.variable_prefix, self.variables.len() + 1);
            log::trace!("Declaring {name} for {:?} node {key:?}", data.kind);
            self.locals
                .push(format!("{} {name} = {expression};", data.data_type.glsl_name()));
            self.variables.insert(key, name);
        }

        self.in_progress.remove(&key);
        Ok(())
    }

    fn source(&self, key: NodeKey, index: usize) -> Option<NodeKey> {
        self.graph
            .connection_table()
            .source(InputSlot::new(key, index))
    }

    /// Right-hand side computing the value of `key`
    fn expression(&self, key: NodeKey, data: &NodeData) -> Result<String, MaterialError> {
        match data.kind {
            NodeKind::Scalar | NodeKind::Output => self.input_expression(key, data, 0),
            NodeKind::Vec4 => {
                let components = (0..data.inputs.len())
                    .map(|index| self.input_expression(key, data, index))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!(
                    "{}({})",
                    data.data_type.glsl_name(),
                    components.join(", ")
                ))
            }
            NodeKind::MultVec4Vec4 | NodeKind::MultVec4Scalar => Ok(format!(
                "{} * {}",
                self.input_expression(key, data, 0)?,
                self.input_expression(key, data, 1)?
            )),
        }
    }

    /// The producer's variable when connected, else the default literal
    fn input_expression(
        &self,
        key: NodeKey,
        data: &NodeData,
        index: usize,
    ) -> Result<String, MaterialError> {
        let input = data.inputs.get(index).ok_or(MaterialError::InvalidPin {
            node: NodeId::new(self.graph.id(), key),
            index,
        })?;

        match self.source(key, index) {
            Some(producer) => self
                .variables
                .get(&producer)
                .cloned()
                .ok_or_else(|| {
                    MaterialError::CycleDetected(NodeId::new(self.graph.id(), producer))
                }),
            None => input.value.to_glsl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::foundation::math::{IVec4, Vec4};

    fn scenario_a() -> MaterialGraph {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node_with(Vec4::new(1.0, 1.0, 1.0, 1.0));
        let a = graph.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
        let b = graph.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
        let product = graph.multiply(a, b).unwrap();
        graph.connect(out, product).unwrap();
        graph
    }

    #[test]
    fn test_scenario_a_source() {
        let source = scenario_a().generate_glsl().unwrap();
        let expected = "\
out vec4 out_1;

void main(void)
{
    vec4 node_1 = vec4(1.0, 2.0, 3.0, 4.0);
    vec4 node_2 = vec4(5.0, 6.0, 7.0, 8.0);
    vec4 node_3 = node_1 * node_2;
    out_1 = node_3;
}
";
        assert_eq!(source, expected);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let graph = scenario_a();
        assert_eq!(graph.generate_glsl().unwrap(), graph.generate_glsl().unwrap());
    }

    #[test]
    fn test_outputs_numbered_in_creation_order() {
        let mut graph = MaterialGraph::new();
        graph.create_output_node::<Vec4>();
        graph.create_output_node::<IVec4>();
        graph.create_output_node::<bool>();

        let source = graph.generate_glsl().unwrap();
        let first = source.find("out vec4 out_1;").unwrap();
        let second = source.find("out ivec4 out_2;").unwrap();
        let third = source.find("out bool out_3;").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_shared_node_is_declared_once() {
        let mut graph = MaterialGraph::new();
        let out1 = graph.create_output_node::<Vec4>();
        let out2 = graph.create_output_node::<Vec4>();
        let a = graph.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
        let b = graph.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
        graph.connect(out1, a).unwrap();
        let product = graph.multiply(a, b).unwrap();
        graph.connect(out2, product).unwrap();

        let source = graph.generate_glsl().unwrap();
        assert_eq!(source.matches("vec4(1.0, 2.0, 3.0, 4.0)").count(), 1);
        assert_eq!(source.matches("vec4 node_").count(), 3);
        assert!(source.contains("    vec4 node_3 = node_1 * node_2;\n"));
        assert!(source.contains("    out_1 = node_1;\n"));
        assert!(source.contains("    out_2 = node_3;\n"));
    }

    #[test]
    fn test_diamond_is_declared_once() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<Vec4>();
        let a = graph.create_vec4_node_splat(2.0f32);
        let left = graph.multiply(a, a).unwrap();
        let right = graph.multiply(a, a).unwrap();
        let top = graph.multiply(left, right).unwrap();
        graph.connect(out, top).unwrap();

        let source = graph.generate_glsl().unwrap();
        assert_eq!(source.matches("vec4(2.0, 2.0, 2.0, 2.0)").count(), 1);
        assert!(source.contains("vec4 node_2 = node_1 * node_1;"));
        assert!(source.contains("vec4 node_3 = node_1 * node_1;"));
        assert!(source.contains("vec4 node_4 = node_2 * node_3;"));
    }

    #[test]
    fn test_unconnected_inputs_use_defaults() {
        let mut graph = MaterialGraph::new();
        graph.create_output_node_with(Vec4::new(0.5, 0.25, 0.0, 1.0));
        graph.create_output_node::<i32>();

        let source = graph.generate_glsl().unwrap();
        assert!(source.contains("    out_1 = vec4(0.5, 0.25, 0.0, 1.0);\n"));
        assert!(source.contains("    out_2 = 0;\n"));
    }

    #[test]
    fn test_scalar_product() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<IVec4>();
        let v = graph.create_vec4_node_from(1, 2, 3, 4);
        let s = graph.create_scalar_node(3);
        graph.connect(v.input_w(), s).unwrap();
        let product = graph.multiply(v, s).unwrap();
        graph.connect(out, product).unwrap();

        let source = graph.generate_glsl().unwrap();
        let body: Vec<&str> = source.lines().skip_while(|l| *l != "{").collect();
        assert_eq!(
            body,
            [
                "{",
                "    int node_1 = 3;",
                "    ivec4 node_2 = ivec4(1, 2, 3, node_1);",
                "    ivec4 node_3 = node_2 * node_1;",
                "    out_1 = node_3;",
                "}"
            ]
        );
    }

    #[test]
    fn test_unreachable_nodes_are_skipped() {
        let mut graph = MaterialGraph::new();
        graph.create_output_node::<Vec4>();
        graph.create_vec4_node_from(9.0f32, 9.0, 9.0, 9.0);

        let source = graph.generate_glsl().unwrap();
        assert!(!source.contains("9.0"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = MaterialGraph::new();
        assert_eq!(graph.generate_glsl().unwrap(), "void main(void)\n{\n}\n");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<Vec4>();
        let a = graph.create_vec4_node::<f32>();
        let b = graph.create_vec4_node::<f32>();
        let product = graph.multiply(a, b).unwrap();
        graph.connect(out, product).unwrap();
        graph.connect(product.input_b(), product).unwrap();

        let result = graph.generate_glsl();
        assert!(matches!(
            result,
            Err(MaterialError::CycleDetected(id)) if id == NodeId::from(product)
        ));
    }

    #[test]
    fn test_self_loop_on_scalar() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<f32>();
        let s = graph.create_scalar_node(1.0f32);
        graph.connect(s.input(), s.output()).unwrap();
        graph.connect(out, s).unwrap();

        assert!(matches!(
            graph.generate_glsl(),
            Err(MaterialError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_vulkan_settings() {
        let source = scenario_a().generate_glsl_with(&GlslConfig::vulkan()).unwrap();
        assert!(source.starts_with("#version 450\n\nlayout(location = 0) out vec4 out_1;\n\n"));
    }

    #[test]
    fn test_custom_prefixes_and_indent() {
        let config = GlslConfig {
            output_prefix: "frag_color".to_string(),
            variable_prefix: "t".to_string(),
            indent_width: 2,
            ..GlslConfig::default()
        };
        let source = scenario_a().generate_glsl_with(&config).unwrap();
        assert!(source.contains("out vec4 frag_color1;"));
        assert!(source.contains("\n  vec4 t3 = t1 * t2;\n"));
        assert!(source.contains("\n  frag_color1 = t3;\n"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GlslConfig {
            variable_prefix: "gl_tmp".to_string(),
            ..GlslConfig::default()
        };
        let result = scenario_a().generate_glsl_with(&config);
        assert!(matches!(result, Err(MaterialError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_non_finite_default_aborts() {
        let mut graph = MaterialGraph::new();
        let out = graph.create_output_node::<Vec4>();
        let v = graph.create_vec4_node_from(1.0f32, f32::INFINITY, 0.0, 0.0);
        graph.connect(out, v).unwrap();

        assert!(matches!(
            graph.generate_glsl(),
            Err(MaterialError::NonFiniteLiteral(_))
        ));
    }
}
