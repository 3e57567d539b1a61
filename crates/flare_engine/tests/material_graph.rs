//! End-to-end tests of the material graph public API

use approx::assert_relative_eq;
use flare_engine::prelude::*;

/// `out = Vec4(1, 2, 3, 4) * Vec4(5, 6, 7, 8)`
struct ScenarioA {
    graph: MaterialGraph,
    out: OutputNode<Vec4>,
    a: Vec4Node<f32>,
    b: Vec4Node<f32>,
    product: MultVec4Vec4Node<f32>,
}

fn scenario_a() -> ScenarioA {
    let mut graph = MaterialGraph::new();
    let out = graph.create_output_node_with(Vec4::new(1.0, 1.0, 1.0, 1.0));
    let a = graph.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
    let b = graph.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
    let product = graph.multiply(a, b).unwrap();
    graph.connect(out, product).unwrap();
    ScenarioA {
        graph,
        out,
        a,
        b,
        product,
    }
}

#[test]
fn connect_is_visible_from_both_ends() {
    let mut graph = MaterialGraph::new();
    let out = graph.create_output_node::<Vec4>();
    let v = graph.create_vec4_node::<f32>();

    graph.connect(out, v).unwrap();
    assert_eq!(graph.connection(out.input()).unwrap(), Some(v.output()));
    assert_eq!(graph.connections(v.output()).unwrap(), [out.input()]);

    assert!(graph.disconnect(out).unwrap());
    assert_eq!(graph.connection(out.input()).unwrap(), None);
    assert!(graph.connections(v.output()).unwrap().is_empty());

    // Disconnecting again changes nothing.
    assert!(!graph.disconnect(out).unwrap());
}

#[test]
fn reconnecting_moves_the_input() {
    let mut graph = MaterialGraph::new();
    let out = graph.create_output_node::<Vec4>();
    let first = graph.create_vec4_node::<f32>();
    let second = graph.create_vec4_node::<f32>();

    graph.connect(out, first).unwrap();
    graph.connect_output(second, out).unwrap();

    assert_eq!(graph.connection(out.input()).unwrap(), Some(second.output()));
    assert!(graph.connections(first.output()).unwrap().is_empty());
    assert_eq!(graph.connections(second.output()).unwrap(), [out.input()]);
    assert_eq!(graph.connection_count(), 1);
}

#[test]
fn outputs_fan_out() {
    let mut graph = MaterialGraph::new();
    let s = graph.create_scalar_node(2.0f32);
    let v = graph.create_vec4_node::<f32>();
    for pin in v.inputs() {
        graph.connect(pin, s).unwrap();
    }
    assert_eq!(graph.connections(s.output()).unwrap().len(), 4);

    assert!(graph.disconnect_output(s, v.input_y()).unwrap());
    assert!(!graph.disconnect_output(s, v.input_y()).unwrap());
    assert_eq!(
        graph.connections(s.output()).unwrap(),
        [v.input_x(), v.input_z(), v.input_w()]
    );

    assert_eq!(graph.disconnect_all(s).unwrap(), 3);
    for pin in v.inputs() {
        assert_eq!(graph.connection(pin).unwrap(), None);
    }
}

#[test]
fn deleted_nodes_are_never_visited() {
    let ScenarioA {
        mut graph, out, a, ..
    } = scenario_a();

    assert!(graph.delete_node(out));
    assert!(graph.delete_node(a));

    let mut visited = Vec::new();
    graph.for_each_node(|node| visited.push(node.id()));
    assert_eq!(visited.len(), 2);
    assert!(!visited.contains(&NodeId::from(out)));
    assert!(!visited.contains(&NodeId::from(a)));

    let mut outputs = 0;
    graph.for_each_output_node(|_| outputs += 1);
    assert_eq!(outputs, 0);
}

#[test]
fn clear_leaves_no_connections() {
    let ScenarioA { mut graph, b, .. } = scenario_a();
    let node_count = graph.node_count();

    assert_eq!(graph.clear(), node_count);
    assert_eq!(graph.connection_count(), 0);
    assert!(matches!(
        graph.connections(b.output()),
        Err(MaterialError::StaleNode(_))
    ));
}

#[test]
fn dropping_a_graph_with_shared_nodes() {
    let mut graph = MaterialGraph::new();
    let out1 = graph.create_output_node::<Vec4>();
    let out2 = graph.create_output_node::<Vec4>();
    let a = graph.create_vec4_node_splat(1.0f32);
    graph.connect(out1, a).unwrap();
    graph.connect(out2, a).unwrap();
    assert_eq!(graph.node_count(), 3);
    drop(graph);
}

#[test]
fn scenario_a_glsl() {
    let ScenarioA { graph, .. } = scenario_a();
    let source = graph.generate_glsl().unwrap();
    assert_eq!(
        source,
        "out vec4 out_1;\n\
         \n\
         void main(void)\n\
         {\n    \
         vec4 node_1 = vec4(1.0, 2.0, 3.0, 4.0);\n    \
         vec4 node_2 = vec4(5.0, 6.0, 7.0, 8.0);\n    \
         vec4 node_3 = node_1 * node_2;\n    \
         out_1 = node_3;\n\
         }\n"
    );
    assert_eq!(source, graph.generate_glsl().unwrap());
}

#[test]
fn shared_subexpression_is_declared_once() {
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
    assert!(source.contains("out vec4 out_1;\nout vec4 out_2;\n"));
}

#[test]
fn scenario_a_debug_tree() {
    let ScenarioA { graph, .. } = scenario_a();
    let tree = graph.debug_string().unwrap();
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(
        lines,
        [
            "Output node:",
            "   Input: MultVec4Vec4 node:",
            "      Input A: Vec4 node: (1, 2, 3, 4)",
            "      Input B: Vec4 node: (5, 6, 7, 8)",
        ]
    );
}

#[test]
fn scenario_b_debug_tree() {
    let ScenarioA { mut graph, .. } = scenario_a();
    let out2 = graph.create_output_node::<IVec4>();
    let v = graph.create_vec4_node_from(11, 22, 33, 44);
    graph.connect(out2, v).unwrap();

    let tree = graph.debug_string().unwrap();
    assert!(tree.ends_with("Output node:\n   Input: Vec4 node: (11, 22, 33, 44)\n"));
    assert_eq!(tree.matches("MultVec4Vec4").count(), 1);
}

#[test]
fn scenario_c_deleting_the_product() {
    let ScenarioA {
        mut graph,
        out,
        a,
        b,
        product,
    } = scenario_a();

    assert!(graph.delete_node(product));
    assert!(graph.contains(a));
    assert!(graph.contains(b));
    assert!(graph.connections(a.output()).unwrap().is_empty());
    assert!(graph.connections(b.output()).unwrap().is_empty());
    assert_eq!(graph.connection(out.input()).unwrap(), None);

    // The output falls back to its default.
    let source = graph.generate_glsl().unwrap();
    assert!(source.contains("out_1 = vec4(1.0, 1.0, 1.0, 1.0);"));
}

#[test]
fn defaults_survive_connections() {
    let ScenarioA { mut graph, a, .. } = scenario_a();
    graph.set_value(a.input_x(), 0.25).unwrap();
    assert_relative_eq!(graph.value(a.input_x()).unwrap(), 0.25);
    assert_relative_eq!(graph.value(a.input_w()).unwrap(), 4.0);
    assert!(graph
        .generate_glsl()
        .unwrap()
        .contains("vec4(0.25, 2.0, 3.0, 4.0)"));
}

#[test]
fn untyped_views_downcast_back() {
    let ScenarioA { graph, product, .. } = scenario_a();
    let root = graph.output_nodes().next().unwrap();
    let input = root.input(0).unwrap().connection().unwrap();

    assert_eq!(input.kind(), NodeKind::MultVec4Vec4);
    assert_eq!(input.data_type(), DataType::Vec4Float);
    let typed: MultVec4Vec4Node<f32> = input.downcast().unwrap();
    assert_eq!(typed, product);
    assert!(input.downcast::<Vec4Node<f32>>().is_err());
}

#[test]
fn document_file_roundtrip() {
    let ScenarioA { graph, .. } = scenario_a();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("material.ron");

    graph.to_document().save_to_file(&path).unwrap();
    let loaded = MaterialGraph::from_document(&MaterialDocument::load_from_file(&path).unwrap())
        .unwrap();

    assert_eq!(loaded.generate_glsl().unwrap(), graph.generate_glsl().unwrap());
    assert_ne!(loaded.id(), graph.id());
}

#[test]
fn vulkan_configuration_from_file() {
    let ScenarioA { graph, .. } = scenario_a();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glsl.toml");
    GlslConfig::vulkan().save_to_file(&path).unwrap();

    let config = GlslConfig::load_from_file(&path).unwrap();
    let source = graph.generate_glsl_with(&config).unwrap();
    assert!(source.starts_with("#version 450\n"));
    assert!(source.contains("layout(location = 0) out vec4 out_1;"));
}

#[test]
fn overlapping_prefixes_are_rejected_before_generation() {
    let mut graph = MaterialGraph::new();
    for _ in 0..11 {
        let out = graph.create_output_node::<f32>();
        let s = graph.create_scalar_node(1.0f32);
        graph.connect(out, s).unwrap();
    }
    let config = GlslConfig {
        output_prefix: "v".to_string(),
        variable_prefix: "v1".to_string(),
        ..GlslConfig::default()
    };

    // "v" + "11" and "v1" + "1" would name the same variable.
    assert!(matches!(
        graph.generate_glsl_with(&config),
        Err(MaterialError::Config(ConfigError::Invalid(_)))
    ));
}
