//! # Flare Engine
//!
//! Material node graphs for the Flare rendering engine.
//!
//! A [`MaterialGraph`](material::MaterialGraph) owns a set of typed nodes
//! (scalar constants, vector constructors, multiplications and shader outputs)
//! connected through typed pins. The graph compiles to GLSL fragment shader
//! source and can be dumped as a debug tree or saved as a document.
//!
//! ## Quick Start
//!
//! ```rust
//! use flare_engine::prelude::*;
//!
//! fn main() -> Result<(), MaterialError> {
//!     let mut material = MaterialGraph::new();
//!
//!     let out = material.create_output_node::<Vec4>();
//!     let a = material.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
//!     let b = material.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
//!     let product = material.multiply(a, b)?;
//!     material.connect(out, product)?;
//!
//!     let source = material.generate_glsl()?;
//!     assert!(source.contains("out vec4 out_1;"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments
)]

pub mod config;
pub mod foundation;
pub mod material;

/// Common imports for material authoring
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, GlslConfig},
        foundation::math::{BVec4, IVec2, IVec4, Vec2, Vec3, Vec4, Vector2, Vector3, Vector4},
        material::{
            AsInputPin, AsOutputPin, DataType, InputPin, MaterialDocument, MaterialError,
            MaterialGraph, MaterialValue, MultVec4ScalarNode, MultVec4Vec4Node, NodeId, NodeKind,
            OutputNode, OutputPin, ScalarNode, Value, Vec4Node,
        },
    };
}
