//! Material graph demo
//!
//! Builds the default Flare material (`Vec4(1, 2, 3, 4) * Vec4(5, 6, 7, 8)`
//! plus an integer output), logs its debug tree and prints the generated
//! fragment shader.
//!
//! Usage: `material_demo [OUTPUT.frag] [GLSL_CONFIG.ron|toml]`
//!
//! With an output path the shader is written there and the graph document is
//! saved next to it as `<stem>.material.ron`.

use std::path::{Path, PathBuf};

use flare_engine::foundation::logging;
use flare_engine::prelude::*;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn build_material() -> Result<MaterialGraph, MaterialError> {
    let mut material = MaterialGraph::new();

    let color = material.create_output_node_with(Vec4::new(1.0, 1.0, 1.0, 1.0));
    let a = material.create_vec4_node_from(1.0f32, 2.0, 3.0, 4.0);
    let b = material.create_vec4_node_from(5.0f32, 6.0, 7.0, 8.0);
    let product = material.multiply(a, b)?;
    material.connect(color, product)?;

    let index_output = material.create_output_node::<IVec4>();
    let indices = material.create_vec4_node_from(11, 22, 33, 44);
    material.connect(index_output, indices)?;

    Ok(material)
}

/// Where the graph document goes for a shader written to `output`
fn document_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map_or_else(|| "material".into(), |stem| stem.to_string_lossy());
    output.with_file_name(format!("{stem}.material.ron"))
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let output_path = args.next();
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading generator settings from {}", path.display());
            GlslConfig::load_from_file(&path)?
        }
        None => GlslConfig::default(),
    };

    let material = build_material()?;
    log::info!(
        "Material {:?}: {} nodes, {} outputs, {} connections",
        material.id(),
        material.node_count(),
        material.output_count(),
        material.connection_count()
    );
    for line in material.debug_string()?.lines() {
        log::info!("{line}");
    }

    let source = material.generate_glsl_with(&config)?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, &source).map_err(|source| DemoError::Write {
                path: path.clone(),
                source,
            })?;
            log::info!("Wrote {} bytes of GLSL to {}", source.len(), path.display());

            let document_path = document_path(&path);
            material.to_document().save_to_file(&document_path)?;
            log::info!("Saved material document to {}", document_path.display());
        }
        None => print!("{source}"),
    }
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);
    log::info!("Starting Flare material demo");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
