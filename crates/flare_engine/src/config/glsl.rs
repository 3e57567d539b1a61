//! GLSL generator settings

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Settings controlling the text produced by the GLSL generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlslConfig {
    /// Emit a `#version` directive when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Prefix of shader output variables, numbered from 1
    pub output_prefix: String,
    /// Prefix of local variables declared for intermediate nodes, numbered from 1
    pub variable_prefix: String,
    /// Spaces per indentation level inside `main`
    pub indent_width: usize,
    /// Emit `layout(location = N)` on every output declaration
    pub output_locations: bool,
}

impl Default for GlslConfig {
    fn default() -> Self {
        Self {
            version: None,
            output_prefix: "out_".to_string(),
            variable_prefix: "node_".to_string(),
            indent_width: 4,
            output_locations: false,
        }
    }
}

impl Config for GlslConfig {}

impl GlslConfig {
    /// Settings suitable for Vulkan GLSL (`#version 450`, explicit output locations)
    pub fn vulkan() -> Self {
        Self {
            version: Some(450),
            output_locations: true,
            ..Self::default()
        }
    }

    /// Check that the prefixes produce valid, non-colliding GLSL identifiers
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix("output_prefix", &self.output_prefix)?;
        validate_prefix("variable_prefix", &self.variable_prefix)?;

        // Names are prefix + number, so one prefix extending the other can
        // produce the same identifier twice ("v" + "11" and "v1" + "1").
        let (output, variable) = (&self.output_prefix, &self.variable_prefix);
        if output.starts_with(variable.as_str()) || variable.starts_with(output.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "output_prefix '{output}' and variable_prefix '{variable}' overlap"
            )));
        }
        Ok(())
    }

    /// Indentation string for one level
    pub(crate) fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<(), ConfigError> {
    let mut chars = prefix.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    if !starts_well || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Invalid(format!(
            "{field} '{prefix}' is not a valid GLSL identifier prefix"
        )));
    }
    // Reserved by GLSL.
    if prefix.starts_with("gl_") || prefix.contains("__") {
        return Err(ConfigError::Invalid(format!(
            "{field} '{prefix}' uses a reserved GLSL identifier form"
        )));
    }
    Ok(())
}
