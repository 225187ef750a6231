//! # valve-cli — Offline Validation Tool
//!
//! Builds the schema registry from a plugin configuration file and runs
//! documents through it, mirroring what the pipeline step does per
//! request. Useful for checking schema configurations and fixtures before
//! deploying the plugin.

use std::path::Path;

use anyhow::Context;
use valve_plugin::PluginConfig;

pub mod schemas;
pub mod validate;

/// Load a plugin configuration document, YAML or JSON by extension.
pub fn load_config(path: &Path) -> anyhow::Result<PluginConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration '{}'", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("configuration '{}' is not valid YAML", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("configuration '{}' is not valid JSON", path.display())),
    }
}
