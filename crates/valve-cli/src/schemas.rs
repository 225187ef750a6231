//! # Schemas Subcommand
//!
//! Lists the collections a configuration registers, their status, and
//! their schema locators. Building the registry here doubles as a
//! configuration check: a bad schema fails the command the same way it
//! would fail plugin initialization.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use valve_schema::SchemaRegistry;

use crate::load_config;

/// Arguments for the schemas subcommand.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Plugin configuration file (YAML or JSON) declaring the schemas.
    #[arg(long)]
    pub config: PathBuf,
}

/// Build the registry and list every registered collection.
pub fn run_schemas(args: &SchemasArgs) -> anyhow::Result<u8> {
    let config = load_config(&args.config)?;
    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let registry = SchemaRegistry::build(&config.schemas, &workdir)?;

    if registry.is_empty() {
        println!("no schemas registered");
        return Ok(0);
    }

    for name in registry.collections() {
        if let Some(entry) = registry.get(name) {
            let status = if entry.is_active() {
                "active"
            } else {
                "deactivated"
            };
            println!("{name}: {status} ({})", entry.descriptor().path);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_fails_on_unloadable_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("valve.json");
        std::fs::write(
            &config_path,
            r#"{"schemas": {"users": {"path": "/nonexistent/user.json"}}}"#,
        )
        .unwrap();

        let args = SchemasArgs {
            config: config_path,
        };
        let err = run_schemas(&args).unwrap_err();
        assert!(err.to_string().contains("'users'"));
    }

    #[test]
    fn lists_active_and_deactivated_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let schema_path = tmp.path().join("user.json");
        std::fs::write(&schema_path, json!({"type": "object"}).to_string()).unwrap();

        let config_path = tmp.path().join("valve.json");
        std::fs::write(
            &config_path,
            json!({
                "schemas": {
                    "users": { "path": schema_path.display().to_string() },
                    "logs": { "path": "/ignored.json", "activated": false }
                }
            })
            .to_string(),
        )
        .unwrap();

        let args = SchemasArgs {
            config: config_path,
        };
        assert_eq!(run_schemas(&args).unwrap(), 0);
    }
}
