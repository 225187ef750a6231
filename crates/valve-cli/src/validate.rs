//! # Validate Subcommand
//!
//! Validates JSON document files against a collection's registered schema.
//! Exit code 0 when every document is valid, 1 when any document is
//! rejected.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use valve_schema::SchemaRegistry;

use crate::load_config;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Plugin configuration file (YAML or JSON) declaring the schemas.
    #[arg(long)]
    pub config: PathBuf,

    /// Collection whose schema the documents are validated against.
    #[arg(long)]
    pub collection: String,

    /// JSON document files to validate.
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,
}

/// Build the registry and validate each document, reporting per-document
/// outcomes on stdout.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<u8> {
    let config = load_config(&args.config)?;
    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let registry = SchemaRegistry::build(&config.schemas, &workdir)?;

    let Some(active) = registry.active(&args.collection) else {
        println!(
            "collection '{}' has no active schema; documents pass through",
            args.collection
        );
        return Ok(0);
    };

    let mut invalid = 0usize;
    for path in &args.documents {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read document '{}'", path.display()))?;
        let body: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("document '{}' is not valid JSON", path.display()))?;

        match active.schema.validate(&body, &active.descriptor.options) {
            Ok(_) => println!("{}: OK", path.display()),
            Err(failure) => {
                invalid += 1;
                println!("{}: INVALID: {failure}", path.display());
            }
        }
    }

    if invalid > 0 {
        tracing::warn!(invalid, total = args.documents.len(), "documents rejected");
        Ok(1)
    } else {
        Ok(0)
    }
}
