//! # valve-plugin — Write-Interception Schema Validation
//!
//! The pipeline plugin tying the workspace together. At initialization it
//! builds the [`SchemaRegistry`](valve_schema::SchemaRegistry) from the
//! collection → descriptor mapping in its configuration, failing fast on
//! any unloadable schema. Per request, its validate handler looks up the
//! target collection, passes unregistered or deactivated collections
//! through untouched, and otherwise runs the body through the compiled
//! schema, replacing it with the normalized output on success or aborting
//! the request with a classified error.
//!
//! ## Completion Contract
//!
//! [`SchemaValidator::validate`] resolves to exactly one outcome per call.
//! The request stays owned by the caller (`&mut`), so the caller's
//! continuation can never be lost or duplicated.

pub mod config;
pub mod pipes;
pub mod plugin;

pub use config::PluginConfig;
pub use plugin::{SchemaValidator, PLUGIN_NAME};
