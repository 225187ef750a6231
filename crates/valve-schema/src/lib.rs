//! # valve-schema — Schema Registry & Validation Capabilities
//!
//! Resolves per-collection schema configuration into an immutable registry
//! of compiled, runnable schemas at initialization time.
//!
//! ## Registry Construction (`registry`)
//!
//! [`SchemaRegistry::build`] walks the collection → descriptor mapping,
//! resolves each active descriptor's locator against the supplied working
//! directory, loads and compiles the schema, and records inactive
//! descriptors without touching their paths. A single bad schema aborts
//! the whole build: registry construction is fail-fast, with no partial or
//! degraded mode.
//!
//! ## Capability Seams
//!
//! - [`SchemaLoader`] maps a resolved locator to a raw schema document.
//!   [`FsSchemaLoader`] reads JSON/YAML files; [`StaticSchemaLoader`]
//!   serves an in-memory map for embedded deployments.
//! - [`ValidationEngine`] compiles raw documents; [`CompiledSchema`] runs
//!   a request body through the schema, returning the normalized value or
//!   a structured diagnostic. [`JsonSchemaEngine`] is the default,
//!   backed by the `jsonschema` crate.
//!
//! The registry depends only on these interfaces, never on a particular
//! schema language or loading mechanism.
//!
//! ## Thread Safety
//!
//! A built [`SchemaRegistry`] is `Send + Sync` and never mutated; it is
//! safe for unbounded concurrent lookups.

pub mod descriptor;
pub mod engine;
pub mod loader;
pub mod registry;

pub use descriptor::{SchemaConfig, SchemaDescriptor, ValidationOptions};
pub use engine::{
    CompiledSchema, JsonSchemaEngine, SchemaCompileError, ValidationEngine, ValidationFailure,
    Violation,
};
pub use loader::{FsSchemaLoader, SchemaLoadError, SchemaLoader, StaticSchemaLoader};
pub use registry::{ActiveSchema, RegistryError, SchemaEntry, SchemaRegistry};
