//! # Schema Registry
//!
//! Immutable lookup from collection name to loaded schema state, built
//! once at plugin initialization and shared read-only for the life of the
//! process.
//!
//! ## Build Semantics
//!
//! - Deactivated descriptors are recorded without any load attempt; their
//!   collections pass through.
//! - Active descriptors resolve their locator against the supplied working
//!   directory, load the document through the injected [`SchemaLoader`],
//!   and compile it through the injected [`ValidationEngine`].
//! - The first load or compile failure aborts the whole build. A registry
//!   either contains every configured schema or does not exist.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::descriptor::{SchemaConfig, SchemaDescriptor};
use crate::engine::{CompiledSchema, JsonSchemaEngine, ValidationEngine};
use crate::loader::{FsSchemaLoader, SchemaLoader};

/// Error building the schema registry. Fatal to plugin initialization.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A schema document failed to load or compile.
    #[error("loading '{collection}' schema from '{}' failed: {reason}", path.display())]
    SchemaLoad {
        /// Collection whose descriptor failed.
        collection: String,
        /// Resolved schema path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },
}

/// A collection's registered schema state.
pub struct SchemaEntry {
    descriptor: SchemaDescriptor,
    schema: Option<Arc<dyn CompiledSchema>>,
}

impl SchemaEntry {
    /// The descriptor this entry was built from.
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Whether the entry carries a compiled schema. Inactive entries never
    /// do.
    pub fn is_active(&self) -> bool {
        self.schema.is_some()
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("descriptor", &self.descriptor)
            .field("schema", &self.schema.as_ref().map(|_| "[compiled]"))
            .finish()
    }
}

/// Lookup view of an active schema: the descriptor plus its compiled
/// schema, present exactly when the descriptor is active.
#[derive(Clone, Copy)]
pub struct ActiveSchema<'a> {
    /// The collection's descriptor.
    pub descriptor: &'a SchemaDescriptor,
    /// The compiled schema, ready to run.
    pub schema: &'a dyn CompiledSchema,
}

/// Immutable collection → schema lookup.
#[derive(Debug)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaEntry>,
}

impl SchemaRegistry {
    /// Build with the default filesystem loader and JSON Schema engine.
    pub fn build(config: &SchemaConfig, workdir: &Path) -> Result<Self, RegistryError> {
        Self::build_with(config, workdir, &FsSchemaLoader, &JsonSchemaEngine)
    }

    /// Build with injected loader and engine capabilities.
    ///
    /// Relative descriptor paths resolve against `workdir`; absolute paths
    /// are used as-is. Building is idempotent given identical input.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaLoad`] naming the collection, the
    /// resolved path, and the cause as soon as any schema fails to load or
    /// compile; no partial registry is ever returned.
    pub fn build_with(
        config: &SchemaConfig,
        workdir: &Path,
        loader: &dyn SchemaLoader,
        engine: &dyn ValidationEngine,
    ) -> Result<Self, RegistryError> {
        let mut entries = HashMap::new();

        for (collection, descriptor) in config {
            if !descriptor.activated {
                tracing::debug!(collection = %collection, "schema deactivated, requests pass through");
                entries.insert(
                    collection.clone(),
                    SchemaEntry {
                        descriptor: descriptor.clone(),
                        schema: None,
                    },
                );
                continue;
            }

            let path = workdir.join(&descriptor.path);
            let schema = load_schema(collection, &path, loader, engine)?;
            tracing::debug!(collection = %collection, path = %path.display(), "schema registered");
            entries.insert(
                collection.clone(),
                SchemaEntry {
                    descriptor: descriptor.clone(),
                    schema: Some(schema),
                },
            );
        }

        tracing::info!(collections = entries.len(), "schema registry built");
        Ok(Self { entries })
    }

    /// Look up a collection's entry, active or not.
    pub fn get(&self, collection: &str) -> Option<&SchemaEntry> {
        self.entries.get(collection)
    }

    /// Look up a collection's active schema.
    ///
    /// `None` when the collection is unregistered or its schema is
    /// deactivated; the caller passes the request through unchanged.
    pub fn active(&self, collection: &str) -> Option<ActiveSchema<'_>> {
        let entry = self.entries.get(collection)?;
        let schema = entry.schema.as_deref()?;
        Some(ActiveSchema {
            descriptor: &entry.descriptor,
            schema,
        })
    }

    /// Number of registered collections, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no collection is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered collection names, sorted alphabetically.
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

fn load_schema(
    collection: &str,
    path: &Path,
    loader: &dyn SchemaLoader,
    engine: &dyn ValidationEngine,
) -> Result<Arc<dyn CompiledSchema>, RegistryError> {
    let document = loader.load(path).map_err(|e| RegistryError::SchemaLoad {
        collection: collection.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    engine
        .compile(&document)
        .map_err(|e| RegistryError::SchemaLoad {
            collection: collection.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
