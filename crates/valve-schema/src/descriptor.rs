//! # Schema Descriptors
//!
//! Static per-collection configuration: where to load a schema from,
//! whether it participates in validation, and the options its validations
//! run with. Descriptors are declared in configuration (YAML or JSON) and
//! are immutable once the registry is built.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use valve_core::{ContextProvider, RequestContext};

/// Static configuration mapping collection name → schema descriptor.
///
/// Map-key uniqueness is what guarantees at most one schema candidate per
/// collection.
pub type SchemaConfig = BTreeMap<String, SchemaDescriptor>;

/// Per-collection schema declaration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Schema document locator. Relative paths resolve against the working
    /// directory supplied at registry build time.
    pub path: String,

    /// Whether the schema participates in validation. Deactivated schemas
    /// are recorded but never loaded; their collections pass through.
    #[serde(default = "default_activated")]
    pub activated: bool,

    /// Static validation options for this collection.
    #[serde(default)]
    pub options: ValidationOptions,

    /// Optional per-request context provider. Attached programmatically by
    /// the host; never part of the serialized configuration.
    #[serde(skip)]
    pub context_provider: Option<Arc<dyn ContextProvider>>,
}

fn default_activated() -> bool {
    true
}

impl SchemaDescriptor {
    /// Declare an active schema at `path` with default options.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            activated: true,
            options: ValidationOptions::default(),
            context_provider: None,
        }
    }

    /// Mark the schema deactivated: registered, never loaded.
    pub fn deactivated(mut self) -> Self {
        self.activated = false;
        self
    }

    /// Set the static validation options.
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a per-request context provider.
    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.context_provider = Some(provider);
        self
    }
}

impl fmt::Debug for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("path", &self.path)
            .field("activated", &self.activated)
            .field("options", &self.options)
            .field(
                "context_provider",
                &self.context_provider.as_ref().map(|_| "[attached]"),
            )
            .finish()
    }
}

/// Options a collection's validations run with.
///
/// The static `context` is merged with request-supplied context before each
/// validation; the other fields always come from the descriptor unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Fill missing object properties from the schema's `default` keywords
    /// before validating.
    #[serde(default = "default_apply_defaults")]
    pub apply_defaults: bool,

    /// Drop object properties the schema does not declare before
    /// validating.
    #[serde(default)]
    pub strip_unknown: bool,

    /// Static validation context handed to the engine (custom engines may
    /// consult it; the default JSON Schema engine does not).
    #[serde(default)]
    pub context: Map<String, Value>,
}

fn default_apply_defaults() -> bool {
    true
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            apply_defaults: true,
            strip_unknown: false,
            context: Map::new(),
        }
    }
}

impl ValidationOptions {
    /// Shallow-merge request-supplied context into these options.
    ///
    /// Request-derived keys override descriptor keys of the same name; all
    /// other option fields are unchanged.
    pub fn merged_with(&self, request_context: &RequestContext) -> ValidationOptions {
        let mut merged = self.clone();
        for (key, value) in request_context {
            merged.context.insert(key.clone(), value.clone());
        }
        merged
    }
}
