//! # Schema Loaders
//!
//! The pluggable capability mapping a resolved schema locator to a raw
//! schema document. The registry depends only on the [`SchemaLoader`]
//! interface; the concrete mechanism is deployment-specific: filesystem
//! files here, embedded resources via [`StaticSchemaLoader`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error loading a schema document.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    /// The document could not be read.
    #[error("cannot read '{}': {reason}", path.display())]
    Read {
        /// Resolved locator that failed.
        path: PathBuf,
        /// Reason the read failed.
        reason: String,
    },

    /// The document was read but could not be parsed.
    #[error("cannot parse '{}': {reason}", path.display())]
    Parse {
        /// Resolved locator that failed.
        path: PathBuf,
        /// Reason the parse failed.
        reason: String,
    },

    /// The locator names a format no loader supports.
    #[error("unsupported schema format: '{}'", path.display())]
    UnsupportedFormat {
        /// Offending locator.
        path: PathBuf,
    },

    /// The locator does not name a known schema.
    #[error("no schema registered for '{}'", path.display())]
    NotFound {
        /// Offending locator.
        path: PathBuf,
    },
}

/// Maps a resolved locator to a loaded schema document.
pub trait SchemaLoader: Send + Sync {
    /// Load the schema document at `path`.
    fn load(&self, path: &Path) -> Result<Value, SchemaLoadError>;
}

/// Filesystem loader for `.json`, `.yaml`, and `.yml` schema documents.
///
/// YAML documents are converted to their equivalent JSON value tree before
/// compilation; schema documents use only the JSON-compatible subset.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSchemaLoader;

impl SchemaLoader for FsSchemaLoader {
    fn load(&self, path: &Path) -> Result<Value, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaLoadError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "json" => serde_json::from_str(&content).map_err(|e| SchemaLoadError::Parse {
                path: path.to_path_buf(),
                reason: format!("invalid JSON: {e}"),
            }),
            "yaml" | "yml" => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(&content).map_err(|e| SchemaLoadError::Parse {
                        path: path.to_path_buf(),
                        reason: format!("invalid YAML: {e}"),
                    })?;
                yaml_to_json_value(&yaml).map_err(|reason| SchemaLoadError::Parse {
                    path: path.to_path_buf(),
                    reason,
                })
            }
            _ => Err(SchemaLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// In-memory loader serving schemas from a fixed map.
///
/// Lets hosts embed schema documents in the binary instead of shipping
/// them on disk; also the loader of choice in tests.
#[derive(Debug, Default)]
pub struct StaticSchemaLoader {
    schemas: HashMap<PathBuf, Value>,
}

impl StaticSchemaLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema document under `path`.
    pub fn with_schema(mut self, path: impl Into<PathBuf>, schema: Value) -> Self {
        self.schemas.insert(path.into(), schema);
        self
    }
}

impl SchemaLoader for StaticSchemaLoader {
    fn load(&self, path: &Path) -> Result<Value, SchemaLoadError> {
        self.schemas
            .get(path)
            .cloned()
            .ok_or_else(|| SchemaLoadError::NotFound {
                path: path.to_path_buf(),
            })
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// YAML has a richer type system than JSON (tags, non-string keys); schema
/// documents use only the JSON-compatible subset, so anything outside it
/// is an error.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
