//! # Validation Engine
//!
//! The capability the registry compiles schemas through and the pipeline
//! step runs request bodies through: `validate(body, options)` returns the
//! possibly-normalized value or a structured diagnostic. The traits keep
//! the registry independent of any particular schema language; the default
//! implementation is JSON Schema via the `jsonschema` crate.
//!
//! ## Normalization
//!
//! When the options ask for it, the default engine normalizes the body
//! before validating: `default` keywords fill missing object properties
//! and undeclared properties are stripped. The walk follows `properties`
//! and `items` subschemas only; combinators (`allOf`, `oneOf`, ...) are
//! validated but not normalized through.
//!
//! The merged options context is not consumed here (JSON Schema has no
//! evaluation context) but it is part of the [`CompiledSchema`] contract
//! so context-aware engines receive the merged map.

use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::ValidationOptions;

/// Compiles raw schema documents into runnable schemas.
pub trait ValidationEngine: Send + Sync {
    /// Compile `schema`, verifying it is well-formed.
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, SchemaCompileError>;
}

/// A schema compiled and ready to run against request bodies.
pub trait CompiledSchema: Send + Sync {
    /// Validate `body`, returning the (possibly normalized) value to write
    /// or the diagnostic describing why the body was rejected.
    fn validate(&self, body: &Value, options: &ValidationOptions)
        -> Result<Value, ValidationFailure>;
}

/// The schema document itself does not compile.
#[derive(Debug, Clone, Error)]
#[error("schema does not compile: {reason}")]
pub struct SchemaCompileError {
    /// Reason reported by the engine.
    pub reason: String,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the body.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Diagnostic for a body that failed schema validation.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Wrap a non-empty list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The individual violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Default engine: JSON Schema validation backed by the `jsonschema` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaEngine;

impl ValidationEngine for JsonSchemaEngine {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, SchemaCompileError> {
        let validator = jsonschema::validator_for(schema).map_err(|e| SchemaCompileError {
            reason: e.to_string(),
        })?;
        Ok(Arc::new(JsonSchema {
            validator,
            schema: schema.clone(),
        }))
    }
}

/// A compiled JSON Schema: the `jsonschema` validator plus the raw
/// document, kept for the normalization walk.
struct JsonSchema {
    validator: Validator,
    schema: Value,
}

impl CompiledSchema for JsonSchema {
    fn validate(
        &self,
        body: &Value,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationFailure> {
        let mut value = body.clone();
        if options.strip_unknown {
            strip_unknown(&mut value, &self.schema);
        }
        if options.apply_defaults {
            apply_defaults(&mut value, &self.schema);
        }

        let violations: Vec<Violation> = self
            .validator
            .iter_errors(&value)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(value)
        } else {
            Err(ValidationFailure::new(violations))
        }
    }
}

/// Fill missing object properties from `default` keywords, recursing
/// through `properties` and `items` subschemas.
fn apply_defaults(value: &mut Value, schema: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                for (key, prop_schema) in props {
                    if let Some(child) = map.get_mut(key) {
                        apply_defaults(child, prop_schema);
                    } else if let Some(default) = prop_schema.get("default") {
                        map.insert(key.clone(), default.clone());
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for item in items {
                    apply_defaults(item, item_schema);
                }
            }
        }
        _ => {}
    }
}

/// Drop object properties the schema does not declare. Objects whose
/// subschema declares no `properties` are left alone.
fn strip_unknown(value: &mut Value, schema: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                map.retain(|key, _| props.contains_key(key));
                for (key, child) in map.iter_mut() {
                    if let Some(prop_schema) = props.get(key) {
                        strip_unknown(child, prop_schema);
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for item in items {
                    strip_unknown(item, item_schema);
                }
            }
        }
        _ => {}
    }
}
