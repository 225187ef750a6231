//! # Plugin Context and Request-Context Providers
//!
//! [`PluginContext`] is the capability the host injects at plugin
//! initialization: the plugin's declared name (prefixed onto every surfaced
//! error message) and an arbitrary data bag that per-request
//! [`ContextProvider`]s may read (session data, tenant info, caller
//! identity).
//!
//! ## Classification
//!
//! Failures raised inside the validation step are classified before they
//! reach the caller. Errors that already carry a classification pass
//! through unwrapped; everything else is wrapped into
//! [`PipelineError::Internal`] with the plugin-name prefix. Providers
//! report failures as [`anyhow::Error`] so an already-classified
//! [`PipelineError`] can be recovered by downcast.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::PipelineError;
use crate::request::WriteRequest;

/// Extra validation-context data supplied per request.
///
/// Merged shallowly into the schema's static options context before
/// validation runs; request-derived keys win on conflict.
pub type RequestContext = Map<String, Value>;

/// Host-injected plugin context.
#[derive(Debug, Clone)]
pub struct PluginContext {
    plugin_name: String,
    data: Map<String, Value>,
}

impl PluginContext {
    /// Create a context for a plugin with the given declared name.
    pub fn new(plugin_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            data: Map::new(),
        }
    }

    /// Attach host data made available to context providers.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// The plugin's declared name, used as the error-message prefix.
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    /// Host data available to context providers.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Classify a message as a request-input failure, plugin-prefixed.
    pub fn bad_request(&self, message: impl fmt::Display) -> PipelineError {
        PipelineError::BadRequest(format!("{}: {}", self.plugin_name, message))
    }

    /// Classify a message as an internal failure, plugin-prefixed.
    pub fn internal(&self, message: impl fmt::Display) -> PipelineError {
        PipelineError::Internal(format!("{}: {}", self.plugin_name, message))
    }

    /// Classify an arbitrary failure.
    ///
    /// An error that is already a [`PipelineError`] passes through
    /// unwrapped (it was classified, and prefixed, at its origin).
    /// Anything else becomes [`PipelineError::Internal`].
    pub fn classify(&self, error: anyhow::Error) -> PipelineError {
        match error.downcast::<PipelineError>() {
            Ok(classified) => classified,
            Err(other) => self.internal(other),
        }
    }
}

/// Optional per-request asynchronous enrichment step.
///
/// Invoked with the request and the plugin context before the schema runs;
/// the returned mapping is merged into the schema's validation options.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Produce extra validation context for this request.
    async fn context(
        &self,
        request: &WriteRequest,
        plugin: &PluginContext,
    ) -> anyhow::Result<RequestContext>;
}
