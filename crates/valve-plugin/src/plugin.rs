//! # Schema Validation Plugin
//!
//! Per-request flow: registry lookup → pass-through for unregistered or
//! deactivated collections → optional async context resolution → shallow
//! option merge → schema run → in-place body replacement or classified
//! error. State lives on the request and the call stack; one plugin
//! instance serves unbounded concurrent validations against the read-only
//! registry.

use valve_core::{ConfigurationError, PipelineError, PluginContext, RequestContext, WriteRequest};
use valve_schema::{
    FsSchemaLoader, JsonSchemaEngine, SchemaLoader, SchemaRegistry, ValidationEngine,
};

use crate::config::PluginConfig;
use crate::pipes;

/// The plugin's declared name, prefixed onto every surfaced error message.
pub const PLUGIN_NAME: &str = env!("CARGO_PKG_NAME");

/// Write-interception schema validator.
pub struct SchemaValidator {
    context: PluginContext,
    registry: SchemaRegistry,
}

impl SchemaValidator {
    /// Initialize the plugin with the default filesystem loader and JSON
    /// Schema engine.
    ///
    /// Relative schema paths in `config.schemas` resolve against the
    /// process current working directory at build time, not against any
    /// plugin-internal directory: schema locations are declared relative
    /// to where the host process runs.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ConfigurationError`] if any schema fails to load
    /// or compile. There is no partial or degraded mode.
    pub fn init(config: PluginConfig, context: PluginContext) -> Result<Self, ConfigurationError> {
        Self::init_with(config, context, &FsSchemaLoader, &JsonSchemaEngine)
    }

    /// Initialize with injected loader and engine capabilities.
    pub fn init_with(
        config: PluginConfig,
        context: PluginContext,
        loader: &dyn SchemaLoader,
        engine: &dyn ValidationEngine,
    ) -> Result<Self, ConfigurationError> {
        let workdir = std::env::current_dir().map_err(|e| {
            ConfigurationError(format!(
                "{}: cannot determine working directory: {e}",
                context.plugin_name()
            ))
        })?;

        let registry = SchemaRegistry::build_with(&config.schemas, &workdir, loader, engine)
            .map_err(|e| ConfigurationError(format!("{}: {e}", context.plugin_name())))?;

        Ok(Self::with_registry(registry, context))
    }

    /// Wrap a prebuilt registry.
    pub fn with_registry(registry: SchemaRegistry, context: PluginContext) -> Self {
        Self { context, registry }
    }

    /// The host pipeline stages this plugin registers its handler on.
    pub fn pipes(&self) -> &'static [(&'static str, &'static str)] {
        pipes::PIPES
    }

    /// The registry backing this plugin.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The per-request interception step.
    ///
    /// Exactly one outcome per call. `Ok(())` passes the request through,
    /// with `data.body` replaced by the schema's normalized output when an
    /// active schema ran; `Err` aborts the request with a classified
    /// error and leaves the body as the caller supplied it. No retries:
    /// a failed request is the caller's to retry as a whole.
    pub async fn validate(&self, request: &mut WriteRequest) -> Result<(), PipelineError> {
        let Some(active) = self.registry.active(&request.collection) else {
            tracing::debug!(collection = %request.collection, "no active schema, passing through");
            return Ok(());
        };

        let request_context = match &active.descriptor.context_provider {
            Some(provider) => provider
                .context(request, &self.context)
                .await
                .map_err(|e| self.context.classify(e))?,
            None => RequestContext::new(),
        };

        let options = active.descriptor.options.merged_with(&request_context);

        match active.schema.validate(&request.data.body, &options) {
            Ok(value) => {
                tracing::debug!(collection = %request.collection, "body validated");
                request.data.body = value;
                Ok(())
            }
            Err(failure) => {
                tracing::warn!(
                    collection = %request.collection,
                    violations = failure.violations().len(),
                    "body rejected by schema"
                );
                Err(self.context.bad_request(failure))
            }
        }
    }
}
