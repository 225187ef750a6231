//! End-to-end tests for the per-request validation step: pass-through,
//! acceptance with normalization, rejection, context resolution, and
//! fail-fast initialization.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use valve_core::{ContextProvider, PipelineError, PluginContext, RequestContext, WriteRequest};
use valve_plugin::{PluginConfig, SchemaValidator, PLUGIN_NAME};
use valve_schema::{
    CompiledSchema, SchemaCompileError, SchemaConfig, SchemaDescriptor, SchemaRegistry,
    StaticSchemaLoader, ValidationEngine, ValidationFailure, ValidationOptions,
};

fn user_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "age"],
        "properties": {
            "name": { "type": "string" },
            "age": { "type": "number", "minimum": 0 },
            "role": { "type": "string", "default": "member" }
        }
    })
}

/// Write the user schema into `dir` and return a plugin configured with it
/// for the `users` collection. Absolute descriptor paths keep the tests
/// independent of the process working directory.
fn user_plugin(dir: &Path) -> SchemaValidator {
    let schema_path = dir.join("user.json");
    std::fs::write(&schema_path, user_schema().to_string()).unwrap();

    let mut config = PluginConfig::default();
    config.schemas.insert(
        "users".into(),
        SchemaDescriptor::new(schema_path.display().to_string()),
    );
    SchemaValidator::init(config, PluginContext::new(PLUGIN_NAME)).unwrap()
}

// ── Pass-through ────────────────────────────────────────────────────────

#[tokio::test]
async fn unregistered_collection_passes_through_unchanged() {
    let plugin = SchemaValidator::init(PluginConfig::default(), PluginContext::new(PLUGIN_NAME))
        .unwrap();

    let mut request =
        WriteRequest::new("products", json!({"anything": ["goes", -1]})).with_request_id("req-1");
    let original = request.clone();

    plugin.validate(&mut request).await.unwrap();
    assert_eq!(request, original);
}

#[tokio::test]
async fn deactivated_schema_passes_through_without_loading() {
    let mut config = PluginConfig::default();
    config.schemas.insert(
        "archive".into(),
        SchemaDescriptor::new("/does/not/exist.json").deactivated(),
    );
    // Initialization succeeds: deactivated paths are never loaded.
    let plugin = SchemaValidator::init(config, PluginContext::new(PLUGIN_NAME)).unwrap();

    let mut request = WriteRequest::new("archive", json!({"free": "form"}));
    let original = request.clone();
    plugin.validate(&mut request).await.unwrap();
    assert_eq!(request, original);
}

// ── Acceptance ──────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_body_is_accepted_and_normalized() {
    let tmp = tempfile::tempdir().unwrap();
    let plugin = user_plugin(tmp.path());

    let mut request =
        WriteRequest::new("users", json!({"name": "Ann", "age": 5})).with_request_id("req-7");
    plugin.validate(&mut request).await.unwrap();

    assert_eq!(
        request.data.body,
        json!({"name": "Ann", "age": 5, "role": "member"})
    );
    assert_eq!(request.collection, "users");
    assert_eq!(request.request_id.as_deref(), Some("req-7"));
}

#[tokio::test]
async fn revalidating_normalized_output_is_stable() {
    let tmp = tempfile::tempdir().unwrap();
    let plugin = user_plugin(tmp.path());

    let mut request = WriteRequest::new("users", json!({"name": "Ann", "age": 5}));
    plugin.validate(&mut request).await.unwrap();
    let normalized = request.data.body.clone();

    plugin.validate(&mut request).await.unwrap();
    assert_eq!(request.data.body, normalized);
}

// ── Rejection ───────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_body_is_rejected_with_prefixed_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let plugin = user_plugin(tmp.path());

    let mut request = WriteRequest::new("users", json!({"name": "Ann", "age": -1}));
    let original = request.clone();

    let err = plugin.validate(&mut request).await.unwrap_err();
    match &err {
        PipelineError::BadRequest(message) => {
            assert!(message.starts_with(&format!("{PLUGIN_NAME}: ")));
            assert!(message.contains("/age"));
        }
        other => panic!("expected BadRequest, got: {other}"),
    }
    // Rejection never mutates the request.
    assert_eq!(request, original);
}

// ── Initialization ──────────────────────────────────────────────────────

#[tokio::test]
async fn missing_schema_aborts_initialization() {
    let mut config = PluginConfig::default();
    config.schemas.insert(
        "users".into(),
        SchemaDescriptor::new("/nonexistent/user.json"),
    );

    let err = match SchemaValidator::init(config, PluginContext::new(PLUGIN_NAME)) {
        Ok(_) => panic!("expected plugin initialization to fail"),
        Err(err) => err,
    };
    let message = err.to_string();
    assert!(message.starts_with(&format!("{PLUGIN_NAME}: ")));
    assert!(message.contains("'users'"));
    assert!(message.contains("/nonexistent/user.json"));
}

// ── Context resolution ──────────────────────────────────────────────────

/// Engine that records the options each validation ran with.
struct CapturingEngine {
    captured: Arc<Mutex<Option<ValidationOptions>>>,
}

struct CapturingSchema {
    captured: Arc<Mutex<Option<ValidationOptions>>>,
}

impl ValidationEngine for CapturingEngine {
    fn compile(&self, _schema: &Value) -> Result<Arc<dyn CompiledSchema>, SchemaCompileError> {
        Ok(Arc::new(CapturingSchema {
            captured: Arc::clone(&self.captured),
        }))
    }
}

impl CompiledSchema for CapturingSchema {
    fn validate(
        &self,
        body: &Value,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationFailure> {
        *self.captured.lock().unwrap() = Some(options.clone());
        Ok(body.clone())
    }
}

struct SessionProvider;

#[async_trait]
impl ContextProvider for SessionProvider {
    async fn context(
        &self,
        _request: &WriteRequest,
        _plugin: &PluginContext,
    ) -> anyhow::Result<RequestContext> {
        let mut context = RequestContext::new();
        context.insert("role".into(), json!("admin"));
        Ok(context)
    }
}

struct FailingProvider;

#[async_trait]
impl ContextProvider for FailingProvider {
    async fn context(
        &self,
        _request: &WriteRequest,
        _plugin: &PluginContext,
    ) -> anyhow::Result<RequestContext> {
        anyhow::bail!("session store unreachable")
    }
}

struct ClassifiedProvider;

#[async_trait]
impl ContextProvider for ClassifiedProvider {
    async fn context(
        &self,
        _request: &WriteRequest,
        plugin: &PluginContext,
    ) -> anyhow::Result<RequestContext> {
        Err(anyhow::Error::new(plugin.bad_request("no active session")))
    }
}

fn plugin_with_provider(
    provider: Arc<dyn ContextProvider>,
    engine: &dyn ValidationEngine,
) -> SchemaValidator {
    let mut options = ValidationOptions::default();
    options.strip_unknown = true;
    options.context.insert("role".into(), json!("guest"));
    options.context.insert("tenant".into(), json!("acme"));

    let mut config = SchemaConfig::new();
    config.insert(
        "users".into(),
        SchemaDescriptor::new("user.json")
            .with_options(options)
            .with_context_provider(provider),
    );

    let loader = StaticSchemaLoader::new().with_schema("/schemas/user.json", user_schema());
    let registry =
        SchemaRegistry::build_with(&config, Path::new("/schemas"), &loader, engine).unwrap();
    SchemaValidator::with_registry(registry, PluginContext::new(PLUGIN_NAME))
}

#[tokio::test]
async fn provider_context_overrides_descriptor_context() {
    let captured = Arc::new(Mutex::new(None));
    let engine = CapturingEngine {
        captured: Arc::clone(&captured),
    };
    let plugin = plugin_with_provider(Arc::new(SessionProvider), &engine);

    let mut request = WriteRequest::new("users", json!({"name": "Ann", "age": 5}));
    plugin.validate(&mut request).await.unwrap();

    let options = captured.lock().unwrap().clone().expect("schema never ran");
    // Request-derived keys win; descriptor-only keys survive.
    assert_eq!(options.context["role"], "admin");
    assert_eq!(options.context["tenant"], "acme");
    // Non-context option fields come from the descriptor unchanged.
    assert!(options.strip_unknown);
}

#[tokio::test]
async fn provider_failure_is_classified_internal() {
    let engine = CapturingEngine {
        captured: Arc::new(Mutex::new(None)),
    };
    let plugin = plugin_with_provider(Arc::new(FailingProvider), &engine);

    let mut request = WriteRequest::new("users", json!({"name": "Ann", "age": 5}));
    let original = request.clone();

    let err = plugin.validate(&mut request).await.unwrap_err();
    assert_eq!(
        err,
        PipelineError::Internal(format!("{PLUGIN_NAME}: session store unreachable"))
    );
    assert_eq!(request, original);
}

#[tokio::test]
async fn already_classified_provider_error_passes_through_unwrapped() {
    let engine = CapturingEngine {
        captured: Arc::new(Mutex::new(None)),
    };
    let plugin = plugin_with_provider(Arc::new(ClassifiedProvider), &engine);

    let mut request = WriteRequest::new("users", json!({"name": "Ann", "age": 5}));
    let err = plugin.validate(&mut request).await.unwrap_err();

    // Classified at its origin; not re-wrapped, not double-prefixed.
    assert_eq!(
        err,
        PipelineError::BadRequest(format!("{PLUGIN_NAME}: no active session"))
    );
}

// ── Pipe registration ───────────────────────────────────────────────────

#[tokio::test]
async fn pipes_expose_the_write_stages() {
    let plugin = SchemaValidator::init(PluginConfig::default(), PluginContext::new(PLUGIN_NAME))
        .unwrap();
    let stages: Vec<&str> = plugin.pipes().iter().map(|(stage, _)| *stage).collect();
    assert!(stages.contains(&"document:beforeCreate"));
    assert!(stages.contains(&"document:beforeUpdate"));
}
