//! # Error Types — Per-Request and Initialization Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Initialization failures are fatal: a single unloadable schema aborts
//!   plugin startup with no partial or degraded mode.
//! - Per-request failures are recoverable and classified before they reach
//!   the caller: request-input problems vs internal faults.
//! - Every surfaced message is prefixed with the plugin's declared name;
//!   the prefix is applied at classification time by
//!   [`PluginContext`](crate::context::PluginContext).

use thiserror::Error;

/// Fatal plugin-initialization failure.
///
/// Produced when the schema registry cannot be built. The message names the
/// offending collection, the resolved schema path, and the underlying cause.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConfigurationError(pub String);

/// Classified per-request failure surfaced through the validation step's
/// completion channel.
///
/// Exactly one of success or one of these reaches the caller per request;
/// no failure path is swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The request body failed schema validation. The caller's input is at
    /// fault; the request is passed back untouched alongside the error.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected failure during context resolution or validation
    /// execution that is not a validation diagnostic.
    #[error("{0}")]
    Internal(String),
}

impl PipelineError {
    /// The diagnostic message, regardless of classification.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::Internal(message) => message,
        }
    }

    /// True for the request-input classification.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}
