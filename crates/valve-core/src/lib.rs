//! # valve-core — Foundational Types for the Valve Pipeline
//!
//! Leaf crate of the valve workspace. Defines the request value the host
//! pipeline hands to the validation step, the classified error taxonomy
//! surfaced back through the completion channel, and the plugin context
//! that carries the host's error-classification capability.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `valve-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod error;
pub mod request;

// Re-export primary types for ergonomic imports.
pub use context::{ContextProvider, PluginContext, RequestContext};
pub use error::{ConfigurationError, PipelineError};
pub use request::{RequestData, WriteRequest};
