//! # Pipe Registration
//!
//! The mapping of host pipeline stage names to this plugin's handlers.
//! Stage names are host-defined; the plugin only promises that the handler
//! named here is invocable as the per-request validation step.

/// Handler name the host dispatches intercepted requests to.
pub const VALIDATE_HANDLER: &str = "validate";

/// Pipeline stages this plugin intercepts, each routed to the validate
/// handler before the write reaches storage.
pub const PIPES: &[(&str, &str)] = &[
    ("document:beforeCreate", VALIDATE_HANDLER),
    ("document:beforeCreateOrReplace", VALIDATE_HANDLER),
    ("document:beforeReplace", VALIDATE_HANDLER),
    ("document:beforeUpdate", VALIDATE_HANDLER),
];
