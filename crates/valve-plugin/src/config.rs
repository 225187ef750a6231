//! # Plugin Configuration
//!
//! The static configuration handed to the plugin at initialization.
//! Parsed from the host's configuration file (YAML or JSON) by whatever
//! bootstrapping the host performs; this crate only defines the shape.

use serde::{Deserialize, Serialize};
use valve_schema::SchemaConfig;

/// Static plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Collection → schema descriptor mapping.
    #[serde(default)]
    pub schemas: SchemaConfig,
}
