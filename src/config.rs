//! Configuration for RecordGateway
//!
//! Provides a builder pattern for configuring the gateway. The same settings
//! can be deserialized from a JSON options object.

use serde::{Deserialize, Serialize};

/// Default name of the field stamped on insert
pub const DEFAULT_CREATED_FIELD: &str = "createdAt";

/// Default name of the field stamped on update
pub const DEFAULT_UPDATED_FIELD: &str = "updatedAt";

fn default_created_field() -> String {
    DEFAULT_CREATED_FIELD.to_string()
}

fn default_updated_field() -> String {
    DEFAULT_UPDATED_FIELD.to_string()
}

/// Configuration for automatic timestamp fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    /// Whether inserts and updates are stamped with epoch milliseconds
    #[serde(default, rename = "timestamps")]
    pub enabled: bool,
    /// Field written on insert (default: "createdAt")
    #[serde(default = "default_created_field")]
    pub created_field: String,
    /// Field written on update (default: "updatedAt")
    #[serde(default = "default_updated_field")]
    pub updated_field: String,
}

impl Default for Timestamps {
    fn default() -> Self {
        Self {
            enabled: false,
            created_field: default_created_field(),
            updated_field: default_updated_field(),
        }
    }
}

/// Configuration for the record gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Region applied to the store client's endpoint
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override, e.g. a local emulator
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Log each operation and its request parameters
    #[serde(default)]
    pub verbose: bool,
    /// Automatic timestamp configuration
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl GatewayConfig {
    /// Create a new configuration builder
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Parse configuration from a JSON options object
    pub fn from_json(options: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(options)?)
    }
}

/// Builder for GatewayConfig
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    region: Option<String>,
    endpoint_url: Option<String>,
    verbose: bool,
    timestamps: Timestamps,
}

impl GatewayConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set an endpoint URL override
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Enable or disable verbose operation logging (default: false)
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Enable or disable automatic timestamps (default: false)
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps.enabled = enabled;
        self
    }

    /// Set the field stamped on insert (default: "createdAt")
    pub fn created_field(mut self, name: impl Into<String>) -> Self {
        self.timestamps.created_field = name.into();
        self
    }

    /// Set the field stamped on update (default: "updatedAt")
    pub fn updated_field(mut self, name: impl Into<String>) -> Self {
        self.timestamps.updated_field = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatewayConfig {
        GatewayConfig {
            region: self.region,
            endpoint_url: self.endpoint_url,
            verbose: self.verbose,
            timestamps: self.timestamps,
        }
    }
}
