//! Error types for gateway and store client operations

use thiserror::Error;

/// Errors surfaced by a store client and passed through the gateway unchanged
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Throttled: {0}")]
    Throttled(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "dynamodb")]
    #[error("Attribute conversion error: {0}")]
    Conversion(#[from] serde_dynamo::Error),
}

impl GatewayError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resource_not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
