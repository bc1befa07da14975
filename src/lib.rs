//! # record-gateway
//!
//! A thin CRUD gateway over a key-value document store.
//!
//! The gateway turns plain field→value maps into the store's parameterized
//! expression syntax, stamps optional created/updated timestamps, and hands
//! each request to a [`StoreClient`]. Results and errors come back exactly as
//! the client returned them.
//!
//! ## Features
//!
//! - **Expression Generation**: `{name: "Alice", age: 30}` becomes
//!   `#0 = :val0 AND #1 = :val1` with separate name and value placeholder maps
//! - **Five Operations**: scan-with-filter, get, insert, update and delete by key
//! - **Automatic Timestamps**: Configurable created/updated fields in epoch milliseconds
//! - **Pluggable Stores**: An in-memory store for development and tests, and a
//!   DynamoDB client behind the `dynamodb` feature
//! - **Verbose Logging**: Each request can be logged through `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use record_gateway::{GatewayConfig, KeySchema, MemoryStore, RecordGateway};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new().with_table("users", KeySchema::partition("id"))?;
//!     let gateway = RecordGateway::new(
//!         store,
//!         GatewayConfig::builder().timestamps(true).build(),
//!     );
//!
//!     // Insert an item; `createdAt` is stamped onto it
//!     let mut user = json!({ "id": "u1", "name": "Alice", "role": "admin" })
//!         .as_object()
//!         .cloned()
//!         .unwrap_or_default();
//!     gateway.insert("users", &mut user).await?;
//!     assert!(user.contains_key("createdAt"));
//!
//!     // Scan with an equality filter
//!     let filter = json!({ "role": "admin" }).as_object().cloned().unwrap_or_default();
//!     let admins = gateway.get_where("users", &filter).await?;
//!     assert_eq!(admins.count, 1);
//!
//!     // Update by key; the new values of updated attributes are returned
//!     let key = json!({ "id": "u1" }).as_object().cloned().unwrap_or_default();
//!     let mut changes = json!({ "role": "owner" }).as_object().cloned().unwrap_or_default();
//!     let updated = gateway.update_by_key("users", &key, &mut changes).await?;
//!     assert!(updated.attributes.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use record_gateway::GatewayConfig;
//!
//! let config = GatewayConfig::builder()
//!     .region("eu-west-1")        // Store region
//!     .verbose(true)              // Log every request
//!     .timestamps(true)           // Stamp created/updated fields
//!     .created_field("createdAt") // Default
//!     .updated_field("updatedAt") // Default
//!     .build();
//! ```

pub mod client;
pub mod config;
#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod error;
pub mod expression;
pub mod gateway;
pub mod memory;
pub mod shared;
pub mod types;

// Re-export main types for convenience
pub use client::StoreClient;
pub use config::{GatewayConfig, GatewayConfigBuilder, Timestamps};
#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
pub use error::{GatewayError, Result};
pub use expression::{Expression, build_expression, sanitize_name};
pub use gateway::RecordGateway;
pub use memory::{KeySchema, MemoryStore};
pub use types::{
    DeleteOutput, DeleteParams, GetOutput, GetParams, Item, PutOutput, PutParams, ReturnValues,
    ScanOutput, ScanParams, UpdateOutput, UpdateParams,
};
