//! RecordGateway - Main entry point for CRUD access to a document store
//!
//! Each operation assembles one parameter object, optionally logs it, and
//! hands it to the store client. Results and errors come back unmodified.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::StoreClient;
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::expression::{build_filter, build_update};
use crate::types::{
    DeleteOutput, DeleteParams, GetOutput, GetParams, Item, PutOutput, PutParams, ScanOutput,
    ScanParams, UpdateOutput, UpdateParams,
};

/// CRUD gateway over a store client
///
/// Holds the client and a read-only configuration; it keeps no per-call
/// state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct RecordGateway {
    /// Store client
    client: Arc<dyn StoreClient>,
    /// Gateway configuration
    config: GatewayConfig,
}

impl std::fmt::Debug for RecordGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecordGateway {
    /// Create a gateway over a store client
    pub fn new(client: impl StoreClient + 'static, config: GatewayConfig) -> Self {
        Self::from_arc(Arc::new(client), config)
    }

    /// Create a gateway over a shared store client
    pub fn from_arc(client: Arc<dyn StoreClient>, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    /// Create a gateway backed by DynamoDB
    ///
    /// The configured region and endpoint override are applied to the client.
    #[cfg(feature = "dynamodb")]
    pub async fn connect(config: GatewayConfig) -> Self {
        let client = crate::dynamodb::DynamoDbStore::connect(&config).await;
        Self::new(client, config)
    }

    /// Get a reference to the store client
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Scan `table` for items whose fields equal every entry of `filter`
    ///
    /// An empty `filter` is forwarded as an empty filter expression; stores
    /// typically reject it.
    pub async fn get_where(&self, table: &str, filter: &Item) -> Result<ScanOutput> {
        let params = ScanParams::new(table, build_filter(filter));

        self.log("get_where", &params);
        self.client.scan(params).await
    }

    /// Write `item` to `table`
    ///
    /// When timestamps are enabled the created field is set to the current
    /// epoch milliseconds on `item` itself before the write, so the caller
    /// sees the stamped value afterwards.
    pub async fn insert(&self, table: &str, item: &mut Item) -> Result<PutOutput> {
        if self.config.timestamps.enabled {
            item.insert(
                self.config.timestamps.created_field.clone(),
                Value::from(now_millis()),
            );
        }

        let params = PutParams::new(table, item.clone());

        self.log("insert", &params);
        self.client.put(params).await
    }

    /// Point lookup of the item at `key`
    pub async fn get_by_key(&self, table: &str, key: &Item) -> Result<GetOutput> {
        let params = GetParams::new(table, key.clone());

        self.log("get_by_key", &params);
        self.client.get(params).await
    }

    /// Set every field of `data` on the item at `key`
    ///
    /// When timestamps are enabled the updated field is appended to `data`
    /// itself before the expression is built, so it is always part of the
    /// update. The store is asked for the new values of the updated
    /// attributes.
    pub async fn update_by_key(
        &self,
        table: &str,
        key: &Item,
        data: &mut Item,
    ) -> Result<UpdateOutput> {
        if self.config.timestamps.enabled {
            data.insert(
                self.config.timestamps.updated_field.clone(),
                Value::from(now_millis()),
            );
        }

        let params = UpdateParams::new(table, key.clone(), build_update(data));

        self.log("update_by_key", &params);
        self.client.update(params).await
    }

    /// Delete the item at `key`
    pub async fn delete_by_key(&self, table: &str, key: &Item) -> Result<DeleteOutput> {
        let params = DeleteParams::new(table, key.clone());

        self.log("delete_by_key", &params);
        self.client.delete(params).await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn log<P: Serialize>(&self, operation: &str, params: &P) {
        if !self.config.verbose {
            return;
        }

        match serde_json::to_string(params) {
            Ok(params) => tracing::info!(target: "record_gateway", operation, %params, "request"),
            Err(e) => tracing::info!(target: "record_gateway", operation, error = %e, "request"),
        }
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
