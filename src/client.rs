//! The store client seam
//!
//! A `StoreClient` is the opaque service the gateway talks to. Each method
//! takes one fully assembled parameter object and returns the store's raw
//! response or a store-level error.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    DeleteOutput, DeleteParams, GetOutput, GetParams, PutOutput, PutParams, ScanOutput,
    ScanParams, UpdateOutput, UpdateParams,
};

/// Primitive operations of a key-value document store
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Full-table read filtered by `params.filter_expression`
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput>;

    /// Point lookup by primary key
    async fn get(&self, params: GetParams) -> Result<GetOutput>;

    /// Write a whole item, replacing any item with the same key
    async fn put(&self, params: PutParams) -> Result<PutOutput>;

    /// Apply an update expression to the item at `params.key`
    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput>;

    /// Remove the item at `params.key`
    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput>;
}
