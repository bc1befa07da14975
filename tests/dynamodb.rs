//! Integration tests for the DynamoDB store client
//!
//! These tests require a reachable DynamoDB endpoint (a local emulator works)
//! and an existing table with a string partition key named `id`.
//! Set `TEST_DYNAMODB_ENDPOINT` and `TEST_DYNAMODB_TABLE` to run them.
//!
//! Example:
//! ```bash
//! TEST_DYNAMODB_ENDPOINT="http://localhost:4566" TEST_DYNAMODB_TABLE="gateway_test" \
//!     cargo test --features dynamodb --test dynamodb
//! ```

#![cfg(feature = "dynamodb")]

use record_gateway::{GatewayConfig, GatewayError, Item, RecordGateway};
use serde_json::{Value, json};

fn item(value: Value) -> Item {
    value.as_object().cloned().expect("object literal")
}

/// Connect to the endpoint from the environment
async fn create_test_gateway() -> Option<(RecordGateway, String)> {
    let endpoint = std::env::var("TEST_DYNAMODB_ENDPOINT").ok()?;
    let table = std::env::var("TEST_DYNAMODB_TABLE").ok()?;

    let config = GatewayConfig::builder()
        .region("us-east-1")
        .endpoint_url(endpoint)
        .timestamps(true)
        .verbose(true)
        .build();

    Some((RecordGateway::connect(config).await, table))
}

/// Unique id for this test run
fn test_id(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn test_crud_against_dynamodb() {
    let Some((gateway, table)) = create_test_gateway().await else {
        eprintln!("Skipping test: TEST_DYNAMODB_ENDPOINT not set");
        return;
    };

    let id = test_id("crud");
    let key = item(json!({ "id": id }));

    let mut record = item(json!({ "id": id, "name": "Alice", "score": 10 }));
    gateway.insert(&table, &mut record).await.expect("Should insert");
    assert!(record.contains_key("createdAt"));

    let fetched = gateway
        .get_by_key(&table, &key)
        .await
        .expect("Should get")
        .item
        .expect("Item should exist");
    assert_eq!(fetched["name"], json!("Alice"));

    let updated = gateway
        .update_by_key(&table, &key, &mut item(json!({ "score": 11 })))
        .await
        .expect("Should update")
        .attributes
        .expect("Updated attributes returned");
    assert_eq!(updated["score"], json!(11));
    assert!(updated.contains_key("updatedAt"));

    let found = gateway
        .get_where(&table, &item(json!({ "id": id, "score": 11 })))
        .await
        .expect("Should scan");
    assert_eq!(found.count, 1);

    gateway.delete_by_key(&table, &key).await.expect("Should delete");
    let gone = gateway.get_by_key(&table, &key).await.expect("Should get");
    assert!(gone.item.is_none());
}

#[tokio::test]
async fn test_unknown_table_error_passes_through() {
    let Some((gateway, _)) = create_test_gateway().await else {
        eprintln!("Skipping test: TEST_DYNAMODB_ENDPOINT not set");
        return;
    };

    let result = gateway
        .get_by_key("record_gateway_missing_table", &item(json!({ "id": "x" })))
        .await;
    assert!(matches!(result, Err(GatewayError::ResourceNotFound(_))));
}
