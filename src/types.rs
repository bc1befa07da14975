//! Request and response types exchanged with a store client
//!
//! Parameter objects serialize with the store's PascalCase field names so the
//! verbose log shows exactly what is sent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// A store item, key, or field→value map, in insertion order
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Which attributes an update returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValues {
    /// Nothing is returned
    #[default]
    None,
    /// All attributes as they were before the update
    AllOld,
    /// Only the updated attributes, as they were before the update
    UpdatedOld,
    /// All attributes as they are after the update
    AllNew,
    /// Only the updated attributes, as they are after the update
    UpdatedNew,
}

impl ReturnValues {
    /// Wire name of the option
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnValues::None => "NONE",
            ReturnValues::AllOld => "ALL_OLD",
            ReturnValues::UpdatedOld => "UPDATED_OLD",
            ReturnValues::AllNew => "ALL_NEW",
            ReturnValues::UpdatedNew => "UPDATED_NEW",
        }
    }
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Parameters for a filtered full-table scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanParams {
    pub table_name: String,
    pub filter_expression: String,
    pub expression_attribute_values: Item,
    pub expression_attribute_names: IndexMap<String, String>,
}

impl ScanParams {
    /// Scan `table` constrained by a filter expression
    pub fn new(table: impl Into<String>, filter: Expression) -> Self {
        Self {
            table_name: table.into(),
            filter_expression: filter.predicate,
            expression_attribute_values: filter.values,
            expression_attribute_names: filter.names,
        }
    }
}

/// Parameters for a point lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParams {
    pub table_name: String,
    pub key: Item,
}

impl GetParams {
    pub fn new(table: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table.into(),
            key,
        }
    }
}

/// Parameters for writing a whole item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutParams {
    pub table_name: String,
    pub item: Item,
}

impl PutParams {
    pub fn new(table: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table.into(),
            item,
        }
    }
}

/// Parameters for updating attributes of the item at `key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateParams {
    pub table_name: String,
    pub key: Item,
    pub update_expression: String,
    pub expression_attribute_values: Item,
    pub expression_attribute_names: IndexMap<String, String>,
    pub return_values: ReturnValues,
}

impl UpdateParams {
    /// Update the item at `key` with a `SET` expression, returning the new
    /// values of the updated attributes
    pub fn new(table: impl Into<String>, key: Item, update: Expression) -> Self {
        Self {
            table_name: table.into(),
            key,
            update_expression: update.predicate,
            expression_attribute_values: update.values,
            expression_attribute_names: update.names,
            return_values: ReturnValues::UpdatedNew,
        }
    }
}

/// Parameters for deleting the item at `key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteParams {
    pub table_name: String,
    pub key: Item,
}

impl DeleteParams {
    pub fn new(table: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table.into(),
            key,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Items matched by a scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    pub items: Vec<Item>,
    /// Number of items returned after filtering
    pub count: usize,
    /// Number of items evaluated before filtering
    pub scanned_count: usize,
}

/// Result of a point lookup; `item` is `None` when nothing matches the key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetOutput {
    pub item: Option<Item>,
}

/// Acknowledgment of a put
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutOutput {
    pub attributes: Option<Item>,
}

/// Attributes returned by an update, per its `ReturnValues`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateOutput {
    pub attributes: Option<Item>,
}

/// Acknowledgment of a delete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteOutput {
    pub attributes: Option<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{build_filter, build_update};
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    // =========================================================================
    // ReturnValues Tests
    // =========================================================================

    #[test]
    fn test_return_values_default() {
        assert_eq!(ReturnValues::default(), ReturnValues::None);
    }

    #[test]
    fn test_return_values_wire_names() {
        assert_eq!(
            serde_json::to_value(ReturnValues::UpdatedNew).unwrap(),
            json!("UPDATED_NEW")
        );
        assert_eq!(serde_json::to_value(ReturnValues::AllOld).unwrap(), json!("ALL_OLD"));
        assert_eq!(ReturnValues::UpdatedNew.as_str(), "UPDATED_NEW");
        assert_eq!(ReturnValues::None.as_str(), "NONE");
    }

    // =========================================================================
    // Parameter Serialization Tests
    // =========================================================================

    #[test]
    fn test_scan_params_from_expression() {
        let params = ScanParams::new("users", build_filter(&item(json!({ "name": "Alice" }))));

        assert_eq!(params.table_name, "users");
        assert_eq!(params.filter_expression, "#0 = :val0");
        assert_eq!(params.expression_attribute_names["#0"], "name");
        assert_eq!(params.expression_attribute_values[":val0"], json!("Alice"));
    }

    #[test]
    fn test_scan_params_serialize_pascal_case() {
        let params = ScanParams::new("users", build_filter(&item(json!({ "name": "Alice" }))));
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["TableName"], json!("users"));
        assert_eq!(value["FilterExpression"], json!("#0 = :val0"));
        assert_eq!(value["ExpressionAttributeNames"], json!({ "#0": "name" }));
        assert_eq!(value["ExpressionAttributeValues"], json!({ ":val0": "Alice" }));
    }

    #[test]
    fn test_update_params_request_updated_new() {
        let params = UpdateParams::new(
            "users",
            item(json!({ "id": "u1" })),
            build_update(&item(json!({ "status": "done" }))),
        );
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(params.return_values, ReturnValues::UpdatedNew);
        assert_eq!(value["ReturnValues"], json!("UPDATED_NEW"));
        assert_eq!(value["UpdateExpression"], json!("SET #0 = :val0"));
        assert_eq!(value["Key"], json!({ "id": "u1" }));
    }

    #[test]
    fn test_key_params_serialize() {
        let key = item(json!({ "id": "u1", "sk": 2 }));

        let get = serde_json::to_value(GetParams::new("users", key.clone())).unwrap();
        let delete = serde_json::to_value(DeleteParams::new("users", key)).unwrap();

        assert_eq!(get, json!({ "TableName": "users", "Key": { "id": "u1", "sk": 2 } }));
        assert_eq!(delete, get);
    }

    #[test]
    fn test_put_params_serialize() {
        let params = PutParams::new("users", item(json!({ "id": "u1", "age": 3 })));
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["Item"], json!({ "id": "u1", "age": 3 }));
    }

    // =========================================================================
    // Output Tests
    // =========================================================================

    #[test]
    fn test_outputs_default_empty() {
        assert!(ScanOutput::default().items.is_empty());
        assert!(GetOutput::default().item.is_none());
        assert!(UpdateOutput::default().attributes.is_none());
    }

    #[test]
    fn test_get_output_deserialize() {
        let output: GetOutput =
            serde_json::from_value(json!({ "Item": { "id": "u1" } })).unwrap();
        assert_eq!(output.item.unwrap()["id"], json!("u1"));
    }
}
