//! DynamoDB store client
//!
//! Forwards parameter objects to `aws-sdk-dynamodb`, converting JSON items to
//! and from attribute-value maps with `serde_dynamo`. SDK errors are mapped
//! onto [`GatewayError`] by their error code.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::debug;

use crate::client::StoreClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::types::{
    DeleteOutput, DeleteParams, GetOutput, GetParams, Item, PutOutput, PutParams, ScanOutput,
    ScanParams, UpdateOutput, UpdateParams,
};

type AttributeMap = HashMap<String, AttributeValue>;

/// A `StoreClient` backed by Amazon DynamoDB
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Build a client from the default AWS configuration chain
    ///
    /// `config.region` and `config.endpoint_url` override the values found in
    /// the environment.
    pub async fn connect(config: &GatewayConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(url) = &config.endpoint_url {
            loader = loader.endpoint_url(url);
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "dynamodb client configured");

        Self::from_client(Client::new(&sdk_config))
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn to_attributes(item: Item) -> Result<AttributeMap> {
    Ok(serde_dynamo::to_item::<_, AttributeMap>(item)?)
}

fn from_attributes(attributes: &AttributeMap) -> Result<Item> {
    Ok(serde_dynamo::from_item(attributes.clone())?)
}

fn from_optional(attributes: Option<&AttributeMap>) -> Result<Option<Item>> {
    attributes.map(from_attributes).transpose()
}

fn count(n: i32) -> usize {
    usize::try_from(n).unwrap_or_default()
}

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();

    if matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)) {
        return GatewayError::Connection(message);
    }

    match err.code() {
        Some(
            "ThrottlingException"
            | "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded",
        ) => GatewayError::Throttled(message),
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "MissingAuthenticationTokenException"
            | "InvalidSignatureException"
            | "ExpiredTokenException",
        ) => GatewayError::Unauthorized(message),
        Some("ValidationException" | "SerializationException") => GatewayError::Validation(message),
        Some("ResourceNotFoundException") => GatewayError::ResourceNotFound(message),
        _ => GatewayError::Service(message),
    }
}

#[async_trait]
impl StoreClient for DynamoDbStore {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        let output = self
            .client
            .scan()
            .table_name(params.table_name)
            .filter_expression(params.filter_expression)
            .set_expression_attribute_names(Some(
                params.expression_attribute_names.into_iter().collect(),
            ))
            .set_expression_attribute_values(Some(to_attributes(
                params.expression_attribute_values,
            )?))
            .send()
            .await
            .map_err(map_sdk_error)?;

        let items = output
            .items()
            .iter()
            .map(from_attributes)
            .collect::<Result<Vec<_>>>()?;

        Ok(ScanOutput {
            items,
            count: count(output.count()),
            scanned_count: count(output.scanned_count()),
        })
    }

    async fn get(&self, params: GetParams) -> Result<GetOutput> {
        let output = self
            .client
            .get_item()
            .table_name(params.table_name)
            .set_key(Some(to_attributes(params.key)?))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(GetOutput {
            item: from_optional(output.item())?,
        })
    }

    async fn put(&self, params: PutParams) -> Result<PutOutput> {
        let output = self
            .client
            .put_item()
            .table_name(params.table_name)
            .set_item(Some(to_attributes(params.item)?))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(PutOutput {
            attributes: from_optional(output.attributes())?,
        })
    }

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        let output = self
            .client
            .update_item()
            .table_name(params.table_name)
            .set_key(Some(to_attributes(params.key)?))
            .update_expression(params.update_expression)
            .set_expression_attribute_names(Some(
                params.expression_attribute_names.into_iter().collect(),
            ))
            .set_expression_attribute_values(Some(to_attributes(
                params.expression_attribute_values,
            )?))
            .return_values(ReturnValue::from(params.return_values.as_str()))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(UpdateOutput {
            attributes: from_optional(output.attributes())?,
        })
    }

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        let output = self
            .client
            .delete_item()
            .table_name(params.table_name)
            .set_key(Some(to_attributes(params.key)?))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(DeleteOutput {
            attributes: from_optional(output.attributes())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    // =========================================================================
    // Attribute Conversion Tests
    // =========================================================================

    #[test]
    fn test_to_attributes_scalar_types() {
        let attrs = to_attributes(item(json!({
            "s": "text",
            "n": 42,
            "b": true,
            "z": null
        })))
        .unwrap();

        assert_eq!(attrs["s"], AttributeValue::S("text".to_string()));
        assert_eq!(attrs["n"], AttributeValue::N("42".to_string()));
        assert_eq!(attrs["b"], AttributeValue::Bool(true));
        assert_eq!(attrs["z"], AttributeValue::Null(true));
    }

    #[test]
    fn test_to_attributes_nested() {
        let attrs = to_attributes(item(json!({ "tags": ["a"], "meta": { "k": "v" } }))).unwrap();

        assert_eq!(
            attrs["tags"],
            AttributeValue::L(vec![AttributeValue::S("a".to_string())])
        );
        assert!(matches!(attrs["meta"], AttributeValue::M(_)));
    }

    #[test]
    fn test_attributes_back_to_item() {
        let original = item(json!({ "id": "u1", "age": 30, "active": false }));
        let attrs = to_attributes(original.clone()).unwrap();

        assert_eq!(from_attributes(&attrs).unwrap(), original);
    }

    #[test]
    fn test_from_optional_none() {
        assert!(from_optional(None).unwrap().is_none());
    }

    #[test]
    fn test_count_clamps_negative() {
        assert_eq!(count(-1), 0);
        assert_eq!(count(7), 7);
    }
}
