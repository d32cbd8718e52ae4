use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use super::{Document, DocumentStore, SetOptions, WriteResult};
use crate::error::StoreError;

const PK: &str = "PK";
const SK: &str = "SK";

/// Single-table DynamoDB store. Each document lives under
/// PK = SK = `{COLLECTION}#{key}`.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn partition_key(collection: &str, key: &str) -> String {
    format!("{}#{}", collection.to_uppercase(), key)
}

fn backend_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Backend(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl DocumentStore for DynamoStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let pk = partition_key(collection, key);

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.clone()))
            .key(SK, AttributeValue::S(pk))
            .send()
            .await
            .map_err(backend_error)?;

        result.item().map(from_item).transpose()
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        value: Document,
        options: SetOptions,
    ) -> Result<WriteResult, StoreError> {
        let pk = partition_key(collection, key);

        if !options.merge {
            let mut item: HashMap<String, AttributeValue> = value
                .iter()
                .map(|(field, v)| (field.clone(), to_attribute(v)))
                .collect();
            // Keys always win over same-named body fields
            item.insert(PK.to_string(), AttributeValue::S(pk.clone()));
            item.insert(SK.to_string(), AttributeValue::S(pk));

            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item))
                .send()
                .await
                .map_err(backend_error)?;

            return Ok(WriteResult::confirmed_now());
        }

        let mut builder = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.clone()))
            .key(SK, AttributeValue::S(pk));

        // Without an expression UpdateItem still creates the keyed item
        if let Some(merge) = merge_expression(&value) {
            builder = builder
                .update_expression(merge.expression)
                .set_expression_attribute_names(Some(merge.names))
                .set_expression_attribute_values(Some(merge.values));
        }

        builder.send().await.map_err(backend_error)?;

        Ok(WriteResult::confirmed_now())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let pk = partition_key(collection, key);

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.clone()))
            .key(SK, AttributeValue::S(pk))
            .send()
            .await
            .map_err(backend_error)?;

        Ok(())
    }
}

/// `SET` clause plus placeholders for a shallow merge
#[derive(Debug, PartialEq)]
struct MergeExpression {
    expression: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

/// `None` when nothing but key attributes (or nothing at all) is supplied
fn merge_expression(value: &Document) -> Option<MergeExpression> {
    let mut clauses = vec![];
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let fields = value
        .iter()
        .filter(|(field, _)| field.as_str() != PK && field.as_str() != SK);
    for (i, (field, v)) in fields.enumerate() {
        clauses.push(format!("#f{i} = :v{i}"));
        names.insert(format!("#f{i}"), field.clone());
        values.insert(format!(":v{i}"), to_attribute(v));
    }

    if clauses.is_empty() {
        return None;
    }

    Some(MergeExpression {
        expression: format!("SET {}", clauses.join(", ")),
        names,
        values,
    })
}

pub(crate) fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

pub(crate) fn from_attribute(field: &str, attr: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attr {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(field, n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(|item| from_attribute(field, item))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| from_attribute(k, v).map(|value| (k.clone(), value)))
                .collect::<Result<Map<_, _>, _>>()?,
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| parse_number(field, n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(StoreError::Conversion {
                field: field.to_string(),
                reason: format!("{:?}", other),
            })
        }
    };
    Ok(value)
}

fn parse_number(field: &str, raw: &str) -> Result<Number, StoreError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::Conversion {
            field: field.to_string(),
            reason: format!("not a number: {}", raw),
        })
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Document, StoreError> {
    item.iter()
        .filter(|(field, _)| field.as_str() != PK && field.as_str() != SK)
        .map(|(field, attr)| from_attribute(field, attr).map(|value| (field.clone(), value)))
        .collect()
}
