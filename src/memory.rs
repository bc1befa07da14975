//! In-memory store client
//!
//! Holds tables in process memory and evaluates the expressions produced by
//! the expression builder: equality clauses joined by `AND` for scans, and
//! `SET` assignment lists for updates. Requests the real store would reject
//! (empty expressions, undefined placeholders, unknown tables, keys that do
//! not match the table's key schema) are rejected with the same error kinds.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{Number, Value};
use tracing::debug;

use crate::client::StoreClient;
use crate::error::{GatewayError, Result};
use crate::expression::validate_table_name;
use crate::types::{
    DeleteOutput, DeleteParams, GetOutput, GetParams, Item, PutOutput, PutParams, ReturnValues,
    ScanOutput, ScanParams, UpdateOutput, UpdateParams,
};

/// Key attributes of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Partition (hash) key attribute
    pub partition_key: String,
    /// Optional sort (range) key attribute
    pub sort_key: Option<String>,
}

impl KeySchema {
    /// Key schema with only a partition key
    pub fn partition(name: impl Into<String>) -> Self {
        Self {
            partition_key: name.into(),
            sort_key: None,
        }
    }

    /// Key schema with a partition key and a sort key
    pub fn composite(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition_key: partition.into(),
            sort_key: Some(sort.into()),
        }
    }

    fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition_key.as_str()).chain(self.sort_key.as_deref())
    }

    fn is_key_attribute(&self, name: &str) -> bool {
        self.attributes().any(|attr| attr == name)
    }

    /// Storage key for an item that must contain every key attribute
    fn key_of_item(&self, item: &Item) -> Result<String> {
        let mut parts = Vec::with_capacity(2);
        for attr in self.attributes() {
            let value = item.get(attr).ok_or_else(|| {
                GatewayError::validation(format!(
                    "One or more parameter values were invalid: Missing the key {} in the item",
                    attr
                ))
            })?;
            if !(value.is_string() || value.is_number()) {
                return Err(GatewayError::validation(format!(
                    "One or more parameter values were invalid: Key attribute '{}' must be a string or number",
                    attr
                )));
            }
            parts.push(canonical(value));
        }
        Ok(serde_json::to_string(&parts)?)
    }

    /// Storage key for a key map, which must contain exactly the key attributes
    fn key_of(&self, key: &Item) -> Result<String> {
        let expected = self.attributes().count();
        if key.len() != expected || !self.attributes().all(|attr| key.contains_key(attr)) {
            return Err(GatewayError::validation(
                "The provided key element does not match the schema",
            ));
        }
        self.key_of_item(key)
    }
}

#[derive(Debug)]
struct MemoryTable {
    schema: KeySchema,
    items: BTreeMap<String, Item>,
}

/// A `StoreClient` backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create a store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table and return the store, for chained setup
    pub fn with_table(self, name: impl Into<String>, schema: KeySchema) -> Result<Self> {
        self.create_table(name, schema)?;
        Ok(self)
    }

    /// Create an empty table
    pub fn create_table(&self, name: impl Into<String>, schema: KeySchema) -> Result<()> {
        let name = name.into();
        validate_table_name(&name).map_err(GatewayError::Validation)?;

        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(GatewayError::validation(format!(
                "Table already exists: {}",
                name
            )));
        }

        debug!(table = %name, ?schema, "creating table");
        tables.insert(
            name,
            MemoryTable {
                schema,
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Names of all tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of items stored in `table`
    pub fn item_count(&self, table: &str) -> Result<usize> {
        let tables = self.tables.read();
        let table = lookup(&tables, table)?;
        Ok(table.items.len())
    }
}

fn lookup<'a>(tables: &'a HashMap<String, MemoryTable>, name: &str) -> Result<&'a MemoryTable> {
    tables.get(name).ok_or_else(|| {
        GatewayError::resource_not_found(format!("Requested resource not found: Table: {}", name))
    })
}

fn lookup_mut<'a>(
    tables: &'a mut HashMap<String, MemoryTable>,
    name: &str,
) -> Result<&'a mut MemoryTable> {
    tables.get_mut(name).ok_or_else(|| {
        GatewayError::resource_not_found(format!("Requested resource not found: Table: {}", name))
    })
}

// ============================================================================
// Expression Evaluation
// ============================================================================

/// One `name = value` clause with placeholders resolved
#[derive(Debug)]
struct Clause {
    name: String,
    value: Value,
}

fn parse_clauses(
    kind: &str,
    expression: &str,
    separator: &str,
    names: &IndexMap<String, String>,
    values: &Item,
) -> Result<Vec<Clause>> {
    if expression.trim().is_empty() {
        return Err(GatewayError::validation(format!(
            "Invalid {}: The expression can not be empty;",
            kind
        )));
    }

    expression
        .split(separator)
        .map(|fragment| {
            let (lhs, rhs) = fragment
                .split_once('=')
                .map(|(l, r)| (l.trim(), r.trim()))
                .filter(|(l, r)| !l.is_empty() && !r.is_empty())
                .ok_or_else(|| {
                    GatewayError::validation(format!(
                        "Invalid {}: Syntax error; token: \"{}\"",
                        kind,
                        fragment.trim()
                    ))
                })?;

            Ok(Clause {
                name: resolve_name(kind, lhs, names)?,
                value: resolve_value(kind, rhs, values)?,
            })
        })
        .collect()
}

fn resolve_name(kind: &str, token: &str, names: &IndexMap<String, String>) -> Result<String> {
    if !token.starts_with('#') {
        return Ok(token.to_string());
    }
    let name = names.get(token).ok_or_else(|| {
        GatewayError::validation(format!(
            "Invalid {}: An expression attribute name used in the document path is not defined; attribute name: {}",
            kind, token
        ))
    })?;
    if name.is_empty() {
        return Err(GatewayError::validation(format!(
            "ExpressionAttributeNames contains invalid value: Empty attribute name for key {}",
            token
        )));
    }
    Ok(name.clone())
}

fn resolve_value(kind: &str, token: &str, values: &Item) -> Result<Value> {
    if !token.starts_with(':') {
        return Err(GatewayError::validation(format!(
            "Invalid {}: Syntax error; token: \"{}\"",
            kind, token
        )));
    }
    values.get(token).cloned().ok_or_else(|| {
        GatewayError::validation(format!(
            "Invalid {}: An expression attribute value used in expression is not defined; attribute value: {}",
            kind, token
        ))
    })
}

fn parse_set_actions(params: &UpdateParams) -> Result<Vec<Clause>> {
    const KIND: &str = "UpdateExpression";

    let body = params
        .update_expression
        .trim_start()
        .strip_prefix("SET")
        .ok_or_else(|| {
            GatewayError::validation(format!(
                "Invalid {}: only SET actions are supported",
                KIND
            ))
        })?;

    if body.trim().is_empty() {
        return Err(GatewayError::validation(format!(
            "Invalid {}: Syntax error; token: \"<EOF>\", near: \"SET\"",
            KIND
        )));
    }

    let actions = parse_clauses(
        KIND,
        body,
        ",",
        &params.expression_attribute_names,
        &params.expression_attribute_values,
    )?;

    for (i, action) in actions.iter().enumerate() {
        if actions[..i].iter().any(|earlier| earlier.name == action.name) {
            return Err(GatewayError::validation(format!(
                "Invalid {}: Two document paths overlap with each other; path one: [{}], path two: [{}]",
                KIND, action.name, action.name
            )));
        }
    }

    Ok(actions)
}

fn matches(item: &Item, clauses: &[Clause]) -> bool {
    clauses.iter().all(|clause| {
        item.get(&clause.name)
            .is_some_and(|value| same_value(value, &clause.value))
    })
}

/// Equality with numbers compared by value, so `30` equals `30.0`
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => same_number(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same_value(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| same_value(v, other)))
        }
        _ => a == b,
    }
}

fn same_number(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => match (a.as_u64(), b.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
    }
}

/// Key value with integral floats folded to integers
fn canonical(value: &Value) -> Value {
    let Value::Number(n) = value else {
        return value.clone();
    };
    if n.is_i64() || n.is_u64() {
        return value.clone();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Value::from(f as i64)
        }
        _ => value.clone(),
    }
}

// ============================================================================
// StoreClient
// ============================================================================

#[async_trait]
impl StoreClient for MemoryStore {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        let tables = self.tables.read();
        let table = lookup(&tables, &params.table_name)?;

        let clauses = parse_clauses(
            "FilterExpression",
            &params.filter_expression,
            " AND ",
            &params.expression_attribute_names,
            &params.expression_attribute_values,
        )?;

        let items: Vec<Item> = table
            .items
            .values()
            .filter(|item| matches(item, &clauses))
            .cloned()
            .collect();

        debug!(
            table = %params.table_name,
            scanned = table.items.len(),
            matched = items.len(),
            "scan"
        );

        Ok(ScanOutput {
            count: items.len(),
            scanned_count: table.items.len(),
            items,
        })
    }

    async fn get(&self, params: GetParams) -> Result<GetOutput> {
        let tables = self.tables.read();
        let table = lookup(&tables, &params.table_name)?;
        let key = table.schema.key_of(&params.key)?;

        Ok(GetOutput {
            item: table.items.get(&key).cloned(),
        })
    }

    async fn put(&self, params: PutParams) -> Result<PutOutput> {
        let mut tables = self.tables.write();
        let table = lookup_mut(&mut tables, &params.table_name)?;
        let key = table.schema.key_of_item(&params.item)?;

        debug!(table = %params.table_name, %key, "put");
        table.items.insert(key, params.item);

        Ok(PutOutput::default())
    }

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        let actions = parse_set_actions(&params)?;

        let mut tables = self.tables.write();
        let table = lookup_mut(&mut tables, &params.table_name)?;
        let key = table.schema.key_of(&params.key)?;

        if let Some(action) = actions
            .iter()
            .find(|action| table.schema.is_key_attribute(&action.name))
        {
            return Err(GatewayError::validation(format!(
                "One or more parameter values were invalid: Cannot update attribute {}. This attribute is part of the key",
                action.name
            )));
        }

        let old = table.items.get(&key).cloned();
        let item = table
            .items
            .entry(key.clone())
            .or_insert_with(|| params.key.clone());

        for action in &actions {
            item.insert(action.name.clone(), action.value.clone());
        }

        debug!(table = %params.table_name, %key, actions = actions.len(), "update");

        let attributes = match params.return_values {
            ReturnValues::None => None,
            ReturnValues::AllNew => Some(item.clone()),
            ReturnValues::AllOld => old,
            ReturnValues::UpdatedNew => Some(
                actions
                    .iter()
                    .map(|action| (action.name.clone(), action.value.clone()))
                    .collect(),
            ),
            ReturnValues::UpdatedOld => old.map(|old| {
                actions
                    .iter()
                    .filter_map(|action| {
                        old.get(&action.name)
                            .map(|value| (action.name.clone(), value.clone()))
                    })
                    .collect()
            }),
        };

        Ok(UpdateOutput { attributes })
    }

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        let mut tables = self.tables.write();
        let table = lookup_mut(&mut tables, &params.table_name)?;
        let key = table.schema.key_of(&params.key)?;

        debug!(table = %params.table_name, %key, "delete");
        table.items.remove(&key);

        Ok(DeleteOutput::default())
    }
}
