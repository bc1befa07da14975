//! Expression building for filter and update requests
//!
//! Converts an ordered field→value map into the store's parameterized
//! expression form: a predicate template plus name and value placeholder maps.

use indexmap::IndexMap;
use serde::Serialize;

use crate::expression::sanitize::sanitize_name;
use crate::types::Item;

/// Separator for filter predicates
pub const AND: &str = "AND";

/// Separator for update assignment lists
pub const COMMA: &str = ",";

/// A parameterized expression ready to hand to a store client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Expression {
    /// Clause template, e.g. `#0 = :val0 AND #1 = :val1`
    pub predicate: String,
    /// Name placeholders (`#i`) to sanitized attribute names, in index order
    pub names: IndexMap<String, String>,
    /// Value placeholders (`:vali`) to attribute values
    pub values: Item,
}

impl Expression {
    /// Number of clauses in the expression
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the expression has no clauses
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prefix the predicate with a keyword such as `SET`
    pub fn with_prefix(mut self, keyword: &str) -> Self {
        self.predicate = format!("{} {}", keyword, self.predicate);
        self
    }
}

/// Name placeholder for position `index`
pub fn name_placeholder(index: usize) -> String {
    format!("#{}", index)
}

/// Value placeholder for position `index`
pub fn value_placeholder(index: usize) -> String {
    format!(":val{}", index)
}

/// Build an expression from a field→value map
///
/// Fields are visited in insertion order; the field at position `i` becomes
/// the clause `#i = :vali`. Clauses are joined by `separator`: word tokens
/// like `AND` are padded on both sides, punctuation like `,` only on the
/// right.
///
/// Attribute names are sanitized to ASCII letters before they are recorded.
/// Values are always read with the caller's original key.
///
/// # Example
/// ```
/// use record_gateway::expression::{build_expression, AND};
/// use serde_json::json;
///
/// let fields = json!({ "name": "Alice", "age": 30 });
/// let expr = build_expression(fields.as_object().unwrap(), AND);
///
/// assert_eq!(expr.predicate, "#0 = :val0 AND #1 = :val1");
/// assert_eq!(expr.names["#1"], "age");
/// assert_eq!(expr.values[":val0"], json!("Alice"));
/// ```
pub fn build_expression(fields: &Item, separator: &str) -> Expression {
    let mut clauses = Vec::with_capacity(fields.len());
    let mut names = IndexMap::with_capacity(fields.len());
    let mut values = Item::new();

    for (index, (key, value)) in fields.iter().enumerate() {
        let name_key = name_placeholder(index);
        let value_key = value_placeholder(index);

        clauses.push(format!("{} = {}", name_key, value_key));
        names.insert(name_key, sanitize_name(key));
        values.insert(value_key, value.clone());
    }

    Expression {
        predicate: clauses.join(&join_token(separator)),
        names,
        values,
    }
}

/// Build an `AND`-joined filter expression
pub fn build_filter(fields: &Item) -> Expression {
    build_expression(fields, AND)
}

/// Build a `SET` update expression with comma-joined assignments
pub fn build_update(fields: &Item) -> Expression {
    build_expression(fields, COMMA).with_prefix("SET")
}

fn join_token(separator: &str) -> String {
    let separator = separator.trim();
    if separator.chars().all(char::is_alphabetic) {
        format!(" {} ", separator)
    } else {
        format!("{} ", separator)
    }
}
