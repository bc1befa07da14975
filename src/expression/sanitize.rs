//! Attribute name and table name sanitization
//!
//! Attribute names are reduced to ASCII letters before they are placed in a
//! name-placeholder map. Table names are checked against the store's naming
//! rules.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z]").expect("valid regex"));

static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid regex"));

/// Minimum table name length accepted by the store
pub const MIN_TABLE_NAME_LEN: usize = 3;

/// Maximum table name length accepted by the store
pub const MAX_TABLE_NAME_LEN: usize = 255;

/// Strip every character outside `[A-Za-z]` from an attribute name
///
/// Case is preserved; digits, punctuation, whitespace and non-ASCII letters
/// are removed.
///
/// # Example
/// ```
/// use record_gateway::expression::sanitize_name;
///
/// assert_eq!(sanitize_name("field1"), "field");
/// assert_eq!(sanitize_name("first_name"), "firstname");
/// assert_eq!(sanitize_name("userId"), "userId");
/// ```
pub fn sanitize_name(name: &str) -> String {
    NON_ALPHABETIC.replace_all(name, "").into_owned()
}

/// Validate a table name
///
/// Rules:
/// - Between 3 and 255 characters
/// - Only letters, digits, underscore, hyphen and dot
///
/// # Example
/// ```
/// use record_gateway::expression::validate_table_name;
///
/// assert!(validate_table_name("users").is_ok());
/// assert!(validate_table_name("ab").is_err());
/// assert!(validate_table_name("my table").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<(), String> {
    if name.len() < MIN_TABLE_NAME_LEN || name.len() > MAX_TABLE_NAME_LEN {
        return Err(format!(
            "Table name '{}' must be between {} and {} characters long",
            name, MIN_TABLE_NAME_LEN, MAX_TABLE_NAME_LEN
        ));
    }

    if !TABLE_NAME.is_match(name) {
        return Err(format!(
            "Table name '{}' is invalid. It may contain only letters, numbers, '_', '-' and '.'",
            name
        ));
    }

    Ok(())
}
