//! Expression generation for store requests
//!
//! Builds filter and update expressions, and sanitizes the names that go
//! into them.

pub mod builder;
pub mod sanitize;

pub use builder::{
    AND, COMMA, Expression, build_expression, build_filter, build_update, name_placeholder,
    value_placeholder,
};
pub use sanitize::{sanitize_name, validate_table_name};
