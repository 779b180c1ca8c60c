//! Adapter from the `toml` crate to [`RawDocument`].
//!
//! Decoding is delegated entirely; this module only converts values and maps
//! decoder failures onto the common parse error shape.

use tracing::debug;

use super::error::PolicyParseError;
use crate::policy::{RawDocument, RawValue};

/// Parse TOML text into a raw document.
pub fn parse_toml(text: &str, file_path: &str) -> Result<RawDocument, PolicyParseError> {
    let table = text
        .parse::<toml::Table>()
        .map_err(|err| decode_error(text, file_path, &err))?;

    let root = convert_table(table);
    debug!("Parsed TOML policy {}: {} top-level keys", file_path, root.len());
    Ok(root)
}

fn convert_table(table: toml::Table) -> RawDocument {
    table
        .into_iter()
        .map(|(key, value)| (key, convert_value(value)))
        .collect()
}

fn convert_value(value: toml::Value) -> RawValue {
    match value {
        toml::Value::String(s) => RawValue::String(s),
        toml::Value::Integer(i) => RawValue::Integer(i),
        toml::Value::Float(f) => RawValue::Float(f),
        toml::Value::Boolean(b) => RawValue::Bool(b),
        toml::Value::Datetime(dt) => RawValue::Datetime(dt.to_string()),
        toml::Value::Array(items) => RawValue::Array(items.into_iter().map(convert_value).collect()),
        toml::Value::Table(table) => RawValue::Map(convert_table(table)),
    }
}

fn decode_error(text: &str, file_path: &str, err: &toml::de::Error) -> PolicyParseError {
    let detail = err.message().trim();
    let message = match err.span() {
        Some(span) => {
            let (line, column) = line_column(text, span.start);
            format!("invalid TOML syntax at line {line}, column {column}: {detail}")
        }
        None => format!("invalid TOML syntax: {detail}"),
    };
    PolicyParseError::general(
        file_path,
        message,
        "Fix TOML syntax at the reported line/column.",
    )
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
