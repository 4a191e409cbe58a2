// crates/contract-validation-core/src/form_data/encode.rs
// ============================================================================
// Module: Form Data Encoding
// Description: JSON tree to URL-encoded key/value pairs.
// Purpose: Reverse bracket expansion with caller-controlled number rendering.
// Dependencies: bigdecimal, serde_json, url
// ============================================================================

//! ## Overview
//! Encoding walks the tree with an explicit stack in document order. Object
//! keys become `[name]` segments and array positions become `[index]`
//! segments; `null` leaves are omitted. Numbers are rendered by a
//! [`NumberFormatter`], which defaults to the exact decimal value without
//! exponent notation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;
use url::form_urlencoded;

// ============================================================================
// SECTION: Number Formatting
// ============================================================================

/// Renders JSON numbers for form encoding.
pub trait NumberFormatter: Send + Sync {
    /// Formats a number as it should appear in the encoded output.
    fn format(&self, number: &Number) -> String;
}

/// Exact decimal rendering without exponent notation or trailing zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactNumberFormatter;

impl NumberFormatter for ExactNumberFormatter {
    fn format(&self, number: &Number) -> String {
        if let Some(integer) = number.as_i64() {
            return integer.to_string();
        }
        if let Some(integer) = number.as_u64() {
            return integer.to_string();
        }
        let rendered = number.to_string();
        BigDecimal::from_str(&rendered)
            .map(|decimal| decimal.normalized().to_plain_string())
            .unwrap_or(rendered)
    }
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// How arrays of scalars are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrayStyle {
    /// `key[0]=a&key[1]=b`.
    Indexed,
    /// `key=a&key=b` for arrays of two or more non-null scalars, `key[]=a`
    /// for a single scalar.
    Repeated,
}

/// Encodes an object tree; non-object roots encode to an empty string.
pub(crate) fn encode_tree(value: &Value, formatter: &dyn NumberFormatter, style: ArrayStyle) -> String {
    let Value::Object(root) = value else {
        return String::new();
    };
    let mut pairs: Vec<String> = Vec::new();
    let mut pending: Vec<(String, &Value)> =
        root.iter().rev().map(|(key, item)| (encode_component(key), item)).collect();
    while let Some((key, item)) = pending.pop() {
        match item {
            Value::Null => {}
            Value::Object(entries) => {
                for (child, entry) in entries.iter().rev() {
                    pending.push((format!("{key}[{}]", encode_component(child)), entry));
                }
            }
            Value::Array(items) if style == ArrayStyle::Repeated && is_repeatable(items) => {
                for entry in items.iter().rev() {
                    pending.push((key.clone(), entry));
                }
            }
            Value::Array(items)
                if style == ArrayStyle::Repeated && items.len() == 1 && is_scalar(&items[0]) =>
            {
                pending.push((format!("{key}[]"), &items[0]));
            }
            Value::Array(items) => {
                for (index, entry) in items.iter().enumerate().rev() {
                    pending.push((format!("{key}[{index}]"), entry));
                }
            }
            Value::Bool(flag) => pairs.push(format!("{key}={flag}")),
            Value::Number(number) => {
                pairs.push(format!("{key}={}", encode_component(&formatter.format(number))));
            }
            Value::String(text) => pairs.push(format!("{key}={}", encode_component(text))),
        }
    }
    pairs.join("&")
}

/// Returns true for values that encode as a single non-empty pair.
const fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// Returns true for arrays that decode back from repeated keys.
fn is_repeatable(items: &[Value]) -> bool {
    items.len() > 1 && items.iter().all(is_scalar)
}

/// Percent-encodes one key segment or value.
fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}
