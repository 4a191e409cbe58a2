// crates/contract-validation-core/src/form_data/mod.rs
// ============================================================================
// Module: Form Data Codec
// Description: URL-encoded key/value pairs to and from JSON trees.
// Purpose: Feed form payloads into type validation and render them back.
// Dependencies: serde_json, url
// ============================================================================

//! ## Overview
//! Decoding splits the input on `&` and each part on its first `=`, then
//! percent-decodes both sides. A part without `=` yields `null`. Repeated
//! keys accumulate into an array in input order. Each key is expanded from
//! bracket notation and merged into the result object.
//!
//! Scalars are inferred from text: `true`/`false` become booleans, any
//! `-?[0-9]+` text becomes an exact-precision integer (leading zeros and the
//! sign of zero are dropped), and everything else stays a string.
//!
//! Encoding reverses the expansion; decode and encode are inverse up to
//! number formatting and explicit `null` values.
//!
//! Security posture: form payloads are untrusted. Key depth and array
//! indices are bounded by [`FormDataLimits`], and expansion, merging, and
//! encoding use explicit worklists instead of recursion.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod encode;
mod keys;
mod merge;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use url::form_urlencoded;

pub use self::encode::ExactNumberFormatter;
pub use self::encode::NumberFormatter;
use self::encode::ArrayStyle;
use self::encode::encode_tree;
use self::keys::expand_key;
use self::merge::merge;
use crate::runtime::primitives::is_integer_text;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default largest array index honored by bracket expansion.
pub const DEFAULT_MAX_ARRAY_INDEX: usize = 1024;
/// Default largest number of bracket groups expanded per key.
pub const DEFAULT_MAX_KEY_DEPTH: usize = 32;

/// Bounds applied to bracket expansion.
///
/// # Invariants
/// - Indices above `max_array_index` are treated as object keys.
/// - Keys with more than `max_key_depth` groups are not expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormDataLimits {
    /// Largest `[N]` index expanded into an array position.
    pub max_array_index: usize,
    /// Largest number of bracket groups expanded for one key.
    pub max_key_depth: usize,
}

impl Default for FormDataLimits {
    fn default() -> Self {
        Self {
            max_array_index: DEFAULT_MAX_ARRAY_INDEX,
            max_key_depth: DEFAULT_MAX_KEY_DEPTH,
        }
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Form data codec with expansion limits and a number formatter.
#[derive(Clone)]
pub struct FormDataCodec {
    /// Expansion limits.
    limits: FormDataLimits,
    /// Number rendering used when encoding.
    formatter: Arc<dyn NumberFormatter>,
}

impl fmt::Debug for FormDataCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDataCodec").field("limits", &self.limits).finish_non_exhaustive()
    }
}

impl Default for FormDataCodec {
    fn default() -> Self {
        Self::new(FormDataLimits::default())
    }
}

impl FormDataCodec {
    /// Creates a codec with exact number formatting.
    #[must_use]
    pub fn new(limits: FormDataLimits) -> Self {
        Self {
            limits,
            formatter: Arc::new(ExactNumberFormatter),
        }
    }

    /// Replaces the number formatter used when encoding.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn NumberFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Returns the expansion limits.
    #[must_use]
    pub const fn limits(&self) -> FormDataLimits {
        self.limits
    }

    /// Decodes URL-encoded pairs into a JSON object.
    #[must_use]
    pub fn decode(&self, encoded: &str) -> Value {
        let mut root = Value::Object(Map::new());
        for (key, values) in accumulate_pairs(encoded) {
            let mut scalars: Vec<Value> = values.into_iter().map(infer_scalar).collect();
            let leaf = if scalars.len() == 1 {
                scalars.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(scalars)
            };
            merge(&mut root, expand_key(&key, leaf, &self.limits));
        }
        root
    }

    /// Encodes a JSON object as URL-encoded pairs with indexed arrays.
    ///
    /// Non-object values encode to an empty string.
    #[must_use]
    pub fn encode(&self, value: &Value) -> String {
        encode_tree(value, self.formatter.as_ref(), ArrayStyle::Indexed)
    }

    /// Normalizes URL-encoded pairs, writing scalar arrays as repeated keys.
    ///
    /// `field[]=a&field[]=b` becomes `field=a&field=b`. Single-element and
    /// sparse arrays keep bracket keys so they decode back as arrays.
    #[must_use]
    pub fn rewrite_encoded(&self, encoded: &str) -> String {
        encode_tree(&self.decode(encoded), self.formatter.as_ref(), ArrayStyle::Repeated)
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Decodes URL-encoded pairs with default limits.
#[must_use]
pub fn decode(encoded: &str) -> Value {
    FormDataCodec::default().decode(encoded)
}

/// Encodes a JSON object with exact number formatting.
#[must_use]
pub fn encode(value: &Value) -> String {
    FormDataCodec::default().encode(value)
}

/// Normalizes URL-encoded pairs with default limits.
#[must_use]
pub fn rewrite_encoded(encoded: &str) -> String {
    FormDataCodec::default().rewrite_encoded(encoded)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits input into keys with their values, both in first-seen order.
fn accumulate_pairs(encoded: &str) -> Vec<(String, Vec<Option<String>>)> {
    let mut pairs: Vec<(String, Vec<Option<String>>)> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    for part in encoded.split('&').filter(|part| !part.is_empty()) {
        let (raw_key, raw_value) = match part.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (part, None),
        };
        let key = percent_decode(raw_key);
        let value = raw_value.map(percent_decode);
        if let Some(entry) = positions.get(&key).and_then(|position| pairs.get_mut(*position)) {
            entry.1.push(value);
            continue;
        }
        positions.insert(key.clone(), pairs.len());
        pairs.push((key, vec![value]));
    }
    pairs
}

/// Percent-decodes one component, treating `+` as a space.
fn percent_decode(component: &str) -> String {
    let buffer = format!("_={component}");
    form_urlencoded::parse(buffer.as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Infers a JSON scalar from a decoded value.
fn infer_scalar(value: Option<String>) -> Value {
    let Some(text) = value else {
        return Value::Null;
    };
    match text.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        digits if is_integer_text(digits) => Number::from_str(&integer_literal(digits))
            .map_or(Value::String(text.clone()), Value::Number),
        _ => Value::String(text),
    }
}

/// Rewrites `-?[0-9]+` as a JSON integer literal with the same value.
fn integer_literal(text: &str) -> String {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text),
    };
    let magnitude = digits.trim_start_matches('0');
    match magnitude {
        "" => "0".to_string(),
        _ if negative => format!("-{magnitude}"),
        _ => magnitude.to_string(),
    }
}
