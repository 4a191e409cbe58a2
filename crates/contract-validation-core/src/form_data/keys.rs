// crates/contract-validation-core/src/form_data/keys.rs
// ============================================================================
// Module: Form Data Key Expansion
// Description: Bracket-notation key parsing and right-to-left expansion.
// Purpose: Turn `a[0][city]` style keys into nested JSON fragments.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A key is a base name followed by zero or more bracket groups. Groups are
//! resolved innermost first: `[]` wraps the value in an array, `[N]` places
//! it at index `N` with `null` filler, and `[name]` nests it under `name`.
//! Expansion runs in a loop, so attacker-controlled bracket depth never
//! grows the call stack. Malformed keys and keys deeper than the configured
//! limit stay plain, unexpanded keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::form_data::FormDataLimits;

// ============================================================================
// SECTION: Key Parsing
// ============================================================================

/// Key split into its base name and bracket groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BracketKey<'k> {
    /// Name before the first bracket.
    pub(crate) base: &'k str,
    /// Bracket group contents, outermost first.
    pub(crate) groups: Vec<&'k str>,
}

impl<'k> BracketKey<'k> {
    /// Parses a key; returns `None` when it is not well-formed bracket notation.
    pub(crate) fn parse(key: &'k str) -> Option<Self> {
        let (base, mut rest) = match key.find('[') {
            Some(start) => key.split_at(start),
            None => (key, ""),
        };
        if base.is_empty() || base.contains(']') {
            return None;
        }
        let mut groups = Vec::new();
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let end = inner.find(']')?;
            let (group, tail) = inner.split_at(end);
            if group.contains('[') {
                return None;
            }
            groups.push(group);
            rest = tail.get(1 ..).unwrap_or_default();
        }
        Some(Self {
            base,
            groups,
        })
    }
}

// ============================================================================
// SECTION: Expansion
// ============================================================================

/// Expands a key and its value into a single-entry JSON object.
pub(crate) fn expand_key(key: &str, value: Value, limits: &FormDataLimits) -> Value {
    let parsed = BracketKey::parse(key).filter(|parsed| parsed.groups.len() <= limits.max_key_depth);
    let Some(parsed) = parsed else {
        return single_entry(key, value);
    };
    let mut current = value;
    for group in parsed.groups.iter().rev() {
        current = if group.is_empty() {
            match current {
                Value::Array(_) => current,
                other => Value::Array(vec![other]),
            }
        } else if let Some(index) = array_index(group, limits.max_array_index) {
            let mut items = vec![Value::Null; index];
            items.push(current);
            Value::Array(items)
        } else {
            single_entry(group, current)
        };
    }
    single_entry(parsed.base, current)
}

/// Parses a canonical array index no larger than `max_index`.
fn array_index(group: &str, max_index: usize) -> Option<usize> {
    let canonical = !group.is_empty()
        && group.bytes().all(|byte| byte.is_ascii_digit())
        && (group == "0" || !group.starts_with('0'));
    if !canonical {
        return None;
    }
    group.parse::<usize>().ok().filter(|index| *index <= max_index)
}

/// Builds `{key: value}`.
fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}
