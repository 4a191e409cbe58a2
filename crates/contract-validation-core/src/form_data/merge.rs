// crates/contract-validation-core/src/form_data/merge.rs
// ============================================================================
// Module: Form Data Tree Merge
// Description: Worklist-based merge of expanded key fragments.
// Purpose: Combine per-key fragments into one JSON tree without recursion.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Objects merge per key, with the incoming side overwriting conflicting
//! scalars. Arrays merge by position: a non-null element wins over `null`,
//! two composites of the same kind merge further, and otherwise the existing
//! element is kept. Pending merges sit on an explicit stack.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

// ============================================================================
// SECTION: Merge
// ============================================================================

/// Merges `incoming` into `target`.
pub(crate) fn merge(target: &mut Value, incoming: Value) {
    let mut pending: Vec<(&mut Value, Value)> = vec![(target, incoming)];
    while let Some((slot, incoming)) = pending.pop() {
        match (slot, incoming) {
            (Value::Object(existing), Value::Object(fresh)) => {
                let mut overlapping = BTreeMap::new();
                for (key, value) in fresh {
                    if existing.contains_key(&key) {
                        overlapping.insert(key, value);
                    } else {
                        existing.insert(key, value);
                    }
                }
                for (key, child) in existing.iter_mut() {
                    if let Some(value) = overlapping.remove(key) {
                        pending.push((child, value));
                    }
                }
            }
            (Value::Array(existing), Value::Array(fresh)) => {
                if existing.len() < fresh.len() {
                    existing.resize(fresh.len(), Value::Null);
                }
                for (child, value) in existing.iter_mut().zip(fresh) {
                    if value.is_null() {
                        continue;
                    }
                    if child.is_null() {
                        *child = value;
                        continue;
                    }
                    let same_composite = (child.is_object() && value.is_object())
                        || (child.is_array() && value.is_array());
                    if same_composite {
                        pending.push((child, value));
                    }
                }
            }
            (slot, incoming) => *slot = incoming,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
