// crates/contract-validation-core/src/form_data/tests.rs
// ============================================================================
// Module: Form Data Codec Unit Tests
// Description: Unit tests for decoding, bracket expansion, and encoding.
// Purpose: Pin scalar inference, expansion limits, and encoding order.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises the codec on literal inputs, including malformed and
//! over-limit keys that must fall back to plain keys.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Number;
use serde_json::json;

use super::FormDataCodec;
use super::FormDataLimits;
use super::NumberFormatter;
use super::decode;
use super::encode;
use super::keys::BracketKey;
use super::rewrite_encoded;

// ============================================================================
// SECTION: Decoding
// ============================================================================

#[test]
fn decode_expands_indexed_objects() {
    assert_eq!(decode("locations[0][city]=Paris"), json!({"locations": [{"city": "Paris"}]}));
}

#[test]
fn decode_infers_integers_and_booleans() {
    assert_eq!(decode("count=42&active=true&neg=-7"), json!({"count": 42, "active": true, "neg": -7}));
}

#[test]
fn decode_keeps_non_numeric_text() {
    assert_eq!(decode("code=WT65xSPLX-5"), json!({"code": "WT65xSPLX-5"}));
    assert_eq!(decode("ratio=1.5&sign=-&plus=+1"), json!({"ratio": "1.5", "sign": "-", "plus": " 1"}));
}

#[test]
fn decode_reads_every_integer_pattern_as_an_exact_number() {
    assert_eq!(decode("zip=007&n=-0&m=-012"), json!({"zip": 7, "n": 0, "m": -12}));
    let decoded = decode("big=123456789012345678901234567890");
    assert!(decoded["big"].is_number());
    assert_eq!(decoded["big"].to_string(), "123456789012345678901234567890");
    assert_eq!(encode(&decoded), "big=123456789012345678901234567890");
}

#[test]
fn decode_treats_missing_equals_as_null() {
    assert_eq!(decode("flag&name="), json!({"flag": null, "name": ""}));
}

#[test]
fn decode_percent_decodes_keys_and_values() {
    assert_eq!(
        decode("full+name=Ada%20Lovelace&note=a%3Db%26c"),
        json!({"full name": "Ada Lovelace", "note": "a=b&c"})
    );
}

#[test]
fn decode_accumulates_repeated_keys() {
    assert_eq!(decode("tag=a&other=1&tag=b"), json!({"tag": ["a", "b"], "other": 1}));
    assert_eq!(decode("ids[]=1&ids[]=2"), json!({"ids": [1, 2]}));
    assert_eq!(decode("ids[]=1"), json!({"ids": [1]}));
}

#[test]
fn decode_merges_sparse_indices() {
    assert_eq!(decode("ids[1]=2&ids[0]=1"), json!({"ids": [1, 2]}));
    assert_eq!(
        decode("user[name]=Ada&user[roles][0]=admin&user[roles][1]=ops"),
        json!({"user": {"name": "Ada", "roles": ["admin", "ops"]}})
    );
}

#[test]
fn decode_ignores_empty_parts() {
    assert_eq!(decode("&&a=1&"), json!({"a": 1}));
    assert_eq!(decode(""), json!({}));
}

// ============================================================================
// SECTION: Limits
// ============================================================================

#[test]
fn indices_above_limit_become_object_keys() {
    let codec = FormDataCodec::new(FormDataLimits {
        max_array_index: 2,
        max_key_depth: 4,
    });
    assert_eq!(codec.decode("ids[3]=x"), json!({"ids": {"3": "x"}}));
    assert_eq!(codec.decode("ids[2]=x"), json!({"ids": [null, null, "x"]}));
}

#[test]
fn keys_deeper_than_limit_stay_plain() {
    let codec = FormDataCodec::new(FormDataLimits {
        max_array_index: 8,
        max_key_depth: 1,
    });
    assert_eq!(codec.decode("a[b][c]=1"), json!({"a[b][c]": 1}));
    assert_eq!(codec.decode("a[b]=1"), json!({"a": {"b": 1}}));
}

#[test]
fn malformed_keys_stay_plain() {
    assert_eq!(decode("a[b=1"), json!({"a[b": 1}));
    assert_eq!(decode("a[b]c=1"), json!({"a[b]c": 1}));
    assert_eq!(decode("[x]=1"), json!({"[x]": 1}));
    assert!(BracketKey::parse("a[[b]]").is_none());
}

#[test]
fn leading_zero_indices_are_object_keys() {
    assert_eq!(decode("ids[01]=x"), json!({"ids": {"01": "x"}}));
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

#[test]
fn encode_writes_bracket_paths_in_document_order() {
    let value = json!({"user": {"name": "Ada Lovelace", "tags": ["a", "b"]}, "n": 3, "skip": null});
    assert_eq!(encode(&value), "user[name]=Ada+Lovelace&user[tags][0]=a&user[tags][1]=b&n=3");
}

#[test]
fn encode_renders_exact_decimals() {
    assert_eq!(encode(&json!({"rate": 0.000_000_1, "whole": 2.50})), "rate=0.0000001&whole=2.5");
}

#[test]
fn encode_non_object_is_empty() {
    assert_eq!(encode(&json!([1, 2])), "");
    assert_eq!(encode(&json!("text")), "");
}

#[test]
fn encode_uses_custom_formatter() {
    struct Fixed;
    impl NumberFormatter for Fixed {
        fn format(&self, number: &Number) -> String {
            format!("{:.2}", number.as_f64().unwrap_or_default())
        }
    }
    let codec = FormDataCodec::default().with_formatter(Arc::new(Fixed));
    assert_eq!(codec.encode(&json!({"price": 3})), "price=3.00");
}

#[test]
fn rewrite_collapses_bracket_arrays_to_repeated_keys() {
    assert_eq!(rewrite_encoded("field[]=a&field[]=b"), "field=a&field=b");
    assert_eq!(rewrite_encoded("field[0]=a&field[1]=b&x=1"), "field=a&field=b&x=1");
    assert_eq!(
        rewrite_encoded("items[0][sku]=a1&items[1][sku]=b2"),
        "items[0][sku]=a1&items[1][sku]=b2"
    );
}

#[test]
fn rewrite_keeps_arrays_that_repeated_keys_cannot_express() {
    assert_eq!(rewrite_encoded("field[]=a"), "field[]=a");
    assert_eq!(decode(&rewrite_encoded("field[]=a")), json!({"field": ["a"]}));
    assert_eq!(rewrite_encoded("ids[2]=x"), "ids[2]=x");
    assert_eq!(decode(&rewrite_encoded("ids[2]=x")), json!({"ids": [null, null, "x"]}));
}
