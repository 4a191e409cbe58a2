// crates/contract-validation-core/tests/form_pipeline.rs
// ============================================================================
// Module: Form Payload Pipeline Tests
// Description: Form decoding feeding contract upcasts, and encoding back.
// Purpose: Confirm decoded form trees upcast like JSON bodies.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Decodes URL-encoded order forms, upcasts them through the shop contract,
//! and re-encodes the result.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use contract_validation_core::FormDataCodec;
use contract_validation_core::FormDataLimits;
use contract_validation_core::decode_form;
use contract_validation_core::encode_form;
use contract_validation_core::rewrite_form;
use serde_json::json;

use crate::common::shop_facade;

#[test]
fn decoded_form_upcasts_through_contract() {
    let facade = shop_facade();
    let form = "id=5ecf6502-e532-4738-aad5-7ac9701251dd&customer[name]=Ada+Lovelace\
                &status=shipped&quantity=3&tags[]=fragile&attributes[weight]=1200";
    let body = decode_form(form);
    let upcast = facade.upcast("POST", "/orders", &body).unwrap();
    assert_eq!(upcast["customer"], json!({"name": "Ada Lovelace"}));
    assert_eq!(upcast["tags"], json!(["fragile"]));
    assert_eq!(upcast["attributes"], json!({"weight": 1200}));
    assert_eq!(upcast["gift"], json!(false));
}

#[test]
fn single_repeated_key_is_lifted_into_an_array() {
    let facade = shop_facade();
    let form = "id=5ecf6502-e532-4738-aad5-7ac9701251dd&customer[name]=Ada&status=placed\
                &quantity=1&tags=only";
    let upcast = facade.upcast("POST", "/orders", &decode_form(form)).unwrap();
    assert_eq!(upcast["tags"], json!(["only"]));
}

#[test]
fn form_field_errors_use_contract_paths() {
    let facade = shop_facade();
    let form = "id=nope&customer[email]=a%40b.io&status=placed&quantity=1";
    let error = facade.upcast("POST", "/orders", &decode_form(form)).unwrap_err();
    assert_eq!(error.messages(), vec![
        "id: must be a valid uuid".to_string(),
        "customer.name: missing required field".to_string(),
    ]);
}

#[test]
fn upcast_result_encodes_back_to_form() {
    let body = json!({
        "customer": {"name": "Ada"},
        "lines": [{"sku": "a1", "qty": 2}, {"sku": "b2", "qty": 1}],
        "total": 12.75
    });
    let encoded = encode_form(&body);
    assert_eq!(
        encoded,
        "customer[name]=Ada&lines[0][sku]=a1&lines[0][qty]=2&lines[1][sku]=b2&lines[1][qty]=1&\
         total=12.75"
    );
    let decoded = decode_form(&encoded);
    assert_eq!(decoded["lines"], body["lines"]);
    assert_eq!(decoded["customer"], body["customer"]);
}

#[test]
fn rewrite_normalizes_scalar_arrays() {
    assert_eq!(rewrite_form("ids[]=1&ids[]=2&name=x"), "ids=1&ids=2&name=x");
}

#[test]
fn codec_limits_are_configurable() {
    let codec = FormDataCodec::new(FormDataLimits {
        max_array_index: 4,
        max_key_depth: 2,
    });
    assert_eq!(codec.limits().max_array_index, 4);
    assert_eq!(codec.decode("slots[9]=x"), json!({"slots": {"9": "x"}}));
    assert_eq!(codec.decode("a[b][c][d]=1"), json!({"a[b][c][d]": 1}));
}
