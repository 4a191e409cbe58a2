// crates/contract-validation-core/tests/contract_ingestion.rs
// ============================================================================
// Module: Contract Ingestion Tests
// Description: Parsing and structural validation of contract documents.
// Purpose: Ensure malformed contracts fail closed with descriptive errors.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Feeds well-formed and malformed documents through
//! `ServiceSpec::from_json_slice`.

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

use contract_validation_core::ContractParseError;
use contract_validation_core::HttpMethod;
use contract_validation_core::MAX_CONTRACT_BYTES;
use contract_validation_core::ResponseCode;
use contract_validation_core::ServiceSpec;
use serde_json::Value;
use serde_json::json;

use crate::common::shop_contract;
use crate::common::shop_document;

/// Parses a JSON value as a contract document.
fn parse(document: &Value) -> Result<ServiceSpec, ContractParseError> {
    ServiceSpec::from_json_slice(&serde_json::to_vec(document).unwrap())
}

#[test]
fn shop_fixture_parses_with_defaults() {
    let contract = shop_contract();
    assert_eq!(contract.operations().count(), 11);
    let customer = contract.models.iter().find(|model| model.name == "customer").unwrap();
    assert!(customer.fields[0].required);
    assert!(!customer.fields[1].required);
    let shape = contract.unions.iter().find(|union| union.name == "shape").unwrap();
    assert_eq!(shape.discriminator_key(), "kind");
    assert_eq!(shape.default_member().map(|member| member.type_ref.as_str()), Some("square"));
    let pet = contract.unions.iter().find(|union| union.name == "pet").unwrap();
    assert_eq!(pet.discriminator_key(), "discriminator");
}

#[test]
fn response_codes_accept_numbers_and_default() {
    let contract = shop_contract();
    let get = contract.operations().find(|operation| operation.method == HttpMethod::Get).unwrap();
    assert_eq!(get.responses[0].code, ResponseCode::Status(200));
    assert_eq!(get.responses[1].code, ResponseCode::Default);
}

#[test]
fn contracts_serialize_back_to_equivalent_documents() {
    let contract = shop_contract();
    let bytes = serde_json::to_vec(&contract).unwrap();
    assert_eq!(ServiceSpec::from_json_slice(&bytes).unwrap(), contract);
}

#[test]
fn missing_namespace_is_rejected() {
    let mut document = shop_document();
    document["namespace"] = json!(" ");
    let error = parse(&document).unwrap_err();
    assert_eq!(error, ContractParseError::Invalid("service namespace must be non-empty".to_string()));
}

#[test]
fn malformed_namespaces_are_rejected() {
    for namespace in ["Not Valid", "io..example", "io.example.", "io/example"] {
        let mut document = shop_document();
        document["namespace"] = json!(namespace);
        let error = parse(&document).unwrap_err();
        assert_eq!(
            error,
            ContractParseError::Invalid(format!(
                "service namespace {namespace} must be dot-separated identifier segments"
            ))
        );
    }
}

#[test]
fn unknown_method_is_a_parse_error() {
    let document = json!({
        "name": "svc",
        "namespace": "io.example.v0",
        "resources": [{"type": "x", "operations": [{"method": "FETCH", "path": "/x"}]}]
    });
    assert!(matches!(parse(&document), Err(ContractParseError::Parse(_))));
}

#[test]
fn relative_paths_and_unnamed_placeholders_are_rejected() {
    for path in ["orders", "/orders/:"] {
        let document = json!({
            "name": "svc",
            "namespace": "io.example.v0",
            "resources": [{"type": "x", "operations": [{"method": "GET", "path": path}]}]
        });
        assert!(matches!(parse(&document), Err(ContractParseError::Invalid(_))), "{path}");
    }
}

#[test]
fn empty_enums_and_double_defaults_are_rejected() {
    let empty_enum = json!({
        "name": "svc",
        "namespace": "io.example.v0",
        "enums": [{"name": "color", "values": []}]
    });
    assert!(matches!(parse(&empty_enum), Err(ContractParseError::Invalid(_))));
    let double_default = json!({
        "name": "svc",
        "namespace": "io.example.v0",
        "unions": [{"name": "u", "types": [
            {"type": "a", "default": true},
            {"type": "b", "default": true}
        ]}]
    });
    assert!(matches!(parse(&double_default), Err(ContractParseError::Invalid(_))));
}

#[test]
fn oversized_documents_are_rejected_before_parsing() {
    let bytes = vec![b' '; MAX_CONTRACT_BYTES + 1];
    let error = ServiceSpec::from_json_slice(&bytes).unwrap_err();
    assert!(matches!(error, ContractParseError::TooLarge { .. }));
}

#[test]
fn invalid_json_is_a_parse_error() {
    assert!(matches!(ServiceSpec::from_json_slice(b"{not json"), Err(ContractParseError::Parse(_))));
}
