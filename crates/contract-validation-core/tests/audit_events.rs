// crates/contract-validation-core/tests/audit_events.rs
// ============================================================================
// Module: Validation Audit Tests
// Description: Audit events emitted by route resolution and upcasts.
// Purpose: Ensure every outcome is recorded without payload contents.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Attaches an in-memory sink to the facades and inspects recorded events.

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

use contract_validation_core::AuditOutcome;
use contract_validation_core::MultiContractFacade;
use serde_json::json;

use crate::common::RecordingSink;
use crate::common::routes_contract;
use crate::common::shop_facade;
use crate::common::valid_order;

#[test]
fn route_resolution_records_matched_template() {
    let sink = RecordingSink::shared();
    let facade = shop_facade().with_audit_sink(sink.clone());
    facade.validate("GET", "/orders/5").unwrap();
    facade.validate("GET", "/missing").unwrap_err();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "route_resolution");
    assert_eq!(events[0].outcome, AuditOutcome::Ok);
    assert_eq!(events[0].contract.as_deref(), Some("shop"));
    assert_eq!(events[0].template.as_deref(), Some("/orders/:id"));
    assert_eq!(events[1].outcome, AuditOutcome::Rejected);
    assert_eq!(events[1].error_kind, Some("unknown_path"));
    assert_eq!(events[1].contract, None);
}

#[test]
fn upcast_records_error_counts() {
    let sink = RecordingSink::shared();
    let facade = shop_facade().with_audit_sink(sink.clone());
    facade.upcast("POST", "/orders", &valid_order()).unwrap();
    facade.upcast("POST", "/orders", &json!({"customer": {}})).unwrap_err();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "payload_upcast");
    assert_eq!(events[0].type_ref.as_deref(), Some("order"));
    assert_eq!(events[0].outcome, AuditOutcome::Ok);
    assert_eq!(events[1].outcome, AuditOutcome::Invalid);
    assert_eq!(events[1].error_kind, Some("invalid_payload"));
    assert_eq!(events[1].error_count, 4);
}

#[test]
fn upcast_type_records_without_request_context() {
    let sink = RecordingSink::shared();
    let facade = shop_facade().with_audit_sink(sink.clone());
    facade.upcast_type("customer", &json!({"name": "Ada"})).unwrap();
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].method, None);
    assert_eq!(events[0].path, None);
    assert_eq!(events[0].contract.as_deref(), Some("shop"));
}

#[test]
fn serialized_events_never_carry_payloads() {
    let sink = RecordingSink::shared();
    let facade = shop_facade().with_audit_sink(sink.clone());
    facade.upcast("POST", "/orders", &json!({"customer": {"name": "secret-name"}})).unwrap_err();
    let rendered = serde_json::to_string(&sink.events()[0]).unwrap();
    assert!(!rendered.contains("secret-name"));
}

#[test]
fn multi_contract_resolution_names_the_owner() {
    let sink = RecordingSink::shared();
    let facade = MultiContractFacade::new(vec![
        routes_contract("alpha", "io.example.alpha.v0", &["/:service"]),
        routes_contract("beta", "io.example.beta.v0", &["/health"]),
    ])
    .with_audit_sink(sink.clone());
    facade.resolve("GET", "/health").unwrap();
    facade.upcast("POST", "/health", &json!({})).unwrap_err();

    let events = sink.events();
    assert_eq!(events[0].contract.as_deref(), Some("beta"));
    assert_eq!(events[1].event, "payload_upcast");
    assert_eq!(events[1].error_kind, Some("method_not_allowed"));
    assert_eq!(events[1].error_count, 1);
}
