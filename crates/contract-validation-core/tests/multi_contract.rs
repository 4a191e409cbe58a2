// crates/contract-validation-core/tests/multi_contract.rs
// ============================================================================
// Module: Multi-Contract Facade Tests
// Description: Ownership selection and type resolution across contracts.
// Purpose: Pin priority order, static preference, and shared type lookup.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Loads several small contracts into one `MultiContractFacade` and checks
//! which contract owns each request and where bare type names resolve.

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

use contract_validation_core::HttpMethod;
use contract_validation_core::MultiContractFacade;
use contract_validation_core::RouteError;
use contract_validation_core::ServiceSpec;
use serde_json::json;

use crate::common::contract_from;
use crate::common::routes_contract;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Contract declaring `money` with an amount and currency.
fn ledger_contract() -> ServiceSpec {
    contract_from(&json!({
        "name": "ledger",
        "namespace": "io.example.ledger.v0",
        "models": [
            {
                "name": "money",
                "fields": [
                    {"name": "amount", "type": "decimal"},
                    {"name": "currency", "type": "string"}
                ]
            },
            {
                "name": "entry",
                "fields": [{"name": "value", "type": "money"}]
            }
        ],
        "resources": [
            {
                "type": "entry",
                "operations": [
                    {"method": "POST", "path": "/entries", "body": {"type": "entry"}},
                    {"method": "POST", "path": "/jobs"}
                ]
            }
        ]
    }))
}

/// Contract declaring its own `money` and a type found only in the ledger.
fn billing_contract() -> ServiceSpec {
    contract_from(&json!({
        "name": "billing",
        "namespace": "io.example.billing.v0",
        "models": [
            {
                "name": "money",
                "fields": [{"name": "cents", "type": "long"}]
            },
            {
                "name": "invoice",
                "fields": [
                    {"name": "total", "type": "money"},
                    {"name": "entry", "type": "entry", "required": false}
                ]
            }
        ],
        "resources": [
            {
                "type": "invoice",
                "operations": [
                    {"method": "POST", "path": "/invoices", "body": {"type": "invoice"}},
                    {"method": "GET", "path": "/jobs"},
                    {"method": "DELETE", "path": "/jobs"}
                ]
            }
        ]
    }))
}

// ============================================================================
// SECTION: Ownership
// ============================================================================

#[test]
fn earliest_contract_wins_identical_static_routes() {
    let facade = MultiContractFacade::new(vec![
        routes_contract("alpha", "io.example.alpha.v0", &["/health"]),
        routes_contract("beta", "io.example.beta.v0", &["/health"]),
    ]);
    let resolution = facade.resolve("GET", "/health").unwrap();
    assert_eq!(resolution.facade.contract().name, "alpha");
}

#[test]
fn static_route_beats_earlier_templated_route() {
    let facade = MultiContractFacade::new(vec![
        routes_contract("alpha", "io.example.alpha.v0", &["/:service"]),
        routes_contract("beta", "io.example.beta.v0", &["/health"]),
    ]);
    let resolution = facade.resolve("GET", "/health").unwrap();
    assert_eq!(resolution.facade.contract().name, "beta");
    let templated = facade.resolve("GET", "/metrics").unwrap();
    assert_eq!(templated.facade.contract().name, "alpha");
    assert_eq!(templated.route.parameters[0].value, "metrics");
}

#[test]
fn earliest_templated_match_wins_without_static_routes() {
    let facade = MultiContractFacade::new(vec![
        routes_contract("alpha", "io.example.alpha.v0", &["/:service"]),
        routes_contract("gamma", "io.example.gamma.v0", &["/:name"]),
    ]);
    let matched = facade.validate("GET", "/health").unwrap();
    assert_eq!(matched.template.as_str(), "/:service");
}

#[test]
fn method_mismatch_comes_from_first_contract_knowing_the_path() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    let error = facade.resolve("PUT", "/jobs").unwrap_err();
    assert_eq!(error, RouteError::MethodNotAllowed {
        method: HttpMethod::Put,
        path: "/jobs".to_string(),
        allowed: vec![HttpMethod::Post],
    });
    assert_eq!(facade.methods_for("/jobs"), vec![
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Post,
    ]);
    assert_eq!(facade.resolve("GET", "/jobs").unwrap().facade.contract().name, "billing");
}

#[test]
fn unknown_paths_and_methods_are_rejected() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    assert!(matches!(facade.resolve("GET", "/nowhere"), Err(RouteError::UnknownPath { .. })));
    assert!(matches!(facade.resolve("BREW", "/jobs"), Err(RouteError::InvalidMethod { .. })));
    assert!(!facade.is_path_known("/nowhere"));
    assert!(facade.is_path_known("/invoices"));
}

// ============================================================================
// SECTION: Type Resolution
// ============================================================================

#[test]
fn owner_namespace_takes_precedence_for_bare_names() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    let upcast = facade.upcast("POST", "/invoices", &json!({"total": {"cents": "1250"}})).unwrap();
    assert_eq!(upcast, json!({"total": {"cents": 1250}}));
    let ledger = facade.upcast("POST", "/entries", &json!({"value": {"amount": "2.5"}})).unwrap_err();
    assert_eq!(ledger.messages(), vec!["value.currency: missing required field".to_string()]);
}

#[test]
fn bare_names_fall_back_to_other_contracts() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    let body = json!({
        "total": {"cents": 1},
        "entry": {"value": {"amount": 3, "currency": "EUR"}}
    });
    assert_eq!(facade.upcast("POST", "/invoices", &body).unwrap(), body);
    assert_eq!(facade.body_type("POST", "/invoices"), Some("invoice"));
}

#[test]
fn upcast_type_prefers_the_first_contract_namespace() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    let errors = facade.upcast_type("money", &json!({"cents": 5})).unwrap_err();
    assert_eq!(errors.len(), 2);
    let billing = facade.upcast_type("io.example.billing.v0.models.money", &json!({"cents": 5}));
    assert_eq!(billing.unwrap(), json!({"cents": 5}));
}

#[test]
fn shared_universe_is_visible_to_every_facade() {
    let facade = MultiContractFacade::new(vec![ledger_contract(), billing_contract()]);
    assert_eq!(facade.len(), 2);
    for contract in facade.facades() {
        let validator = contract.type_validator();
        assert_eq!(validator.resolve("money", contract.namespace()).len(), 2);
        assert_eq!(validator.resolve("money", contract.namespace())[0].namespace(), contract.namespace());
    }
}
