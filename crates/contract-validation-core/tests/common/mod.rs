// crates/contract-validation-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared contracts and helpers for core integration tests.
// Purpose: Provide deterministic contract fixtures across test binaries.
// Dependencies: contract-validation-core, serde_json
// ============================================================================

//! ## Overview
//! Fixtures are built as JSON documents and loaded through
//! `ServiceSpec::from_json_slice`, so every test also exercises ingestion.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use contract_validation_core::ContractFacade;
use contract_validation_core::ServiceSpec;
use contract_validation_core::ValidationAuditEvent;
use contract_validation_core::ValidationAuditSink;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads a contract fixture through the ingestion boundary.
pub fn contract_from(document: &Value) -> ServiceSpec {
    let bytes = serde_json::to_vec(document).unwrap();
    ServiceSpec::from_json_slice(&bytes).expect("fixture contract must be valid")
}

// ============================================================================
// SECTION: Shop Contract
// ============================================================================

/// Namespace of the shop fixture.
pub const SHOP_NAMESPACE: &str = "io.example.shop.v0";

/// Contract covering every declaration kind and the routing edge cases.
pub fn shop_document() -> Value {
    json!({
        "name": "shop",
        "namespace": SHOP_NAMESPACE,
        "enums": [
            {
                "name": "order_status",
                "values": [
                    {"name": "placed"},
                    {"name": "shipped"},
                    {"name": "cancelled", "value": "CANCELLED"}
                ]
            }
        ],
        "models": [
            {
                "name": "customer",
                "fields": [
                    {"name": "name", "type": "string"},
                    {"name": "email", "type": "string", "required": false}
                ]
            },
            {
                "name": "order",
                "fields": [
                    {"name": "id", "type": "uuid"},
                    {"name": "customer", "type": "customer"},
                    {"name": "status", "type": "order_status"},
                    {"name": "quantity", "type": "integer"},
                    {"name": "placed_at", "type": "date-time-iso8601", "required": false},
                    {"name": "tags", "type": "[string]", "required": false},
                    {"name": "attributes", "type": "map[long]", "required": false},
                    {"name": "gift", "type": "boolean", "required": false, "default": false}
                ]
            },
            {
                "name": "settings",
                "fields": [
                    {"name": "theme", "type": "string", "required": false}
                ]
            },
            {
                "name": "profile",
                "fields": [
                    {"name": "settings", "type": "settings"}
                ]
            },
            {
                "name": "left",
                "fields": [
                    {"name": "right", "type": "right"}
                ]
            },
            {
                "name": "right",
                "fields": [
                    {"name": "left", "type": "left"},
                    {"name": "label", "type": "string"}
                ]
            },
            {
                "name": "tree",
                "fields": [
                    {"name": "children", "type": "tree[]", "required": false}
                ]
            },
            {
                "name": "dog",
                "fields": [
                    {"name": "name", "type": "string"},
                    {"name": "good", "type": "boolean", "required": false}
                ]
            },
            {
                "name": "cat",
                "fields": [
                    {"name": "name", "type": "string"},
                    {"name": "lives", "type": "integer", "required": false}
                ]
            },
            {
                "name": "circle",
                "fields": [
                    {"name": "radius", "type": "decimal"}
                ]
            },
            {
                "name": "square",
                "fields": [
                    {"name": "side", "type": "decimal"}
                ]
            },
            {
                "name": "token_request",
                "fields": [
                    {"name": "scope", "type": "string"}
                ]
            },
            {
                "name": "user_token_request",
                "fields": [
                    {"name": "user_id", "type": "long"}
                ]
            },
            {
                "name": "error_body",
                "fields": [
                    {"name": "message", "type": "string"}
                ]
            }
        ],
        "unions": [
            {
                "name": "pet",
                "types": [
                    {"type": "dog"},
                    {"type": "cat"}
                ]
            },
            {
                "name": "shape",
                "discriminator": "kind",
                "types": [
                    {"type": "circle", "discriminator_value": "round"},
                    {"type": "square", "default": true}
                ]
            },
            {
                "name": "status_or_count",
                "types": [
                    {"type": "order_status"},
                    {"type": "integer"}
                ]
            }
        ],
        "resources": [
            {
                "type": "order",
                "path": "/orders",
                "operations": [
                    {"method": "POST", "path": "/orders", "body": {"type": "order"}},
                    {
                        "method": "GET",
                        "path": "/orders/:id",
                        "responses": [
                            {"code": 200, "type": "order"},
                            {"code": "default", "type": "error_body"}
                        ]
                    },
                    {"method": "DELETE", "path": "/orders/:id"},
                    {"method": "PUT", "path": "/orders/:id", "body": {"type": "io.example.shop.v0.models.order"}}
                ]
            },
            {
                "type": "token_request",
                "operations": [
                    {"method": "POST", "path": "/:org/tokens", "body": {"type": "token_request"}},
                    {"method": "POST", "path": "/users/tokens", "body": {"type": "user_token_request"}},
                    {"method": "POST", "path": "/:org/:kind"}
                ]
            },
            {
                "type": "pet",
                "operations": [
                    {"method": "POST", "path": "/pets", "body": {"type": "pet"}},
                    {"method": "POST", "path": "/shapes", "body": {"type": "shape"}},
                    {"method": "POST", "path": "/profiles", "body": {"type": "profile"}},
                    {"method": "POST", "path": "/uploads", "body": {"type": "unknown_blob"}}
                ]
            }
        ]
    })
}

/// Loads the shop contract.
pub fn shop_contract() -> ServiceSpec {
    contract_from(&shop_document())
}

/// Builds a facade over the shop contract.
pub fn shop_facade() -> ContractFacade {
    ContractFacade::new(shop_contract())
}

/// A valid order payload for the shop contract.
pub fn valid_order() -> Value {
    json!({
        "id": "5ecf6502-e532-4738-aad5-7ac9701251dd",
        "customer": {"name": "Ada"},
        "status": "placed",
        "quantity": 2
    })
}

// ============================================================================
// SECTION: Routing Contracts
// ============================================================================

/// Builds a contract declaring `GET` operations on the given paths.
pub fn routes_contract(name: &str, namespace: &str, paths: &[&str]) -> ServiceSpec {
    let operations: Vec<Value> =
        paths.iter().map(|path| json!({"method": "GET", "path": path})).collect();
    contract_from(&json!({
        "name": name,
        "namespace": namespace,
        "resources": [{"type": "status", "operations": operations}]
    }))
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Recorded events in order.
    events: Mutex<Vec<ValidationAuditEvent>>,
}

impl RecordingSink {
    /// Creates a shared recording sink.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<ValidationAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ValidationAuditSink for RecordingSink {
    fn record(&self, event: &ValidationAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
