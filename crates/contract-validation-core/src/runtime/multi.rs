// crates/contract-validation-core/src/runtime/multi.rs
// ============================================================================
// Module: Multi-Contract Facade
// Description: Priority-ordered routing across several loaded contracts.
// Purpose: Pick exactly one owning contract per request and forward upcasts.
// Dependencies: crate::{audit, core, runtime}, serde_json
// ============================================================================

//! ## Overview
//! [`MultiContractFacade`] holds contracts in priority order, earliest first.
//! A request is owned by:
//! 1. the only contract whose route matches, or
//! 2. when several match, the first whose matched template is static, else
//!    the first match in priority order, or
//! 3. when none match, the first contract that knows the path under another
//!    method supplies the method mismatch error.
//!
//! All facades share one type universe, so bare type names resolve in the
//! owning contract's namespace first and then across the remaining contracts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::audit::AuditOutcome;
use crate::audit::NoopAuditSink;
use crate::audit::UPCAST_EVENT;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditEventParams;
use crate::audit::ValidationAuditSink;
use crate::core::HttpMethod;
use crate::core::OperationDecl;
use crate::core::ServiceSpec;
use crate::core::ValidationErrors;
use crate::runtime::facade::ContractFacade;
use crate::runtime::facade::INVALID_PAYLOAD_LABEL;
use crate::runtime::facade::UpcastError;
use crate::runtime::facade::record_route;
use crate::runtime::facade::record_upcast;
use crate::runtime::route::RouteError;
use crate::runtime::route::RouteMatch;
use crate::runtime::validator::TypeValidator;
use crate::runtime::validator::ValidationLimits;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Owning contract and matched route for a request.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Facade of the owning contract.
    pub facade: &'a ContractFacade,
    /// Route matched within the owning contract.
    pub route: RouteMatch<'a>,
}

// ============================================================================
// SECTION: Facade
// ============================================================================

/// Routing and validation facade over priority-ordered contracts.
///
/// # Invariants
/// - `facades` preserves load order; earlier entries take priority.
/// - Every facade shares the same type universe.
#[derive(Clone)]
pub struct MultiContractFacade {
    /// Per-contract facades in priority order.
    facades: Vec<ContractFacade>,
    /// Contracts in priority order, shared with every facade.
    universe: Arc<[Arc<ServiceSpec>]>,
    /// Validation limits.
    limits: ValidationLimits,
    /// Audit sink for resolution and upcast outcomes.
    audit: Arc<dyn ValidationAuditSink>,
}

impl fmt::Debug for MultiContractFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiContractFacade")
            .field("facades", &self.facades)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl MultiContractFacade {
    /// Creates a facade over contracts in priority order.
    #[must_use]
    pub fn new(contracts: Vec<ServiceSpec>) -> Self {
        Self::from_shared(contracts.into_iter().map(Arc::new).collect())
    }

    /// Creates a facade over shared contracts in priority order.
    #[must_use]
    pub fn from_shared(contracts: Vec<Arc<ServiceSpec>>) -> Self {
        let universe: Arc<[Arc<ServiceSpec>]> = Arc::from(contracts);
        let facades = universe
            .iter()
            .map(|contract| ContractFacade::from_shared(Arc::clone(contract), Arc::clone(&universe)))
            .collect();
        Self {
            facades,
            universe,
            limits: ValidationLimits::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the validation limits of every contract.
    #[must_use]
    pub fn with_limits(self, limits: ValidationLimits) -> Self {
        Self {
            facades: self.facades.into_iter().map(|facade| facade.with_limits(limits)).collect(),
            limits,
            ..self
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the per-contract facades in priority order.
    #[must_use]
    pub fn facades(&self) -> &[ContractFacade] {
        &self.facades
    }

    /// Returns the number of loaded contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facades.len()
    }

    /// Returns true when no contracts are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facades.is_empty()
    }

    /// Returns a validator over all loaded contracts.
    #[must_use]
    pub fn type_validator(&self) -> TypeValidator<'_> {
        TypeValidator::new(&self.universe).with_limits(self.limits)
    }

    /// Picks the owning contract for a request and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first contract's method mismatch error when the path is
    /// only known under other methods, [`RouteError::UnknownPath`] when no
    /// contract knows the path, and [`RouteError::InvalidMethod`] for unknown
    /// method labels.
    pub fn resolve(&self, method: &str, path: &str) -> Result<Resolution<'_>, RouteError> {
        let result = self.resolve_owner(method, path);
        let contract = result.as_ref().ok().map(|resolution| resolution.facade.contract().name.as_str());
        let route = result.as_ref().map(|resolution| &resolution.route);
        record_route(self.audit.as_ref(), method, path, contract, route);
        result
    }

    /// Resolves a request to a declared operation in its owning contract.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`MultiContractFacade::resolve`].
    pub fn validate(&self, method: &str, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        self.resolve(method, path).map(|resolution| resolution.route)
    }

    /// Returns the operation of the owning contract, if any.
    #[must_use]
    pub fn operation(&self, method: &str, path: &str) -> Option<&OperationDecl> {
        self.resolve_owner(method, path).ok().map(|resolution| resolution.route.operation)
    }

    /// Returns the body type declared by the owning contract's operation.
    #[must_use]
    pub fn body_type(&self, method: &str, path: &str) -> Option<&str> {
        self.operation(method, path).and_then(OperationDecl::body_type)
    }

    /// Returns the response type for a status, falling back to `default`.
    #[must_use]
    pub fn response_type(&self, method: &str, path: &str, status: u16) -> Option<&str> {
        self.operation(method, path).and_then(|operation| operation.response_type(status))
    }

    /// Returns the sorted union of methods any contract declares for a path.
    #[must_use]
    pub fn methods_for(&self, path: &str) -> Vec<HttpMethod> {
        let mut methods: Vec<HttpMethod> =
            self.facades.iter().flat_map(|facade| facade.methods_for(path)).collect();
        HttpMethod::sort_and_dedup(&mut methods);
        methods
    }

    /// Returns true when any contract declares the path.
    #[must_use]
    pub fn is_path_known(&self, path: &str) -> bool {
        self.facades.iter().any(|facade| facade.is_path_known(path))
    }

    /// Upcasts a request body using the owning contract's body type.
    ///
    /// # Errors
    ///
    /// Returns [`UpcastError::Route`] when no contract owns the request and
    /// [`UpcastError::Invalid`] when the body fails validation.
    pub fn upcast(&self, method: &str, path: &str, body: &Value) -> Result<Value, UpcastError> {
        let mut params = ValidationAuditEventParams::request(UPCAST_EVENT, method, path);
        let result = self.resolve_owner(method, path).map_err(UpcastError::from).and_then(|resolution| {
            resolution
                .facade
                .upcast_matched(&resolution.route, body, &mut params)
                .map_err(UpcastError::from)
        });
        record_upcast(self.audit.as_ref(), params, result.as_ref().err());
        result
    }

    /// Upcasts a value against a type reference.
    ///
    /// Bare names resolve in the highest-priority contract's namespace first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the value fails validation.
    pub fn upcast_type(&self, type_ref: &str, body: &Value) -> Result<Value, ValidationErrors> {
        let namespace = self.universe.first().map_or("", |contract| contract.namespace.as_str());
        let result = self.type_validator().validate_type(type_ref, namespace, body);
        let mut params = ValidationAuditEventParams::new(UPCAST_EVENT);
        params.type_ref = Some(type_ref.to_string());
        if let Err(errors) = &result {
            params.outcome = AuditOutcome::Invalid;
            params.error_kind = Some(INVALID_PAYLOAD_LABEL);
            params.error_count = errors.len();
        }
        self.audit.record(&ValidationAuditEvent::new(params));
        result
    }

    /// Picks the owning contract without recording an audit event.
    fn resolve_owner(&self, method: &str, path: &str) -> Result<Resolution<'_>, RouteError> {
        let mut matches = Vec::new();
        let mut mismatch = None;
        for facade in &self.facades {
            match facade.resolve_route(method, path) {
                Ok(route) => matches.push(Resolution {
                    facade,
                    route,
                }),
                Err(error @ RouteError::MethodNotAllowed { .. }) => {
                    if mismatch.is_none() {
                        mismatch = Some(error);
                    }
                }
                Err(error @ RouteError::InvalidMethod { .. }) => return Err(error),
                Err(RouteError::UnknownPath { .. }) => {}
            }
        }
        let unknown = || RouteError::UnknownPath {
            path: path.to_string(),
        };
        if matches.is_empty() {
            return Err(mismatch.unwrap_or_else(unknown));
        }
        let owner = matches.iter().position(|resolution| resolution.route.template.is_static()).unwrap_or(0);
        matches.into_iter().nth(owner).ok_or_else(unknown)
    }
}
