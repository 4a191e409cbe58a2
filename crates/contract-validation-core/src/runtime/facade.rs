// crates/contract-validation-core/src/runtime/facade.rs
// ============================================================================
// Module: Contract Facade
// Description: Single-contract composition of routing and type validation.
// Purpose: Answer which operation a request matches and upcast its payload.
// Dependencies: crate::{audit, core, runtime}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ContractFacade`] wraps one contract with its [`RouteResolver`]. Type
//! resolution searches the facade's contract universe, which is the contract
//! itself unless the facade was built by a [`crate::MultiContractFacade`].
//! Route resolution and upcast outcomes are reported to the configured audit
//! sink; the default sink discards them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::audit::AuditOutcome;
use crate::audit::NoopAuditSink;
use crate::audit::ROUTE_EVENT;
use crate::audit::UPCAST_EVENT;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditEventParams;
use crate::audit::ValidationAuditSink;
use crate::core::HttpMethod;
use crate::core::OperationDecl;
use crate::core::ServiceSpec;
use crate::core::ValidationErrors;
use crate::runtime::route::RouteError;
use crate::runtime::route::RouteMatch;
use crate::runtime::route::RouteResolver;
use crate::runtime::validator::TypeValidator;
use crate::runtime::validator::ValidationLimits;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error label recorded for payloads that fail field validation.
pub(crate) const INVALID_PAYLOAD_LABEL: &str = "invalid_payload";

/// Failure to upcast a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpcastError {
    /// The request does not match a declared operation.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// The payload failed field validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl UpcastError {
    /// Returns every human-readable error message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Route(error) => vec![error.to_string()],
            Self::Invalid(errors) => errors.messages(),
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Route(error) => error.kind_label(),
            Self::Invalid(_) => INVALID_PAYLOAD_LABEL,
        }
    }
}

// ============================================================================
// SECTION: Facade
// ============================================================================

/// Routing and validation facade over a single contract.
///
/// # Invariants
/// - `universe` contains `contract`.
/// - The contract is never mutated after construction.
#[derive(Clone)]
pub struct ContractFacade {
    /// Contract answered by this facade.
    contract: Arc<ServiceSpec>,
    /// Contracts searched for type resolution, highest priority first.
    universe: Arc<[Arc<ServiceSpec>]>,
    /// Route resolver over the contract's operations.
    resolver: RouteResolver,
    /// Validation limits.
    limits: ValidationLimits,
    /// Audit sink for resolution and upcast outcomes.
    audit: Arc<dyn ValidationAuditSink>,
}

impl fmt::Debug for ContractFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractFacade")
            .field("contract", &self.contract.name)
            .field("namespace", &self.contract.namespace)
            .field("routes", &self.resolver.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl ContractFacade {
    /// Creates a facade whose type universe is the contract itself.
    #[must_use]
    pub fn new(contract: ServiceSpec) -> Self {
        let contract = Arc::new(contract);
        let universe: Arc<[Arc<ServiceSpec>]> = Arc::from(vec![Arc::clone(&contract)]);
        Self::from_shared(contract, universe)
    }

    /// Creates a facade over a shared contract and type universe.
    #[must_use]
    pub fn from_shared(contract: Arc<ServiceSpec>, universe: Arc<[Arc<ServiceSpec>]>) -> Self {
        let resolver = RouteResolver::new(&contract);
        Self {
            contract,
            universe,
            resolver,
            limits: ValidationLimits::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the contract answered by this facade.
    #[must_use]
    pub fn contract(&self) -> &ServiceSpec {
        &self.contract
    }

    /// Returns the contract namespace, the default for bare type names.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.contract.namespace
    }

    /// Returns a validator over this facade's type universe.
    #[must_use]
    pub fn type_validator(&self) -> TypeValidator<'_> {
        TypeValidator::new(&self.universe).with_limits(self.limits)
    }

    /// Resolves a request to a declared operation and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the method is invalid, the path is
    /// unknown, or the path is not declared for the method.
    pub fn validate(&self, method: &str, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        let result = self.resolve_route(method, path);
        record_route(self.audit.as_ref(), method, path, Some(self.contract.name.as_str()), result.as_ref());
        result
    }

    /// Resolves a request without recording an audit event.
    pub(crate) fn resolve_route(&self, method: &str, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        self.resolver.resolve_label(method, path)
    }

    /// Returns the operation matching the request, if any.
    #[must_use]
    pub fn operation(&self, method: &str, path: &str) -> Option<&OperationDecl> {
        self.resolve_route(method, path).ok().map(|matched| matched.operation)
    }

    /// Returns the body type declared by the matching operation.
    #[must_use]
    pub fn body_type(&self, method: &str, path: &str) -> Option<&str> {
        self.operation(method, path).and_then(OperationDecl::body_type)
    }

    /// Returns the response type for a status, falling back to `default`.
    #[must_use]
    pub fn response_type(&self, method: &str, path: &str, status: u16) -> Option<&str> {
        self.operation(method, path).and_then(|operation| operation.response_type(status))
    }

    /// Returns the sorted methods declared for a path.
    #[must_use]
    pub fn methods_for(&self, path: &str) -> Vec<HttpMethod> {
        self.resolver.methods_for(path)
    }

    /// Returns true when any operation declares the path.
    #[must_use]
    pub fn is_path_known(&self, path: &str) -> bool {
        self.resolver.is_path_known(path)
    }

    /// Upcasts a request body to the matching operation's body type.
    ///
    /// Operations without a body type, and body types that resolve to no
    /// declaration, return the body unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`UpcastError::Route`] when the request matches no operation
    /// and [`UpcastError::Invalid`] when the body fails validation.
    pub fn upcast(&self, method: &str, path: &str, body: &Value) -> Result<Value, UpcastError> {
        let mut params = ValidationAuditEventParams::request(UPCAST_EVENT, method, path);
        let result = self.resolve_route(method, path).map_err(UpcastError::from).and_then(|matched| {
            self.upcast_matched(&matched, body, &mut params).map_err(UpcastError::from)
        });
        record_upcast(self.audit.as_ref(), params, result.as_ref().err());
        result
    }

    /// Upcasts a body for an already-resolved route, filling audit details.
    pub(crate) fn upcast_matched(
        &self,
        matched: &RouteMatch<'_>,
        body: &Value,
        params: &mut ValidationAuditEventParams,
    ) -> Result<Value, ValidationErrors> {
        params.contract = Some(self.contract.name.clone());
        params.template = Some(matched.template.as_str().to_string());
        let Some(type_ref) = matched.operation.body_type() else {
            return Ok(body.clone());
        };
        params.type_ref = Some(type_ref.to_string());
        self.type_validator().validate_type(type_ref, self.namespace(), body)
    }

    /// Upcasts a value against a type reference in this facade's namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the value fails validation.
    pub fn upcast_type(&self, type_ref: &str, body: &Value) -> Result<Value, ValidationErrors> {
        let result = self.type_validator().validate_type(type_ref, self.namespace(), body);
        let mut params = ValidationAuditEventParams::new(UPCAST_EVENT);
        params.contract = Some(self.contract.name.clone());
        params.type_ref = Some(type_ref.to_string());
        if let Err(errors) = &result {
            params.outcome = AuditOutcome::Invalid;
            params.error_kind = Some(INVALID_PAYLOAD_LABEL);
            params.error_count = errors.len();
        }
        self.audit.record(&ValidationAuditEvent::new(params));
        result
    }
}

// ============================================================================
// SECTION: Audit Helpers
// ============================================================================

/// Records a route resolution outcome.
pub(crate) fn record_route(
    sink: &dyn ValidationAuditSink,
    method: &str,
    path: &str,
    contract: Option<&str>,
    result: Result<&RouteMatch<'_>, &RouteError>,
) {
    let mut params = ValidationAuditEventParams::request(ROUTE_EVENT, method, path);
    params.contract = contract.map(str::to_string);
    match result {
        Ok(matched) => {
            params.template = Some(matched.template.as_str().to_string());
        }
        Err(error) => {
            params.contract = None;
            params.outcome = AuditOutcome::Rejected;
            params.error_kind = Some(error.kind_label());
            params.error_count = 1;
        }
    }
    sink.record(&ValidationAuditEvent::new(params));
}

/// Records an upcast outcome.
pub(crate) fn record_upcast(
    sink: &dyn ValidationAuditSink,
    mut params: ValidationAuditEventParams,
    error: Option<&UpcastError>,
) {
    if let Some(error) = error {
        params.error_kind = Some(error.kind_label());
        match error {
            UpcastError::Route(_) => {
                params.outcome = AuditOutcome::Rejected;
                params.error_count = 1;
            }
            UpcastError::Invalid(errors) => {
                params.outcome = AuditOutcome::Invalid;
                params.error_count = errors.len();
            }
        }
    }
    sink.record(&ValidationAuditEvent::new(params));
}
