// crates/contract-validation-core/src/lib.rs
// ============================================================================
// Module: Contract Validation Core Library
// Description: Public API surface for contract-driven HTTP traffic validation.
// Purpose: Expose contract types, route resolution, upcasting, and form data.
// Dependencies: crate::{core, runtime, form_data, audit}
// ============================================================================

//! ## Overview
//! Contract validation core decides, for an arbitrary HTTP request, which
//! declared operation it matches and whether its payload conforms to (and can
//! be coerced into) the operation's declared body type. Several independently
//! versioned contracts may be loaded at once; earlier contracts take priority.
//!
//! All operations are pure and synchronous. Contracts are immutable once
//! loaded, so concurrent validations against one contract set need no locking.
//!
//! Security posture: request paths, bodies, and form payloads are untrusted;
//! recursion and bracket expansion are bounded by explicit limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod form_data;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::AuditOutcome;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditEventParams;
pub use audit::ValidationAuditSink;
pub use form_data::ExactNumberFormatter;
pub use form_data::FormDataCodec;
pub use form_data::FormDataLimits;
pub use form_data::NumberFormatter;
pub use form_data::decode as decode_form;
pub use form_data::encode as encode_form;
pub use form_data::rewrite_encoded as rewrite_form;
pub use runtime::ContractFacade;
pub use runtime::MultiContractFacade;
pub use runtime::PathParameter;
pub use runtime::PathSegment;
pub use runtime::PathTemplate;
pub use runtime::Primitive;
pub use runtime::Resolution;
pub use runtime::RouteError;
pub use runtime::RouteMatch;
pub use runtime::RouteResolver;
pub use runtime::TypeValidator;
pub use runtime::UpcastError;
pub use runtime::ValidationLimits;
