// crates/contract-validation-core/src/runtime/mod.rs
// ============================================================================
// Module: Contract Validation Runtime
// Description: Route resolution, type validation, and contract facades.
// Purpose: Match requests to operations and upcast payloads to declared types.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The runtime composes two engines over immutable contracts: the
//! [`RouteResolver`] maps a method and concrete path to a declared operation,
//! and the [`TypeValidator`] recursively validates and upcasts JSON values.
//! [`ContractFacade`] and [`MultiContractFacade`] combine them for one or
//! several contracts, with contract list order as priority order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod facade;
pub mod multi;
pub mod primitives;
pub mod route;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use facade::ContractFacade;
pub use facade::UpcastError;
pub use multi::MultiContractFacade;
pub use multi::Resolution;
pub use primitives::Primitive;
pub use route::PathParameter;
pub use route::PathSegment;
pub use route::PathTemplate;
pub use route::RouteError;
pub use route::RouteMatch;
pub use route::RouteResolver;
pub use validator::TypeValidator;
pub use validator::ValidationLimits;
