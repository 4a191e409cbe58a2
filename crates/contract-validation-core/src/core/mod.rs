// crates/contract-validation-core/src/core/mod.rs
// ============================================================================
// Module: Contract Validation Core Types
// Description: Contract data model, type references, and field errors.
// Purpose: Provide the plain-data vocabulary consumed by the runtime engines.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe loaded contracts (services, resources, operations, and
//! the enum/model/union type vocabulary), parsed type references, and the
//! field-scoped error values produced by validation. None of these types
//! perform I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod errors;
pub mod method;
pub mod schema_type;
pub mod spec;
pub mod type_name;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use errors::FieldError;
pub use errors::FieldErrorKind;
pub use errors::ValidationErrors;
pub use method::HttpMethod;
pub use method::MethodParseError;
pub use schema_type::SchemaType;
pub use schema_type::TypeKind;
pub use spec::BodyDecl;
pub use spec::ContractParseError;
pub use spec::DEFAULT_DISCRIMINATOR_KEY;
pub use spec::EnumDecl;
pub use spec::EnumValueDecl;
pub use spec::FieldDecl;
pub use spec::MAX_CONTRACT_BYTES;
pub use spec::ModelDecl;
pub use spec::OperationDecl;
pub use spec::ResourceDecl;
pub use spec::ResponseCode;
pub use spec::ResponseDecl;
pub use spec::ServiceSpec;
pub use spec::UnionDecl;
pub use spec::UnionMemberDecl;
pub use type_name::TypeName;
