// crates/contract-validation-core/src/core/spec.rs
// ============================================================================
// Module: Contract Data Model
// Description: Service, resource, operation, and type declarations.
// Purpose: Deserialize contract documents into immutable plain data.
// Dependencies: crate::core::{method, schema_type, type_name}, serde, serde_json
// ============================================================================

//! ## Overview
//! A contract (service specification) declares resources with their
//! operations and a closed type vocabulary of enums, models, and unions.
//! [`ServiceSpec::from_json_slice`] is the ingestion boundary: it enforces a
//! size limit, deserializes the JSON document, and checks structural
//! invariants, reporting a single descriptive error on failure.
//!
//! Security posture: contract documents may come from remote sources and are
//! treated as untrusted until validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::method::HttpMethod;
use crate::core::schema_type::SchemaType;
use crate::core::schema_type::TypeKind;
use crate::core::type_name::TypeName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted contract document size in bytes.
pub const MAX_CONTRACT_BYTES: usize = 16 * 1024 * 1024;
/// Union discriminator key used when a union does not declare one.
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "discriminator";

// ============================================================================
// SECTION: Service
// ============================================================================

/// Loaded contract describing one versioned service.
///
/// # Invariants
/// - `name` and `namespace` are non-empty once validated.
/// - Declarations are immutable for the lifetime of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Service name.
    pub name: String,
    /// Namespace that qualifies every type declared by this service.
    pub namespace: String,
    /// Declared enums.
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Declared models.
    #[serde(default)]
    pub models: Vec<ModelDecl>,
    /// Declared unions.
    #[serde(default)]
    pub unions: Vec<UnionDecl>,
    /// Declared resources and their operations.
    #[serde(default)]
    pub resources: Vec<ResourceDecl>,
}

impl ServiceSpec {
    /// Parses and validates a contract document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ContractParseError`] when the document is too large, is not
    /// valid JSON for the contract shape, or violates structural invariants.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ContractParseError> {
        if bytes.len() > MAX_CONTRACT_BYTES {
            return Err(ContractParseError::TooLarge {
                size: bytes.len(),
                limit: MAX_CONTRACT_BYTES,
            });
        }
        let spec: Self = serde_json::from_slice(bytes)
            .map_err(|err| ContractParseError::Parse(err.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Checks structural invariants of the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractParseError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ContractParseError> {
        ensure_non_empty(&self.name, "service name")?;
        ensure_non_empty(&self.namespace, "service namespace")?;
        validate_namespace(&self.namespace)?;
        for decl in &self.enums {
            ensure_non_empty(&decl.name, "enum name")?;
            if decl.values.is_empty() {
                return Err(invalid(format!("enum {} declares no values", decl.name)));
            }
        }
        for decl in &self.models {
            ensure_non_empty(&decl.name, "model name")?;
            for field in &decl.fields {
                ensure_non_empty(&field.name, "field name")?;
                ensure_non_empty(&field.type_ref, "field type")?;
            }
        }
        for decl in &self.unions {
            ensure_non_empty(&decl.name, "union name")?;
            for member in &decl.types {
                ensure_non_empty(&member.type_ref, "union member type")?;
            }
            if decl.types.iter().filter(|member| member.default).count() > 1 {
                return Err(invalid(format!("union {} declares more than one default", decl.name)));
            }
        }
        for operation in self.operations() {
            validate_path_template(&operation.path)?;
        }
        Ok(())
    }

    /// Iterates over all operations in resource declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDecl> {
        self.resources.iter().flat_map(|resource| resource.operations.iter())
    }

    /// Finds a declared type by bare name, optionally restricted to one kind.
    ///
    /// Enums are searched first, then models, then unions.
    #[must_use]
    pub fn find_type(&self, name: &str, kind: Option<TypeKind>) -> Option<SchemaType<'_>> {
        let wants = |candidate: TypeKind| kind.is_none_or(|kind| kind == candidate);
        if wants(TypeKind::Enum)
            && let Some(decl) = self.enums.iter().find(|decl| decl.name == name)
        {
            return Some(SchemaType::Enum {
                contract: self,
                decl,
            });
        }
        if wants(TypeKind::Model)
            && let Some(decl) = self.models.iter().find(|decl| decl.name == name)
        {
            return Some(SchemaType::Model {
                contract: self,
                decl,
            });
        }
        if wants(TypeKind::Union)
            && let Some(decl) = self.unions.iter().find(|decl| decl.name == name)
        {
            return Some(SchemaType::Union {
                contract: self,
                decl,
            });
        }
        None
    }
}

// ============================================================================
// SECTION: Type Declarations
// ============================================================================

/// Enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
    /// Declared values in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValueDecl>,
}

impl EnumDecl {
    /// Returns the accepted wire values in declaration order.
    pub fn wire_values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(EnumValueDecl::wire_value)
    }
}

/// Single enum value declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDecl {
    /// Value name.
    pub name: String,
    /// Explicit wire value overriding the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnumValueDecl {
    /// Returns the value accepted on the wire.
    #[must_use]
    pub fn wire_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }
}

/// Model declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDecl {
    /// Model name.
    pub name: String,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// Model field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name as it appears in JSON payloads.
    pub name: String,
    /// Declared type expression (primitive, type name, `[T]`, `T[]`, `map[T]`).
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Whether the field must be present.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Value inserted when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Union declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionDecl {
    /// Union name.
    pub name: String,
    /// Discriminator key; defaults to [`DEFAULT_DISCRIMINATOR_KEY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// Member types in declaration order.
    #[serde(default)]
    pub types: Vec<UnionMemberDecl>,
}

impl UnionDecl {
    /// Returns the key that carries the discriminator value.
    #[must_use]
    pub fn discriminator_key(&self) -> &str {
        self.discriminator.as_deref().unwrap_or(DEFAULT_DISCRIMINATOR_KEY)
    }

    /// Finds the member whose discriminator value matches.
    #[must_use]
    pub fn member_for(&self, discriminator_value: &str) -> Option<&UnionMemberDecl> {
        self.types.iter().find(|member| member.discriminator_value() == discriminator_value)
    }

    /// Returns the member used when no discriminator is present.
    #[must_use]
    pub fn default_member(&self) -> Option<&UnionMemberDecl> {
        self.types.iter().find(|member| member.default)
    }
}

/// Union member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionMemberDecl {
    /// Member type expression.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Explicit discriminator value; defaults to the bare type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
    /// Whether this member applies when the discriminator is absent.
    #[serde(default)]
    pub default: bool,
}

impl UnionMemberDecl {
    /// Returns the discriminator value identifying this member.
    #[must_use]
    pub fn discriminator_value(&self) -> &str {
        match &self.discriminator_value {
            Some(value) => value,
            None => bare_type_name(&self.type_ref),
        }
    }
}

// ============================================================================
// SECTION: Resource Declarations
// ============================================================================

/// Resource declaration grouping operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDecl {
    /// Type the resource exposes.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Base path of the resource, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Operations with fully qualified path templates.
    #[serde(default)]
    pub operations: Vec<OperationDecl>,
}

/// Operation declaration: method, path template, and payload types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDecl {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template, e.g. `/:org/tokens`.
    pub path: String,
    /// Request body declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyDecl>,
    /// Declared responses.
    #[serde(default)]
    pub responses: Vec<ResponseDecl>,
}

impl OperationDecl {
    /// Returns the declared body type, if any.
    #[must_use]
    pub fn body_type(&self) -> Option<&str> {
        self.body.as_ref().map(|body| body.type_ref.as_str())
    }

    /// Returns the response type for a status code, falling back to `default`.
    #[must_use]
    pub fn response_type(&self, status: u16) -> Option<&str> {
        self.responses
            .iter()
            .find(|response| response.code == ResponseCode::Status(status))
            .or_else(|| self.responses.iter().find(|response| response.code == ResponseCode::Default))
            .map(|response| response.type_ref.as_str())
    }
}

/// Request body declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyDecl {
    /// Body type expression.
    #[serde(rename = "type")]
    pub type_ref: String,
}

/// Response declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDecl {
    /// Status code or `default`.
    pub code: ResponseCode,
    /// Response body type expression.
    #[serde(rename = "type")]
    pub type_ref: String,
}

/// Response status code selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ResponseCode {
    /// Exact HTTP status.
    Status(u16),
    /// Fallback for any status without an exact entry.
    Default,
}

impl TryFrom<Value> for ResponseCode {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => number
                .as_u64()
                .and_then(|code| u16::try_from(code).ok())
                .map(Self::Status)
                .ok_or_else(|| format!("invalid response code: {number}")),
            Value::String(label) if label.eq_ignore_ascii_case("default") => Ok(Self::Default),
            Value::String(label) => label
                .parse::<u16>()
                .map(Self::Status)
                .map_err(|_| format!("invalid response code: {label}")),
            other => Err(format!("invalid response code: {other}")),
        }
    }
}

impl From<ResponseCode> for Value {
    fn from(value: ResponseCode) -> Self {
        match value {
            ResponseCode::Status(code) => Self::from(code),
            ResponseCode::Default => Self::String("default".to_string()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Contract ingestion errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractParseError {
    /// Document exceeds the size limit.
    #[error("contract document is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        /// Document size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
    /// Document is not valid JSON for the contract shape.
    #[error("contract parse error: {0}")]
    Parse(String),
    /// Document violates a structural invariant.
    #[error("invalid contract: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for [`FieldDecl::required`].
const fn default_required() -> bool {
    true
}

/// Builds an invalid-contract error.
const fn invalid(message: String) -> ContractParseError {
    ContractParseError::Invalid(message)
}

/// Rejects empty or whitespace-only labels.
fn ensure_non_empty(value: &str, label: &str) -> Result<(), ContractParseError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{label} must be non-empty")));
    }
    Ok(())
}

/// Rejects namespaces that are not dot-separated identifier segments.
fn validate_namespace(namespace: &str) -> Result<(), ContractParseError> {
    let well_formed = namespace.split('.').all(|segment| {
        !segment.is_empty()
            && segment.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    });
    if !well_formed {
        return Err(invalid(format!(
            "service namespace {namespace} must be dot-separated identifier segments"
        )));
    }
    Ok(())
}

/// Rejects path templates that are relative or contain unnamed placeholders.
fn validate_path_template(path: &str) -> Result<(), ContractParseError> {
    if !path.starts_with('/') {
        return Err(invalid(format!("operation path {path} must start with '/'")));
    }
    if path.split('/').any(|segment| segment == ":") {
        return Err(invalid(format!("operation path {path} has an unnamed placeholder")));
    }
    Ok(())
}

/// Returns the bare name component of a type expression.
fn bare_type_name(type_ref: &str) -> &str {
    match TypeName::parse(type_ref) {
        Some(parsed) if parsed.namespace().is_some() => {
            type_ref.rsplit('.').next().unwrap_or(type_ref)
        }
        _ => type_ref,
    }
}
