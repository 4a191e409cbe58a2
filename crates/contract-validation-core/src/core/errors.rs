// crates/contract-validation-core/src/core/errors.rs
// ============================================================================
// Module: Field Validation Errors
// Description: Field-scoped validation errors and their aggregate.
// Purpose: Report every payload problem found in one validation pass.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Validation is exhaustive: every problem is recorded as a [`FieldError`]
//! carrying a dotted field path (`user.email`, `items[2].sku`) and a typed
//! [`FieldErrorKind`]. [`ValidationErrors`] preserves the visit order, which is
//! model declaration order followed by union and array expansion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Reason a single field failed validation.
///
/// # Invariants
/// - Display strings are stable and human readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field is absent or null.
    #[error("missing required field")]
    MissingRequired,
    /// Value has the wrong JSON shape and cannot be coerced.
    #[error("must be {expected}")]
    InvalidType {
        /// Description of the expected shape, e.g. `an object`.
        expected: String,
    },
    /// Value is textual but does not match the required format.
    #[error("must be a valid {expected}")]
    InvalidFormat {
        /// Description of the expected format.
        expected: String,
    },
    /// Value is not one of the declared enum values.
    #[error("invalid value '{value}', valid values are: {}", quote_all(.allowed))]
    InvalidEnumValue {
        /// Rejected value.
        value: String,
        /// Declared wire values.
        allowed: Vec<String>,
    },
    /// Discriminator value does not identify a union member.
    #[error("invalid {key} '{value}', valid values are: {}", quote_all(.allowed))]
    UnknownDiscriminator {
        /// Discriminator key.
        key: String,
        /// Rejected discriminator value.
        value: String,
        /// Declared member discriminator values.
        allowed: Vec<String>,
    },
    /// Union value carries no discriminator and the union has no default member.
    #[error("missing {key}, valid values are: {}", quote_all(.allowed))]
    MissingDiscriminator {
        /// Discriminator key.
        key: String,
        /// Declared member discriminator values.
        allowed: Vec<String>,
    },
    /// Nesting exceeds the configured recursion limit.
    #[error("exceeds maximum nesting depth of {limit}")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },
}

impl FieldErrorKind {
    /// Builds an [`FieldErrorKind::InvalidType`] error.
    #[must_use]
    pub fn invalid_type(expected: &str) -> Self {
        Self::InvalidType {
            expected: expected.to_string(),
        }
    }

    /// Builds an [`FieldErrorKind::InvalidFormat`] error.
    #[must_use]
    pub fn invalid_format(expected: &str) -> Self {
        Self::InvalidFormat {
            expected: expected.to_string(),
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::InvalidType {
                ..
            } => "invalid_type",
            Self::InvalidFormat {
                ..
            } => "invalid_format",
            Self::InvalidEnumValue {
                ..
            } => "invalid_enum_value",
            Self::UnknownDiscriminator {
                ..
            } => "unknown_discriminator",
            Self::MissingDiscriminator {
                ..
            } => "missing_discriminator",
            Self::DepthExceeded {
                ..
            } => "depth_exceeded",
        }
    }
}

// ============================================================================
// SECTION: Field Error
// ============================================================================

/// Validation error scoped to a field path.
///
/// # Invariants
/// - `path` is empty for errors on the root value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted field path; empty at the root.
    pub path: String,
    /// Error reason.
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for FieldError {}

// ============================================================================
// SECTION: Aggregate
// ============================================================================

/// Non-empty, ordered list of field errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wraps collected errors; returns `None` when there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(Self(errors)) }
    }

    /// Returns the errors in visit order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the rendered error messages in visit order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no errors are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the aggregate and returns the errors.
    #[must_use]
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders values as a comma-separated list of single-quoted strings.
fn quote_all(values: &[String]) -> String {
    values.iter().map(|value| format!("'{value}'")).collect::<Vec<_>>().join(", ")
}
