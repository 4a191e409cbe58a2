// crates/contract-validation-core/src/core/schema_type.rs
// ============================================================================
// Module: Schema Types
// Description: Closed variant over enum, model, and union declarations.
// Purpose: Give resolved type references a canonical identity and owner.
// Dependencies: crate::core::spec, serde
// ============================================================================

//! ## Overview
//! A [`SchemaType`] pairs a raw declaration with the contract that owns it.
//! Values are constructed lazily by lookups and never cached; the qualified
//! identifier `namespace.{enums|models|unions}.name` is the identity key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::spec::EnumDecl;
use crate::core::spec::ModelDecl;
use crate::core::spec::ServiceSpec;
use crate::core::spec::UnionDecl;

// ============================================================================
// SECTION: Type Kind
// ============================================================================

/// Declaration kind of a schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Enumeration of string values.
    Enum,
    /// Object with declared fields.
    Model,
    /// Discriminated union of member types.
    Union,
}

impl TypeKind {
    /// Returns the plural collection label used in qualified names.
    #[must_use]
    pub const fn collection_label(self) -> &'static str {
        match self {
            Self::Enum => "enums",
            Self::Model => "models",
            Self::Union => "unions",
        }
    }

    /// Parses a plural collection label.
    #[must_use]
    pub fn from_collection_label(label: &str) -> Option<Self> {
        match label {
            "enums" => Some(Self::Enum),
            "models" => Some(Self::Model),
            "unions" => Some(Self::Union),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Schema Type
// ============================================================================

/// Resolved schema type borrowed from its owning contract.
///
/// # Invariants
/// - `decl` is a declaration owned by `contract`.
/// - Equality follows the qualified identifier, not the declaration contents.
#[derive(Debug, Clone, Copy)]
pub enum SchemaType<'a> {
    /// Enum declaration.
    Enum {
        /// Owning contract.
        contract: &'a ServiceSpec,
        /// Raw enum declaration.
        decl: &'a EnumDecl,
    },
    /// Model declaration.
    Model {
        /// Owning contract.
        contract: &'a ServiceSpec,
        /// Raw model declaration.
        decl: &'a ModelDecl,
    },
    /// Union declaration.
    Union {
        /// Owning contract.
        contract: &'a ServiceSpec,
        /// Raw union declaration.
        decl: &'a UnionDecl,
    },
}

impl<'a> SchemaType<'a> {
    /// Returns the declaration kind.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Enum {
                ..
            } => TypeKind::Enum,
            Self::Model {
                ..
            } => TypeKind::Model,
            Self::Union {
                ..
            } => TypeKind::Union,
        }
    }

    /// Returns the contract that owns the declaration.
    #[must_use]
    pub const fn contract(&self) -> &'a ServiceSpec {
        match *self {
            Self::Enum {
                contract, ..
            }
            | Self::Model {
                contract, ..
            }
            | Self::Union {
                contract, ..
            } => contract,
        }
    }

    /// Returns the bare declared name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Enum {
                decl, ..
            } => &decl.name,
            Self::Model {
                decl, ..
            } => &decl.name,
            Self::Union {
                decl, ..
            } => &decl.name,
        }
    }

    /// Returns the namespace of the owning contract.
    #[must_use]
    pub fn namespace(&self) -> &'a str {
        &self.contract().namespace
    }

    /// Returns the canonical `namespace.{enums|models|unions}.name` identifier.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.namespace(), self.kind().collection_label(), self.name())
    }
}

impl PartialEq for SchemaType<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.name() == other.name()
            && self.namespace() == other.namespace()
    }
}

impl Eq for SchemaType<'_> {}
