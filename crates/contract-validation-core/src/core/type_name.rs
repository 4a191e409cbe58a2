// crates/contract-validation-core/src/core/type_name.rs
// ============================================================================
// Module: Type Name References
// Description: Parsing for bare and qualified contract type references.
// Purpose: Split `namespace.kind.name` references into lookup components.
// Dependencies: crate::core::schema_type
// ============================================================================

//! ## Overview
//! A type reference is either a bare `name` (resolved against a caller-supplied
//! default namespace) or a qualified `namespace.kind.name` where `kind` is one
//! of `enums`, `models`, or `unions`. References with at least three segments
//! are qualified; shorter references are bare.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::schema_type::TypeKind;

// ============================================================================
// SECTION: Type Name
// ============================================================================

/// Parsed contract type reference.
///
/// # Invariants
/// - `name` is never empty.
/// - `namespace` is `None` only for bare references.
/// - `kind` is only set when the qualified reference names a known collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Namespace component when the reference is qualified.
    namespace: Option<String>,
    /// Collection hint extracted from a qualified reference.
    kind: Option<TypeKind>,
    /// Bare type name.
    name: String,
}

impl TypeName {
    /// Parses a type reference. Returns `None` when the name component is empty.
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        let segments: Vec<&str> = reference.split('.').collect();
        let (last, rest) = segments.split_last()?;
        if last.is_empty() {
            return None;
        }
        if segments.len() < 3 {
            return Some(Self {
                namespace: None,
                kind: None,
                name: reference.to_string(),
            });
        }
        let (kind, namespace_segments) = match rest.split_last() {
            Some((label, head)) => match TypeKind::from_collection_label(label) {
                Some(kind) => (Some(kind), head),
                None => (None, rest),
            },
            None => (None, rest),
        };
        let namespace = namespace_segments.join(".");
        if namespace.is_empty() || namespace_segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }
        Some(Self {
            namespace: Some(namespace),
            kind,
            name: (*last).to_string(),
        })
    }

    /// Returns the bare type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace when the reference was qualified.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the collection hint when the reference was qualified.
    #[must_use]
    pub const fn kind(&self) -> Option<TypeKind> {
        self.kind
    }

    /// Returns the namespace, falling back to the supplied default.
    #[must_use]
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.namespace, self.kind) {
            (Some(namespace), Some(kind)) => {
                write!(f, "{namespace}.{}.{}", kind.collection_label(), self.name)
            }
            (Some(namespace), None) => write!(f, "{namespace}.{}", self.name),
            (None, _) => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::TypeName;
    use crate::core::schema_type::TypeKind;

    #[test]
    fn bare_names_leave_namespace_absent() {
        let parsed = TypeName::parse("user").unwrap();
        assert_eq!(parsed.name(), "user");
        assert_eq!(parsed.namespace(), None);
        assert_eq!(parsed.namespace_or("io.example.v0"), "io.example.v0");
    }

    #[test]
    fn two_segments_stay_bare() {
        let parsed = TypeName::parse("v0.user").unwrap();
        assert_eq!(parsed.name(), "v0.user");
        assert_eq!(parsed.namespace(), None);
    }

    #[test]
    fn qualified_names_split_kind_from_namespace() {
        let parsed = TypeName::parse("io.example.v0.models.user").unwrap();
        assert_eq!(parsed.name(), "user");
        assert_eq!(parsed.namespace(), Some("io.example.v0"));
        assert_eq!(parsed.kind(), Some(TypeKind::Model));
        assert_eq!(parsed.to_string(), "io.example.v0.models.user");
    }

    #[test]
    fn qualified_names_without_kind_keep_remainder() {
        let parsed = TypeName::parse("io.example.user").unwrap();
        assert_eq!(parsed.name(), "user");
        assert_eq!(parsed.namespace(), Some("io.example"));
        assert_eq!(parsed.kind(), None);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(TypeName::parse("").is_none());
        assert!(TypeName::parse("io.example.models.").is_none());
        assert!(TypeName::parse(".models.user").is_none());
    }
}
