// crates/contract-validation-core/src/runtime/validator.rs
// ============================================================================
// Module: Type Validator
// Description: Recursive, type-directed JSON validation and upcasting.
// Purpose: Normalize payloads to declared types and report every field error.
// Dependencies: crate::core, crate::runtime::primitives, serde_json
// ============================================================================

//! ## Overview
//! [`TypeValidator`] walks a JSON value against a declared type expression:
//! a primitive name, a bare or qualified type name, `T[]`/`[T]` arrays, or
//! `map[T]` maps. Validation is exhaustive: every nested failure is recorded
//! with its field path, and the upcast tree is built even when errors occur.
//!
//! Recursion is bounded by [`ValidationLimits::max_depth`]. Required nested
//! models are synthesized from `{}` only when they are not already on the
//! current model path, so cyclic schemas terminate.
//!
//! Security posture: payloads are untrusted; exceeding the depth limit is a
//! field error, never a crash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::core::EnumDecl;
use crate::core::FieldDecl;
use crate::core::FieldError;
use crate::core::FieldErrorKind;
use crate::core::ModelDecl;
use crate::core::SchemaType;
use crate::core::ServiceSpec;
use crate::core::TypeName;
use crate::core::UnionDecl;
use crate::core::ValidationErrors;
use crate::runtime::primitives::Primitive;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum nesting depth for validation.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Key carrying the payload of a non-object union member.
const UNION_VALUE_KEY: &str = "value";

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Bounds applied to one validation pass.
///
/// # Invariants
/// - `max_depth` counts nested containers below the root value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum nesting depth before a depth error is reported.
    pub max_depth: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// SECTION: Type Expressions
// ============================================================================

/// Parsed shape of a declared type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeExpr<'t> {
    /// `T[]` or `[T]`.
    Array(&'t str),
    /// `map[T]`, or bare `map` for string values.
    Map(&'t str),
    /// Primitive or declared type name.
    Named(&'t str),
}

impl<'t> TypeExpr<'t> {
    /// Parses a type expression; the suffix form `T[]` is checked first.
    fn parse(type_ref: &'t str) -> Self {
        let trimmed = type_ref.trim();
        if let Some(inner) = trimmed.strip_suffix("[]")
            && !inner.is_empty()
        {
            return Self::Array(inner);
        }
        if trimmed == "map" {
            return Self::Map("string");
        }
        if let Some(inner) = trimmed.strip_prefix("map[").and_then(|rest| rest.strip_suffix(']')) {
            return Self::Map(inner);
        }
        if let Some(inner) = trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return Self::Array(inner);
        }
        Self::Named(trimmed)
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Type-directed validator over an ordered list of contracts.
///
/// # Invariants
/// - Contract order is priority order for ambiguous bare names.
/// - Validation never mutates contracts or the input value.
#[derive(Debug, Clone, Copy)]
pub struct TypeValidator<'a> {
    /// Contracts searched during type resolution, highest priority first.
    contracts: &'a [Arc<ServiceSpec>],
    /// Recursion limits.
    limits: ValidationLimits,
}

impl<'a> TypeValidator<'a> {
    /// Creates a validator with default limits.
    #[must_use]
    pub fn new(contracts: &'a [Arc<ServiceSpec>]) -> Self {
        Self {
            contracts,
            limits: ValidationLimits::default(),
        }
    }

    /// Replaces the validation limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the contracts searched by this validator.
    #[must_use]
    pub const fn contracts(&self) -> &'a [Arc<ServiceSpec>] {
        self.contracts
    }

    /// Returns the active limits.
    #[must_use]
    pub const fn limits(&self) -> ValidationLimits {
        self.limits
    }

    /// Resolves a type reference to every matching declaration.
    ///
    /// Qualified references only match contracts with that namespace. Bare
    /// references list matches in `default_namespace` first, then matches in
    /// the remaining contracts, each group in contract order.
    #[must_use]
    pub fn resolve(&self, reference: &str, default_namespace: &str) -> Vec<SchemaType<'a>> {
        let Some(name) = TypeName::parse(reference) else {
            return Vec::new();
        };
        let contracts = self.contracts;
        let find = |contract: &'a Arc<ServiceSpec>| contract.find_type(name.name(), name.kind());
        match name.namespace() {
            Some(namespace) => contracts
                .iter()
                .filter(|contract| contract.namespace == namespace)
                .filter_map(find)
                .collect(),
            None => {
                let preferred = contracts
                    .iter()
                    .filter(|contract| contract.namespace == default_namespace)
                    .filter_map(find);
                let others = contracts
                    .iter()
                    .filter(|contract| contract.namespace != default_namespace)
                    .filter_map(find);
                preferred.chain(others).collect()
            }
        }
    }

    /// Validates and upcasts a value against a resolved schema type.
    ///
    /// `prefix` is prepended to every reported field path.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding every field error found.
    pub fn validate(
        &self,
        schema: SchemaType<'a>,
        value: &Value,
        prefix: &str,
    ) -> Result<Value, ValidationErrors> {
        let mut pass = ValidationPass::new(*self);
        let upcast = pass.schema(schema, value, prefix, 0);
        pass.finish(upcast)
    }

    /// Validates and upcasts a value against a type expression.
    ///
    /// Unresolvable type names pass the value through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding every field error found.
    pub fn validate_type(
        &self,
        type_ref: &str,
        default_namespace: &str,
        value: &Value,
    ) -> Result<Value, ValidationErrors> {
        let mut pass = ValidationPass::new(*self);
        let upcast = pass.expr(type_ref, default_namespace, value, "", 0);
        pass.finish(upcast)
    }
}

// ============================================================================
// SECTION: Validation Pass
// ============================================================================

/// Mutable state of one validation pass.
struct ValidationPass<'a> {
    /// Validator configuration.
    validator: TypeValidator<'a>,
    /// Errors in visit order.
    errors: Vec<FieldError>,
    /// Qualified names of models on the current path.
    ancestors: Vec<String>,
}

impl<'a> ValidationPass<'a> {
    /// Starts an empty pass.
    const fn new(validator: TypeValidator<'a>) -> Self {
        Self {
            validator,
            errors: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    /// Converts the pass into its final result.
    fn finish(self, upcast: Value) -> Result<Value, ValidationErrors> {
        match ValidationErrors::from_errors(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(upcast),
        }
    }

    /// Records a field error.
    fn fail(&mut self, path: &str, kind: FieldErrorKind) {
        self.errors.push(FieldError::new(path, kind));
    }

    /// Returns true and records an error when `depth` exceeds the limit.
    fn too_deep(&mut self, path: &str, depth: usize) -> bool {
        let limit = self.validator.limits.max_depth;
        if depth > limit {
            self.fail(path, FieldErrorKind::DepthExceeded {
                limit,
            });
            return true;
        }
        false
    }

    /// Validates a value against a type expression.
    fn expr(
        &mut self,
        type_ref: &str,
        namespace: &str,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Value {
        if self.too_deep(path, depth) {
            return value.clone();
        }
        match TypeExpr::parse(type_ref) {
            TypeExpr::Array(inner) => self.array(inner, namespace, value, path, depth),
            TypeExpr::Map(inner) => self.map(inner, namespace, value, path, depth),
            TypeExpr::Named(name) => {
                if let Some(primitive) = Primitive::parse(name) {
                    return match primitive.coerce(value) {
                        Ok(upcast) => upcast,
                        Err(kind) => {
                            self.fail(path, kind);
                            value.clone()
                        }
                    };
                }
                match self.validator.resolve(name, namespace).first() {
                    Some(schema) => self.schema(*schema, value, path, depth),
                    None => value.clone(),
                }
            }
        }
    }

    /// Validates array elements; a single scalar is wrapped in an array.
    fn array(
        &mut self,
        inner: &str,
        namespace: &str,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.expr(inner, namespace, item, &index_path(path, index), depth + 1)
                    })
                    .collect(),
            ),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                let item = self.expr(inner, namespace, value, &index_path(path, 0), depth + 1);
                Value::Array(vec![item])
            }
            Value::Null | Value::Object(_) => {
                self.fail(path, FieldErrorKind::invalid_type("an array"));
                value.clone()
            }
        }
    }

    /// Validates map values; keys pass through unchanged.
    fn map(
        &mut self,
        inner: &str,
        namespace: &str,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Value {
        let Value::Object(entries) = value else {
            self.fail(path, FieldErrorKind::invalid_type("an object"));
            return value.clone();
        };
        let mut output = Map::new();
        for (key, item) in entries {
            let upcast = self.expr(inner, namespace, item, &child_path(path, key), depth + 1);
            output.insert(key.clone(), upcast);
        }
        Value::Object(output)
    }

    /// Validates a value against a resolved schema type.
    fn schema(&mut self, schema: SchemaType<'a>, value: &Value, path: &str, depth: usize) -> Value {
        if self.too_deep(path, depth) {
            return value.clone();
        }
        match schema {
            SchemaType::Enum {
                decl, ..
            } => self.enumeration(decl, value, path),
            SchemaType::Model {
                contract,
                decl,
            } => {
                self.ancestors.push(schema.qualified_name());
                let upcast = self.model(contract, decl, value, path, depth);
                self.ancestors.pop();
                upcast
            }
            SchemaType::Union {
                contract,
                decl,
            } => self.union(contract, decl, value, path, depth),
        }
    }

    /// Validates an enum value by exact wire-value match.
    fn enumeration(&mut self, decl: &EnumDecl, value: &Value, path: &str) -> Value {
        let text = scalar_text(value);
        if decl.wire_values().any(|allowed| allowed == text) {
            return Value::String(text);
        }
        self.fail(path, FieldErrorKind::InvalidEnumValue {
            value: text,
            allowed: decl.wire_values().map(str::to_string).collect(),
        });
        value.clone()
    }

    /// Validates declared model fields; undeclared keys pass through.
    ///
    /// Supplied keys keep their input order. Defaults and placeholders for
    /// absent fields follow in declaration order.
    fn model(
        &mut self,
        contract: &'a ServiceSpec,
        decl: &'a ModelDecl,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Value {
        let Value::Object(entries) = value else {
            self.fail(path, FieldErrorKind::invalid_type("an object"));
            return value.clone();
        };
        let mut upcasts: Vec<(&'a str, Option<Value>)> = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let field_path = child_path(path, &field.name);
            let supplied = entries.get(&field.name).filter(|item| !item.is_null());
            let upcast = match supplied.or(field.default.as_ref()) {
                Some(item) => {
                    Some(self.expr(&field.type_ref, &contract.namespace, item, &field_path, depth + 1))
                }
                None if field.required => self.missing(contract, field, &field_path, depth),
                None => None,
            };
            upcasts.push((field.name.as_str(), upcast));
        }
        let positions: BTreeMap<&str, usize> =
            upcasts.iter().enumerate().map(|(index, (name, _))| (*name, index)).collect();
        let mut output = Map::with_capacity(entries.len() + upcasts.len());
        for (key, item) in entries {
            let declared = positions
                .get(key.as_str())
                .and_then(|index| upcasts.get_mut(*index))
                .and_then(|(_, slot)| slot.take());
            output.insert(key.clone(), declared.unwrap_or_else(|| item.clone()));
        }
        for (name, upcast) in upcasts {
            if let Some(upcast) = upcast {
                output.insert(name.to_string(), upcast);
            }
        }
        Value::Object(output)
    }

    /// Reports a missing required field, synthesizing nested models.
    ///
    /// Returns the synthesized placeholder when one was built. A required
    /// field is always reported missing, even when the synthesized nested
    /// model validates cleanly.
    fn missing(
        &mut self,
        contract: &'a ServiceSpec,
        field: &FieldDecl,
        path: &str,
        depth: usize,
    ) -> Option<Value> {
        let nested = match TypeExpr::parse(&field.type_ref) {
            TypeExpr::Named(name) => self
                .validator
                .resolve(name, &contract.namespace)
                .into_iter()
                .next()
                .filter(|schema| matches!(schema, SchemaType::Model { .. }))
                .filter(|schema| !self.ancestors.contains(&schema.qualified_name())),
            TypeExpr::Array(_) | TypeExpr::Map(_) => None,
        };
        let Some(schema) = nested else {
            self.fail(path, FieldErrorKind::MissingRequired);
            return None;
        };
        let before = self.errors.len();
        let placeholder = self.schema(schema, &Value::Object(Map::new()), path, depth + 1);
        if self.errors.len() == before {
            self.fail(path, FieldErrorKind::MissingRequired);
        }
        Some(placeholder)
    }

    /// Validates a discriminated union value.
    fn union(
        &mut self,
        contract: &'a ServiceSpec,
        decl: &'a UnionDecl,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Value {
        let Value::Object(entries) = value else {
            self.fail(path, FieldErrorKind::invalid_type("an object"));
            return value.clone();
        };
        let key = decl.discriminator_key();
        let allowed = || -> Vec<String> {
            decl.types.iter().map(|member| member.discriminator_value().to_string()).collect()
        };
        let member = match entries.get(key) {
            Some(discriminator) => {
                let text = scalar_text(discriminator);
                match decl.member_for(&text) {
                    Some(member) => member,
                    None => {
                        self.fail(path, FieldErrorKind::UnknownDiscriminator {
                            key: key.to_string(),
                            value: text,
                            allowed: allowed(),
                        });
                        return value.clone();
                    }
                }
            }
            None => match decl.default_member() {
                Some(member) => member,
                None => {
                    self.fail(path, FieldErrorKind::MissingDiscriminator {
                        key: key.to_string(),
                        allowed: allowed(),
                    });
                    return value.clone();
                }
            },
        };
        let resolved = match TypeExpr::parse(&member.type_ref) {
            TypeExpr::Named(name) => self.validator.resolve(name, &contract.namespace).into_iter().next(),
            TypeExpr::Array(_) | TypeExpr::Map(_) => None,
        };
        match resolved {
            Some(schema @ (SchemaType::Model { .. } | SchemaType::Union { .. })) => {
                let mut upcast = self.schema(schema, value, path, depth + 1);
                if let (Value::Object(output), Some(discriminator)) = (&mut upcast, entries.get(key))
                    && !output.contains_key(key)
                {
                    output.insert(key.to_string(), discriminator.clone());
                }
                upcast
            }
            Some(SchemaType::Enum { .. }) | None => {
                let value_path = child_path(path, UNION_VALUE_KEY);
                let mut output = entries.clone();
                match entries.get(UNION_VALUE_KEY).filter(|item| !item.is_null()) {
                    Some(item) => {
                        let upcast = self.expr(
                            &member.type_ref,
                            &contract.namespace,
                            item,
                            &value_path,
                            depth + 1,
                        );
                        output.insert(UNION_VALUE_KEY.to_string(), upcast);
                    }
                    None => self.fail(&value_path, FieldErrorKind::MissingRequired),
                }
                Value::Object(output)
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends a field name to a dotted path.
fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

/// Appends an array index to a path.
fn index_path(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

/// Renders a scalar as text; composite values render as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::TypeExpr;

    #[test]
    fn type_expressions_parse_suffix_before_brackets() {
        assert_eq!(TypeExpr::parse("user[]"), TypeExpr::Array("user"));
        assert_eq!(TypeExpr::parse("[user]"), TypeExpr::Array("user"));
        assert_eq!(TypeExpr::parse("map[long]"), TypeExpr::Map("long"));
        assert_eq!(TypeExpr::parse("map"), TypeExpr::Map("string"));
        assert_eq!(TypeExpr::parse("[string][]"), TypeExpr::Array("[string]"));
        assert_eq!(TypeExpr::parse("io.example.models.user"), TypeExpr::Named("io.example.models.user"));
    }
}
