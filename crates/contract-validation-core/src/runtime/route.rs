// crates/contract-validation-core/src/runtime/route.rs
// ============================================================================
// Module: Route Resolver
// Description: Method and path matching against declared operations.
// Purpose: Map a concrete request onto exactly one declared operation.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Path templates are ordered literal and `:name` placeholder segments. A
//! template matches a concrete path when segment counts agree and every
//! literal equals its concrete segment. When several templates of the same
//! method match, the one with the fewest placeholders wins, so a static
//! template always beats a templated one; remaining ties go to declaration
//! order.
//!
//! Resolution failures are reported singly: an unknown path, or a known path
//! requested with a method it does not declare (with the sorted list of
//! methods that do match).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::HttpMethod;
use crate::core::OperationDecl;
use crate::core::ServiceSpec;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix marking a named placeholder segment.
const PLACEHOLDER_PREFIX: char = ':';

// ============================================================================
// SECTION: Path Templates
// ============================================================================

/// Single segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathSegment {
    /// Literal segment that must match exactly.
    Literal(String),
    /// Named placeholder matching any single segment.
    Placeholder(String),
}

/// Parsed operation path template.
///
/// # Invariants
/// - `segments` never contains empty literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    /// Template as declared.
    raw: String,
    /// Parsed segments in order.
    segments: Vec<PathSegment>,
}

impl PathTemplate {
    /// Parses a path template such as `/:org/tokens`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let segments = split_path(raw)
            .into_iter()
            .map(|segment| match segment.strip_prefix(PLACEHOLDER_PREFIX) {
                Some(name) if !name.is_empty() => PathSegment::Placeholder(name.to_string()),
                _ => PathSegment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Returns the template as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of placeholder segments.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, PathSegment::Placeholder(_)))
            .count()
    }

    /// Returns true when the template has no placeholders.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.placeholder_count() == 0
    }

    /// Returns true when the template matches the concrete segments.
    #[must_use]
    pub fn matches(&self, concrete: &[&str]) -> bool {
        self.segments.len() == concrete.len()
            && self.segments.iter().zip(concrete).all(|(segment, actual)| match segment {
                PathSegment::Literal(literal) => literal == actual,
                PathSegment::Placeholder(_) => true,
            })
    }

    /// Binds placeholders to concrete segments, in template order.
    #[must_use]
    pub fn bind(&self, concrete: &[&str]) -> Option<Vec<PathParameter>> {
        if !self.matches(concrete) {
            return None;
        }
        Some(
            self.segments
                .iter()
                .zip(concrete)
                .filter_map(|(segment, actual)| match segment {
                    PathSegment::Placeholder(name) => Some(PathParameter {
                        name: name.clone(),
                        value: (*actual).to_string(),
                    }),
                    PathSegment::Literal(_) => None,
                })
                .collect(),
        )
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Placeholder binding captured during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathParameter {
    /// Placeholder name without the leading `:`.
    pub name: String,
    /// Concrete segment bound to the placeholder.
    pub value: String,
}

// ============================================================================
// SECTION: Route Errors
// ============================================================================

/// Route resolution failures.
///
/// # Invariants
/// - `allowed` lists are sorted by method label and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No operation matches the path under any method.
    #[error("HTTP path {path} is not defined")]
    UnknownPath {
        /// Requested path.
        path: String,
    },
    /// The path is known but not under the requested method.
    #[error("HTTP method '{method}' not supported for path {path} - {}", describe_allowed(.allowed))]
    MethodNotAllowed {
        /// Requested method.
        method: HttpMethod,
        /// Requested path.
        path: String,
        /// Methods that match the path.
        allowed: Vec<HttpMethod>,
    },
    /// The method label is not a known HTTP method.
    #[error("HTTP method '{method}' is invalid")]
    InvalidMethod {
        /// Rejected method label.
        method: String,
    },
}

impl RouteError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::UnknownPath {
                ..
            } => "unknown_path",
            Self::MethodNotAllowed {
                ..
            } => "method_not_allowed",
            Self::InvalidMethod {
                ..
            } => "invalid_method",
        }
    }
}

/// Renders the allowed-method clause of a method mismatch error.
fn describe_allowed(allowed: &[HttpMethod]) -> String {
    match allowed {
        [] => "no methods available".to_string(),
        [only] => format!("available method: {only}"),
        many => {
            let labels: Vec<&str> = many.iter().map(|method| method.as_str()).collect();
            format!("available methods: {}", labels.join(", "))
        }
    }
}

// ============================================================================
// SECTION: Route Resolver
// ============================================================================

/// Successful route resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Matched operation.
    pub operation: &'a OperationDecl,
    /// Matched path template.
    pub template: &'a PathTemplate,
    /// Placeholder bindings in template order.
    pub parameters: Vec<PathParameter>,
}

/// Declared operation with its parsed template.
#[derive(Debug, Clone)]
struct Route {
    /// Declared method.
    method: HttpMethod,
    /// Parsed path template.
    template: PathTemplate,
    /// Operation declaration.
    operation: OperationDecl,
}

/// Resolves requests against one contract's operations.
///
/// # Invariants
/// - Routes are kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteResolver {
    /// Declared routes.
    routes: Vec<Route>,
}

impl RouteResolver {
    /// Builds a resolver from a contract's operations.
    #[must_use]
    pub fn new(contract: &ServiceSpec) -> Self {
        let routes = contract
            .operations()
            .map(|operation| Route {
                method: operation.method,
                template: PathTemplate::parse(&operation.path),
                operation: operation.clone(),
            })
            .collect();
        Self {
            routes,
        }
    }

    /// Returns the number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true when no routes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolves a method label and concrete path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidMethod`] for unknown method labels, and
    /// the errors of [`RouteResolver::resolve`] otherwise.
    pub fn resolve_label(&self, method: &str, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        let parsed = method.parse::<HttpMethod>().map_err(|_| RouteError::InvalidMethod {
            method: method.to_string(),
        })?;
        self.resolve(parsed, path)
    }

    /// Resolves a method and concrete path to a declared operation.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPath`] when no template matches the path
    /// and [`RouteError::MethodNotAllowed`] when only other methods match.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        let concrete = split_path(path);
        let mut best: Option<&Route> = None;
        for route in self.matching(&concrete).filter(|route| route.method == method) {
            let better = best.is_none_or(|current| {
                route.template.placeholder_count() < current.template.placeholder_count()
            });
            if better {
                best = Some(route);
            }
        }
        if let Some(route) = best {
            return Ok(RouteMatch {
                operation: &route.operation,
                template: &route.template,
                parameters: route.template.bind(&concrete).unwrap_or_default(),
            });
        }
        let allowed = self.methods_matching(&concrete);
        if allowed.is_empty() {
            return Err(RouteError::UnknownPath {
                path: path.to_string(),
            });
        }
        Err(RouteError::MethodNotAllowed {
            method,
            path: path.to_string(),
            allowed,
        })
    }

    /// Returns the sorted methods declared for a concrete path.
    #[must_use]
    pub fn methods_for(&self, path: &str) -> Vec<HttpMethod> {
        self.methods_matching(&split_path(path))
    }

    /// Returns true when any operation matches the path under any method.
    #[must_use]
    pub fn is_path_known(&self, path: &str) -> bool {
        self.matching(&split_path(path)).next().is_some()
    }

    /// Iterates routes whose template matches the concrete segments.
    fn matching<'r, 'c>(
        &'r self,
        concrete: &'c [&'c str],
    ) -> impl Iterator<Item = &'r Route> + use<'r, 'c> {
        self.routes.iter().filter(move |route| route.template.matches(concrete))
    }

    /// Returns sorted, deduplicated methods matching the concrete segments.
    fn methods_matching(&self, concrete: &[&str]) -> Vec<HttpMethod> {
        let mut methods: Vec<HttpMethod> = self.matching(concrete).map(|route| route.method).collect();
        HttpMethod::sort_and_dedup(&mut methods);
        methods
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a path into non-empty segments, ignoring any query string.
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.split_once('?').map_or(path, |(head, _)| head);
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
