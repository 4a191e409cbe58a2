// crates/contract-validation-core/src/core/method.rs
// ============================================================================
// Module: HTTP Methods
// Description: Closed set of HTTP methods declared by contract operations.
// Purpose: Normalize method strings from contracts and requests.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Contracts and callers spell methods in any case; both sides normalize to
//! the [`HttpMethod`] enum so comparisons never depend on casing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Method Type
// ============================================================================

/// HTTP method declared on a contract operation.
///
/// # Invariants
/// - Labels returned by [`HttpMethod::as_str`] are uppercase and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// PATCH.
    Patch,
    /// DELETE.
    Delete,
    /// HEAD.
    Head,
    /// CONNECT.
    Connect,
    /// OPTIONS.
    Options,
    /// TRACE.
    Trace,
}

impl HttpMethod {
    /// All supported methods.
    pub const ALL: [Self; 9] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Connect,
        Self::Options,
        Self::Trace,
    ];

    /// Returns the uppercase wire label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }

    /// Sorts methods by their wire label and removes duplicates.
    pub fn sort_and_dedup(methods: &mut Vec<Self>) {
        methods.sort_by_key(|method| method.as_str());
        methods.dedup();
    }
}

/// Error returned when a method label is not a known HTTP method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP method '{0}' is invalid")]
pub struct MethodParseError(pub String);

impl FromStr for HttpMethod {
    type Err = MethodParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MethodParseError(value.to_string()))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = MethodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
