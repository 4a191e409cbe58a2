// crates/contract-validation-config/src/lib.rs
// ============================================================================
// Module: Contract Validation Config Library
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for contract-validation.toml semantics.
// Dependencies: contract-validation-core, serde, toml
// ============================================================================

//! ## Overview
//! `contract-validation-config` defines the configuration model for the
//! contract validation tooling: which contracts to load and in what priority,
//! validation and form data limits, and where audit events go.
//!
//! Security posture: config inputs are untrusted and fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
