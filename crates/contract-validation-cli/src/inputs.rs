// crates/contract-validation-cli/src/inputs.rs
// ============================================================================
// Module: CLI Inputs
// Description: Size-limited reads of contract documents and request bodies.
// Purpose: Keep every file and stdin read bounded before parsing.
// Dependencies: contract-validation-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Contract documents and JSON bodies are untrusted. Every read enforces a
//! hard byte limit before the content reaches a parser.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use contract_validation_core::MAX_CONTRACT_BYTES;
use contract_validation_core::ServiceSpec;
use serde_json::Value;
use thiserror::Error;

use crate::CliError;
use crate::CliResult;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted request body size in bytes.
pub(crate) const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Errors raised while reading size-limited input.
#[derive(Debug, Error)]
pub(crate) enum ReadLimitError {
    /// File or stream I/O failure.
    #[error("{0}")]
    Io(io::Error),
    /// Input size exceeds the configured limit.
    #[error("input is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
pub(crate) fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    read_with_limit(file, max_bytes)
}

/// Reads a stream to its end while enforcing a hard size limit.
pub(crate) fn read_with_limit(reader: impl Read, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let read_limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut limited = reader.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Loads contract documents in priority order.
pub(crate) fn load_contracts(paths: &[PathBuf]) -> CliResult<Vec<ServiceSpec>> {
    paths
        .iter()
        .map(|path| {
            let bytes = read_bytes_with_limit(path, MAX_CONTRACT_BYTES).map_err(|err| {
                CliError::new(format!("failed to read contract {}: {err}", path.display()))
            })?;
            ServiceSpec::from_json_slice(&bytes)
                .map_err(|err| CliError::new(format!("contract {}: {err}", path.display())))
        })
        .collect()
}

/// Reads a JSON body from a file, or from stdin when no file is given.
pub(crate) fn read_json_body(path: Option<&Path>) -> CliResult<Value> {
    let (bytes, source) = match path {
        Some(path) => (read_bytes_with_limit(path, MAX_BODY_BYTES), path.display().to_string()),
        None => (read_with_limit(io::stdin().lock(), MAX_BODY_BYTES), "stdin".to_string()),
    };
    let bytes = bytes.map_err(|err| CliError::new(format!("failed to read body from {source}: {err}")))?;
    parse_json(&bytes, &source)
}

/// Parses JSON text, naming its source on failure.
pub(crate) fn parse_json(bytes: &[u8], source: &str) -> CliResult<Value> {
    serde_json::from_slice(bytes)
        .map_err(|err| CliError::new(format!("invalid JSON in {source}: {err}")))
}
