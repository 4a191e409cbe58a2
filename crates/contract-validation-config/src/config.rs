// crates/contract-validation-config/src/config.rs
// ============================================================================
// Module: Contract Validation Configuration
// Description: Configuration loading and validation for contract tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: contract-validation-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed. Contract and audit paths
//! are resolved relative to the directory holding the config file.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use contract_validation_core::FileAuditSink;
use contract_validation_core::FormDataLimits;
use contract_validation_core::NoopAuditSink;
use contract_validation_core::StderrAuditSink;
use contract_validation_core::ValidationAuditSink;
use contract_validation_core::ValidationLimits;
use contract_validation_core::form_data::DEFAULT_MAX_ARRAY_INDEX;
use contract_validation_core::form_data::DEFAULT_MAX_KEY_DEPTH;
use contract_validation_core::runtime::validator::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "contract-validation.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTRACT_VALIDATION_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured contract documents.
pub(crate) const MAX_CONTRACT_PATHS: usize = 256;
/// Smallest accepted validation depth limit.
pub(crate) const MIN_VALIDATION_DEPTH: usize = 1;
/// Largest accepted validation depth limit.
pub(crate) const MAX_VALIDATION_DEPTH: usize = 1024;
/// Largest accepted form data array index limit.
pub(crate) const MAX_FORM_ARRAY_INDEX: usize = 65_536;
/// Smallest accepted form data key depth limit.
pub(crate) const MIN_FORM_KEY_DEPTH: usize = 1;
/// Largest accepted form data key depth limit.
pub(crate) const MAX_FORM_KEY_DEPTH: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Contract validation tooling configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractValidationConfig {
    /// Contract documents to load.
    #[serde(default)]
    pub contracts: ContractsConfig,
    /// Type validation limits.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Form data codec limits.
    #[serde(default)]
    pub form_data: FormDataConfig,
    /// Audit event destination.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory of the loaded config file (not serialized).
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl ContractValidationConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_dir = resolved
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.contracts.validate()?;
        self.validation.validate()?;
        self.form_data.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns contract paths in priority order, resolved against the config
    /// file directory.
    #[must_use]
    pub fn contract_paths(&self) -> Vec<PathBuf> {
        self.contracts.paths.iter().map(|path| self.resolve_relative(path)).collect()
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn ValidationAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let Some(path) = self.audit.path.as_deref() else {
                    return Err(ConfigError::Invalid(
                        "audit.path is required when audit.sink = \"file\"".to_string(),
                    ));
                };
                let sink = FileAuditSink::new(&self.resolve_relative(path))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Resolves a configured path against the config file directory.
    fn resolve_relative(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Contract documents to load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    /// Contract JSON paths in priority order; earlier entries win.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl ContractsConfig {
    /// Validates contract path entries.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.len() > MAX_CONTRACT_PATHS {
            return Err(ConfigError::Invalid("too many contracts.paths entries".to_string()));
        }
        let mut seen = BTreeSet::new();
        for path in &self.paths {
            validate_path_string("contracts.paths", path)?;
            if !seen.insert(path.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "contracts.paths contains duplicate entry {}",
                    path.trim()
                )));
            }
        }
        Ok(())
    }
}

/// Type validation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    /// Maximum nesting depth before a depth error is reported.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation limits.
    fn validate(self) -> Result<(), ConfigError> {
        if !(MIN_VALIDATION_DEPTH ..= MAX_VALIDATION_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::Invalid(format!(
                "validation.max_depth must be between {MIN_VALIDATION_DEPTH} and \
                 {MAX_VALIDATION_DEPTH}"
            )));
        }
        Ok(())
    }

    /// Returns the validator limits.
    #[must_use]
    pub const fn limits(self) -> ValidationLimits {
        ValidationLimits {
            max_depth: self.max_depth,
        }
    }
}

/// Form data codec limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FormDataConfig {
    /// Largest `[N]` index expanded into an array position.
    #[serde(default = "default_max_array_index")]
    pub max_array_index: usize,
    /// Largest number of bracket groups expanded for one key.
    #[serde(default = "default_max_key_depth")]
    pub max_key_depth: usize,
}

impl Default for FormDataConfig {
    fn default() -> Self {
        Self {
            max_array_index: default_max_array_index(),
            max_key_depth: default_max_key_depth(),
        }
    }
}

impl FormDataConfig {
    /// Validates form data limits.
    fn validate(self) -> Result<(), ConfigError> {
        if self.max_array_index > MAX_FORM_ARRAY_INDEX {
            return Err(ConfigError::Invalid(format!(
                "form_data.max_array_index must be at most {MAX_FORM_ARRAY_INDEX}"
            )));
        }
        if !(MIN_FORM_KEY_DEPTH ..= MAX_FORM_KEY_DEPTH).contains(&self.max_key_depth) {
            return Err(ConfigError::Invalid(format!(
                "form_data.max_key_depth must be between {MIN_FORM_KEY_DEPTH} and \
                 {MAX_FORM_KEY_DEPTH}"
            )));
        }
        Ok(())
    }

    /// Returns the codec limits.
    #[must_use]
    pub const fn limits(self) -> FormDataLimits {
        FormDataLimits {
            max_array_index: self.max_array_index,
            max_key_depth: self.max_key_depth,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to `audit.path`.
    File,
}

/// Audit event destination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink = \"file\"".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for [`ValidationConfig::max_depth`].
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Serde default for [`FormDataConfig::max_array_index`].
const fn default_max_array_index() -> usize {
    DEFAULT_MAX_ARRAY_INDEX
}

/// Serde default for [`FormDataConfig::max_key_depth`].
const fn default_max_key_depth() -> usize {
    DEFAULT_MAX_KEY_DEPTH
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
