// crates/contract-validation-cli/src/main.rs
// ============================================================================
// Module: Contract Validation CLI Entry Point
// Description: Command dispatcher for routing, upcasting, and form data.
// Purpose: Exercise loaded contracts from the command line.
// Dependencies: clap, contract-validation-config, contract-validation-core,
// serde_json, thiserror
// ============================================================================

//! ## Overview
//! The CLI loads contracts in priority order (from `--contract` flags or the
//! configured `contracts.paths`) and answers route, upcast, and form data
//! requests. Successful results are written to stdout as JSON or encoded
//! text; rejections are written to stderr one message per line and exit with
//! a failure code. Security posture: all inputs are untrusted and read with
//! hard size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod inputs;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use contract_validation_config::CONFIG_ENV_VAR;
use contract_validation_config::ContractValidationConfig;
use contract_validation_config::DEFAULT_CONFIG_NAME;
use contract_validation_core::FormDataCodec;
use contract_validation_core::MultiContractFacade;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Arguments
// ============================================================================

/// Contract validation command-line interface.
#[derive(Parser, Debug)]
#[command(name = "contract-validation", version, disable_help_subcommand = true)]
struct Cli {
    /// Configuration file (overrides `CONTRACT_VALIDATION_CONFIG`).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Contract document to load; repeat in priority order. Replaces the
    /// configured contract paths.
    #[arg(long = "contract", value_name = "FILE", global = true)]
    contracts: Vec<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a request to its owning contract and operation.
    Route(RequestArgs),
    /// Upcast a request body to the matched operation's body type.
    Upcast {
        /// Request method and path.
        #[command(flatten)]
        request: RequestArgs,
        /// JSON body file; stdin when omitted.
        #[arg(long, value_name = "FILE")]
        body: Option<PathBuf>,
    },
    /// Upcast a JSON value against a type reference.
    UpcastType {
        /// Bare or fully qualified type reference.
        #[arg(long = "type", value_name = "TYPE")]
        type_ref: String,
        /// JSON body file; stdin when omitted.
        #[arg(long, value_name = "FILE")]
        body: Option<PathBuf>,
    },
    /// URL-encoded form data utilities.
    Form {
        /// Selected form subcommand.
        #[command(subcommand)]
        command: FormCommand,
    },
}

/// Request coordinates shared by routing commands.
#[derive(Args, Debug)]
struct RequestArgs {
    /// HTTP method label.
    #[arg(long)]
    method: String,
    /// Concrete request path.
    #[arg(long)]
    path: String,
}

/// Form data subcommands.
#[derive(Subcommand, Debug)]
enum FormCommand {
    /// Decode URL-encoded pairs into JSON.
    Decode {
        /// URL-encoded input.
        input: String,
    },
    /// Encode a JSON object as URL-encoded pairs.
    Encode {
        /// JSON object text.
        input: String,
    },
    /// Normalize URL-encoded pairs, writing scalar arrays as repeated keys.
    Rewrite {
        /// URL-encoded input.
        input: String,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    /// Output written to stdout with a success exit code.
    Accepted(String),
    /// Messages written to stderr with a failure exit code.
    Rejected(Vec<String>),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let outcome = match cli.command {
        Commands::Route(request) => {
            let facade = build_facade(&config, &cli.contracts)?;
            route_outcome(&facade, &request)?
        }
        Commands::Upcast {
            request,
            body,
        } => {
            let facade = build_facade(&config, &cli.contracts)?;
            let body = inputs::read_json_body(body.as_deref())?;
            upcast_outcome(&facade, &request, &body)?
        }
        Commands::UpcastType {
            type_ref,
            body,
        } => {
            let facade = build_facade(&config, &cli.contracts)?;
            let body = inputs::read_json_body(body.as_deref())?;
            upcast_type_outcome(&facade, &type_ref, &body)?
        }
        Commands::Form {
            command,
        } => form_outcome(&FormDataCodec::new(config.form_data.limits()), command)?,
    };
    emit(outcome)
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Loads configuration, falling back to defaults when none is present.
fn load_config(path: Option<&Path>) -> CliResult<ContractValidationConfig> {
    let explicit = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
    if !explicit && !Path::new(DEFAULT_CONFIG_NAME).exists() {
        return Ok(ContractValidationConfig::default());
    }
    ContractValidationConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Loads contracts and builds the multi-contract facade.
fn build_facade(
    config: &ContractValidationConfig,
    overrides: &[PathBuf],
) -> CliResult<MultiContractFacade> {
    let paths = if overrides.is_empty() { config.contract_paths() } else { overrides.to_vec() };
    if paths.is_empty() {
        return Err(CliError::new(
            "no contracts configured; pass --contract or set contracts.paths".to_string(),
        ));
    }
    let contracts = inputs::load_contracts(&paths)?;
    let audit = config.audit_sink().map_err(|err| CliError::new(err.to_string()))?;
    Ok(MultiContractFacade::new(contracts)
        .with_limits(config.validation.limits())
        .with_audit_sink(audit))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Resolves a request and reports the owning contract and operation.
fn route_outcome(facade: &MultiContractFacade, request: &RequestArgs) -> CliResult<Outcome> {
    let resolution = match facade.resolve(&request.method, &request.path) {
        Ok(resolution) => resolution,
        Err(error) => return Ok(Outcome::Rejected(vec![error.to_string()])),
    };
    let parameters: Map<String, Value> = resolution
        .route
        .parameters
        .iter()
        .map(|parameter| (parameter.name.clone(), Value::String(parameter.value.clone())))
        .collect();
    let operation = serde_json::to_value(resolution.route.operation)
        .map_err(|err| CliError::new(format!("failed to serialize operation: {err}")))?;
    let mut report = Map::new();
    report.insert("contract".to_string(), Value::String(resolution.facade.contract().name.clone()));
    report.insert(
        "template".to_string(),
        Value::String(resolution.route.template.as_str().to_string()),
    );
    report.insert("parameters".to_string(), Value::Object(parameters));
    report.insert("operation".to_string(), operation);
    render_json(&Value::Object(report)).map(Outcome::Accepted)
}

/// Upcasts a request body through the owning contract.
fn upcast_outcome(
    facade: &MultiContractFacade,
    request: &RequestArgs,
    body: &Value,
) -> CliResult<Outcome> {
    match facade.upcast(&request.method, &request.path, body) {
        Ok(upcast) => render_json(&upcast).map(Outcome::Accepted),
        Err(error) => Ok(Outcome::Rejected(error.messages())),
    }
}

/// Upcasts a value against a type reference.
fn upcast_type_outcome(
    facade: &MultiContractFacade,
    type_ref: &str,
    body: &Value,
) -> CliResult<Outcome> {
    match facade.upcast_type(type_ref, body) {
        Ok(upcast) => render_json(&upcast).map(Outcome::Accepted),
        Err(errors) => Ok(Outcome::Rejected(errors.messages())),
    }
}

/// Runs a form data subcommand.
fn form_outcome(codec: &FormDataCodec, command: FormCommand) -> CliResult<Outcome> {
    match command {
        FormCommand::Decode {
            input,
        } => render_json(&codec.decode(&input)).map(Outcome::Accepted),
        FormCommand::Encode {
            input,
        } => {
            let value = inputs::parse_json(input.as_bytes(), "form input")?;
            if !value.is_object() {
                return Ok(Outcome::Rejected(vec![
                    "form encoding requires a JSON object".to_string(),
                ]));
            }
            Ok(Outcome::Accepted(codec.encode(&value)))
        }
        FormCommand::Rewrite {
            input,
        } => Ok(Outcome::Accepted(codec.rewrite_encoded(&input))),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Renders JSON for stdout.
fn render_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render JSON: {err}")))
}

/// Writes an outcome to the matching stream and picks the exit code.
fn emit(outcome: Outcome) -> CliResult<ExitCode> {
    match outcome {
        Outcome::Accepted(output) => {
            write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(messages) => {
            for message in messages {
                write_stderr_line(&message)
                    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
