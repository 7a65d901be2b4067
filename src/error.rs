//! Error handling for the yang interpreter.
//! Defines the error taxonomy of a run and how each error maps to a process exit code.

use std::io;
use thiserror::Error;

use crate::constants::{MANIFEST_ERROR_EXIT_CODE, TIMEOUT_EXIT_CODE};

/// Custom error types for yang operations.
///
/// Every error is fail-fast: once one is raised, no later directive, file or
/// stage is processed.
#[derive(Error, Debug)]
pub enum YangError {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// The manifest passed on the command line does not exist
    #[error("Manifest not found: {0}.")]
    ManifestNotFound(String),

    /// Malformed directive, undefined `when` key or reserved-name reassignment
    #[error("Parse error at {path}:{line}: {message}.")]
    ParseError {
        path: String,
        line: usize,
        message: String,
    },

    /// Expansion did not reach a fixpoint within the configured number of passes
    #[error("Expansion error: '{template}' did not settle after {passes} passes.")]
    ExpansionError { template: String, passes: usize },

    /// An external command exited with a non-zero status
    #[error("Command '{command}' failed with exit code {code}.")]
    ExecutionError { command: String, code: i32 },

    /// An external command exceeded the configured timeout and was killed
    #[error("Command '{command}' timed out after {seconds}s.")]
    TimeoutError { command: String, seconds: u64 },

    /// Network fetch failure during a `download:` directive
    #[error("Download error: {url}: {message}.")]
    DownloadError { url: String, message: String },

    /// Invalid variable definition, such as redefining a built-in
    #[error("Variable error: {0}.")]
    VariableError(String),

    /// Invalid `exclude:` glob pattern
    #[error("Exclusion error: {0}.")]
    ExclusionError(String),
}

impl YangError {
    /// Process exit code reported for this error.
    ///
    /// A failing command's own exit code is surfaced verbatim.
    pub fn exit_code(&self) -> i32 {
        match self {
            YangError::ExecutionError { code, .. } => *code,
            YangError::TimeoutError { .. } => TIMEOUT_EXIT_CODE,
            YangError::ManifestNotFound(_)
            | YangError::ParseError { .. }
            | YangError::VariableError(_) => MANIFEST_ERROR_EXIT_CODE,
            _ => 1,
        }
    }
}

/// Convenience type alias for Results with YangError as the error type.
pub type YangResult<T> = Result<T, YangError>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The YangError to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with `err.exit_code()`
pub fn default_error_handler(err: YangError) -> ! {
    eprintln!("{}", err);
    std::process::exit(err.exit_code());
}
