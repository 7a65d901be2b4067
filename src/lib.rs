//! yang is a small declarative build-orchestration language and its interpreter.
//! A manifest describes variables, conditional assignments, extension-driven
//! compilation rules, downloads and shell commands; the interpreter loads it
//! and runs the resulting pipeline with fail-fast semantics.

/// Command-line interface module for the yang binary
pub mod cli;

/// Invocation settings and built-in variables
pub mod config;

/// Directive keywords, reserved names and exit codes
pub mod constants;

/// Error types and handling for the interpreter
pub mod error;

/// Logger initialisation
pub mod logger;

/// Variable store
pub mod vars;

/// Fixpoint `$name` expansion
pub mod expand;

/// Manifest line grammar
pub mod directive;

/// Manifest loading and evaluation
pub mod manifest;

/// Exclusion rules for the main compilation pass
pub mod exclude;

/// External command execution
pub mod exec;

/// Downloads for the `download:` directive
pub mod fetch;

/// Pattern-driven directory compilation
pub mod compiler;

/// Stage sequencing of a loaded manifest
pub mod pipeline;
