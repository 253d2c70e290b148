//! Error handling for the Stenciler application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Stenciler operations.
///
/// Every variant aborts the current apply when it surfaces; the engine never
/// retries internally. Reliability comes from safe re-invocation of `update`.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors in parsing or validating a manifest
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors raised while cloning a template repository
    #[error("Source fetch error: {0}.")]
    Git2Error(#[from] git2::Error),

    /// Represents non-git failures while locating a template source
    #[error("Source fetch error: {0}.")]
    FetchError(String),

    /// Represents errors that occur during template rendering
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// A rendered file referenced a parameter that was never resolved
    #[error("Unknown parameter: {0}.")]
    UnknownParameterError(String),

    /// A validation hook exited with a nonzero status
    #[error("Validation hook '{hook}' failed: {detail}")]
    ValidationError { hook: String, detail: String },

    /// A lifecycle hook exited with a nonzero status
    #[error("Hook '{hook}' failed: {detail}")]
    HookError { hook: String, detail: String },

    /// Represents errors raised by the interactive prompt
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
