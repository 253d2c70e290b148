//! Stenciler supports both initial templating of a repository and keeping
//! that repository up to date with changes from the template. A template is a
//! directory tree plus a declarative manifest; applying it resolves
//! parameters, classifies files for rendering or raw copying, and runs
//! ordered lifecycle hooks.

/// Per-file classification: render, raw-copy, or skip
pub mod classify;

/// Command-line interface and run configuration
pub mod cli;

/// Manifest model, YAML codec boundary, and update-time merge
pub mod config;

/// Error types and handling for the Stenciler application
pub mod error;

/// External hook execution and validation
pub mod hooks;

/// Template source fetching (local directories and git repositories)
pub mod loader;

/// Core materialization orchestration for init and update
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Placeholder substitution for template files
pub mod renderer;

/// Parameter resolution (value/prompt/default/validation)
pub mod resolver;

/// Top-level driver for the update command
pub mod update;
