//! Command-line interface implementation for Stenciler.
//! Provides argument parsing using clap and the immutable run configuration
//! that the engine consumes instead of process-wide globals.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for Stenciler.
#[derive(Parser, Debug)]
#[command(author, version, about = "Stenciler: repository templates made easy", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Local directory to use as the template repository instead of cloning
    #[arg(short = 'r', long, global = true, value_name = "DIR")]
    pub template_repo_dir: Option<PathBuf>,

    /// Authentication token for private remote repositories
    #[arg(
        short = 't',
        long,
        global = true,
        value_name = "TOKEN",
        conflicts_with = "template_repo_dir"
    )]
    pub auth_token: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Materialize a template into the output directory
    Init {
        /// URL or local path of the template repository
        #[arg(value_name = "REPOSITORY")]
        repository: String,

        /// Directory to materialize the project into
        #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },
    /// Re-apply the recorded templates onto an existing project
    Update {
        /// Directory holding the previously materialized project
        #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Immutable run configuration, constructed once from the parsed arguments
/// and passed explicitly into the engine.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Local template repository override; suppresses cloning when set.
    pub repo_dir: Option<PathBuf>,
    /// Token used to authenticate clones of private repositories.
    pub auth_token: Option<String>,
    /// Root of the materialized output tree.
    pub output_dir: PathBuf,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
