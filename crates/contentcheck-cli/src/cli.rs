//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contentcheck CLI - Validate structured content items before they are saved
///
/// Checks content save documents against a catalog of content types and
/// data types, including the rows of composite (block list) properties.
#[derive(Parser, Debug)]
#[command(
    name = "contentcheck",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CONTENTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a content save document against a type catalog
    Validate(ValidateArgs),

    /// Check a type catalog for inconsistencies
    CheckTypes(CheckTypesArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the content save document (JSON or YAML)
    #[arg(value_name = "CONTENT")]
    pub content: PathBuf,

    /// Path to the type catalog (JSON or YAML)
    #[arg(short, long, value_name = "CATALOG")]
    pub types: PathBuf,

    /// Override the maximum composite nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Override the report key scope
    #[arg(long)]
    pub key_scope: Option<String>,

    /// Print property failures as serialized model-state entries
    #[arg(long)]
    pub model_state: bool,
}

/// Arguments for the check-types command
#[derive(Parser, Debug)]
pub struct CheckTypesArgs {
    /// Path to the type catalog (JSON or YAML)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
