//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Listen command arguments.
#[derive(Debug, Args)]
pub struct ListenCommand {
    /// UDP port to listen on (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to write ADIF logs into (overrides configuration)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Convert command arguments.
#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Files each holding one saved contactinfo payload
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Directory to write ADIF logs into (overrides configuration)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Band command arguments.
#[derive(Debug, Args)]
pub struct BandCommand {
    /// Frequency in MHz
    #[arg(value_name = "MHZ")]
    pub frequency: String,

    /// Treat the frequency as a raw N1MM rxfreq value
    #[arg(short, long)]
    pub raw: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
