//! Command-line interface for n1mm2adif.
//!
//! This module provides the CLI structure for the `n1mm2adif` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{BandCommand, ConfigCommand, ConvertCommand, ListenCommand};

/// n1mm2adif - Log N1MM Logger+ contacts to ADIF files
///
/// Listens for the contact broadcasts N1MM Logger+ sends over UDP and appends
/// each contact to a per-station ADIF log.
#[derive(Debug, Parser)]
#[command(name = "n1mm2adif")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Listen for N1MM broadcasts and log every contact
    Listen(ListenCommand),

    /// Log contacts from saved contactinfo payloads
    Convert(ConvertCommand),

    /// Look up the band for a frequency
    Band(BandCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Config(ConfigCommand::Path),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "n1mm2adif");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_listen() {
        let cli = Cli::try_parse_from(["n1mm2adif", "listen"]).unwrap();
        let Command::Listen(cmd) = cli.command else {
            panic!("expected listen");
        };
        assert_eq!(cmd.port, None);
        assert_eq!(cmd.output_dir, None);
    }

    #[test]
    fn test_parse_listen_overrides() {
        let cli = Cli::try_parse_from([
            "n1mm2adif",
            "listen",
            "--port",
            "12062",
            "--output-dir",
            "/srv/adif",
        ])
        .unwrap();
        let Command::Listen(cmd) = cli.command else {
            panic!("expected listen");
        };
        assert_eq!(cmd.port, Some(12062));
        assert_eq!(cmd.output_dir, Some(PathBuf::from("/srv/adif")));
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["n1mm2adif", "convert", "a.xml", "b.xml"]).unwrap();
        let Command::Convert(cmd) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(cmd.files.len(), 2);
    }

    #[test]
    fn test_parse_convert_requires_files() {
        assert!(Cli::try_parse_from(["n1mm2adif", "convert"]).is_err());
    }

    #[test]
    fn test_parse_band() {
        let cli = Cli::try_parse_from(["n1mm2adif", "band", "--raw", "1400000"]).unwrap();
        let Command::Band(cmd) = cli.command else {
            panic!("expected band");
        };
        assert_eq!(cmd.frequency, "1400000");
        assert!(cmd.raw);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["n1mm2adif", "config", "validate", "-f", "/tmp/c.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "n1mm2adif",
            "band",
            "14.025",
            "-c",
            "/custom/config.toml",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
