//! CLI command definitions for resource-env
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    Json,
    #[default]
    Markdown,
}

/// Inspect the global resource environment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of environment override files (overrides config)
    #[arg(short, long, global = true)]
    pub environment_dir: Option<PathBuf>,

    /// Plugin directory (overrides config, repeatable)
    #[arg(short, long = "plugin-dir", global = true)]
    pub plugin_dirs: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Markdown, global = true)]
    pub format: FormatArg,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered resource types (default if no subcommand given)
    List,

    /// Resolve a resource type to its implementation
    Resolve(ResolveArgs),

    /// Print the environment's override data as YAML
    Show,

    /// Load a directory of environment files and report failures
    Check(CheckArgs),
}

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Resource type name
    pub resource_type: String,

    /// Resource name, for per-resource overrides
    #[arg(short, long)]
    pub resource: Option<String>,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory to check (default: the configured environment directory)
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["resource-env"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.format, FormatArg::Markdown);
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn test_repeatable_plugin_dir() {
        let cli = Cli::parse_from(["resource-env", "-p", "/a", "--plugin-dir", "/b", "list"]);
        assert_eq!(cli.plugin_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(matches!(cli.command, Some(Command::List)));
    }

    #[test]
    fn test_resolve_args() {
        let cli = Cli::parse_from(["resource-env", "resolve", "MyType", "--resource", "db", "-f", "json"]);
        match cli.command {
            Some(Command::Resolve(args)) => {
                assert_eq!(args.resource_type, "MyType");
                assert_eq!(args.resource.as_deref(), Some("db"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, FormatArg::Json);
    }
}
