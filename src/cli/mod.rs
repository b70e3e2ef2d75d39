//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::classify::SnapshotType;

pub mod login;
pub mod logout;
pub mod snapshot;
pub mod status;

/// SnapShell CLI - Convert CLI output to shareable snapshots
///
/// Pipes raw CLI output (terraform plan, npm audit, trivy) into a clean,
/// styled, shareable web snapshot and prints its URL.
#[derive(Parser, Debug)]
#[command(name = "snapshell")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
Examples:
  terraform plan | snapshell --label=\"My Plan\"
  npm audit | snapshell --label=\"Security Audit\"
  snapshell --file=plan.txt --label=\"My Plan\"
  snapshell login")]
pub struct Cli {
    /// Subcommand to execute; omit to create a snapshot from input
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API base URL
    #[arg(
        long,
        global = true,
        env = "SNAPSHELL_API",
        default_value = "https://snapshell.dev",
        hide_env = true
    )]
    pub api: String,

    /// Override credential file location
    #[arg(long, global = true, env = "SNAPSHELL_CONFIG", hide_env = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Options for the default snapshot-creation command
#[derive(Debug, Clone, Args)]
pub struct SnapshotArgs {
    /// Snapshot label (defaults to file name, or detected type plus timestamp)
    #[arg(long)]
    pub label: Option<String>,

    /// Snapshot type: trivy, npm-audit, npm, terraform (auto-detected if not specified)
    #[arg(long = "type")]
    pub snapshot_type: Option<SnapshotType>,

    /// Make snapshot private (pass --private=false for a public snapshot)
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub private: bool,

    /// Snapshot expiration in days
    #[arg(long, default_value_t = 30)]
    pub expires: u32,

    /// Read from file instead of stdin
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Login via browser to get a CLI token
    Login {
        /// Abort if no token arrives within this many seconds (blocks
        /// indefinitely when unset)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Clear authentication and logout
    Logout,

    /// Show authentication status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_defaults() {
        let cli = Cli::parse_from(["snapshell"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.api, "https://snapshell.dev");
        assert!(cli.snapshot.private);
        assert_eq!(cli.snapshot.expires, 30);
        assert!(cli.snapshot.label.is_none());
    }

    #[test]
    fn test_type_flag_parses_labels() {
        let cli = Cli::parse_from(["snapshell", "--type", "npm-audit"]);
        assert_eq!(cli.snapshot.snapshot_type, Some(SnapshotType::NpmAudit));

        let bad = Cli::try_parse_from(["snapshell", "--type", "yarn"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_private_flag_can_be_disabled() {
        let cli = Cli::parse_from(["snapshell", "--private=false"]);
        assert!(!cli.snapshot.private);

        let cli = Cli::parse_from(["snapshell", "--private"]);
        assert!(cli.snapshot.private);
    }

    #[test]
    fn test_login_timeout_flag() {
        let cli = Cli::parse_from(["snapshell", "login", "--timeout", "120"]);
        match cli.command {
            Some(Commands::Login { timeout }) => assert_eq!(timeout, Some(120)),
            other => panic!("Expected login command, got {other:?}"),
        }
    }

    #[test]
    fn test_api_flag_is_global() {
        let cli = Cli::parse_from(["snapshell", "login", "--api", "http://localhost:3000"]);
        assert_eq!(cli.api, "http://localhost:3000");
    }
}
