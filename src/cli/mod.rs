//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod dashboard;
pub mod new_scan;
pub mod queue;
pub mod reports;
pub mod scan;
pub mod settings;
pub mod view;

pub use args::{OutputFormat, ReportFilterArgs, SortDir};
pub use context::CommandContext;
pub use view::View;

use crate::scanner::{AuthMethod, ScanMode};

/// ScanLite - queue and review simulated web application security scans
#[derive(Parser, Debug)]
#[command(name = "scanlite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "SCANLITE_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "SCANLITE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SCANLITE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Start with an empty scan history
    #[arg(long, global = true)]
    pub no_demo: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit scans and follow them until they finish
    Scan(ScanArgs),

    /// Open a view by name or URL fragment (e.g. scan-queue, #settings)
    View {
        /// dashboard, new-scan, scan-queue, scan-reports or settings
        name: String,
    },

    /// Show the security dashboard
    Dashboard,

    /// Show queued and running scans
    Queue,

    /// List finished scan reports
    Reports {
        #[command(flatten)]
        filters: ReportFilterArgs,
    },

    /// Show the full report for one scan
    Report {
        /// Scan ID (e.g. scan-k2x9qa)
        scan_id: String,
    },

    /// View or change scanner settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Generate shell completions (static)
    #[command(after_help = "\
Examples:
  bash:   scanlite completion bash > /etc/bash_completion.d/scanlite
  zsh:    scanlite completion zsh > \"${fpath[1]}/_scanlite\"
  fish:   scanlite completion fish > ~/.config/fish/completions/scanlite.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

/// Arguments for `scan`
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Target URLs (absolute, e.g. https://example.com)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Scan mode
    #[arg(long, short = 'm', value_enum, default_value_t = ScanMode::Passive)]
    pub mode: ScanMode,

    /// Authentication method for authenticated scans
    #[arg(long, value_enum, default_value_t = AuthMethod::None)]
    pub auth: AuthMethod,

    /// Login username (form auth)
    #[arg(long)]
    pub username: Option<String>,

    /// Login password (form auth)
    #[arg(long, env = "SCANLITE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Authorization token (header auth)
    #[arg(long, env = "SCANLITE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Use virtual time instead of waiting for real timers
    #[arg(long)]
    pub fast: bool,

    /// Seed for reproducible ids and results
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current scanner settings
    Show,

    /// Change and save scanner settings
    Set {
        /// Maximum number of simultaneous scans
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        concurrency: Option<u32>,

        /// Requests per second
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rate_limit: Option<u32>,

        /// Enable or disable custom CSP injection
        #[arg(long)]
        csp_enabled: Option<bool>,

        /// Custom CSP header value
        #[arg(long)]
        csp_policy: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args_parse() {
        let cli = Cli::parse_from([
            "scanlite",
            "scan",
            "https://example.com",
            "--mode",
            "authenticated",
            "--auth",
            "form",
            "--username",
            "admin",
            "--fast",
            "--seed",
            "7",
        ]);

        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.urls, vec!["https://example.com"]);
                assert_eq!(args.mode, ScanMode::Authenticated);
                assert_eq!(args.auth, AuthMethod::Form);
                assert_eq!(args.username.as_deref(), Some("admin"));
                assert!(args.fast);
                assert_eq!(args.seed, Some(7));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_settings_set_rejects_zero_concurrency() {
        let result = Cli::try_parse_from(["scanlite", "settings", "set", "--concurrency", "0"]);
        assert!(result.is_err());
    }
}
