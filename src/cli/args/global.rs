//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For the output format the precedence is: CLI flag > environment variable >
/// `preferences.format` in the config file > pretty. This struct captures the
/// CLI/env layer; the config layer is resolved in `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json), if given on the command line
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.scanlite/config.yaml)
    pub config: Option<String>,

    /// Start with an empty store instead of demo history
    pub no_demo: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_demo: cli.no_demo,
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_flags() {
        let cli = Cli::parse_from([
            "scanlite",
            "--format",
            "json",
            "--config",
            "/custom/path",
            "--no-demo",
            "dashboard",
        ]);
        let opts = GlobalOptions::from_cli(&cli);

        assert_eq!(opts.format, Some(OutputFormat::Json));
        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert!(opts.no_demo);
    }

    #[test]
    fn test_defaults_leave_format_unset() {
        let opts = GlobalOptions::default();
        assert_eq!(opts.format, None);
        assert_eq!(opts.config_ref(), None);
        assert!(!opts.no_demo);
    }
}
