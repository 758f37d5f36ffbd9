//! Command execution context
//!
//! Loads configuration, resolves the output format and builds the scan
//! session every view reads from.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::demo::demo_scans;
use crate::scanner::{Clock, ScanSession, ScanStore, SystemClock};

/// Context for command execution containing config, session and output format.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Scan store, simulator and clock for this invocation
    pub session: ScanSession,
    /// Resolved output format
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context on wall-clock time with a random seed.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        Self::with_clock(opts, Arc::new(SystemClock), None)
    }

    /// Create a context on a specific clock, optionally seeded.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be read or is invalid.
    pub fn with_clock(
        opts: &GlobalOptions,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let format = resolve_format(opts.format, &config);

        let store = if opts.no_demo {
            ScanStore::new()
        } else {
            ScanStore::with_scans(demo_scans(clock.now()))
        };
        debug!("Session starts with {} scans", store.scans().len());

        let session = ScanSession::new(store, config.simulator.clone(), clock, seed);

        Ok(Self {
            config,
            session,
            format,
        })
    }

    /// Current time on the session clock.
    pub fn now(&self) -> chrono::DateTime<Utc> {
        self.session.now()
    }
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }
    match config.preferences.format.as_deref() {
        Some(pref) => pref.parse().unwrap_or_else(|_| {
            warn!("Ignoring unknown preferences.format '{}'", pref);
            OutputFormat::default()
        }),
        None => OutputFormat::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preferences;
    use tempfile::tempdir;

    fn config_with_format(format: Option<&str>) -> Config {
        Config {
            preferences: Preferences {
                format: format.map(str::to_string),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_flag_beats_config() {
        let config = config_with_format(Some("table"));
        assert_eq!(
            resolve_format(Some(OutputFormat::Json), &config),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_config_preference_used_without_flag() {
        let config = config_with_format(Some("table"));
        assert_eq!(resolve_format(None, &config), OutputFormat::Table);
    }

    #[test]
    fn test_bad_preference_falls_back_to_pretty() {
        let config = config_with_format(Some("yaml"));
        assert_eq!(resolve_format(None, &config), OutputFormat::Pretty);
        assert_eq!(
            resolve_format(None, &Config::default()),
            OutputFormat::Pretty
        );
    }

    #[test]
    fn test_context_demo_toggle() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        let mut opts = GlobalOptions {
            config: Some(path.to_string_lossy().to_string()),
            ..GlobalOptions::default()
        };

        let ctx = CommandContext::new(&opts).unwrap();
        assert!(!ctx.session.store().is_empty());

        opts.no_demo = true;
        let ctx = CommandContext::new(&opts).unwrap();
        assert!(ctx.session.store().is_empty());
    }
}
