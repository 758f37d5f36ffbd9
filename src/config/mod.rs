//! Configuration management for ScanLite

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Admin settings shown on the settings view
    #[serde(default)]
    pub settings: ScannerSettings,

    /// Timing and sampling knobs for the scan simulator
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Global scanner settings.
///
/// These are stored and displayed but do not influence the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Maximum number of scans that may run simultaneously
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: u32,

    /// Maximum HTTP requests per second the scanner would send
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Inject a custom Content Security Policy into scanned responses
    #[serde(default)]
    pub csp_enabled: bool,

    /// Custom CSP header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csp_policy: Option<String>,
}

fn default_concurrency_limit() -> u32 {
    5
}

fn default_rate_limit() -> u32 {
    10
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            rate_limit: default_rate_limit(),
            csp_enabled: false,
            csp_policy: None,
        }
    }
}

/// Simulator timing and result sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Delay from creation until `queued -> running`
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,

    /// Lower bound of the completion delay, measured from creation
    #[serde(default = "default_min_completion_ms")]
    pub min_completion_ms: u64,

    /// Upper bound of the completion delay, measured from creation
    #[serde(default = "default_max_completion_ms")]
    pub max_completion_ms: u64,

    /// Chance that a completed scan reports any vulnerabilities
    #[serde(default = "default_vuln_probability")]
    pub vuln_probability: f64,

    /// Maximum catalog draws per scan
    #[serde(default = "default_max_vulns")]
    pub max_vulns: usize,

    /// Chance that a scan ends `failed` instead of `completed`
    #[serde(default)]
    pub failure_rate: f64,
}

fn default_start_delay_ms() -> u64 {
    2_000
}

fn default_min_completion_ms() -> u64 {
    7_000
}

fn default_max_completion_ms() -> u64 {
    10_000
}

fn default_vuln_probability() -> f64 {
    0.7
}

fn default_max_vulns() -> usize {
    3
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay_ms(),
            min_completion_ms: default_min_completion_ms(),
            max_completion_ms: default_max_completion_ms(),
            vuln_probability: default_vuln_probability(),
            max_vulns: default_max_vulns(),
            failure_rate: 0.0,
        }
    }
}

/// Longest delay any simulator timer may be set to (24 hours).
pub const MAX_SIMULATOR_DELAY_MS: u64 = 24 * 60 * 60 * 1_000;

impl SimulatorConfig {
    /// Check that the timings keep `running` strictly before the terminal
    /// transition and that every delay is at most [`MAX_SIMULATOR_DELAY_MS`].
    pub fn validate(&self) -> Result<()> {
        if self.max_completion_ms > MAX_SIMULATOR_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "simulator.max_completion_ms ({}) must not exceed {}",
                self.max_completion_ms, MAX_SIMULATOR_DELAY_MS
            ))
            .into());
        }
        if self.start_delay_ms >= self.min_completion_ms {
            return Err(ConfigError::Invalid(format!(
                "simulator.start_delay_ms ({}) must be less than simulator.min_completion_ms ({})",
                self.start_delay_ms, self.min_completion_ms
            ))
            .into());
        }
        if self.min_completion_ms > self.max_completion_ms {
            return Err(ConfigError::Invalid(format!(
                "simulator.min_completion_ms ({}) must not exceed simulator.max_completion_ms ({})",
                self.min_completion_ms, self.max_completion_ms
            ))
            .into());
        }
        if !(0.0..=1.0).contains(&self.vuln_probability) {
            return Err(ConfigError::Invalid(
                "simulator.vuln_probability must be between 0 and 1".to_string(),
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Invalid(
                "simulator.failure_rate must be between 0 and 1".to_string(),
            )
            .into());
        }
        if self.max_vulns == 0 {
            return Err(
                ConfigError::Invalid("simulator.max_vulns must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// User preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".scanlite").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path, falling back to defaults
    /// when no file exists yet.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.simulator.validate()?;

        Ok(config)
    }

    /// Save configuration to an optional path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.settings.concurrency_limit, 5);
        assert_eq!(config.settings.rate_limit, 10);
        assert!(!config.settings.csp_enabled);
        assert_eq!(config.simulator.start_delay_ms, 2_000);
        assert_eq!(config.simulator.min_completion_ms, 7_000);
        assert_eq!(config.simulator.max_completion_ms, 10_000);
        assert_eq!(config.simulator.failure_rate, 0.0);
        assert!(config.simulator.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nope.yaml");
        let config = Config::load_at(path.to_str()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.settings.concurrency_limit = 8;
        config.settings.csp_enabled = true;
        config.settings.csp_policy = Some("default-src 'self'".to_string());
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.settings.concurrency_limit, 8);
        assert!(loaded.settings.csp_enabled);
        assert_eq!(
            loaded.settings.csp_policy.as_deref(),
            Some("default-src 'self'")
        );
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "settings:\n  rate_limit: 25\n").unwrap();

        let config = Config::load_from(path).unwrap();
        assert_eq!(config.settings.rate_limit, 25);
        assert_eq!(config.settings.concurrency_limit, 5);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_simulator_rejects_start_after_completion() {
        let sim = SimulatorConfig {
            start_delay_ms: 8_000,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());
    }

    #[test]
    fn test_simulator_rejects_inverted_completion_window() {
        let sim = SimulatorConfig {
            min_completion_ms: 12_000,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());
    }

    #[test]
    fn test_simulator_rejects_delays_beyond_a_day() {
        let sim = SimulatorConfig {
            min_completion_ms: u64::MAX,
            max_completion_ms: u64::MAX,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());

        let sim = SimulatorConfig {
            start_delay_ms: 10_u64.pow(16),
            min_completion_ms: 2 * 10_u64.pow(16),
            max_completion_ms: 2 * 10_u64.pow(16),
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());

        let sim = SimulatorConfig {
            start_delay_ms: MAX_SIMULATOR_DELAY_MS - 1,
            min_completion_ms: MAX_SIMULATOR_DELAY_MS,
            max_completion_ms: MAX_SIMULATOR_DELAY_MS,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_wrapping_completion_delay() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "simulator:\n  min_completion_ms: 18446744073709551615\n  max_completion_ms: 18446744073709551615\n",
        )
        .unwrap();

        let err = Config::load_from(path).unwrap_err();
        assert!(err.to_string().contains("max_completion_ms"));
    }

    #[test]
    fn test_simulator_rejects_bad_probabilities() {
        let sim = SimulatorConfig {
            vuln_probability: 1.5,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());

        let sim = SimulatorConfig {
            failure_rate: -0.1,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());

        let sim = SimulatorConfig {
            max_vulns: 0,
            ..SimulatorConfig::default()
        };
        assert!(sim.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "settings: [oops").unwrap();

        let err = Config::load_from(path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
