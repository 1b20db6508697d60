use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::breaker::{CircuitBreakerConfig, DEFAULT_RETENTION_SECS};
use crate::error::ConfigError;
use crate::retry::{DEFAULT_JITTER_RATIO, DEFAULT_MAX_ATTEMPTS};

/// Retry scheduling parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts advertised in every `RetrySchedule` (including the first).
    ///
    /// Display only: retryability is decided by the classifier, whose
    /// ceiling (`classify::RETRY_CEILING`, 5) does not change with this value.
    pub max_attempts: u32,
    /// Jitter half-width as a fraction of the delay (0.25 = ±25%).
    pub jitter_ratio: f64,
    /// Fixed seed for the jitter source; unset means OS-seeded.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            jitter_ratio: DEFAULT_JITTER_RATIO,
            seed: None,
        }
    }
}

/// Telemetry sampling for medium-severity reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Fraction of `should_sample` reports that are actually sent.
    pub sample_rate: f64,
    /// Fixed seed for the sampler; unset means OS-seeded.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            sample_rate: 0.1,
            seed: None,
        }
    }
}

fn default_retention_secs() -> u64 {
    DEFAULT_RETENTION_SECS
}

/// Engine configuration loaded from `~/.config/resil/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long failure records stay in the breaker ledger.
    #[serde(default = "default_retention_secs")]
    pub ledger_retention_secs: u64,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Optional retry section; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ledger_retention_secs: DEFAULT_RETENTION_SECS,
            circuit_breaker: CircuitBreakerConfig::default(),
            retry: None,
            reporting: ReportingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Effective retry section.
    pub fn retry(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Reject values the breaker, scheduler, or sampler cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cb = &self.circuit_breaker;
        if cb.failure_threshold == 0 {
            return Err(ConfigError::ZeroFailureThreshold);
        }
        if !(cb.failure_rate_threshold > 0.0) {
            return Err(ConfigError::NonPositiveFailureRate(cb.failure_rate_threshold));
        }
        if cb.window_duration_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.ledger_retention_secs.saturating_mul(1000) < cb.window_duration_ms {
            return Err(ConfigError::RetentionShorterThanWindow {
                retention_secs: self.ledger_retention_secs,
                window_ms: cb.window_duration_ms,
            });
        }
        if let Some(retry) = &self.retry {
            if !(0.0..1.0).contains(&retry.jitter_ratio) {
                return Err(ConfigError::JitterOutOfRange(retry.jitter_ratio));
            }
            if retry.max_attempts == 0 {
                return Err(ConfigError::ZeroMaxAttempts);
            }
        }
        if !(0.0..=1.0).contains(&self.reporting.sample_rate) {
            return Err(ConfigError::SampleRateOutOfRange(self.reporting.sample_rate));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resil")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EngineConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EngineConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: EngineConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.ledger_retention_secs, 300);
        assert_eq!(cfg.circuit_breaker.failure_threshold, 5);
        assert!((cfg.circuit_breaker.failure_rate_threshold - 0.5).abs() < 1e-9);
        assert_eq!(cfg.circuit_breaker.window_duration_ms, 60_000);
        assert_eq!(cfg.circuit_breaker.trip_duration_ms, 30_000);
        assert_eq!(cfg.retry().max_attempts, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = EngineConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            [circuit_breaker]
            failure_threshold = 3
            failure_rate_threshold = 1.0
            window_duration_ms = 10000
            trip_duration_ms = 5000
        "#;
        let cfg: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.circuit_breaker.failure_threshold, 3);
        assert_eq!(cfg.circuit_breaker.window_duration_ms, 10_000);
        assert_eq!(cfg.ledger_retention_secs, 300);
        assert!(cfg.retry.is_none());
        assert!((cfg.reporting.sample_rate - 0.1).abs() < 1e-9);
    }

    #[test]
    fn config_toml_retry_and_reporting() {
        let toml = r#"
            ledger_retention_secs = 600

            [retry]
            max_attempts = 3
            jitter_ratio = 0.1
            seed = 99

            [reporting]
            sample_rate = 0.5
        "#;
        let cfg: EngineConfig = toml::from_str(toml).unwrap();
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 3);
        assert!((retry.jitter_ratio - 0.1).abs() < 1e-9);
        assert_eq!(retry.seed, Some(99));
        assert!((cfg.reporting.sample_rate - 0.5).abs() < 1e-9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = EngineConfig::default();
        cfg.circuit_breaker.failure_threshold = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroFailureThreshold));

        let mut cfg = EngineConfig::default();
        cfg.ledger_retention_secs = 30;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RetentionShorterThanWindow { .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.retry = Some(RetryConfig {
            jitter_ratio: 1.5,
            ..RetryConfig::default()
        });
        assert_eq!(cfg.validate(), Err(ConfigError::JitterOutOfRange(1.5)));

        let mut cfg = EngineConfig::default();
        cfg.reporting.sample_rate = -0.1;
        assert_eq!(cfg.validate(), Err(ConfigError::SampleRateOutOfRange(-0.1)));
    }

    #[test]
    fn load_from_path_validates() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[circuit_breaker]").unwrap();
        writeln!(f, "failure_threshold = 0").unwrap();
        writeln!(f, "failure_rate_threshold = 0.5").unwrap();
        writeln!(f, "window_duration_ms = 60000").unwrap();
        writeln!(f, "trip_duration_ms = 30000").unwrap();
        let err = load_from_path(f.path()).unwrap_err();
        assert!(err.to_string().contains("failure_threshold"));
    }
}
