//! Configuration management for the pacing gate.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{RateGateError, Result};
use crate::gate::PacingPolicy;

/// Configuration for a single gate.
///
/// All parameters are fixed for the lifetime of the gate built from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Number of calls allowed per window
    #[serde(default = "default_max_count")]
    pub max_count: u32,

    /// Window length in seconds
    #[serde(default = "default_per_seconds")]
    pub per_seconds: f64,

    /// Pacing policy
    #[serde(default)]
    pub policy: PacingPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            per_seconds: default_per_seconds(),
            policy: PacingPolicy::default(),
        }
    }
}

fn default_max_count() -> u32 {
    1
}

fn default_per_seconds() -> f64 {
    1.0
}

impl GateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading gate configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GateConfig = serde_yaml::from_str(yaml)
            .map_err(|e| RateGateError::Config(format!("Failed to parse gate config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that these values can produce a usable gate.
    ///
    /// The window math divides by `max_count`, so both parameters must be
    /// strictly positive (and the window length finite).
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(RateGateError::Config(
                "max_count must be at least 1".to_string(),
            ));
        }
        if !self.per_seconds.is_finite() || self.per_seconds <= 0.0 {
            return Err(RateGateError::Config(format!(
                "per_seconds must be a positive number, got {}",
                self.per_seconds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.max_count, 1);
        assert!((config.per_seconds - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.policy, PacingPolicy::Steady);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
max_count: 10
per_seconds: 1.5
policy: greedy
"#;
        let config = GateConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.max_count, 10);
        assert!((config.per_seconds - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.policy, PacingPolicy::Greedy);
    }

    #[test]
    fn test_parse_applies_field_defaults() {
        let config = GateConfig::from_yaml("max_count: 4").unwrap();
        assert_eq!(config.max_count, 4);
        assert!((config.per_seconds - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.policy, PacingPolicy::Steady);
    }

    #[test]
    fn test_rejects_zero_max_count() {
        let result = GateConfig::from_yaml("max_count: 0");
        assert!(matches!(result, Err(RateGateError::Config(_))));
    }

    #[test]
    fn test_rejects_non_positive_window() {
        for per_seconds in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let config = GateConfig {
                max_count: 10,
                per_seconds,
                policy: PacingPolicy::Steady,
            };
            assert!(
                matches!(config.validate(), Err(RateGateError::Config(_))),
                "expected rejection for per_seconds = {}",
                per_seconds
            );
        }
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let result = GateConfig::from_yaml("max_count: [");
        assert!(matches!(result, Err(RateGateError::Config(_))));
    }
}
