//! Configuration loading and typed config structures for the junction
//! controller.
//!
//! The canonical configuration lives in `junction-config.yaml` at the
//! project root. Every section is optional; an empty file yields the
//! defaults below. The fuzzy membership tables and the rule base are not
//! configurable.

use std::path::Path;

use junction_types::{LaneId, Scenario};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The YAML parsed but a value is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level controller configuration.
///
/// Mirrors the structure of `junction-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ControllerConfig {
    /// Cross-lane arbitration settings.
    #[serde(default)]
    pub arbitration: ArbitrationConfig,

    /// The fixed-cycle signal the fuzzy result is compared against.
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Effectiveness scoring weights.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Control-surface grid resolution.
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scenarios to run. Empty means the built-in catalogue.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl ControllerConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails [`validate`](Self::validate).
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml treats an empty document as unit, not as an empty map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        let epsilon = self.arbitration.tie_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return invalid(format!(
                "arbitration.tie_epsilon must be a non-negative number, got {epsilon}"
            ));
        }
        let green = self.baseline.green_seconds;
        if !green.is_finite() || green <= 0.0 {
            return invalid(format!(
                "baseline.green_seconds must be positive, got {green}"
            ));
        }
        let weight = self.scoring.emergency_weight;
        if !weight.is_finite() || weight <= 0.0 {
            return invalid(format!(
                "scoring.emergency_weight must be positive, got {weight}"
            ));
        }
        if self.surface.density_steps == 0 || self.surface.wait_steps == 0 {
            return invalid("surface steps must be at least 1".to_owned());
        }
        Ok(())
    }
}

/// Cross-lane arbitration settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ArbitrationConfig {
    /// Priorities closer than this are treated as tied and broken on wait.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: default_tie_epsilon(),
        }
    }
}

/// Fixed-cycle reference signal.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BaselineConfig {
    /// Lane the static signal always serves.
    #[serde(default = "default_baseline_lane")]
    pub lane: LaneId,

    /// Green time the static signal always grants, in seconds.
    #[serde(default = "default_baseline_green_seconds")]
    pub green_seconds: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            lane: default_baseline_lane(),
            green_seconds: default_baseline_green_seconds(),
        }
    }
}

/// Effectiveness scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoringConfig {
    /// Wait-equivalent bonus for relieving a lane with an emergency vehicle.
    #[serde(default = "default_emergency_weight")]
    pub emergency_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            emergency_weight: default_emergency_weight(),
        }
    }
}

/// Control-surface grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SurfaceConfig {
    /// Number of density samples across 0--100.
    #[serde(default = "default_surface_steps")]
    pub density_steps: usize,

    /// Number of wait samples across 0--120.
    #[serde(default = "default_surface_steps")]
    pub wait_steps: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            density_steps: default_surface_steps(),
            wait_steps: default_surface_steps(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_tie_epsilon() -> f64 {
    crate::arbiter::TIE_EPSILON
}

const fn default_baseline_lane() -> LaneId {
    LaneId::North
}

const fn default_baseline_green_seconds() -> f64 {
    30.0
}

const fn default_emergency_weight() -> f64 {
    crate::effectiveness::EMERGENCY_WEIGHT
}

const fn default_surface_steps() -> usize {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.arbitration.tie_epsilon - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.baseline.lane, LaneId::North);
        assert!((config.baseline.green_seconds - 30.0).abs() < f64::EPSILON);
        assert!((config.scoring.emergency_weight - 1000.0).abs() < f64::EPSILON);
        assert_eq!(config.surface.density_steps, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
arbitration:
  tie_epsilon: 0.5

baseline:
  lane: East
  green_seconds: 45

scoring:
  emergency_weight: 500

surface:
  density_steps: 11
  wait_steps: 13

logging:
  level: "debug"
  json: true

scenarios:
  - name: "Rush hour"
    lanes:
      north: { density: 90, wait: 60 }
      south: { density: 80, wait: 70 }
      east: { density: 10, wait: 5 }
      west: { density: 20, wait: 10, emergency: true }
"#;

        let config = ControllerConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_else(ControllerConfig::default);

        assert!((config.arbitration.tie_epsilon - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.baseline.lane, LaneId::East);
        assert!((config.baseline.green_seconds - 45.0).abs() < f64::EPSILON);
        assert_eq!(config.surface.wait_steps, 13);
        assert!(config.logging.json);
        assert_eq!(config.scenarios.len(), 1);
        let rush = config.scenarios.first();
        assert!(rush.is_some_and(|s| s.lanes.west.emergency && !s.lanes.north.emergency));
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "baseline:\n  green_seconds: 20\n";
        let config = ControllerConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_else(ControllerConfig::default);

        // Green is overridden
        assert!((config.baseline.green_seconds - 20.0).abs() < f64::EPSILON);
        // Everything else uses defaults
        assert_eq!(config.baseline.lane, LaneId::North);
        assert_eq!(config.surface.density_steps, 30);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = ControllerConfig::parse("");
        assert!(config.is_ok());
        assert!(config.is_ok_and(|c| c == ControllerConfig::default()));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let negative_epsilon = ControllerConfig::parse("arbitration:\n  tie_epsilon: -0.1\n");
        assert!(matches!(negative_epsilon, Err(ConfigError::Invalid { .. })));

        let zero_green = ControllerConfig::parse("baseline:\n  green_seconds: 0\n");
        assert!(matches!(zero_green, Err(ConfigError::Invalid { .. })));

        let zero_steps = ControllerConfig::parse("surface:\n  density_steps: 0\n");
        assert!(matches!(zero_steps, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = ControllerConfig::parse("baseline: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn unknown_lane_is_a_yaml_error() {
        let result = ControllerConfig::parse("baseline:\n  lane: Up\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("junction-config.yaml");
        let config = ControllerConfig::from_file(&path);
        assert!(config.is_ok(), "failed to load junction-config.yaml: {config:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ControllerConfig::from_file(Path::new("/nonexistent/junction-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
