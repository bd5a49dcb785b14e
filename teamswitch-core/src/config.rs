//! Configuration for the team switch feature

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Static, process-wide team switch policy
///
/// Time values are in match-time seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSwitchConfig {
    /// Whether the interact point is offered at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum interact point lifetime. Carried as policy input only.
    #[serde(default = "default_min_lifetime")]
    pub min_lifetime: f64,

    /// Interact points older than this are removed on the next tick
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime: f64,

    /// Removal threshold for |vx| + |vy| + |vz|
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,

    /// How often the spawn routine re-checks whether the player is grounded
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,

    /// Vertical offset of the interact point above the player's facing point
    #[serde(default = "default_spawn_height_offset")]
    pub spawn_height_offset: f64,
}

fn default_true() -> bool {
    true
}

fn default_min_lifetime() -> f64 {
    1.0
}

fn default_max_lifetime() -> f64 {
    3.0
}

fn default_velocity_threshold() -> f64 {
    3.0
}

fn default_poll_interval() -> f64 {
    0.2
}

fn default_spawn_height_offset() -> f64 {
    1.5
}

impl Default for TeamSwitchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_lifetime: default_min_lifetime(),
            max_lifetime: default_max_lifetime(),
            velocity_threshold: default_velocity_threshold(),
            poll_interval: default_poll_interval(),
            spawn_height_offset: default_spawn_height_offset(),
        }
    }
}

impl TeamSwitchConfig {
    /// Config with the feature switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TeamSwitchConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the lifecycle cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("min_lifetime", self.min_lifetime),
            ("max_lifetime", self.max_lifetime),
            ("velocity_threshold", self.velocity_threshold),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if self.min_lifetime > self.max_lifetime {
            return Err(ConfigError::Invalid {
                field: "min_lifetime",
                reason: format!(
                    "must not exceed max_lifetime ({} > {})",
                    self.min_lifetime, self.max_lifetime
                ),
            });
        }

        if !self.poll_interval.is_finite() || self.poll_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval",
                reason: format!("must be positive, got {}", self.poll_interval),
            });
        }

        if !self.spawn_height_offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "spawn_height_offset",
                reason: "must be finite".to_string(),
            });
        }

        Ok(())
    }

    /// Grounded-wait poll interval as a sleep duration
    pub fn poll_duration(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval)
    }
}
