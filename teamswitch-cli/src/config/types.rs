use serde::Deserialize;
use teamswitch_core::TeamSwitchConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawTeamSwitchConfig {
    pub enabled: Option<bool>,
    pub min_lifetime: Option<f64>,
    pub max_lifetime: Option<f64>,
    pub velocity_threshold: Option<f64>,
    pub poll_interval: Option<f64>,
    pub spawn_height_offset: Option<f64>,
}

impl RawTeamSwitchConfig {
    /// Overlay values override self only if explicitly set
    pub fn merge(self, overlay: RawTeamSwitchConfig) -> RawTeamSwitchConfig {
        RawTeamSwitchConfig {
            enabled: overlay.enabled.or(self.enabled),
            min_lifetime: overlay.min_lifetime.or(self.min_lifetime),
            max_lifetime: overlay.max_lifetime.or(self.max_lifetime),
            velocity_threshold: overlay.velocity_threshold.or(self.velocity_threshold),
            poll_interval: overlay.poll_interval.or(self.poll_interval),
            spawn_height_offset: overlay.spawn_height_offset.or(self.spawn_height_offset),
        }
    }

    /// Apply defaults for every field left unset
    pub fn finalize(self) -> TeamSwitchConfig {
        let defaults = TeamSwitchConfig::default();
        TeamSwitchConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            min_lifetime: self.min_lifetime.unwrap_or(defaults.min_lifetime),
            max_lifetime: self.max_lifetime.unwrap_or(defaults.max_lifetime),
            velocity_threshold: self
                .velocity_threshold
                .unwrap_or(defaults.velocity_threshold),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            spawn_height_offset: self
                .spawn_height_offset
                .unwrap_or(defaults.spawn_height_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_raw_finalizes_to_defaults() {
        let config = RawTeamSwitchConfig::default().finalize();
        assert_eq!(config, TeamSwitchConfig::default());
    }

    #[test]
    fn test_merge_overlay_overrides_base() {
        let base = RawTeamSwitchConfig {
            enabled: Some(false),
            max_lifetime: Some(5.0),
            ..Default::default()
        };
        let overlay = RawTeamSwitchConfig {
            max_lifetime: Some(8.0),
            velocity_threshold: Some(1.0),
            ..Default::default()
        };

        let merged = base.merge(overlay);

        assert_eq!(merged.enabled, Some(false));
        assert_eq!(merged.max_lifetime, Some(8.0));
        assert_eq!(merged.velocity_threshold, Some(1.0));
        assert_eq!(merged.poll_interval, None);
    }

    #[test]
    fn test_partial_toml_parses() {
        let raw: RawTeamSwitchConfig = toml::from_str("max_lifetime = 4.5\n").unwrap();
        assert_eq!(raw.max_lifetime, Some(4.5));
        assert_eq!(raw.finalize().velocity_threshold, 3.0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = toml::from_str::<RawTeamSwitchConfig>("max_lifetme = 4.5\n");
        assert!(result.is_err());
    }
}
