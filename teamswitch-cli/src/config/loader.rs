use super::types::RawTeamSwitchConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use teamswitch_core::TeamSwitchConfig;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + explicit file)
    pub fn load(explicit: Option<&Path>) -> Result<TeamSwitchConfig> {
        let user_path = Self::user_config_path();
        let project_path = Self::project_config_path();
        Self::load_layers(user_path.as_deref(), &project_path, explicit)
    }

    /// Merge the given layers in order, later layers winning
    ///
    /// Missing user or project files are skipped; a missing explicit file is an
    /// error.
    pub fn load_layers(
        user: Option<&Path>,
        project: &Path,
        explicit: Option<&Path>,
    ) -> Result<TeamSwitchConfig> {
        let mut raw = RawTeamSwitchConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user
            && user_path.exists()
        {
            raw = raw.merge(Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project.exists() {
            raw = raw.merge(Self::read_raw(project)?);
        }

        // Layer 3: --config
        if let Some(path) = explicit {
            raw = raw.merge(Self::read_raw(path)?);
        }

        let config = raw.finalize();
        config.validate()?;
        Ok(config)
    }

    fn read_raw(path: &Path) -> Result<RawTeamSwitchConfig> {
        debug!(path = %path.display(), "Reading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw: RawTeamSwitchConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(raw)
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "teamswitch").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with TEAMSWITCH_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("TEAMSWITCH_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".teamswitch/config.toml")
        }
    }
}
