//! Error types for teamswitch-core

use thiserror::Error;

use crate::types::{ObjectId, PlayerId, WidgetId};

/// Top-level error type for teamswitch-core
#[derive(Error, Debug)]
pub enum TeamSwitchError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("World error: {0}")]
    World(#[from] WorldError),

    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to per-player session records
///
/// Both variants indicate a missed join or leave event.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No session for player {0}")]
    NotFound(PlayerId),

    #[error("Session already exists for player {0}")]
    AlreadyExists(PlayerId),
}

/// Errors reported by the world simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    #[error("Object {0} does not exist")]
    ObjectNotFound(ObjectId),

    #[error("Player {0} does not exist")]
    PlayerNotFound(PlayerId),

    #[error("Failed to spawn object: {0}")]
    SpawnFailed(String),

    #[error("Team assignment failed for player {player}: {reason}")]
    TeamAssignment { player: PlayerId, reason: String },

    #[error("World operation failed: {0}")]
    Other(String),
}

/// Errors reported by the UI surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    #[error("Widget {0} does not exist")]
    WidgetNotFound(WidgetId),

    #[error("Widget name already in use: {0}")]
    DuplicateName(String),

    #[error("UI operation failed: {0}")]
    Other(String),
}

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
