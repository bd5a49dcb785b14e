//! Game events consumed by the team switch handler

use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, PlayerId, WidgetId};

/// Kind of UI button event reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonEvent {
    ButtonDown,
    ButtonUp,
    FocusIn,
    FocusOut,
}

/// Player-scoped events delivered by the outer game runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Player connected to the match
    PlayerJoined { player: PlayerId },

    /// Player spawned a soldier
    PlayerDeployed { player: PlayerId },

    /// Player's soldier was removed from play
    PlayerUndeployed { player: PlayerId },

    /// Player disconnected
    PlayerLeft { player: PlayerId },

    /// Periodic per-player update
    PlayerTick { player: PlayerId },

    /// Player activated an interact point
    PlayerInteracted {
        player: PlayerId,
        interact_point: ObjectId,
    },

    /// Player pressed or focused a UI widget
    UiButton {
        player: PlayerId,
        widget: WidgetId,
        event: ButtonEvent,
    },
}

impl GameEvent {
    /// The player this event belongs to
    pub fn player(&self) -> PlayerId {
        match self {
            Self::PlayerJoined { player }
            | Self::PlayerDeployed { player }
            | Self::PlayerUndeployed { player }
            | Self::PlayerLeft { player }
            | Self::PlayerTick { player }
            | Self::PlayerInteracted { player, .. }
            | Self::UiButton { player, .. } => *player,
        }
    }
}
