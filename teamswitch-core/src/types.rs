//! Shared identifiers and value types

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Stable identifier of a connected player
pub type PlayerId = u32;

/// Identifier of a spawned world object
pub type ObjectId = u32;

/// Identifier of a UI widget
pub type WidgetId = u32;

/// Team membership as reported by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl TeamId {
    pub const TEAM_1: TeamId = TeamId(1);
    pub const TEAM_2: TeamId = TeamId(2);

    /// The team a switch moves this player to.
    ///
    /// Anything other than team 2 is treated as team 1.
    pub fn opposing(self) -> TeamId {
        if self == Self::TEAM_2 {
            Self::TEAM_1
        } else {
            Self::TEAM_2
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Three component world vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Sum of the absolute values of each axis component
    pub fn abs_sum(&self) -> f64 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Localized string keys resolved by the host string table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    TeamSwitched,
    Team1Label,
    Team2Label,
    SpectateLabel,
    CancelLabel,
    OptOutLabel,
}

impl MessageKey {
    /// String-table key for this message
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamSwitched => "NOTIFICATION_TEAMSWITCH",
            Self::Team1Label => "UI_TEAMSWITCH_BUTTON_TEAM1_LABEL",
            Self::Team2Label => "UI_TEAMSWITCH_BUTTON_TEAM2_LABEL",
            Self::SpectateLabel => "UI_TEAMSWITCH_BUTTON_SPECTATE_LABEL",
            Self::CancelLabel => "UI_TEAMSWITCH_BUTTON_CANCEL_LABEL",
            Self::OptOutLabel => "UI_TEAMSWITCH_BUTTON_OPTOUT_LABEL",
        }
    }
}
