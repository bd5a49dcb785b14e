//! Dialog widget naming, layout, and per-player registry
//!
//! The host UI looks widgets up by name, so every widget name is a purpose
//! base name followed by the owning player's id. Inside this crate widgets are
//! tracked by purpose through [`PlayerWidgets`] instead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::traits::{BgFill, ContainerStyle, UiAnchor, UiDepth, WidgetLayout};
use crate::types::{MessageKey, PlayerId, TeamId, Vec3, WidgetId};

const CONTAINER_BASE_NAME: &str = "teamswitch_container_";

const BUTTON_SIZE: Vec3 = Vec3::new(300.0, 100.0, 0.0);

/// Dialog container geometry
pub const CONTAINER_LAYOUT: WidgetLayout = WidgetLayout {
    position: Vec3::ZERO,
    size: Vec3::new(1300.0, 700.0, 0.0),
    anchor: UiAnchor::Center,
};

/// Dialog container style
pub const CONTAINER_STYLE: ContainerStyle = ContainerStyle {
    visible: true,
    padding: 10.0,
    bg_color: Vec3::ZERO,
    bg_alpha: 1.0,
    bg_fill: BgFill::Blur,
    depth: UiDepth::AboveGameUi,
};

/// Buttons shown in the team switch dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogButton {
    Team1,
    Team2,
    Spectate,
    Cancel,
    OptOut,
}

impl DialogButton {
    /// All buttons in build order
    pub const ALL: [DialogButton; 5] = [
        Self::Team1,
        Self::Team2,
        Self::Spectate,
        Self::Cancel,
        Self::OptOut,
    ];

    fn button_base_name(&self) -> &'static str {
        match self {
            Self::Team1 => "teamswitch_button_team1_",
            Self::Team2 => "teamswitch_button_team2_",
            Self::Spectate => "teamswitch_button_spectate_",
            Self::Cancel => "teamswitch_button_cancel_",
            Self::OptOut => "teamswitch_button_optout_",
        }
    }

    fn label_base_name(&self) -> &'static str {
        match self {
            Self::Team1 => "teamswitch_label_team1_",
            Self::Team2 => "teamswitch_label_team2_",
            Self::Spectate => "teamswitch_label_spectate_",
            Self::Cancel => "teamswitch_label_cancel_",
            Self::OptOut => "teamswitch_label_optout_",
        }
    }

    /// Name of this button's widget for `player`
    pub fn button_name(&self, player: PlayerId) -> String {
        format!("{}{}", self.button_base_name(), player)
    }

    /// Name of this button's text label for `player`
    pub fn label_name(&self, player: PlayerId) -> String {
        format!("{}{}", self.label_base_name(), player)
    }

    /// Resolve a pressed widget's name against `player`'s dialog buttons
    pub fn from_widget_name(name: &str, player: PlayerId) -> Option<DialogButton> {
        Self::ALL
            .into_iter()
            .find(|button| button.button_name(player) == name)
    }

    /// Localized label shown on the button
    pub fn label(&self) -> MessageKey {
        match self {
            Self::Team1 => MessageKey::Team1Label,
            Self::Team2 => MessageKey::Team2Label,
            Self::Spectate => MessageKey::SpectateLabel,
            Self::Cancel => MessageKey::CancelLabel,
            Self::OptOut => MessageKey::OptOutLabel,
        }
    }

    /// Geometry shared by the button and its label
    pub fn layout(&self) -> WidgetLayout {
        let (position, anchor) = match self {
            Self::Team1 => (Vec3::ZERO, UiAnchor::TopLeft),
            Self::Team2 => (Vec3::new(0.0, 110.0, 0.0), UiAnchor::TopLeft),
            Self::Spectate => (Vec3::new(0.0, 220.0, 0.0), UiAnchor::TopLeft),
            Self::Cancel => (Vec3::ZERO, UiAnchor::BottomRight),
            Self::OptOut => (Vec3::ZERO, UiAnchor::BottomCenter),
        };
        WidgetLayout {
            position,
            size: BUTTON_SIZE,
            anchor,
        }
    }

    /// Whether the button can be pressed by a player on `current` team
    ///
    /// Switching to the team you are already on is not offered. Spectating is
    /// not available.
    pub fn enabled_for(&self, current: TeamId) -> bool {
        match self {
            Self::Team1 => current != TeamId::TEAM_1,
            Self::Team2 => current != TeamId::TEAM_2,
            Self::Spectate => false,
            Self::Cancel | Self::OptOut => true,
        }
    }
}

/// Name of the dialog container for `player`
pub fn container_name(player: PlayerId) -> String {
    format!("{CONTAINER_BASE_NAME}{player}")
}

/// Handles of one button and its label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonWidgets {
    pub button: WidgetId,
    pub label: WidgetId,
}

/// Widgets making up one player's open dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerWidgets {
    container: WidgetId,
    buttons: HashMap<DialogButton, ButtonWidgets>,
}

impl PlayerWidgets {
    pub fn new(container: WidgetId) -> Self {
        Self {
            container,
            buttons: HashMap::new(),
        }
    }

    pub fn container(&self) -> WidgetId {
        self.container
    }

    pub fn insert(&mut self, button: DialogButton, widgets: ButtonWidgets) {
        self.buttons.insert(button, widgets);
    }

    pub fn get(&self, button: DialogButton) -> Option<ButtonWidgets> {
        self.buttons.get(&button).copied()
    }

    /// Which button, if any, a widget handle belongs to
    pub fn button_for(&self, widget: WidgetId) -> Option<DialogButton> {
        self.buttons
            .iter()
            .find(|(_, w)| w.button == widget)
            .map(|(button, _)| *button)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
