//! UI surface consumed by the dialog flow

use serde::{Deserialize, Serialize};

use crate::error::UiError;
use crate::types::{MessageKey, PlayerId, Vec3, WidgetId};

/// Anchor point a widget is positioned against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAnchor {
    TopLeft,
    Center,
    BottomCenter,
    BottomRight,
}

/// Background fill of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BgFill {
    None,
    Solid,
    Blur,
}

/// Layer a widget renders on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiDepth {
    BelowGameUi,
    AboveGameUi,
}

/// Position and size of a widget relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub position: Vec3,
    pub size: Vec3,
    pub anchor: UiAnchor,
}

/// Visual style of a container widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerStyle {
    pub visible: bool,
    pub padding: f64,
    pub bg_color: Vec3,
    pub bg_alpha: f64,
    pub bg_fill: BgFill,
    pub depth: UiDepth,
}

/// Widget primitives provided by the host UI
///
/// Every widget is scoped to the player it is created for.
pub trait UiSurface: Send + Sync {
    /// Root every top-level widget hangs off
    fn root(&self) -> WidgetId;

    fn add_container(
        &self,
        name: &str,
        layout: &WidgetLayout,
        style: &ContainerStyle,
        parent: WidgetId,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError>;

    fn add_button(
        &self,
        name: &str,
        layout: &WidgetLayout,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError>;

    fn add_text(
        &self,
        name: &str,
        layout: &WidgetLayout,
        label: MessageKey,
        owner: PlayerId,
    ) -> Result<WidgetId, UiError>;

    /// Find a widget by name anywhere below `within`
    fn find_widget(&self, name: &str, within: WidgetId) -> Option<WidgetId>;

    fn widget_name(&self, widget: WidgetId) -> Option<String>;

    /// Delete a widget together with all of its children
    fn delete_widget(&self, widget: WidgetId) -> Result<(), UiError>;

    fn set_parent(&self, widget: WidgetId, parent: WidgetId) -> Result<(), UiError>;

    fn set_bg_alpha(&self, widget: WidgetId, alpha: f64) -> Result<(), UiError>;

    fn set_button_enabled(&self, widget: WidgetId, enabled: bool) -> Result<(), UiError>;

    /// Switch the player between UI-exclusive and normal game input
    fn set_input_mode(&self, player: PlayerId, ui_exclusive: bool) -> Result<(), UiError>;
}
