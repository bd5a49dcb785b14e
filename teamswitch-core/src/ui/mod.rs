//! Team switch dialog and the UI surface it renders on

pub mod dialog;
pub mod mock;
pub mod traits;
pub mod widgets;

// Re-export key types for convenience
pub use dialog::{DialogAction, PlayerPresence, UiFlowController};
pub use mock::{MockUi, MockWidget, MockWidgetKind};
pub use traits::{BgFill, ContainerStyle, UiAnchor, UiDepth, UiSurface, WidgetLayout};
pub use widgets::{ButtonWidgets, DialogButton, PlayerWidgets, container_name};
