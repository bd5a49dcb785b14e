//! teamswitch-core: Post-deploy team switching for multiplayer matches
//!
//! After a player deploys, a physical interact point is spawned in front of
//! them. Activating it opens a modal dialog offering a switch to the other
//! team. The interact point is short-lived: it goes away when the player moves,
//! when it expires, or when the player undeploys or leaves.
//!
//! - **Sessions** - [`PlayerSessionStore`] holds one [`PlayerSession`] per connected player
//! - **Interact points** - [`InteractPointLifecycle`] spawns and removes them
//! - **Dialog** - [`UiFlowController`] builds the dialog and routes its buttons
//! - **Teams** - [`TeamAssignmentService`] switches teams and records opt-outs
//! - **Events** - [`TeamSwitchHandler`] dispatches [`GameEvent`]s to all of the above
//!
//! The game world and the UI are reached through the [`World`] and
//! [`UiSurface`] traits. [`MockWorld`] and [`MockUi`] implement them in memory.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamswitch_core::{GameEvent, MockUi, MockWorld, TeamSwitchConfig, TeamSwitchHandler};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let world = Arc::new(MockWorld::new());
//!     let ui = Arc::new(MockUi::new());
//!     let handler = TeamSwitchHandler::new(TeamSwitchConfig::default(), world, ui)?;
//!
//!     handler.dispatch(GameEvent::PlayerJoined { player: 1 }).await?;
//!     let spawn = handler.on_player_deployed(1);
//!     println!("spawn finished: {:?}", spawn.await??);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    TeamSwitchHandler                     │
//! │  ┌─────────────────────┐      ┌────────────────────────┐ │
//! │  │ InteractPoint-      │◄─────│   UiFlowController     │ │
//! │  │ Lifecycle           │      │  (dialog + buttons)    │ │
//! │  │ (spawn tasks)       │      └───────────┬────────────┘ │
//! │  └─────────┬───────────┘                  │              │
//! │            │            ┌─────────────────▼────────────┐ │
//! │            │            │  TeamAssignmentService       │ │
//! │            │            └─────────────────┬────────────┘ │
//! │  ┌─────────▼──────────────────────────────▼────────────┐ │
//! │  │                 PlayerSessionStore                  │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! └───────────────┬──────────────────────────┬───────────────┘
//!                 ▼                          ▼
//!            dyn World                  dyn UiSurface
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod interact;
pub mod session;
pub mod team;
pub mod types;
pub mod ui;
pub mod world;

// Re-export key types for convenience
pub use config::TeamSwitchConfig;
pub use error::{ConfigError, SessionError, TeamSwitchError, UiError, WorldError};
pub use events::{ButtonEvent, GameEvent};
pub use handler::{EventOutcome, SpawnTask, TeamSwitchHandler};
pub use interact::{
    InteractPointLifecycle, RemovalOutcome, RemovalReason, SkipReason, SpawnOutcome,
};
pub use session::{InteractPoint, PlayerSession, PlayerSessionStore};
pub use team::TeamAssignmentService;
pub use types::{MessageKey, ObjectId, PlayerId, TeamId, Vec3, WidgetId};
pub use ui::{
    DialogAction, DialogButton, MockUi, PlayerPresence, PlayerWidgets, UiFlowController,
    UiSurface,
};
pub use world::{MockSoldier, MockWorld, World, WorldCall};
