//! Event handler wiring the session store, lifecycle, team service, and dialogs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::TeamSwitchConfig;
use crate::error::{ConfigError, SessionError, TeamSwitchError};
use crate::events::{ButtonEvent, GameEvent};
use crate::interact::{InteractPointLifecycle, RemovalOutcome, RemovalReason, SpawnOutcome};
use crate::session::PlayerSessionStore;
use crate::team::TeamAssignmentService;
use crate::types::{ObjectId, PlayerId, WidgetId};
use crate::ui::{DialogAction, PlayerPresence, UiFlowController, UiSurface};
use crate::world::World;

/// Handle of a running spawn routine
pub type SpawnTask = JoinHandle<Result<SpawnOutcome, TeamSwitchError>>;

/// What dispatching one [`GameEvent`] did
#[derive(Debug)]
pub enum EventOutcome {
    Joined,
    SpawnStarted(SpawnTask),
    Undeployed(RemovalOutcome),
    Left(RemovalOutcome),
    Ticked(Option<RemovalReason>),
    /// Whether a dialog was opened by the interaction
    Interacted(bool),
    Button(DialogAction),
}

/// Entry point for the outer game runtime
pub struct TeamSwitchHandler {
    config: Arc<TeamSwitchConfig>,
    sessions: Arc<PlayerSessionStore>,
    lifecycle: Arc<InteractPointLifecycle>,
    teams: Arc<TeamAssignmentService>,
    dialogs: UiFlowController,
}

impl TeamSwitchHandler {
    /// Build a handler; the config is validated first
    pub fn new(
        config: TeamSwitchConfig,
        world: Arc<dyn World>,
        ui: Arc<dyn UiSurface>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let sessions = Arc::new(PlayerSessionStore::new());
        let lifecycle = Arc::new(InteractPointLifecycle::new(
            config.clone(),
            sessions.clone(),
            world.clone(),
        ));
        let teams = Arc::new(TeamAssignmentService::new(world.clone(), sessions.clone()));
        let dialogs = UiFlowController::new(ui, world, lifecycle.clone(), teams.clone());

        Ok(Self {
            config,
            sessions,
            lifecycle,
            teams,
            dialogs,
        })
    }

    pub fn config(&self) -> &TeamSwitchConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<PlayerSessionStore> {
        &self.sessions
    }

    pub fn lifecycle(&self) -> &Arc<InteractPointLifecycle> {
        &self.lifecycle
    }

    pub fn teams(&self) -> &Arc<TeamAssignmentService> {
        &self.teams
    }

    pub fn dialogs(&self) -> &UiFlowController {
        &self.dialogs
    }

    // ==================== Player Events ====================

    pub async fn on_player_joined(&self, player: PlayerId) -> Result<(), TeamSwitchError> {
        self.sessions
            .create(player)
            .await
            .map_err(|e| session_failure(player, e))?;
        debug!(player, "Team switch session created");
        Ok(())
    }

    /// Start the spawn routine; the returned task resolves once it finishes
    pub fn on_player_deployed(&self, player: PlayerId) -> SpawnTask {
        self.lifecycle.start_spawn(player)
    }

    pub async fn on_player_undeployed(
        &self,
        player: PlayerId,
    ) -> Result<RemovalOutcome, TeamSwitchError> {
        self.lifecycle.cancel_pending_spawn(player);
        let outcome = self
            .lifecycle
            .remove_interact_point(player)
            .await
            .map_err(|e| session_failure(player, e))?;
        Ok(outcome)
    }

    /// Tear down everything held for a departing player and drop the session
    pub async fn on_player_left(&self, player: PlayerId) -> Result<RemovalOutcome, TeamSwitchError> {
        self.lifecycle.cancel_pending_spawn(player);
        self.dialogs.close_dialog(player, PlayerPresence::Departed);

        let outcome = self
            .lifecycle
            .remove_interact_point(player)
            .await
            .map_err(|e| session_failure(player, e))?;
        self.sessions
            .remove(player)
            .await
            .map_err(|e| session_failure(player, e))?;
        debug!(player, "Team switch session removed");
        Ok(outcome)
    }

    pub async fn on_player_tick(
        &self,
        player: PlayerId,
    ) -> Result<Option<RemovalReason>, TeamSwitchError> {
        let reason = self
            .lifecycle
            .check_removal(player)
            .await
            .map_err(|e| session_failure(player, e))?;
        Ok(reason)
    }

    /// Open the dialog when the player activates their own interact point
    pub async fn on_player_interact(
        &self,
        player: PlayerId,
        object: ObjectId,
    ) -> Result<bool, TeamSwitchError> {
        let owned = self
            .lifecycle
            .owns_interact_point(player, object)
            .await
            .map_err(|e| session_failure(player, e))?;
        if !owned {
            debug!(player, object, "Interaction with foreign interact point");
            return Ok(false);
        }
        Ok(self.dialogs.open_dialog(player)?)
    }

    pub async fn on_ui_button(
        &self,
        player: PlayerId,
        widget: WidgetId,
        event: ButtonEvent,
    ) -> Result<DialogAction, TeamSwitchError> {
        self.dialogs.handle_button(player, widget, event).await
    }

    /// Route a game event to its handler
    pub async fn dispatch(&self, event: GameEvent) -> Result<EventOutcome, TeamSwitchError> {
        let outcome = match event {
            GameEvent::PlayerJoined { player } => {
                self.on_player_joined(player).await?;
                EventOutcome::Joined
            }
            GameEvent::PlayerDeployed { player } => {
                EventOutcome::SpawnStarted(self.on_player_deployed(player))
            }
            GameEvent::PlayerUndeployed { player } => {
                EventOutcome::Undeployed(self.on_player_undeployed(player).await?)
            }
            GameEvent::PlayerLeft { player } => {
                EventOutcome::Left(self.on_player_left(player).await?)
            }
            GameEvent::PlayerTick { player } => {
                EventOutcome::Ticked(self.on_player_tick(player).await?)
            }
            GameEvent::PlayerInteracted {
                player,
                interact_point,
            } => EventOutcome::Interacted(self.on_player_interact(player, interact_point).await?),
            GameEvent::UiButton {
                player,
                widget,
                event,
            } => EventOutcome::Button(self.on_ui_button(player, widget, event).await?),
        };
        Ok(outcome)
    }
}

fn session_failure(player: PlayerId, e: SessionError) -> TeamSwitchError {
    error!(player, error = %e, "Team switch session error");
    e.into()
}
