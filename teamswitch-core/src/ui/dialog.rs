//! Team switch dialog flow
//!
//! Builds the per-player modal dialog when the interact point is activated
//! and routes its button presses to the team service or back to teardown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::traits::UiSurface;
use super::widgets::{
    ButtonWidgets, CONTAINER_LAYOUT, CONTAINER_STYLE, DialogButton, PlayerWidgets, container_name,
};
use crate::error::{TeamSwitchError, UiError};
use crate::events::ButtonEvent;
use crate::interact::InteractPointLifecycle;
use crate::team::TeamAssignmentService;
use crate::types::{PlayerId, TeamId, WidgetId};
use crate::world::World;

/// Whether the player behind a teardown is still connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPresence {
    Connected,
    Departed,
}

/// What a button press did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogAction {
    SwitchedTeam { team: TeamId },
    Spectate,
    Cancelled,
    OptedOut,
    /// The widget is not one of this player's dialog buttons
    Ignored,
}

/// Opens, routes, and closes team switch dialogs
pub struct UiFlowController {
    ui: Arc<dyn UiSurface>,
    world: Arc<dyn World>,
    lifecycle: Arc<InteractPointLifecycle>,
    teams: Arc<TeamAssignmentService>,
    open: Mutex<HashMap<PlayerId, PlayerWidgets>>,
}

impl UiFlowController {
    pub fn new(
        ui: Arc<dyn UiSurface>,
        world: Arc<dyn World>,
        lifecycle: Arc<InteractPointLifecycle>,
        teams: Arc<TeamAssignmentService>,
    ) -> Self {
        Self {
            ui,
            world,
            lifecycle,
            teams,
            open: Mutex::new(HashMap::new()),
        }
    }

    fn open_dialogs(&self) -> MutexGuard<'_, HashMap<PlayerId, PlayerWidgets>> {
        self.open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_open(&self, player: PlayerId) -> bool {
        self.open_dialogs().contains_key(&player)
    }

    /// Registered widgets of the player's open dialog
    pub fn widgets(&self, player: PlayerId) -> Option<PlayerWidgets> {
        self.open_dialogs().get(&player).cloned()
    }

    /// Open the dialog and give the player UI-exclusive input
    ///
    /// Returns false when the dialog was already open.
    pub fn open_dialog(&self, player: PlayerId) -> Result<bool, UiError> {
        if self.is_open(player) {
            debug!(player, "Team switch dialog already open");
            return Ok(false);
        }

        self.ui.set_input_mode(player, true)?;
        let widgets = match self.build_dialog(player) {
            Ok(widgets) => widgets,
            Err(e) => {
                warn!(player, error = %e, "Failed to build team switch dialog");
                self.delete_container(player);
                if let Err(restore) = self.ui.set_input_mode(player, false) {
                    warn!(player, error = %restore, "Failed to restore input mode");
                }
                return Err(e);
            }
        };

        self.open_dialogs().insert(player, widgets);
        info!(player, "Opened team switch dialog");
        Ok(true)
    }

    fn build_dialog(&self, player: PlayerId) -> Result<PlayerWidgets, UiError> {
        let container = self.ui.add_container(
            &container_name(player),
            &CONTAINER_LAYOUT,
            &CONTAINER_STYLE,
            self.ui.root(),
            player,
        )?;
        let mut widgets = PlayerWidgets::new(container);
        let current_team = self.world.team(player);

        for button in DialogButton::ALL {
            let layout = button.layout();

            let button_id = self
                .ui
                .add_button(&button.button_name(player), &layout, player)?;
            self.ui.set_parent(button_id, container)?;
            self.ui
                .set_button_enabled(button_id, button.enabled_for(current_team))?;

            let label_id =
                self.ui
                    .add_text(&button.label_name(player), &layout, button.label(), player)?;
            self.ui.set_bg_alpha(label_id, 0.0)?;
            self.ui.set_parent(label_id, container)?;

            widgets.insert(
                button,
                ButtonWidgets {
                    button: button_id,
                    label: label_id,
                },
            );
        }

        Ok(widgets)
    }

    /// Route a button press from one of the player's widgets
    pub async fn handle_button(
        &self,
        player: PlayerId,
        widget: WidgetId,
        event: ButtonEvent,
    ) -> Result<DialogAction, TeamSwitchError> {
        let Some(name) = self.ui.widget_name(widget) else {
            trace!(player, widget, "Button event for unknown widget");
            return Ok(DialogAction::Ignored);
        };
        let Some(button) = DialogButton::from_widget_name(&name, player) else {
            trace!(player, widget = %name, "Button event outside team switch dialog");
            return Ok(DialogAction::Ignored);
        };
        debug!(player, ?button, ?event, "Team switch dialog button pressed");

        let action = match button {
            DialogButton::Team1 | DialogButton::Team2 => {
                let team = self.teams.switch_team(player)?;
                self.close_dialog(player, PlayerPresence::Connected);
                DialogAction::SwitchedTeam { team }
            }
            DialogButton::Spectate => DialogAction::Spectate,
            DialogButton::Cancel => {
                self.close_dialog(player, PlayerPresence::Connected);
                DialogAction::Cancelled
            }
            DialogButton::OptOut => {
                self.teams.opt_out(player).await?;
                // No further points spawn for an opted-out session, so the current one
                // goes now. Cancel keeps it so the player can interact again.
                self.lifecycle.remove_interact_point(player).await?;
                self.close_dialog(player, PlayerPresence::Connected);
                DialogAction::OptedOut
            }
        };
        Ok(action)
    }

    /// Tear down the player's dialog
    ///
    /// Restores normal input for connected players. Safe to call with no
    /// dialog open; returns whether a dialog container was deleted. UI
    /// failures are logged, never returned.
    pub fn close_dialog(&self, player: PlayerId, presence: PlayerPresence) -> bool {
        if presence == PlayerPresence::Connected
            && let Err(e) = self.ui.set_input_mode(player, false)
        {
            warn!(player, error = %e, "Failed to restore input mode");
        }
        self.open_dialogs().remove(&player);

        let deleted = self.delete_container(player);
        if deleted {
            info!(player, "Closed team switch dialog");
        }
        deleted
    }

    fn delete_container(&self, player: PlayerId) -> bool {
        let Some(container) = self.ui.find_widget(&container_name(player), self.ui.root()) else {
            return false;
        };
        match self.ui.delete_widget(container) {
            Ok(()) => true,
            Err(UiError::WidgetNotFound(_)) => false,
            Err(e) => {
                warn!(player, error = %e, "Failed to delete team switch dialog");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeamSwitchConfig;
    use crate::interact::SpawnOutcome;
    use crate::session::PlayerSessionStore;
    use crate::ui::mock::MockUi;
    use crate::world::{MockSoldier, MockWorld, WorldCall};
    use tokio_util::sync::CancellationToken;

    struct Fixture {
        dialogs: UiFlowController,
        lifecycle: Arc<InteractPointLifecycle>,
        sessions: Arc<PlayerSessionStore>,
        world: Arc<MockWorld>,
        ui: Arc<MockUi>,
    }

    async fn fixture(player: PlayerId, team: TeamId) -> Fixture {
        let sessions = Arc::new(PlayerSessionStore::new());
        let world = Arc::new(MockWorld::new());
        let ui = Arc::new(MockUi::new());
        let world_dyn: Arc<dyn World> = world.clone();
        let ui_dyn: Arc<dyn UiSurface> = ui.clone();

        let lifecycle = Arc::new(InteractPointLifecycle::new(
            Arc::new(TeamSwitchConfig::default()),
            sessions.clone(),
            world_dyn.clone(),
        ));
        let teams = Arc::new(TeamAssignmentService::new(world_dyn.clone(), sessions.clone()));
        let dialogs = UiFlowController::new(ui_dyn, world_dyn, lifecycle.clone(), teams);

        world.add_player(player, MockSoldier::on_team(team));
        sessions.create(player).await.unwrap();

        Fixture {
            dialogs,
            lifecycle,
            sessions,
            world,
            ui,
        }
    }

    fn button_id(f: &Fixture, player: PlayerId, button: DialogButton) -> WidgetId {
        f.dialogs.widgets(player).unwrap().get(button).unwrap().button
    }

    // ==================== Open Tests ====================

    #[tokio::test]
    async fn open_builds_container_buttons_and_labels() {
        let f = fixture(1, TeamId::TEAM_1).await;

        assert!(f.dialogs.open_dialog(1).unwrap());

        let widgets = f.dialogs.widgets(1).unwrap();
        assert_eq!(widgets.len(), 5);
        assert_eq!(f.ui.widget_count(), 11);
        assert_eq!(f.ui.input_mode(1), Some(true));
        for button in DialogButton::ALL {
            let ids = widgets.get(button).unwrap();
            assert_eq!(f.ui.parent_of(ids.button), Some(widgets.container()));
            assert_eq!(f.ui.parent_of(ids.label), Some(widgets.container()));
            assert_eq!(f.ui.bg_alpha(ids.label), Some(0.0));
        }
    }

    #[tokio::test]
    async fn team_1_player_cannot_pick_team_1() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();

        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Team1)), Some(false));
        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Team2)), Some(true));
        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Spectate)), Some(false));
        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Cancel)), Some(true));
    }

    #[tokio::test]
    async fn team_2_player_cannot_pick_team_2() {
        let f = fixture(1, TeamId::TEAM_2).await;
        f.dialogs.open_dialog(1).unwrap();

        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Team1)), Some(true));
        assert_eq!(f.ui.button_enabled(button_id(&f, 1, DialogButton::Team2)), Some(false));
    }

    #[tokio::test]
    async fn second_open_is_noop() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();

        assert!(!f.dialogs.open_dialog(1).unwrap());
        assert_eq!(f.ui.widget_count(), 11);
    }

    #[tokio::test]
    async fn dialogs_for_different_players_do_not_collide() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.world.add_player(2, MockSoldier::on_team(TeamId::TEAM_2));

        f.dialogs.open_dialog(1).unwrap();
        f.dialogs.open_dialog(2).unwrap();
        f.dialogs.close_dialog(1, PlayerPresence::Connected);

        assert!(f.dialogs.is_open(2));
        assert_eq!(f.ui.widget_count(), 11);
    }

    #[tokio::test]
    async fn failed_build_leaves_no_partial_dialog() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.ui.fail_on_widget(&DialogButton::Cancel.label_name(1));

        let result = f.dialogs.open_dialog(1);

        assert!(result.is_err());
        assert!(!f.dialogs.is_open(1));
        assert_eq!(f.ui.widget_count(), 0);
        assert_eq!(f.ui.input_mode(1), Some(false));
    }

    // ==================== Close Tests ====================

    #[tokio::test]
    async fn close_restores_input_and_deletes_everything() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();

        assert!(f.dialogs.close_dialog(1, PlayerPresence::Connected));

        assert_eq!(f.ui.widget_count(), 0);
        assert_eq!(f.ui.input_mode(1), Some(false));
        assert!(!f.dialogs.is_open(1));
    }

    #[tokio::test]
    async fn close_without_dialog_is_safe() {
        let f = fixture(1, TeamId::TEAM_1).await;
        assert!(!f.dialogs.close_dialog(1, PlayerPresence::Connected));
        assert!(!f.dialogs.close_dialog(1, PlayerPresence::Departed));
    }

    #[tokio::test]
    async fn close_for_departed_player_leaves_input_mode_alone() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();

        f.dialogs.close_dialog(1, PlayerPresence::Departed);

        assert_eq!(f.ui.input_mode(1), Some(true));
        assert_eq!(f.ui.widget_count(), 0);
    }

    // ==================== Button Tests ====================

    #[tokio::test]
    async fn team_button_switches_then_closes() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();
        let widget = button_id(&f, 1, DialogButton::Team2);

        let action = f
            .dialogs
            .handle_button(1, widget, ButtonEvent::ButtonUp)
            .await
            .unwrap();

        assert_eq!(action, DialogAction::SwitchedTeam { team: TeamId::TEAM_2 });
        assert_eq!(f.world.team(1), TeamId::TEAM_2);
        assert!(f.world.calls().contains(&WorldCall::Undeploy { player: 1 }));
        assert!(!f.dialogs.is_open(1));
        assert_eq!(f.ui.input_mode(1), Some(false));
    }

    #[tokio::test]
    async fn failed_team_switch_keeps_dialog_open() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();
        f.world.fail_team_assignment("locked");
        let widget = button_id(&f, 1, DialogButton::Team2);

        let result = f.dialogs.handle_button(1, widget, ButtonEvent::ButtonUp).await;

        assert!(matches!(result, Err(TeamSwitchError::World(_))));
        assert!(f.dialogs.is_open(1));
    }

    #[tokio::test]
    async fn cancel_closes_without_state_change() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.lifecycle
            .spawn_interact_point(1, CancellationToken::new())
            .await
            .unwrap();
        f.dialogs.open_dialog(1).unwrap();
        let widget = button_id(&f, 1, DialogButton::Cancel);

        let action = f
            .dialogs
            .handle_button(1, widget, ButtonEvent::ButtonUp)
            .await
            .unwrap();

        assert_eq!(action, DialogAction::Cancelled);
        assert!(!f.dialogs.is_open(1));
        let session = f.sessions.get(1).await.unwrap();
        assert!(!session.opted_out());
        assert!(session.has_interact_point());
        assert_eq!(f.world.team(1), TeamId::TEAM_1);
    }

    #[tokio::test]
    async fn opt_out_sets_flag_removes_point_and_closes() {
        let f = fixture(1, TeamId::TEAM_1).await;
        let outcome = f
            .lifecycle
            .spawn_interact_point(1, CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, SpawnOutcome::Spawned { .. }));
        f.dialogs.open_dialog(1).unwrap();
        let widget = button_id(&f, 1, DialogButton::OptOut);

        let action = f
            .dialogs
            .handle_button(1, widget, ButtonEvent::ButtonUp)
            .await
            .unwrap();

        assert_eq!(action, DialogAction::OptedOut);
        let session = f.sessions.get(1).await.unwrap();
        assert!(session.opted_out());
        assert!(!session.has_interact_point());
        assert_eq!(f.world.object_count(), 0);
        assert!(!f.dialogs.is_open(1));
    }

    #[tokio::test]
    async fn spectate_does_nothing() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.dialogs.open_dialog(1).unwrap();
        let widget = button_id(&f, 1, DialogButton::Spectate);

        let action = f
            .dialogs
            .handle_button(1, widget, ButtonEvent::ButtonUp)
            .await
            .unwrap();

        assert_eq!(action, DialogAction::Spectate);
        assert!(f.dialogs.is_open(1));
    }

    #[tokio::test]
    async fn other_players_button_is_ignored() {
        let f = fixture(1, TeamId::TEAM_1).await;
        f.world.add_player(2, MockSoldier::on_team(TeamId::TEAM_1));
        f.dialogs.open_dialog(2).unwrap();
        let foreign = button_id(&f, 2, DialogButton::Cancel);

        let action = f
            .dialogs
            .handle_button(1, foreign, ButtonEvent::ButtonUp)
            .await
            .unwrap();

        assert_eq!(action, DialogAction::Ignored);
        assert!(f.dialogs.is_open(2));
    }

    #[tokio::test]
    async fn unknown_widget_is_ignored() {
        let f = fixture(1, TeamId::TEAM_1).await;
        let action = f
            .dialogs
            .handle_button(1, 999, ButtonEvent::ButtonDown)
            .await
            .unwrap();
        assert_eq!(action, DialogAction::Ignored);
    }
}
