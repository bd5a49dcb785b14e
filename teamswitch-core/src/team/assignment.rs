//! Team change and opt-out side effects

use std::sync::Arc;

use tracing::info;

use crate::error::{SessionError, WorldError};
use crate::session::PlayerSessionStore;
use crate::types::{MessageKey, PlayerId, TeamId};
use crate::world::World;

/// Performs the team change requested from the dialog
pub struct TeamAssignmentService {
    world: Arc<dyn World>,
    sessions: Arc<PlayerSessionStore>,
}

impl TeamAssignmentService {
    pub fn new(world: Arc<dyn World>, sessions: Arc<PlayerSessionStore>) -> Self {
        Self { world, sessions }
    }

    /// Move the player to the other team and force a redeploy
    ///
    /// Team 2 goes to team 1, everything else to team 2. World failures are
    /// returned as-is; nothing is retried.
    pub fn switch_team(&self, player: PlayerId) -> Result<TeamId, WorldError> {
        let current = self.world.team(player);
        let target = current.opposing();

        self.world.set_team(player, target)?;
        self.world.undeploy_player(player)?;
        self.world
            .display_notification(player, MessageKey::TeamSwitched)?;

        info!(player, from = %current, to = %target, "Player switched teams");
        Ok(target)
    }

    /// Suppress the interact point for the rest of the player's session
    pub async fn opt_out(&self, player: PlayerId) -> Result<(), SessionError> {
        self.sessions
            .with_session(player, |session| session.opt_out())
            .await?;
        info!(player, "Player opted out of team switching");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{MockSoldier, MockWorld, WorldCall};

    fn setup() -> (TeamAssignmentService, Arc<MockWorld>, Arc<PlayerSessionStore>) {
        let world = Arc::new(MockWorld::new());
        let sessions = Arc::new(PlayerSessionStore::new());
        let world_dyn: Arc<dyn World> = world.clone();
        (
            TeamAssignmentService::new(world_dyn, sessions.clone()),
            world,
            sessions,
        )
    }

    #[test]
    fn team_1_moves_to_team_2() {
        let (service, world, _) = setup();
        world.add_player(1, MockSoldier::on_team(TeamId::TEAM_1));

        assert_eq!(service.switch_team(1).unwrap(), TeamId::TEAM_2);
        assert_eq!(world.team(1), TeamId::TEAM_2);
    }

    #[test]
    fn team_2_moves_to_team_1() {
        let (service, world, _) = setup();
        world.add_player(1, MockSoldier::on_team(TeamId::TEAM_2));

        assert_eq!(service.switch_team(1).unwrap(), TeamId::TEAM_1);
    }

    #[test]
    fn switch_changes_team_then_undeploys_then_notifies() {
        let (service, world, _) = setup();
        world.add_player(4, MockSoldier::on_team(TeamId::TEAM_1));

        service.switch_team(4).unwrap();

        assert_eq!(
            world.calls(),
            vec![
                WorldCall::SetTeam {
                    player: 4,
                    team: TeamId::TEAM_2
                },
                WorldCall::Undeploy { player: 4 },
                WorldCall::Notify {
                    player: 4,
                    message: MessageKey::TeamSwitched
                },
            ]
        );
        assert!(!world.is_deployed(4));
    }

    #[test]
    fn team_assignment_failure_propagates() {
        let (service, world, _) = setup();
        world.add_player(1, MockSoldier::on_team(TeamId::TEAM_1));
        world.fail_team_assignment("match ending");

        let result = service.switch_team(1);

        assert!(matches!(result, Err(WorldError::TeamAssignment { .. })));
        assert!(world.is_deployed(1));
        assert!(world.notifications(1).is_empty());
    }

    #[tokio::test]
    async fn opt_out_sets_flag() {
        let (service, _, sessions) = setup();
        sessions.create(1).await.unwrap();

        service.opt_out(1).await.unwrap();

        assert!(sessions.get(1).await.unwrap().opted_out());
    }

    #[tokio::test]
    async fn opt_out_without_session_is_error() {
        let (service, _, _) = setup();
        assert_eq!(service.opt_out(2).await, Err(SessionError::NotFound(2)));
    }
}
