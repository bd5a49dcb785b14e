//! World trait consumed by the team switch flow
//!
//! The host game owns the entity simulation. Queries are synchronous and side
//! effect free; mutations report failures through [`WorldError`].

use crate::error::WorldError;
use crate::types::{MessageKey, ObjectId, PlayerId, TeamId, Vec3};

/// Entity and match state exposed by the host game
pub trait World: Send + Sync {
    /// Whether the player's soldier has ground contact
    fn is_grounded(&self, player: PlayerId) -> bool;

    /// Whether the player's soldier is alive
    fn is_alive(&self, player: PlayerId) -> bool;

    fn position(&self, player: PlayerId) -> Vec3;

    /// Unit vector the player is looking along
    fn facing_direction(&self, player: PlayerId) -> Vec3;

    fn linear_velocity(&self, player: PlayerId) -> Vec3;

    fn team(&self, player: PlayerId) -> TeamId;

    /// Seconds elapsed since the match started
    fn match_time_elapsed(&self) -> f64;

    /// Spawn an interact point object at `position` with `rotation`
    fn spawn_interact_point(&self, position: Vec3, rotation: Vec3)
    -> Result<ObjectId, WorldError>;

    /// Toggle whether players can activate the interact point
    fn enable_interact_point(&self, object: ObjectId, enabled: bool) -> Result<(), WorldError>;

    /// Release a spawned object back to the world
    fn unspawn_object(&self, object: ObjectId) -> Result<(), WorldError>;

    fn set_team(&self, player: PlayerId, team: TeamId) -> Result<(), WorldError>;

    /// Force the player out of the active deployment
    fn undeploy_player(&self, player: PlayerId) -> Result<(), WorldError>;

    /// Show a localized notification to a single player
    fn display_notification(&self, player: PlayerId, message: MessageKey)
    -> Result<(), WorldError>;
}
