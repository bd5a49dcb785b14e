//! In-memory world for tests and scenario replay
//!
//! MockWorld keeps soldier state per player, tracks spawned objects, and
//! records every mutation so tests can assert on ordering.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::traits::World;
use crate::error::WorldError;
use crate::types::{MessageKey, ObjectId, PlayerId, TeamId, Vec3};

/// Soldier state for one simulated player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockSoldier {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_facing")]
    pub facing: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default = "default_true")]
    pub grounded: bool,
    #[serde(default = "default_true")]
    pub alive: bool,
    #[serde(default = "default_team")]
    pub team: TeamId,
    #[serde(default = "default_true")]
    pub deployed: bool,
}

fn default_facing() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

fn default_true() -> bool {
    true
}

fn default_team() -> TeamId {
    TeamId::TEAM_1
}

impl Default for MockSoldier {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: default_facing(),
            velocity: Vec3::ZERO,
            grounded: true,
            alive: true,
            team: default_team(),
            deployed: true,
        }
    }
}

impl MockSoldier {
    pub fn on_team(team: TeamId) -> Self {
        Self {
            team,
            ..Self::default()
        }
    }
}

/// A spawned object
#[derive(Debug, Clone, PartialEq)]
pub struct MockObject {
    pub position: Vec3,
    pub rotation: Vec3,
    pub interactive: bool,
}

/// A recorded world mutation
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    Spawn { object: ObjectId, position: Vec3 },
    EnableInteractPoint { object: ObjectId, enabled: bool },
    Unspawn { object: ObjectId },
    SetTeam { player: PlayerId, team: TeamId },
    Undeploy { player: PlayerId },
    Notify { player: PlayerId, message: MessageKey },
}

#[derive(Debug, Default)]
struct MockWorldState {
    soldiers: HashMap<PlayerId, MockSoldier>,
    objects: HashMap<ObjectId, MockObject>,
    next_object_id: ObjectId,
    time: f64,
    calls: Vec<WorldCall>,
    fail_team_assignment: Option<String>,
}

/// Mock implementation of [`World`]
///
/// Unknown players read as the default soldier.
#[derive(Debug, Default)]
pub struct MockWorld {
    state: Mutex<MockWorldState>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockWorldState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update_soldier(&self, player: PlayerId, f: impl FnOnce(&mut MockSoldier)) {
        let mut state = self.lock();
        f(state.soldiers.entry(player).or_default());
    }

    fn soldier(&self, player: PlayerId) -> MockSoldier {
        self.lock()
            .soldiers
            .get(&player)
            .cloned()
            .unwrap_or_default()
    }

    /// Add or replace a player's soldier
    pub fn add_player(&self, player: PlayerId, soldier: MockSoldier) {
        self.lock().soldiers.insert(player, soldier);
    }

    pub fn set_grounded(&self, player: PlayerId, grounded: bool) {
        self.update_soldier(player, |s| s.grounded = grounded);
    }

    pub fn set_alive(&self, player: PlayerId, alive: bool) {
        self.update_soldier(player, |s| s.alive = alive);
    }

    pub fn set_velocity(&self, player: PlayerId, velocity: Vec3) {
        self.update_soldier(player, |s| s.velocity = velocity);
    }

    pub fn set_position(&self, player: PlayerId, position: Vec3, facing: Vec3) {
        self.update_soldier(player, |s| {
            s.position = position;
            s.facing = facing;
        });
    }

    /// Change team membership without recording a call
    pub fn place_on_team(&self, player: PlayerId, team: TeamId) {
        self.update_soldier(player, |s| s.team = team);
    }

    pub fn set_deployed(&self, player: PlayerId, deployed: bool) {
        self.update_soldier(player, |s| s.deployed = deployed);
    }

    pub fn set_time(&self, time: f64) {
        self.lock().time = time;
    }

    pub fn advance_time(&self, seconds: f64) {
        self.lock().time += seconds;
    }

    /// Make every following `set_team` fail with `reason`
    pub fn fail_team_assignment(&self, reason: impl Into<String>) {
        self.lock().fail_team_assignment = Some(reason.into());
    }

    /// Remove an object behind the caller's back
    pub fn despawn_externally(&self, object: ObjectId) -> bool {
        self.lock().objects.remove(&object).is_some()
    }

    pub fn is_deployed(&self, player: PlayerId) -> bool {
        self.soldier(player).deployed
    }

    pub fn object(&self, object: ObjectId) -> Option<MockObject> {
        self.lock().objects.get(&object).cloned()
    }

    /// Number of objects currently spawned
    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    /// All recorded mutations, oldest first
    pub fn calls(&self) -> Vec<WorldCall> {
        self.lock().calls.clone()
    }

    /// Notifications shown to `player`
    pub fn notifications(&self, player: PlayerId) -> Vec<MessageKey> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                WorldCall::Notify { player: p, message } if *p == player => Some(*message),
                _ => None,
            })
            .collect()
    }
}

impl World for MockWorld {
    fn is_grounded(&self, player: PlayerId) -> bool {
        self.soldier(player).grounded
    }

    fn is_alive(&self, player: PlayerId) -> bool {
        self.soldier(player).alive
    }

    fn position(&self, player: PlayerId) -> Vec3 {
        self.soldier(player).position
    }

    fn facing_direction(&self, player: PlayerId) -> Vec3 {
        self.soldier(player).facing
    }

    fn linear_velocity(&self, player: PlayerId) -> Vec3 {
        self.soldier(player).velocity
    }

    fn team(&self, player: PlayerId) -> TeamId {
        self.soldier(player).team
    }

    fn match_time_elapsed(&self) -> f64 {
        self.lock().time
    }

    fn spawn_interact_point(
        &self,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<ObjectId, WorldError> {
        let mut state = self.lock();
        state.next_object_id += 1;
        let object = state.next_object_id;
        state.objects.insert(
            object,
            MockObject {
                position,
                rotation,
                interactive: false,
            },
        );
        state.calls.push(WorldCall::Spawn { object, position });
        Ok(object)
    }

    fn enable_interact_point(&self, object: ObjectId, enabled: bool) -> Result<(), WorldError> {
        let mut state = self.lock();
        let entry = state
            .objects
            .get_mut(&object)
            .ok_or(WorldError::ObjectNotFound(object))?;
        entry.interactive = enabled;
        state
            .calls
            .push(WorldCall::EnableInteractPoint { object, enabled });
        Ok(())
    }

    fn unspawn_object(&self, object: ObjectId) -> Result<(), WorldError> {
        let mut state = self.lock();
        state
            .objects
            .remove(&object)
            .ok_or(WorldError::ObjectNotFound(object))?;
        state.calls.push(WorldCall::Unspawn { object });
        Ok(())
    }

    fn set_team(&self, player: PlayerId, team: TeamId) -> Result<(), WorldError> {
        let mut state = self.lock();
        if let Some(reason) = state.fail_team_assignment.clone() {
            return Err(WorldError::TeamAssignment { player, reason });
        }
        state.soldiers.entry(player).or_default().team = team;
        state.calls.push(WorldCall::SetTeam { player, team });
        Ok(())
    }

    fn undeploy_player(&self, player: PlayerId) -> Result<(), WorldError> {
        let mut state = self.lock();
        state.soldiers.entry(player).or_default().deployed = false;
        state.calls.push(WorldCall::Undeploy { player });
        Ok(())
    }

    fn display_notification(
        &self,
        player: PlayerId,
        message: MessageKey,
    ) -> Result<(), WorldError> {
        self.lock().calls.push(WorldCall::Notify { player, message });
        Ok(())
    }
}
