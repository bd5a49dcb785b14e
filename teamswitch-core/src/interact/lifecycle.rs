//! Interact point lifecycle
//!
//! Spawns the interact point once a deployed player is grounded and tears it
//! down on undeploy, leave, opt-out, excess velocity, or expiry. Each spawn
//! runs as its own tokio task with a cancellation token so a stale spawn
//! cannot land after the player has moved on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::TeamSwitchConfig;
use crate::error::{SessionError, TeamSwitchError, WorldError};
use crate::session::{InteractPoint, PlayerSessionStore};
use crate::types::{ObjectId, PlayerId, Vec3};
use crate::world::World;

/// Why a spawn request did not produce an interact point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The feature is switched off
    Disabled,
    /// The player already owns an interact point
    AlreadyPresent,
    /// The player opted out for this session
    OptedOut,
}

/// Result of one spawn routine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnOutcome {
    Spawned { point: InteractPoint, position: Vec3 },
    Skipped { reason: SkipReason },
    Cancelled,
}

/// Result of tearing down an interact point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalOutcome {
    /// The object was disabled and returned to the world
    Released,
    /// The world no longer had the object
    AlreadyGone,
    /// The world refused the release; the session reference was still cleared
    Detached,
    /// The session held no interact point
    NothingToRemove,
}

/// Why a tick removed an interact point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemovalReason {
    /// Velocity axis sum went over the threshold
    Moving { speed: f64 },
    /// The interact point outlived its maximum lifetime
    Expired { age: f64 },
}

struct PendingSpawn {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct PendingSpawns {
    next_generation: u64,
    tasks: HashMap<PlayerId, PendingSpawn>,
}

/// Creates and destroys interact points and encodes their policy
pub struct InteractPointLifecycle {
    config: Arc<TeamSwitchConfig>,
    sessions: Arc<PlayerSessionStore>,
    world: Arc<dyn World>,
    pending: Mutex<PendingSpawns>,
}

impl InteractPointLifecycle {
    pub fn new(
        config: Arc<TeamSwitchConfig>,
        sessions: Arc<PlayerSessionStore>,
        world: Arc<dyn World>,
    ) -> Self {
        Self {
            config,
            sessions,
            world,
            pending: Mutex::new(PendingSpawns::default()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, PendingSpawns> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ==================== Spawn ====================

    /// Launch the spawn routine for a freshly deployed player
    ///
    /// Any spawn still pending for this player is cancelled first.
    pub fn start_spawn(
        self: &Arc<Self>,
        player: PlayerId,
    ) -> JoinHandle<Result<SpawnOutcome, TeamSwitchError>> {
        let token = CancellationToken::new();
        let generation = {
            let mut pending = self.pending();
            pending.next_generation += 1;
            let generation = pending.next_generation;
            let previous = pending.tasks.insert(
                player,
                PendingSpawn {
                    generation,
                    token: token.clone(),
                },
            );
            if let Some(previous) = previous {
                debug!(player, "Redeploy cancels pending spawn");
                previous.token.cancel();
            }
            generation
        };

        let lifecycle = Arc::clone(self);
        tokio::spawn(async move {
            let result = lifecycle.spawn_interact_point(player, token).await;
            lifecycle.finish_spawn(player, generation);
            if let Err(e) = &result {
                error!(player, error = %e, "Interact point spawn failed");
            }
            result
        })
    }

    /// Cancel a pending spawn routine, returning whether one was pending
    pub fn cancel_pending_spawn(&self, player: PlayerId) -> bool {
        match self.pending().tasks.remove(&player) {
            Some(pending) => {
                debug!(player, "Cancelling pending spawn");
                pending.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn has_pending_spawn(&self, player: PlayerId) -> bool {
        self.pending().tasks.contains_key(&player)
    }

    fn finish_spawn(&self, player: PlayerId, generation: u64) {
        let mut pending = self.pending();
        if pending
            .tasks
            .get(&player)
            .is_some_and(|p| p.generation == generation)
        {
            pending.tasks.remove(&player);
        }
    }

    /// Spawn routine: check preconditions, wait for ground contact, commit
    ///
    /// Suspends only while polling the grounded predicate. Preconditions are
    /// checked again under the store lock right before the spawn is committed.
    pub async fn spawn_interact_point(
        &self,
        player: PlayerId,
        cancel: CancellationToken,
    ) -> Result<SpawnOutcome, TeamSwitchError> {
        if !self.config.enabled {
            return Ok(skipped(player, SkipReason::Disabled));
        }

        let session = self.sessions.get(player).await?;
        if session.has_interact_point() {
            return Ok(skipped(player, SkipReason::AlreadyPresent));
        }
        if session.opted_out() {
            return Ok(skipped(player, SkipReason::OptedOut));
        }

        while !self.world.is_grounded(player) {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(player, "Spawn cancelled while waiting for ground contact");
                    return Ok(SpawnOutcome::Cancelled);
                }
                _ = tokio::time::sleep(self.config.poll_duration()) => {}
            }
        }

        let position = self.world.position(player)
            + self.world.facing_direction(player)
            + Vec3::new(0.0, self.config.spawn_height_offset, 0.0);

        let world = &self.world;
        let outcome = self
            .sessions
            .with_session(player, |session| -> Result<SpawnOutcome, WorldError> {
                if cancel.is_cancelled() {
                    return Ok(SpawnOutcome::Cancelled);
                }
                if session.has_interact_point() {
                    return Ok(SpawnOutcome::Skipped {
                        reason: SkipReason::AlreadyPresent,
                    });
                }
                if session.opted_out() {
                    return Ok(SpawnOutcome::Skipped {
                        reason: SkipReason::OptedOut,
                    });
                }

                let object = world.spawn_interact_point(position, Vec3::ZERO)?;
                if let Err(e) = world.enable_interact_point(object, true) {
                    if let Err(cleanup) = world.unspawn_object(object) {
                        warn!(player, object, error = %cleanup, "Failed to unspawn unusable interact point");
                    }
                    return Err(e);
                }

                let point = InteractPoint::new(object);
                session.attach_interact_point(point, world.match_time_elapsed());
                Ok(SpawnOutcome::Spawned { point, position })
            })
            .await?;

        let outcome = outcome?;
        match &outcome {
            SpawnOutcome::Spawned { point, position } => {
                info!(player, object = point.object_id, ?position, "Spawned team switch interact point");
            }
            SpawnOutcome::Skipped { reason } => {
                debug!(player, ?reason, "Spawn skipped at commit");
            }
            SpawnOutcome::Cancelled => {
                debug!(player, "Spawn cancelled before commit");
            }
        }
        Ok(outcome)
    }

    // ==================== Removal ====================

    /// Tear down the player's interact point, if any
    ///
    /// World failures are logged and never propagated; the session reference
    /// is always cleared.
    pub async fn remove_interact_point(
        &self,
        player: PlayerId,
    ) -> Result<RemovalOutcome, SessionError> {
        let point = self
            .sessions
            .with_session(player, |session| session.take_interact_point())
            .await?;

        let Some(point) = point else {
            return Ok(RemovalOutcome::NothingToRemove);
        };

        Ok(self.release(player, point))
    }

    fn release(&self, player: PlayerId, point: InteractPoint) -> RemovalOutcome {
        let object = point.object_id;
        let result = self
            .world
            .enable_interact_point(object, false)
            .and_then(|()| self.world.unspawn_object(object));

        match result {
            Ok(()) => {
                info!(player, object, "Removed team switch interact point");
                RemovalOutcome::Released
            }
            Err(WorldError::ObjectNotFound(_)) => {
                debug!(player, object, "Interact point already gone");
                RemovalOutcome::AlreadyGone
            }
            Err(e) => {
                warn!(player, object, error = %e, "Failed to release interact point");
                RemovalOutcome::Detached
            }
        }
    }

    /// Periodic check: remove the interact point once the player moves or it expires
    ///
    /// Returns the reason when a removal happened. An unknown player is an error
    /// even while the feature is off or the player is dead.
    pub async fn check_removal(
        &self,
        player: PlayerId,
    ) -> Result<Option<RemovalReason>, SessionError> {
        let session = self.sessions.get(player).await?;
        if !self.config.enabled || !self.world.is_alive(player) || !session.has_interact_point() {
            return Ok(None);
        }

        let speed = self.world.linear_velocity(player).abs_sum();
        let age = session.interact_point_age(self.world.match_time_elapsed());

        let reason = if speed > self.config.velocity_threshold {
            RemovalReason::Moving { speed }
        } else if age > self.config.max_lifetime {
            RemovalReason::Expired { age }
        } else {
            return Ok(None);
        };

        debug!(player, ?reason, "Interact point removal triggered");
        self.remove_interact_point(player).await?;
        Ok(Some(reason))
    }

    // ==================== Activation ====================

    /// Whether `object` is the interact point this player owns
    pub async fn owns_interact_point(
        &self,
        player: PlayerId,
        object: ObjectId,
    ) -> Result<bool, SessionError> {
        let session = self.sessions.get(player).await?;
        Ok(session
            .interact_point()
            .is_some_and(|point| point.object_id == object))
    }
}

fn skipped(player: PlayerId, reason: SkipReason) -> SpawnOutcome {
    debug!(player, ?reason, "Interact point spawn skipped");
    SpawnOutcome::Skipped { reason }
}
