//! PlayerSessionStore for per-player interaction state
//!
//! Records are created on join and dropped on leave. Spawn routines run as
//! separate tokio tasks, so the map sits behind a RwLock.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::SessionError;
use crate::types::PlayerId;

use super::state::PlayerSession;

/// Owns the mapping from player id to [`PlayerSession`]
#[derive(Default)]
pub struct PlayerSessionStore {
    sessions: RwLock<HashMap<PlayerId, PlayerSession>>,
}

impl PlayerSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh session for a joining player
    ///
    /// A second create for the same player means a leave event was missed.
    pub async fn create(&self, player: PlayerId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&player) {
            return Err(SessionError::AlreadyExists(player));
        }
        sessions.insert(player, PlayerSession::new());
        Ok(())
    }

    /// Snapshot of a player's session
    pub async fn get(&self, player: PlayerId) -> Result<PlayerSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(&player)
            .cloned()
            .ok_or(SessionError::NotFound(player))
    }

    /// Mutate a player's session under the write lock
    ///
    /// The guard is released before this returns.
    pub async fn with_session<F, R>(&self, player: PlayerId, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut PlayerSession) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&player)
            .ok_or(SessionError::NotFound(player))?;
        Ok(f(session))
    }

    /// Delete a player's session, returning its final state
    pub async fn remove(&self, player: PlayerId) -> Result<PlayerSession, SessionError> {
        self.sessions
            .write()
            .await
            .remove(&player)
            .ok_or(SessionError::NotFound(player))
    }

    pub async fn contains(&self, player: PlayerId) -> bool {
        self.sessions.read().await.contains_key(&player)
    }

    /// Number of tracked players
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of sessions currently holding an interact point
    pub async fn live_interact_points(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.has_interact_point())
            .count()
    }
}
