//! Per-player interaction state

use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// Handle to a live interact point owned by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractPoint {
    /// World object backing this interact point
    pub object_id: ObjectId,
}

impl InteractPoint {
    pub fn new(object_id: ObjectId) -> Self {
        Self { object_id }
    }
}

/// Interaction state for one connected player
///
/// Holds at most one interact point. The opt-out flag can only ever be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSession {
    interact_point: Option<InteractPoint>,
    last_deploy_time: f64,
    opted_out: bool,
}

impl PlayerSession {
    /// Fresh session: no interact point, time zero, not opted out
    pub fn new() -> Self {
        Self::default()
    }

    /// The live interact point, if any
    pub fn interact_point(&self) -> Option<InteractPoint> {
        self.interact_point
    }

    pub fn has_interact_point(&self) -> bool {
        self.interact_point.is_some()
    }

    /// Match time at which the current interact point was spawned
    pub fn last_deploy_time(&self) -> f64 {
        self.last_deploy_time
    }

    pub fn opted_out(&self) -> bool {
        self.opted_out
    }

    /// Record a freshly spawned interact point
    pub fn attach_interact_point(&mut self, point: InteractPoint, spawned_at: f64) {
        self.interact_point = Some(point);
        self.last_deploy_time = spawned_at;
    }

    /// Release ownership of the interact point, leaving none behind
    pub fn take_interact_point(&mut self) -> Option<InteractPoint> {
        self.interact_point.take()
    }

    /// Suppress future interact points for the rest of the session
    pub fn opt_out(&mut self) {
        self.opted_out = true;
    }

    /// Age of the interact point at `now`
    pub fn interact_point_age(&self, now: f64) -> f64 {
        now - self.last_deploy_time
    }
}
