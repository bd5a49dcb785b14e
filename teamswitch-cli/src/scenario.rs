//! Scripted replay of game events against the in-memory world and UI

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use teamswitch_core::{
    ButtonEvent, ConfigError, DialogButton, EventOutcome, GameEvent, MockSoldier, MockUi, MockWorld, ObjectId,
    PlayerId, SpawnOutcome, SpawnTask, TeamId, TeamSwitchConfig, TeamSwitchError,
    TeamSwitchHandler, Vec3, World,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Step {step}: {source}")]
    Handler {
        step: usize,
        #[source]
        source: TeamSwitchError,
    },

    #[error("Step {step}: spawn task failed: {reason}")]
    SpawnTask { step: usize, reason: String },

    #[error("Step {step}: no spawn pending for player {player}")]
    NoPendingSpawn { step: usize, player: PlayerId },

    #[error("Step {step}: spawn for player {player} did not finish within {seconds}s")]
    SpawnTimeout {
        step: usize,
        player: PlayerId,
        seconds: f64,
    },

    #[error("Step {step}: player {player} has no interact point to interact with")]
    NoInteractPoint { step: usize, player: PlayerId },

    #[error("Step {step}: widget {name} is not on screen")]
    WidgetNotShown { step: usize, name: String },

    #[error("Step {step}: expected {what} to be {expected}, found {actual}")]
    Expectation {
        step: usize,
        what: String,
        expected: String,
        actual: String,
    },
}

/// A scenario file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,

    /// Match time at the start of the scenario
    #[serde(default)]
    pub start_time: f64,

    /// Soldiers known to the world before the first step
    #[serde(default)]
    pub players: BTreeMap<PlayerId, MockSoldier>,

    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn default_timeout() -> f64 {
    5.0
}

/// One scripted step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Deliver a game event
    Event { event: GameEvent },

    /// Advance match time
    Advance { seconds: f64 },

    SetGrounded { player: PlayerId, grounded: bool },

    SetVelocity { player: PlayerId, velocity: Vec3 },

    SetAlive { player: PlayerId, alive: bool },

    /// Wait for the player's pending spawn routine to finish
    AwaitSpawn {
        player: PlayerId,
        #[serde(default = "default_timeout")]
        timeout: f64,
    },

    /// Activate the player's own interact point
    Interact { player: PlayerId },

    /// Press one of the player's dialog buttons, resolved by widget name
    PressButton {
        player: PlayerId,
        button: DialogButton,
    },

    /// Assert on a player's state; unset fields are not checked
    Expect {
        player: PlayerId,
        #[serde(default)]
        interact_point: Option<bool>,
        #[serde(default)]
        dialog_open: Option<bool>,
        #[serde(default)]
        team: Option<TeamId>,
        #[serde(default)]
        opted_out: Option<bool>,
        #[serde(default)]
        deployed: Option<bool>,
    },
}

/// What one step did
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub outcome: String,
}

/// Final state of one player
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub team: TeamId,
    pub deployed: bool,
    pub connected: bool,
    pub interact_point: Option<ObjectId>,
    pub opted_out: bool,
    pub dialog_open: bool,
}

/// Result of a full replay
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: Option<String>,
    pub steps: Vec<StepRecord>,
    pub players: Vec<PlayerSummary>,
    pub objects_alive: usize,
    pub world_calls: usize,
}

/// Replays a [`Scenario`] against a fresh [`TeamSwitchHandler`]
pub struct ScenarioRunner {
    handler: TeamSwitchHandler,
    world: Arc<MockWorld>,
    ui: Arc<MockUi>,
    spawns: HashMap<PlayerId, SpawnTask>,
    players: Vec<PlayerId>,
}

impl ScenarioRunner {
    pub fn new(config: TeamSwitchConfig) -> Result<Self, ScenarioError> {
        let world = Arc::new(MockWorld::new());
        let ui = Arc::new(MockUi::new());
        let handler = TeamSwitchHandler::new(config, world.clone(), ui.clone())?;
        Ok(Self {
            handler,
            world,
            ui,
            spawns: HashMap::new(),
            players: Vec::new(),
        })
    }

    pub async fn run(mut self, scenario: Scenario) -> Result<ScenarioReport, ScenarioError> {
        info!(
            name = scenario.name.as_deref().unwrap_or("unnamed"),
            steps = scenario.steps.len(),
            "Replaying scenario"
        );
        self.world.set_time(scenario.start_time);
        for (player, soldier) in scenario.players {
            self.world.add_player(player, soldier);
            self.track(player);
        }

        let mut records = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.into_iter().enumerate() {
            let index = index + 1;
            debug!(step = index, ?step, "Running scenario step");
            let outcome = self.run_step(index, step).await?;
            records.push(StepRecord { index, outcome });
        }

        let mut players = Vec::with_capacity(self.players.len());
        for player in &self.players {
            players.push(self.summarize(*player).await);
        }

        Ok(ScenarioReport {
            name: scenario.name,
            steps: records,
            players,
            objects_alive: self.world.object_count(),
            world_calls: self.world.calls().len(),
        })
    }

    fn track(&mut self, player: PlayerId) {
        if !self.players.contains(&player) {
            self.players.push(player);
        }
    }

    /// Give spawn routines a poll interval to observe the latest world state
    async fn settle(&self) {
        tokio::time::sleep(self.handler.config().poll_duration()).await;
    }

    async fn run_step(&mut self, index: usize, step: Step) -> Result<String, ScenarioError> {
        let handler_error = |source: TeamSwitchError| ScenarioError::Handler {
            step: index,
            source,
        };

        let outcome = match step {
            Step::Event { event } => {
                self.track(event.player());
                let outcome = self.handler.dispatch(event).await.map_err(handler_error)?;
                self.describe(event, outcome)
            }
            Step::Advance { seconds } => {
                self.world.advance_time(seconds);
                self.settle().await;
                format!("match time is now {:.2}s", self.world.match_time_elapsed())
            }
            Step::SetGrounded { player, grounded } => {
                self.world.set_grounded(player, grounded);
                self.settle().await;
                format!("player {player} grounded = {grounded}")
            }
            Step::SetVelocity { player, velocity } => {
                self.world.set_velocity(player, velocity);
                format!("player {player} speed = {}", velocity.abs_sum())
            }
            Step::SetAlive { player, alive } => {
                self.world.set_alive(player, alive);
                format!("player {player} alive = {alive}")
            }
            Step::AwaitSpawn { player, timeout } => {
                let task = self
                    .spawns
                    .remove(&player)
                    .ok_or(ScenarioError::NoPendingSpawn {
                        step: index,
                        player,
                    })?;
                let joined = tokio::time::timeout(Duration::from_secs_f64(timeout), task)
                    .await
                    .map_err(|_| ScenarioError::SpawnTimeout {
                        step: index,
                        player,
                        seconds: timeout,
                    })?;
                let result = joined.map_err(|e| ScenarioError::SpawnTask {
                    step: index,
                    reason: e.to_string(),
                })?;
                describe_spawn(player, result.map_err(handler_error)?)
            }
            Step::Interact { player } => {
                let session = self
                    .handler
                    .sessions()
                    .get(player)
                    .await
                    .map_err(|e| handler_error(e.into()))?;
                let point = session
                    .interact_point()
                    .ok_or(ScenarioError::NoInteractPoint {
                        step: index,
                        player,
                    })?;
                let event = GameEvent::PlayerInteracted {
                    player,
                    interact_point: point.object_id,
                };
                let outcome = self.handler.dispatch(event).await.map_err(handler_error)?;
                self.describe(event, outcome)
            }
            Step::PressButton { player, button } => {
                let name = button.button_name(player);
                let widget = self
                    .ui
                    .widget_id(&name)
                    .ok_or_else(|| ScenarioError::WidgetNotShown {
                        step: index,
                        name: name.clone(),
                    })?;
                let event = GameEvent::UiButton {
                    player,
                    widget,
                    event: ButtonEvent::ButtonUp,
                };
                let outcome = self.handler.dispatch(event).await.map_err(handler_error)?;
                self.describe(event, outcome)
            }
            Step::Expect {
                player,
                interact_point,
                dialog_open,
                team,
                opted_out,
                deployed,
            } => {
                let summary = self.summarize(player).await;
                let has_point = summary.interact_point.is_some();
                check(index, "interact point present", interact_point, has_point)?;
                check(index, "dialog open", dialog_open, summary.dialog_open)?;
                check(index, "team", team, summary.team)?;
                check(index, "opted out", opted_out, summary.opted_out)?;
                check(index, "deployed", deployed, summary.deployed)?;
                format!("player {player} matches expectations")
            }
        };
        Ok(outcome)
    }

    fn describe(&mut self, event: GameEvent, outcome: EventOutcome) -> String {
        let player = event.player();
        match outcome {
            EventOutcome::Joined => format!("player {player} joined"),
            EventOutcome::SpawnStarted(task) => {
                self.spawns.insert(player, task);
                format!("player {player} deployed, spawn routine started")
            }
            EventOutcome::Undeployed(removal) => {
                format!("player {player} undeployed, interact point {removal:?}")
            }
            EventOutcome::Left(removal) => {
                self.spawns.remove(&player);
                format!("player {player} left, interact point {removal:?}")
            }
            EventOutcome::Ticked(Some(reason)) => {
                format!("player {player} tick removed interact point: {reason:?}")
            }
            EventOutcome::Ticked(None) => format!("player {player} tick, no change"),
            EventOutcome::Interacted(true) => format!("player {player} opened the dialog"),
            EventOutcome::Interacted(false) => format!("player {player} interaction ignored"),
            EventOutcome::Button(action) => format!("player {player} dialog: {action:?}"),
        }
    }

    async fn summarize(&self, player: PlayerId) -> PlayerSummary {
        let session = self.handler.sessions().get(player).await.ok();
        PlayerSummary {
            player,
            team: self.world.team(player),
            deployed: self.world.is_deployed(player),
            connected: session.is_some(),
            interact_point: session
                .as_ref()
                .and_then(|s| s.interact_point())
                .map(|p| p.object_id),
            opted_out: session.as_ref().is_some_and(|s| s.opted_out()),
            dialog_open: self.handler.dialogs().is_open(player),
        }
    }
}

fn describe_spawn(player: PlayerId, outcome: SpawnOutcome) -> String {
    match outcome {
        SpawnOutcome::Spawned { point, position } => format!(
            "player {player} got interact point {} at ({:.2}, {:.2}, {:.2})",
            point.object_id, position.x, position.y, position.z
        ),
        SpawnOutcome::Skipped { reason } => format!("player {player} spawn skipped: {reason:?}"),
        SpawnOutcome::Cancelled => format!("player {player} spawn cancelled"),
    }
}

fn check<T>(step: usize, what: &str, expected: Option<T>, actual: T) -> Result<(), ScenarioError>
where
    T: PartialEq + std::fmt::Debug,
{
    match expected {
        Some(expected) if expected != actual => Err(ScenarioError::Expectation {
            step,
            what: what.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }),
        _ => Ok(()),
    }
}
