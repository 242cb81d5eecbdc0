//! Scenario and host configuration, loaded from JSON under data/.

use crate::{
    clock::CYCLE_SECONDS,
    schedule::{Schedule, ScriptedAction},
    types::{PlayerNumber, Tick},
    world_state::Ball,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One line of a scenario script: an action pinned to an exact cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub cycle:  Tick,
    #[serde(flatten)]
    pub action: ScriptedAction,
}

/// What the scenario does when the host reports a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalReaction {
    #[serde(default = "default_true")]
    pub clear_ball:   bool,
    /// Finish the run this many cycles after the goal.
    #[serde(default)]
    pub finish_after: Option<Tick>,
}

fn default_true() -> bool { true }

/// Longest accepted goal-to-finish delay: about 3.3 hours of match time.
pub const MAX_FINISH_AFTER: Tick = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name:         String,
    /// Players spawned during setup, in order.
    #[serde(default)]
    pub spawn:        Vec<PlayerNumber>,
    #[serde(default)]
    pub initial_ball: Option<Ball>,
    #[serde(default)]
    pub script:       Vec<ScriptEntry>,
    #[serde(default)]
    pub on_goal:      Option<GoalReaction>,
}

impl ScenarioConfig {
    /// Load a scenario file.
    /// In tests, use the built-ins in `scenarios`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: ScenarioConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Cycle 0 belongs to setup; on_cycle never sees it.
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(entry) = self.script.iter().find(|entry| entry.cycle == 0) {
            anyhow::bail!(
                "scenario '{}': action {:?} is pinned to cycle 0, which runs before the first tick",
                self.name,
                entry.action
            );
        }
        if let Some(delay) = self.on_goal.as_ref().and_then(|reaction| reaction.finish_after) {
            if delay > MAX_FINISH_AFTER {
                anyhow::bail!(
                    "scenario '{}': on_goal.finish_after {delay} exceeds {MAX_FINISH_AFTER} cycles",
                    self.name
                );
            }
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        self.script
            .iter()
            .map(|entry| (entry.cycle, entry.action.clone()))
            .collect()
    }
}

/// Parameters of the built-in ball physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub cycle_seconds:        f32,
    /// Linear rolling deceleration in m/s².
    pub rolling_deceleration: f32,
    /// Half the field length; the goal lines sit at ±this x.
    pub goal_line_x:          f32,
    /// Half the distance between the goal posts.
    pub goal_half_width:      f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cycle_seconds:        CYCLE_SECONDS,
            rolling_deceleration: 0.5,
            goal_line_x:          4.5,
            goal_half_width:      0.75,
        }
    }
}
