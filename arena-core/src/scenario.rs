//! Recorded sessions: the ruleset plus the ordered per-tick snapshots a
//! host delivered to the agent. Replaying one through a bot reproduces the
//! bot's decisions exactly, since the policy is deterministic given the seed.

use core::f64::consts::PI;
use serde::{Deserialize, Serialize};

use crate::digest::crc32;
use crate::error::ScenarioError;
use crate::model::{Agent, GameRules, TickInput, WorldSnapshot};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickFrame {
    pub agent: Agent,
    pub world: WorldSnapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub rules: GameRules,
    pub ticks: Vec<TickFrame>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub frames: usize,
    pub first_tick: u32,
    pub last_tick: u32,
    pub map_size: f64,
    pub random_seed: i64,
    pub checksum: u32,
}

impl Scenario {
    pub fn input(&self, frame: usize) -> Option<TickInput> {
        self.ticks.get(frame).map(|tick| TickInput {
            agent: tick.agent.clone(),
            world: tick.world.clone(),
            rules: self.rules.clone(),
        })
    }

    pub fn inputs(&self) -> impl Iterator<Item = TickInput> + '_ {
        self.ticks.iter().map(move |tick| TickInput {
            agent: tick.agent.clone(),
            world: tick.world.clone(),
            rules: self.rules.clone(),
        })
    }
}

pub fn parse_scenario(bytes: &[u8]) -> Result<Scenario, ScenarioError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn validate_scenario(scenario: &Scenario) -> Result<ScenarioSummary, ScenarioError> {
    let rules = &scenario.rules;
    if !rules.map_size.is_finite() || rules.map_size <= 0.0 {
        return Err(ScenarioError::InvalidMapSize {
            map_size: rules.map_size,
        });
    }
    if !(rules.staff_sector > 0.0 && rules.staff_sector <= 2.0 * PI) {
        return Err(ScenarioError::InvalidStaffSector {
            staff_sector: rules.staff_sector,
        });
    }

    let (first, last) = match (scenario.ticks.first(), scenario.ticks.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ScenarioError::EmptyScenario),
    };

    let mut previous_tick: Option<u32> = None;
    for (frame, tick) in scenario.ticks.iter().enumerate() {
        if tick.world.map_size != rules.map_size {
            return Err(ScenarioError::MapSizeMismatch {
                frame,
                rules: rules.map_size,
                world: tick.world.map_size,
            });
        }

        if let Some(previous) = previous_tick {
            if tick.world.tick_index <= previous {
                return Err(ScenarioError::NonMonotonicTick {
                    frame,
                    previous,
                    found: tick.world.tick_index,
                });
            }
        }
        previous_tick = Some(tick.world.tick_index);

        let agent = &tick.agent;
        if agent.max_life <= 0 || agent.life > agent.max_life {
            return Err(ScenarioError::LifeOutOfRange {
                frame,
                life: agent.life,
                max_life: agent.max_life,
            });
        }

        let inside = |v: f64| v.is_finite() && (0.0..=rules.map_size).contains(&v);
        if !inside(agent.x) || !inside(agent.y) {
            return Err(ScenarioError::AgentOutOfBounds {
                frame,
                x: agent.x,
                y: agent.y,
            });
        }
        if !(-PI..=PI).contains(&agent.angle) {
            return Err(ScenarioError::InvalidFacing {
                frame,
                angle: agent.angle,
            });
        }
    }

    let encoded = serde_json::to_vec(scenario)?;

    Ok(ScenarioSummary {
        name: scenario.name.clone(),
        frames: scenario.ticks.len(),
        first_tick: first.world.tick_index,
        last_tick: last.world.tick_index,
        map_size: rules.map_size,
        random_seed: rules.random_seed,
        checksum: crc32(&encoded),
    })
}
