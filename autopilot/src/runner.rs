use crate::bots::{bot_fingerprint, bot_ids, create_bot, ArenaBot};
use crate::tactics::Decision;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use wizard_arena_core::model::{ActionKind, Command};
use wizard_arena_core::{parse_scenario, validate_scenario, Scenario};

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub scenario: String,
    pub scenario_checksum: u32,
    pub seed: i64,
    pub frame_count: u32,
    pub first_tick: u32,
    pub last_tick: u32,
    pub cast_ticks: u32,
    pub move_ticks: u32,
    pub strafe_ticks: u32,
    pub wait_ticks: u32,
    pub label_changes: u32,
    pub respawns: u32,
    pub final_label: Option<String>,
    /// Tick count per top-level action.
    pub actions: BTreeMap<String, u32>,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub commands: Vec<Command>,
    pub decisions: Vec<Option<Decision>>,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let bytes = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    parse_scenario(&bytes).with_context(|| format!("invalid scenario {}", path.display()))
}

/// Replays `scenario` through a roster bot. `seed` overrides the recorded
/// host seed.
pub fn run_bot(bot_id: &str, scenario: &Scenario, seed: Option<i64>) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| {
        anyhow!(
            "unknown bot '{bot_id}'. available: {}",
            bot_ids().join(", ")
        )
    })?;
    let mut artifact = run_bot_instance(bot.as_mut(), scenario, seed)?;
    if let Some(fingerprint) = bot_fingerprint(bot_id) {
        artifact.metrics.bot_fingerprint = fingerprint;
    }
    Ok(artifact)
}

pub fn run_bot_instance(
    bot: &mut dyn ArenaBot,
    scenario: &Scenario,
    seed: Option<i64>,
) -> Result<RunArtifact> {
    let summary = validate_scenario(scenario)
        .map_err(|err| anyhow!("scenario '{}' failed validation: {err}", scenario.name))?;
    let seed = seed.unwrap_or(scenario.rules.random_seed);

    bot.reset();

    let mut commands = Vec::with_capacity(scenario.ticks.len());
    let mut decisions = Vec::with_capacity(scenario.ticks.len());
    let mut actions: BTreeMap<String, u32> = BTreeMap::new();
    let mut cast_ticks = 0u32;
    let mut move_ticks = 0u32;
    let mut strafe_ticks = 0u32;
    let mut wait_ticks = 0u32;
    let mut label_changes = 0u32;
    let mut respawns = 0u32;
    let mut previous: Option<Decision> = None;

    for mut input in scenario.inputs() {
        input.rules.random_seed = seed;
        let command = bot.next_command(&input);
        let decision = bot.last_decision();

        if command.action == ActionKind::Cast {
            cast_ticks += 1;
        }
        if command.speed != 0.0 {
            move_ticks += 1;
        }
        if command.strafe_speed != 0.0 {
            strafe_ticks += 1;
        }
        if command.is_idle() {
            wait_ticks += 1;
        }
        if bot.respawned() {
            respawns += 1;
        }
        if let Some(decision) = decision {
            *actions.entry(decision.action.as_str().to_string()).or_default() += 1;
            if previous != Some(decision) {
                label_changes += 1;
            }
            previous = Some(decision);
        }

        commands.push(command);
        decisions.push(decision);
    }

    debug!(
        bot = bot.id(),
        scenario = %scenario.name,
        frames = commands.len(),
        label_changes,
        "scenario replayed"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot.id().to_string(),
            bot_fingerprint: bot_fingerprint(bot.id()).unwrap_or_else(|| "unknown".to_string()),
            scenario: scenario.name.clone(),
            scenario_checksum: summary.checksum,
            seed,
            frame_count: commands.len() as u32,
            first_tick: summary.first_tick,
            last_tick: summary.last_tick,
            cast_ticks,
            move_ticks,
            strafe_ticks,
            wait_ticks,
            label_changes,
            respawns,
            final_label: previous.map(|decision| decision.to_string()),
            actions,
        },
        commands,
        decisions,
    })
}

pub fn write_commands(path: &Path, commands: &[Command]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(commands).context("failed to serialize commands")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
