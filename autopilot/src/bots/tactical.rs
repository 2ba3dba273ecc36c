use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use wizard_arena_core::model::{Command, TickInput};

use super::ArenaBot;
use crate::tactics::{self, Decision, EngineContext, PolicyConfig, TickOutcome};

/// The priority-tree policy driven by one [`PolicyConfig`].
pub struct TacticalBot {
    config: PolicyConfig,
    context: Option<EngineContext>,
    last: Option<TickOutcome>,
}

impl TacticalBot {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            config,
            context: None,
            last: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
        let config: PolicyConfig = serde_json::from_slice(&data)
            .with_context(|| format!("invalid policy profile {}", path.display()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

impl ArenaBot for TacticalBot {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn reset(&mut self) {
        self.context = None;
        self.last = None;
    }

    fn next_command(&mut self, input: &TickInput) -> Command {
        let (context, outcome) = tactics::tick(self.context.take(), input, &self.config);
        self.context = Some(context);
        let command = outcome.command;
        self.last = Some(outcome);
        command
    }

    fn last_decision(&self) -> Option<Decision> {
        self.last.as_ref().map(|outcome| outcome.decision)
    }

    fn respawned(&self) -> bool {
        self.last.as_ref().is_some_and(|outcome| outcome.respawned)
    }
}
