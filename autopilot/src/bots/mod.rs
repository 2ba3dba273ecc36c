use serde::Serialize;
use wizard_arena_core::model::{Command, TickInput};

use crate::tactics::Decision;

mod baseline;
mod roster;
mod tactical;

pub use baseline::{BaselineBot, BaselineConfig};
pub use roster::{
    bot_fingerprint, bot_ids, bot_manifest_entries, create_bot, describe_bots, load_custom_bot,
    tactical_presets,
};
pub use tactical::TacticalBot;

/// Prefix selecting a policy profile stored as JSON, e.g. `custom:profiles/push.json`.
pub const CUSTOM_PREFIX: &str = "custom:";

pub trait ArenaBot: Send {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    /// Forget all session state; the next tick starts a new session.
    fn reset(&mut self);
    fn next_command(&mut self, input: &TickInput) -> Command;
    fn last_decision(&self) -> Option<Decision>;
    fn respawned(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}
