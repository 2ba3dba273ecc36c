use anyhow::Result;
use std::path::Path;
use tracing::warn;
use wizard_arena_core::digest::crc32;

use super::baseline::BASELINE;
use super::{ArenaBot, BaselineBot, BotManifestEntry, TacticalBot, CUSTOM_PREFIX};
use crate::tactics::config::{PerceptionRadii, PolicyConfig};

pub fn tactical_presets() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig::default(),
        PolicyConfig {
            id: "tactical-cautious".to_string(),
            description: "Retreats early, keeps well clear of the enemy base.".to_string(),
            low_hp_factor: 0.4,
            safe_hp_factor: 0.75,
            melee_distance: 120.0,
            behind_distance: 250.0,
            enemy_base_radius: 1_400.0,
            bonus_lead_ticks: 150,
            ..PolicyConfig::default()
        },
        PolicyConfig {
            id: "tactical-grinder".to_string(),
            description: "Farms neutrals around friendly structures for most of the match."
                .to_string(),
            grind_zone_base_radius: 1_600.0,
            grind_zone_tower_radius: 1_100.0,
            grind_cutoff_tick: 16_000,
            perception: PerceptionRadii {
                neutral: 0.9,
                ..PerceptionRadii::default()
            },
            ..PolicyConfig::default()
        },
        PolicyConfig {
            id: "tactical-pusher".to_string(),
            description: "Low retreat threshold and early advance; pressures towers.".to_string(),
            low_hp_factor: 0.15,
            safe_hp_factor: 0.45,
            start_time_ticks: 300,
            behind_distance: 80.0,
            enemy_base_radius: 700.0,
            bonus_lead_ticks: 0,
            bonus_trail_ticks: 0,
            ..PolicyConfig::default()
        },
    ]
}

pub fn bot_ids() -> Vec<String> {
    let mut ids: Vec<String> = tactical_presets().into_iter().map(|cfg| cfg.id).collect();
    ids.push(BASELINE.id.to_string());
    ids
}

pub fn describe_bots() -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = tactical_presets()
        .into_iter()
        .map(|cfg| (cfg.id, cfg.description))
        .collect();
    out.push((BASELINE.id.to_string(), BASELINE.description.to_string()));
    out
}

pub fn load_custom_bot(path: &Path) -> Result<TacticalBot> {
    TacticalBot::from_file(path)
}

pub fn create_bot(id: &str) -> Option<Box<dyn ArenaBot>> {
    if let Some(path) = id.strip_prefix(CUSTOM_PREFIX) {
        return match load_custom_bot(Path::new(path)) {
            Ok(bot) => Some(Box::new(bot)),
            Err(err) => {
                warn!(bot = id, "custom profile rejected: {err:#}");
                None
            }
        };
    }
    if let Some(cfg) = tactical_presets().into_iter().find(|cfg| cfg.id == id) {
        return Some(Box::new(TacticalBot::new(cfg)));
    }
    if id == BASELINE.id {
        return Some(Box::new(BaselineBot::new(BASELINE)));
    }
    None
}

fn hash_json(value: &serde_json::Value) -> String {
    let encoded = value.to_string().into_bytes();
    let digest = crc32(&encoded);
    format!("crc32:{digest:08x}:len:{}", encoded.len())
}

fn manifest_entry(
    id: &str,
    family: &str,
    description: &str,
    config: serde_json::Value,
) -> BotManifestEntry {
    BotManifestEntry {
        id: id.to_string(),
        family: family.to_string(),
        description: description.to_string(),
        config_hash: hash_json(&config),
        config,
    }
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    let mut out = Vec::new();
    for cfg in tactical_presets() {
        let config = serde_json::to_value(&cfg).unwrap_or_default();
        out.push(manifest_entry(&cfg.id, "tactical", &cfg.description, config));
    }
    let config = serde_json::to_value(BASELINE).unwrap_or_default();
    out.push(manifest_entry(
        BASELINE.id,
        "baseline",
        BASELINE.description,
        config,
    ));
    out
}

/// Fingerprint of a roster bot, or of the profile behind a `custom:` id.
pub fn bot_fingerprint(id: &str) -> Option<String> {
    if let Some(path) = id.strip_prefix(CUSTOM_PREFIX) {
        let bot = load_custom_bot(Path::new(path)).ok()?;
        let config = serde_json::to_value(bot.config()).ok()?;
        return Some(hash_json(&config));
    }
    bot_manifest_entries()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(&id);
            assert!(bot.is_some(), "{id}");
            assert_eq!(bot.map(|bot| bot.id().to_string()), Some(id));
        }
        assert!(create_bot("no-such-bot").is_none());
    }

    #[test]
    fn ids_are_unique_and_described() {
        let ids = bot_ids();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(describe_bots().len(), ids.len());
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        let entries = bot_manifest_entries();
        let hashes: HashSet<&str> = entries.iter().map(|e| e.config_hash.as_str()).collect();
        assert_eq!(hashes.len(), entries.len());
        for entry in &entries {
            assert!(entry.config_hash.starts_with("crc32:"));
            assert_eq!(bot_fingerprint(&entry.id).as_deref(), Some(entry.config_hash.as_str()));
        }
    }

    #[test]
    fn custom_profiles_load_from_disk() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"id":"lab-7","melee_distance":95.0}}"#)?;
        let id = format!("{CUSTOM_PREFIX}{}", file.path().display());

        let bot = create_bot(&id).ok_or_else(|| anyhow::anyhow!("custom bot missing"))?;
        assert_eq!(bot.id(), "lab-7");
        assert!(bot_fingerprint(&id).is_some());
        assert!(create_bot("custom:/definitely/not/here.json").is_none());
        Ok(())
    }
}
