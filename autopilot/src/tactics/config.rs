//! Tunable thresholds of the tactical policy.
//!
//! Every field has a default, so a JSON profile only needs to list the
//! values it changes.

use serde::{Deserialize, Serialize};

/// Detection radius multipliers of the agent's vision range, per relation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionRadii {
    pub hostile: f64,
    pub friendly: f64,
    pub neutral: f64,
    pub bonus: f64,
    pub obstacle: f64,
}

impl Default for PerceptionRadii {
    fn default() -> Self {
        Self {
            hostile: 1.0,
            friendly: 2.0,
            neutral: 0.6,
            bonus: 1.0,
            obstacle: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub id: String,
    pub description: String,

    pub low_hp_factor: f64,
    pub safe_hp_factor: f64,
    pub melee_distance: f64,

    pub start_time_ticks: u32,
    pub behind_distance: f64,

    pub safe_zone_base_radius: f64,
    pub safe_zone_tower_radius: f64,
    pub grind_zone_base_radius: f64,
    pub grind_zone_tower_radius: f64,

    pub base_danger_factor: f64,
    pub on_base_radius: f64,
    pub grind_cutoff_tick: u32,

    /// Ticks before each bonus spawn during which a detour is worth it.
    pub bonus_lead_ticks: u32,
    /// Ticks after each bonus spawn during which the detour stays active.
    pub bonus_trail_ticks: u32,

    pub enemy_base_radius: f64,

    pub waypoint_radius: f64,
    pub min_move_distance: f64,
    pub spawn_jump_distance: f64,
    pub strafe_coefficient: f64,

    pub perception: PerceptionRadii,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            id: "tactical-default".to_string(),
            description: "Priority-tree lane fighter with bonus detours.".to_string(),
            low_hp_factor: 0.25,
            safe_hp_factor: 0.6,
            melee_distance: 80.0,
            start_time_ticks: 600,
            behind_distance: 150.0,
            safe_zone_base_radius: 700.0,
            safe_zone_tower_radius: 450.0,
            grind_zone_base_radius: 1_200.0,
            grind_zone_tower_radius: 800.0,
            base_danger_factor: 0.6,
            on_base_radius: 400.0,
            grind_cutoff_tick: 12_000,
            bonus_lead_ticks: 250,
            bonus_trail_ticks: 50,
            enemy_base_radius: 1_000.0,
            waypoint_radius: 100.0,
            min_move_distance: 0.5,
            spawn_jump_distance: 300.0,
            strafe_coefficient: 2.0,
            perception: PerceptionRadii::default(),
        }
    }
}
