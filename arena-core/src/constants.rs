//! Ruleset defaults for the lane arena.
//!
//! The host ships its own `GameRules` every tick; these values only seed
//! `GameRules::default()` and the synthetic fixtures used by tests.

use core::f64::consts::PI;

pub const MAP_SIZE: f64 = 4_000.0;
pub const TICK_COUNT: u32 = 20_000;

pub const WIZARD_RADIUS: f64 = 35.0;
pub const WIZARD_MAX_LIFE: i32 = 100;
pub const WIZARD_CAST_RANGE: f64 = 500.0;
pub const WIZARD_VISION_RANGE: f64 = 600.0;

pub const WIZARD_FORWARD_SPEED: f64 = 4.0;
pub const WIZARD_BACKWARD_SPEED: f64 = 3.0;
pub const WIZARD_STRAFE_SPEED: f64 = 3.0;

/// Full width of the staff sector; casts are allowed within half of it.
pub const STAFF_SECTOR: f64 = PI / 3.0;
pub const MAGIC_MISSILE_RADIUS: f64 = 10.0;

pub const BONUS_APPEARANCE_INTERVAL_TICKS: u32 = 2_500;

pub const MINION_RADIUS: f64 = 25.0;
pub const GUARDIAN_TOWER_RADIUS: f64 = 50.0;
pub const FACTION_BASE_RADIUS: f64 = 100.0;
