//! Per-tick world model handed over by the host simulator.
//!
//! Everything here is read-only from the policy's point of view and fully
//! replaced on the next tick.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BONUS_APPEARANCE_INTERVAL_TICKS, MAGIC_MISSILE_RADIUS, MAP_SIZE, STAFF_SECTOR, TICK_COUNT,
    WIZARD_BACKWARD_SPEED, WIZARD_FORWARD_SPEED, WIZARD_STRAFE_SPEED,
};
use crate::geometry::{relative_angle, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Academy,
    Renegades,
    Neutral,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Burning,
    Empowered,
    Frozen,
    Hastened,
    Shielded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    GuardianTower,
    FactionBase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinionKind {
    OrcWoodcutter,
    FetishBlowdart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Empower,
    Haste,
    Shield,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
    pub faction: Faction,
    pub kind: BuildingKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minion {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
    pub faction: Faction,
    pub kind: MinionKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
    pub faction: Faction,
    #[serde(default)]
    pub statuses: Vec<StatusKind>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub kind: BonusKind,
}

/// The controlled wizard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
    pub faction: Faction,
    pub cast_range: f64,
    pub vision_range: f64,
    #[serde(default)]
    pub statuses: Vec<StatusKind>,
}

impl Agent {
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn distance_to(&self, point: Point) -> f64 {
        self.position().distance_to(point)
    }

    #[inline]
    pub fn angle_to(&self, point: Point) -> f64 {
        relative_angle(self.position(), self.angle, point)
    }

    pub fn has_status(&self, status: StatusKind) -> bool {
        self.statuses.contains(&status)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick_index: u32,
    pub tick_count: u32,
    pub map_size: f64,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub minions: Vec<Minion>,
    #[serde(default)]
    pub wizards: Vec<Wizard>,
    #[serde(default)]
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
}

/// Static ruleset constants; identical on every tick of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub map_size: f64,
    pub tick_count: u32,
    pub wizard_forward_speed: f64,
    pub wizard_backward_speed: f64,
    pub wizard_strafe_speed: f64,
    pub staff_sector: f64,
    pub magic_missile_radius: f64,
    pub bonus_appearance_interval_ticks: u32,
    pub random_seed: i64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            map_size: MAP_SIZE,
            tick_count: TICK_COUNT,
            wizard_forward_speed: WIZARD_FORWARD_SPEED,
            wizard_backward_speed: WIZARD_BACKWARD_SPEED,
            wizard_strafe_speed: WIZARD_STRAFE_SPEED,
            staff_sector: STAFF_SECTOR,
            magic_missile_radius: MAGIC_MISSILE_RADIUS,
            bonus_appearance_interval_ticks: BONUS_APPEARANCE_INTERVAL_TICKS,
            random_seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub agent: Agent,
    pub world: WorldSnapshot,
    pub rules: GameRules,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    None,
    Cast,
}

/// The single per-tick output. `Command::default()` is the inert wait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub turn: f64,
    pub speed: f64,
    pub strafe_speed: f64,
    pub action: ActionKind,
    pub cast_angle: f64,
    pub min_cast_distance: f64,
}

impl Command {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
