//! Snapshot builders shared by the tactics unit tests.

use wizard_arena_core::constants::{
    FACTION_BASE_RADIUS, GUARDIAN_TOWER_RADIUS, MAP_SIZE, MINION_RADIUS, WIZARD_CAST_RANGE,
    WIZARD_MAX_LIFE, WIZARD_RADIUS, WIZARD_VISION_RANGE,
};
use wizard_arena_core::model::{
    Agent, Bonus, BonusKind, Building, BuildingKind, Faction, GameRules, Minion, MinionKind,
    TickInput, Tree, Wizard, WorldSnapshot,
};

pub fn agent_at(x: f64, y: f64) -> Agent {
    Agent {
        id: 1,
        x,
        y,
        angle: 0.0,
        radius: WIZARD_RADIUS,
        life: WIZARD_MAX_LIFE,
        max_life: WIZARD_MAX_LIFE,
        faction: Faction::Academy,
        cast_range: WIZARD_CAST_RANGE,
        vision_range: WIZARD_VISION_RANGE,
        statuses: Vec::new(),
    }
}

pub fn input_with(agent: Agent) -> TickInput {
    TickInput {
        agent,
        world: WorldSnapshot {
            tick_index: 0,
            tick_count: 20_000,
            map_size: MAP_SIZE,
            ..WorldSnapshot::default()
        },
        rules: GameRules::default(),
    }
}

pub fn minion(id: i64, x: f64, y: f64, faction: Faction) -> Minion {
    Minion {
        id,
        x,
        y,
        radius: MINION_RADIUS,
        life: 100,
        max_life: 100,
        faction,
        kind: MinionKind::OrcWoodcutter,
    }
}

pub fn wizard(id: i64, x: f64, y: f64, faction: Faction, life: i32) -> Wizard {
    Wizard {
        id,
        x,
        y,
        radius: WIZARD_RADIUS,
        life,
        max_life: WIZARD_MAX_LIFE,
        faction,
        statuses: Vec::new(),
    }
}

pub fn tree(id: i64, x: f64, y: f64) -> Tree {
    Tree {
        id,
        x,
        y,
        radius: 30.0,
        life: 12,
        max_life: 12,
    }
}

pub fn bonus(id: i64, x: f64, y: f64) -> Bonus {
    Bonus {
        id,
        x,
        y,
        radius: 20.0,
        kind: BonusKind::Haste,
    }
}

pub fn base(id: i64, x: f64, y: f64, faction: Faction, life: i32) -> Building {
    Building {
        id,
        x,
        y,
        radius: FACTION_BASE_RADIUS,
        life,
        max_life: 1_000,
        faction,
        kind: BuildingKind::FactionBase,
    }
}

pub fn tower(id: i64, x: f64, y: f64, faction: Faction) -> Building {
    Building {
        id,
        x,
        y,
        radius: GUARDIAN_TOWER_RADIUS,
        life: 500,
        max_life: 500,
        faction,
        kind: BuildingKind::GuardianTower,
    }
}
