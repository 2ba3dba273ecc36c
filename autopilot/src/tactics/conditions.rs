//! Tactical flags derived once per tick from the snapshot and perception.
//!
//! Flags are evaluated in a fixed order and never read the previous tick's
//! flags. Missing structures (a destroyed base, a base outside the snapshot)
//! leave the dependent flag `false`.

use serde::Serialize;
use wizard_arena_core::model::{Building, BuildingKind, Faction, StatusKind, TickInput};
use wizard_arena_core::unit::{HasLife, HasPosition};

use super::config::PolicyConfig;
use super::perception::{Bucket, Perception, MELEE_BUCKETS};

pub const BENEFICIAL_STATUSES: [StatusKind; 3] = [
    StatusKind::Empowered,
    StatusKind::Hastened,
    StatusKind::Shielded,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Conditions {
    pub low_hp: bool,
    pub safe_hp: bool,
    pub melee_danger: bool,
    pub wizards_adjacent: bool,
    pub has_bonus: bool,
    pub overweight: bool,
    pub friends_forward: bool,
    pub on_safe_zone: bool,
    pub on_grind_zone: bool,
    pub base_danger: bool,
    pub on_base: bool,
    pub can_grind: bool,
    pub bonus_time: bool,
    pub enemy_base_danger: bool,
}

impl Conditions {
    pub fn evaluate(input: &TickInput, perception: &Perception, config: &PolicyConfig) -> Self {
        let agent = &input.agent;
        let world = &input.world;
        let position = agent.position();
        let tick = world.tick_index;
        let own_base = own_base(input);

        let low_hp = is_low_hp(agent.life, agent.max_life, config.low_hp_factor);
        let safe_hp = (agent.life as f64) > agent.max_life as f64 * config.safe_hp_factor;

        let close_range = config.melee_distance + agent.radius;
        let melee_danger = MELEE_BUCKETS
            .iter()
            .flat_map(|bucket| perception.bucket(*bucket))
            .map(|contact| contact.distance_to_point(position))
            .reduce(f64::min)
            .is_some_and(|nearest| nearest <= close_range);
        let wizards_adjacent = perception
            .bucket(Bucket::HostileWizards)
            .iter()
            .any(|wizard| wizard.distance_to_point(position) <= close_range);

        let has_bonus = BENEFICIAL_STATUSES
            .iter()
            .any(|&status| agent.has_status(status));

        let overweight = if has_bonus {
            false
        } else {
            let hostile: f64 = perception
                .bucket(Bucket::HostileWizards)
                .iter()
                .map(|wizard| wizard.life_fraction())
                .sum();
            let friendly: f64 = agent.life_fraction()
                + perception
                    .bucket(Bucket::FriendlyWizards)
                    .iter()
                    .map(|wizard| wizard.life_fraction())
                    .sum::<f64>();
            hostile > friendly
        };

        let friends_forward = tick > config.start_time_ticks
            || own_base.is_some_and(|base| {
                let base_position = base.position();
                let agent_to_base = position.distance_to(base_position);
                [Bucket::FriendlyMinions, Bucket::FriendlyWizards]
                    .iter()
                    .flat_map(|bucket| perception.bucket(*bucket))
                    .any(|friend| {
                        friend.distance_to_point(base_position) - agent_to_base
                            > config.behind_distance
                    })
            });

        let nearest_friendly_building = perception
            .bucket(Bucket::FriendlyBuildings)
            .iter()
            .map(|building| (building, building.distance_to_point(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let on_safe_zone = nearest_friendly_building.is_some_and(|(building, distance)| {
            let radius = if building.is_base {
                config.safe_zone_base_radius
            } else {
                config.safe_zone_tower_radius
            };
            distance < radius
        });
        let on_grind_zone = nearest_friendly_building.is_some_and(|(building, distance)| {
            let radius = if building.is_base {
                config.grind_zone_base_radius
            } else {
                config.grind_zone_tower_radius
            };
            distance < radius
        });

        let base_danger = perception
            .bucket(Bucket::FriendlyBuildings)
            .iter()
            .any(|building| {
                building.is_base && building.life_fraction() < config.base_danger_factor
            });

        let on_base =
            own_base.is_some_and(|base| base.distance_to_point(position) < config.on_base_radius);

        let can_grind = tick < config.grind_cutoff_tick;

        let bonus_time = !has_bonus
            && in_bonus_window(
                tick,
                input.rules.bonus_appearance_interval_ticks,
                config.bonus_lead_ticks,
                config.bonus_trail_ticks,
            );

        let enemy_base_danger = hostile_base(input)
            .is_some_and(|base| base.distance_to_point(position) < config.enemy_base_radius);

        Self {
            low_hp,
            safe_hp,
            melee_danger,
            wizards_adjacent,
            has_bonus,
            overweight,
            friends_forward,
            on_safe_zone,
            on_grind_zone,
            base_danger,
            on_base,
            can_grind,
            bonus_time,
            enemy_base_danger,
        }
    }
}

/// Strictly below the threshold; equality is not low.
#[inline]
pub fn is_low_hp(life: i32, max_life: i32, factor: f64) -> bool {
    (life as f64) < max_life as f64 * factor
}

/// True shortly before each bonus spawn and shortly after it. The very
/// first interval boundary (tick 0) never spawns a bonus.
pub fn in_bonus_window(tick: u32, interval: u32, lead: u32, trail: u32) -> bool {
    if interval == 0 {
        return false;
    }
    let phase = tick % interval;
    phase >= interval.saturating_sub(lead) || (tick >= interval && phase < trail)
}

pub fn own_base(input: &TickInput) -> Option<&Building> {
    input.world.buildings.iter().find(|building| {
        building.kind == BuildingKind::FactionBase && building.faction == input.agent.faction
    })
}

pub fn hostile_base(input: &TickInput) -> Option<&Building> {
    input.world.buildings.iter().find(|building| {
        building.kind == BuildingKind::FactionBase
            && building.faction != input.agent.faction
            && !matches!(building.faction, Faction::Neutral | Faction::Other)
    })
}
