//! Relation-tagged, distance-filtered views of the current snapshot.
//!
//! Buckets are rebuilt from scratch on every tick; nothing carries over.

use serde::Serialize;
use wizard_arena_core::geometry::Point;
use wizard_arena_core::model::{
    Agent, Bonus, Building, BuildingKind, Faction, Minion, TickInput, Tree, Wizard,
};
use wizard_arena_core::unit::{HasFaction, HasId, HasLife, HasPosition, HasRadius};

use super::config::PolicyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Building,
    Minion,
    Wizard,
    Tree,
    Bonus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Hostile,
    Friendly,
    Neutral,
    Bonus,
    Obstacle,
}

impl Relation {
    /// Faction-based relation of a unit to the agent. Bonus and obstacle
    /// relations come from the category, not the faction.
    pub fn between(agent: Faction, other: Faction) -> Self {
        if other == agent {
            Self::Friendly
        } else if matches!(other, Faction::Neutral | Faction::Other) {
            Self::Neutral
        } else {
            Self::Hostile
        }
    }

    pub fn radius_factor(self, config: &PolicyConfig) -> f64 {
        let radii = &config.perception;
        match self {
            Self::Hostile => radii.hostile,
            Self::Friendly => radii.friendly,
            Self::Neutral => radii.neutral,
            Self::Bonus => radii.bonus,
            Self::Obstacle => radii.obstacle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    HostileBuildings,
    FriendlyBuildings,
    HostileMinions,
    FriendlyMinions,
    NeutralMinions,
    HostileWizards,
    FriendlyWizards,
    Obstacles,
    Bonuses,
}

impl Bucket {
    pub const COUNT: usize = 9;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PerceptionRule {
    pub bucket: Bucket,
    pub category: Category,
    pub relation: Relation,
}

pub const PERCEPTION_TABLE: [PerceptionRule; Bucket::COUNT] = [
    PerceptionRule {
        bucket: Bucket::HostileBuildings,
        category: Category::Building,
        relation: Relation::Hostile,
    },
    PerceptionRule {
        bucket: Bucket::FriendlyBuildings,
        category: Category::Building,
        relation: Relation::Friendly,
    },
    PerceptionRule {
        bucket: Bucket::HostileMinions,
        category: Category::Minion,
        relation: Relation::Hostile,
    },
    PerceptionRule {
        bucket: Bucket::FriendlyMinions,
        category: Category::Minion,
        relation: Relation::Friendly,
    },
    PerceptionRule {
        bucket: Bucket::NeutralMinions,
        category: Category::Minion,
        relation: Relation::Neutral,
    },
    PerceptionRule {
        bucket: Bucket::HostileWizards,
        category: Category::Wizard,
        relation: Relation::Hostile,
    },
    PerceptionRule {
        bucket: Bucket::FriendlyWizards,
        category: Category::Wizard,
        relation: Relation::Friendly,
    },
    PerceptionRule {
        bucket: Bucket::Obstacles,
        category: Category::Tree,
        relation: Relation::Obstacle,
    },
    PerceptionRule {
        bucket: Bucket::Bonuses,
        category: Category::Bonus,
        relation: Relation::Bonus,
    },
];

/// Units that can strike the agent at close range.
pub const MELEE_BUCKETS: [Bucket; 3] = [
    Bucket::HostileMinions,
    Bucket::HostileWizards,
    Bucket::NeutralMinions,
];

/// A sighted unit, copied out of the snapshot for this tick only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Contact {
    pub id: i64,
    pub category: Category,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub life: i32,
    pub max_life: i32,
    pub is_base: bool,
}

impl HasPosition for Contact {
    #[inline]
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl HasRadius for Contact {
    #[inline]
    fn radius(&self) -> f64 {
        self.radius
    }
}

impl HasLife for Contact {
    #[inline]
    fn life(&self) -> i32 {
        self.life
    }

    #[inline]
    fn max_life(&self) -> i32 {
        self.max_life
    }
}

impl HasId for Contact {
    #[inline]
    fn id(&self) -> i64 {
        self.id
    }
}

trait Sensed: HasId + HasPosition + HasRadius + HasFaction {
    fn vitals(&self) -> (i32, i32);

    fn is_base(&self) -> bool {
        false
    }
}

macro_rules! sensed_living {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Sensed for $ty {
                fn vitals(&self) -> (i32, i32) {
                    (self.life(), self.max_life())
                }
            }
        )+
    };
}

sensed_living!(Minion, Wizard, Tree);

impl Sensed for Building {
    fn vitals(&self) -> (i32, i32) {
        (self.life, self.max_life)
    }

    fn is_base(&self) -> bool {
        self.kind == BuildingKind::FactionBase
    }
}

impl Sensed for Bonus {
    fn vitals(&self) -> (i32, i32) {
        (0, 0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Perception {
    buckets: [Vec<Contact>; Bucket::COUNT],
}

impl Perception {
    pub fn gather(input: &TickInput, config: &PolicyConfig) -> Self {
        let mut perception = Self::default();
        let agent = &input.agent;
        let world = &input.world;

        for rule in PERCEPTION_TABLE {
            let reach = agent.vision_range * rule.relation.radius_factor(config);
            let bucket = &mut perception.buckets[rule.bucket.index()];
            match rule.category {
                Category::Building => sense(agent, &world.buildings, rule, reach, bucket),
                Category::Minion => sense(agent, &world.minions, rule, reach, bucket),
                Category::Wizard => sense(agent, &world.wizards, rule, reach, bucket),
                Category::Tree => sense(agent, &world.trees, rule, reach, bucket),
                Category::Bonus => sense(agent, &world.bonuses, rule, reach, bucket),
            }
        }

        perception
    }

    #[inline]
    pub fn bucket(&self, bucket: Bucket) -> &[Contact] {
        &self.buckets[bucket.index()]
    }

    #[inline]
    pub fn has_any(&self, bucket: Bucket) -> bool {
        !self.bucket(bucket).is_empty()
    }

    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.buckets.iter().flatten()
    }
}

fn sense<T: Sensed>(
    agent: &Agent,
    units: &[T],
    rule: PerceptionRule,
    reach: f64,
    out: &mut Vec<Contact>,
) {
    let origin = agent.position();
    for unit in units {
        if rule.category == Category::Wizard && unit.id() == agent.id {
            continue;
        }
        let relation = match rule.relation {
            Relation::Bonus | Relation::Obstacle => rule.relation,
            _ => Relation::between(agent.faction, unit.faction()),
        };
        if relation != rule.relation || unit.distance_to_point(origin) > reach {
            continue;
        }
        let (life, max_life) = unit.vitals();
        let position = unit.position();
        out.push(Contact {
            id: unit.id(),
            category: rule.category,
            x: position.x,
            y: position.y,
            radius: unit.radius(),
            life,
            max_life,
            is_base: unit.is_base(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::testkit::{agent_at, input_with, minion, tree, wizard};
    use wizard_arena_core::model::Faction;

    #[test]
    fn buckets_split_by_relation_and_reach() {
        let mut input = input_with(agent_at(1_000.0, 1_000.0));
        input.world.minions = vec![
            minion(10, 1_100.0, 1_000.0, Faction::Renegades),
            minion(11, 1_100.0, 1_000.0, Faction::Academy),
            minion(12, 1_200.0, 1_000.0, Faction::Neutral),
            // Beyond the neutral reach (600 * 0.6) but inside the hostile one.
            minion(13, 1_500.0, 1_000.0, Faction::Neutral),
            minion(14, 1_700.0, 1_000.0, Faction::Renegades),
        ];
        input.world.trees = vec![tree(20, 1_050.0, 1_000.0), tree(21, 1_400.0, 1_000.0)];

        let perception = Perception::gather(&input, &PolicyConfig::default());

        let ids = |bucket| -> Vec<i64> {
            perception
                .bucket(bucket)
                .iter()
                .map(|contact| contact.id)
                .collect()
        };
        assert_eq!(ids(Bucket::HostileMinions), vec![10]);
        assert_eq!(ids(Bucket::FriendlyMinions), vec![11]);
        assert_eq!(ids(Bucket::NeutralMinions), vec![12]);
        assert_eq!(ids(Bucket::Obstacles), vec![20]);
    }

    #[test]
    fn agent_is_not_its_own_ally() {
        let agent = agent_at(500.0, 500.0);
        let mut input = input_with(agent.clone());
        input.world.wizards = vec![
            wizard(agent.id, 500.0, 500.0, Faction::Academy, 100),
            wizard(99, 520.0, 500.0, Faction::Academy, 100),
        ];

        let perception = Perception::gather(&input, &PolicyConfig::default());
        let friends: Vec<i64> = perception
            .bucket(Bucket::FriendlyWizards)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(friends, vec![99]);
    }

    #[test]
    fn inclusion_is_inclusive_at_the_reach_boundary() {
        let mut input = input_with(agent_at(0.0, 0.0));
        input.world.wizards = vec![wizard(7, 600.0, 0.0, Faction::Renegades, 100)];

        let perception = Perception::gather(&input, &PolicyConfig::default());
        assert!(perception.has_any(Bucket::HostileWizards));
    }

    #[test]
    fn each_gather_only_reflects_its_own_snapshot() {
        let config = PolicyConfig::default();
        let mut first = input_with(agent_at(1_000.0, 1_000.0));
        first.world.minions = vec![minion(1, 1_050.0, 1_000.0, Faction::Renegades)];
        let mut second = first.clone();
        second.world.minions = vec![minion(2, 1_060.0, 1_000.0, Faction::Renegades)];

        let _ = Perception::gather(&first, &config);
        let perception = Perception::gather(&second, &config);

        for contact in perception.contacts() {
            assert!(second.world.minions.iter().any(|m| m.id == contact.id));
        }
        assert_eq!(perception.bucket(Bucket::HostileMinions).len(), 1);
    }
}
