//! Fixed-priority action selection.
//!
//! Tiers are walked top to bottom and the first one whose guard holds writes
//! the whole command. Nothing here remembers earlier choices; the only state
//! touched is the strafe accumulator behind the [`Pilot`].

use std::fmt;

use serde::Serialize;
use wizard_arena_core::geometry::Point;
use wizard_arena_core::unit::HasPosition;

use super::conditions::Conditions;
use super::navigation::Pilot;
use super::perception::{Bucket, Perception};
use super::targeting::nearest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Defend,
    Retreat,
    Attack,
    Collect,
    Detour,
    Advance,
    Wait,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Defend => "defend",
            Self::Retreat => "retreat",
            Self::Attack => "attack",
            Self::Collect => "collect",
            Self::Detour => "detour",
            Self::Advance => "advance",
            Self::Wait => "wait",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    LowHp,
    MeleeDanger,
    WizardsAdjacent,
    Overweight,
    EnemyBase,
    BaseUnderAttack,
    HostileWizard,
    HostileMinion,
    HostileBuilding,
    Neutral,
    BonusVisible,
    BonusWindow,
    FriendsForward,
    SafeZone,
    NoTargets,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowHp => "low hp",
            Self::MeleeDanger => "melee danger",
            Self::WizardsAdjacent => "wizards adjacent",
            Self::Overweight => "overweight",
            Self::EnemyBase => "enemy base",
            Self::BaseUnderAttack => "base under attack",
            Self::HostileWizard => "hostile wizard",
            Self::HostileMinion => "hostile minion",
            Self::HostileBuilding => "hostile building",
            Self::Neutral => "neutral",
            Self::BonusVisible => "bonus visible",
            Self::BonusWindow => "bonus window",
            Self::FriendsForward => "friends forward",
            Self::SafeZone => "safe zone",
            Self::NoTargets => "no targets",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Decision {
    pub action: Action,
    pub reason: Option<Reason>,
}

impl Decision {
    pub const WAIT: Decision = Decision {
        action: Action::Wait,
        reason: None,
    };

    pub const fn new(action: Action, reason: Reason) -> Self {
        Self {
            action,
            reason: Some(reason),
        }
    }
}

/// The side-channel label, e.g. `retreat (low hp)`.
impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "{} ({})", self.action.as_str(), reason.as_str()),
            None => f.write_str(self.action.as_str()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Gate {
    Always,
    AwayFromEnemyBase,
    GrindAllowed,
}

impl Gate {
    fn open(self, conditions: &Conditions) -> bool {
        match self {
            Self::Always => true,
            Self::AwayFromEnemyBase => !conditions.enemy_base_danger,
            Self::GrindAllowed => conditions.on_grind_zone && conditions.can_grind,
        }
    }
}

/// Opportunistic engagements once no hostile wizard is in sight.
const ENGAGE_ORDER: [(Bucket, Reason, Gate); 3] = [
    (Bucket::HostileMinions, Reason::HostileMinion, Gate::Always),
    (Bucket::HostileBuildings, Reason::HostileBuilding, Gate::AwayFromEnemyBase),
    (Bucket::NeutralMinions, Reason::Neutral, Gate::GrindAllowed),
];

/// Route geometry the selector may follow this tick.
#[derive(Clone, Copy, Debug)]
pub struct Routes<'r> {
    pub lane: &'r [Point],
    pub bonus: &'r [Point],
}

pub fn select(
    pilot: &mut Pilot<'_>,
    perception: &Perception,
    conditions: &Conditions,
    routes: Routes<'_>,
) -> Decision {
    let position = pilot.agent.position();

    if conditions.base_danger {
        for (bucket, reason) in [
            (Bucket::HostileWizards, Reason::HostileWizard),
            (Bucket::HostileMinions, Reason::HostileMinion),
        ] {
            if let Some(target) = nearest(perception.bucket(bucket), position) {
                pilot.fight(target);
                return Decision::new(Action::Defend, reason);
            }
        }
        return Decision::new(Action::Defend, Reason::BaseUnderAttack);
    }

    if conditions.low_hp && !conditions.on_base {
        pilot.retreat_along(routes.lane);
        return Decision::new(Action::Retreat, Reason::LowHp);
    }

    if conditions.melee_danger {
        if conditions.wizards_adjacent {
            pilot.retreat_along(routes.lane);
            return Decision::new(Action::Retreat, Reason::WizardsAdjacent);
        }
        if conditions.safe_hp {
            let close = perception
                .bucket(Bucket::HostileMinions)
                .iter()
                .chain(perception.bucket(Bucket::NeutralMinions));
            if let Some(target) = nearest(close, position) {
                pilot.fight(target);
                return Decision::new(Action::Attack, Reason::MeleeDanger);
            }
        }
        pilot.retreat_along(routes.lane);
        return Decision::new(Action::Retreat, Reason::MeleeDanger);
    }

    if let Some(bonus) = nearest(perception.bucket(Bucket::Bonuses), position) {
        pilot.move_to(bonus.position());
        return Decision::new(Action::Collect, Reason::BonusVisible);
    }
    if conditions.bonus_time {
        pilot.advance_along(routes.bonus);
        return Decision::new(Action::Detour, Reason::BonusWindow);
    }

    if perception.has_any(Bucket::HostileWizards) {
        if conditions.overweight && !conditions.safe_hp {
            pilot.retreat_along(routes.lane);
            return Decision::new(Action::Retreat, Reason::Overweight);
        }
        pilot.engage(perception.bucket(Bucket::HostileWizards));
        return Decision::new(Action::Attack, Reason::HostileWizard);
    }

    for (bucket, reason, gate) in ENGAGE_ORDER {
        if gate.open(conditions) && pilot.engage(perception.bucket(bucket)) {
            return Decision::new(Action::Attack, reason);
        }
    }

    if conditions.enemy_base_danger {
        pilot.retreat_along(routes.lane);
        return Decision::new(Action::Retreat, Reason::EnemyBase);
    }
    if conditions.friends_forward {
        pilot.advance_along(routes.lane);
        return Decision::new(Action::Advance, Reason::FriendsForward);
    }
    if conditions.on_safe_zone {
        pilot.advance_along(routes.lane);
        return Decision::new(Action::Advance, Reason::SafeZone);
    }
    Decision::new(Action::Wait, Reason::NoTargets)
}
