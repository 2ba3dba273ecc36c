//! Minimal lane pusher: retreat when hurt, shoot whatever hostile is closest
//! inside cast range, otherwise walk the lane. Strafes in a random direction
//! every tick.

use serde::Serialize;
use wizard_arena_core::geometry::Point;
use wizard_arena_core::model::{ActionKind, Command, Faction, TickInput};
use wizard_arena_core::rng::SeededRng;
use wizard_arena_core::unit::{HasFaction, HasPosition, HasRadius};

use super::ArenaBot;
use crate::tactics::lanes::{lane_for_agent_id, Lane, LaneRoutes};
use crate::tactics::navigation::{next_waypoint, previous_waypoint, steer_towards};
use crate::tactics::perception::Relation;
use crate::tactics::{Action, Decision, Reason};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct BaselineConfig {
    pub id: &'static str,
    pub description: &'static str,
    pub low_hp_factor: f64,
    pub waypoint_radius: f64,
}

pub(super) const BASELINE: BaselineConfig = BaselineConfig {
    id: "baseline-lane",
    description: "Lane pusher: retreat on low HP, shoot the nearest hostile, else advance.",
    low_hp_factor: 0.25,
    waypoint_radius: 100.0,
};

struct Session {
    rng: SeededRng,
    routes: LaneRoutes,
    lane: Lane,
}

pub struct BaselineBot {
    cfg: BaselineConfig,
    session: Option<Session>,
    last: Option<Decision>,
}

impl BaselineBot {
    pub fn new(cfg: BaselineConfig) -> Self {
        Self {
            cfg,
            session: None,
            last: None,
        }
    }

    pub fn config(&self) -> BaselineConfig {
        self.cfg
    }
}

#[derive(Clone, Copy)]
struct Mark {
    position: Point,
    radius: f64,
    reason: Reason,
}

fn mark<T: HasPosition + HasRadius>(unit: &T, reason: Reason) -> Mark {
    Mark {
        position: unit.position(),
        radius: unit.radius(),
        reason,
    }
}

/// Closest hostile building, wizard or minion anywhere on the map.
fn nearest_hostile(input: &TickInput) -> Option<Mark> {
    let faction = input.agent.faction;
    let hostile = |other: Faction| Relation::between(faction, other) == Relation::Hostile;
    let world = &input.world;

    let buildings = world
        .buildings
        .iter()
        .filter(|unit| hostile(unit.faction()))
        .map(|unit| mark(unit, Reason::HostileBuilding));
    let wizards = world
        .wizards
        .iter()
        .filter(|unit| hostile(unit.faction()))
        .map(|unit| mark(unit, Reason::HostileWizard));
    let minions = world
        .minions
        .iter()
        .filter(|unit| hostile(unit.faction()))
        .map(|unit| mark(unit, Reason::HostileMinion));

    let origin = input.agent.position();
    let mut best: Option<Mark> = None;
    let mut best_distance = f64::MAX;
    for candidate in buildings.chain(wizards).chain(minions) {
        let distance = candidate.position.distance_to(origin);
        if distance < best_distance {
            best = Some(candidate);
            best_distance = distance;
        }
    }
    best
}

impl ArenaBot for BaselineBot {
    fn id(&self) -> &str {
        self.cfg.id
    }

    fn description(&self) -> &str {
        self.cfg.description
    }

    fn reset(&mut self) {
        self.session = None;
        self.last = None;
    }

    fn next_command(&mut self, input: &TickInput) -> Command {
        let agent = &input.agent;
        let rules = &input.rules;
        let session = self.session.get_or_insert_with(|| {
            let mut rng = SeededRng::from_host_seed(rules.random_seed);
            let routes = LaneRoutes::generate(rules.map_size, &mut rng);
            let lane = lane_for_agent_id(agent.id).unwrap_or(Lane::Top);
            Session { rng, routes, lane }
        });

        let strafe = if session.rng.next_bool() {
            rules.wizard_strafe_speed
        } else {
            -rules.wizard_strafe_speed
        };
        let route = session.routes.route(session.lane);
        let position = agent.position();

        let (mut command, decision) = if (agent.life as f64)
            < agent.max_life as f64 * self.cfg.low_hp_factor
        {
            let target = previous_waypoint(route, position, self.cfg.waypoint_radius);
            (
                steer_towards(agent, rules, target),
                Decision::new(Action::Retreat, Reason::LowHp),
            )
        } else {
            match nearest_hostile(input)
                .filter(|target| agent.distance_to(target.position) <= agent.cast_range)
            {
                Some(target) => {
                    let distance = agent.distance_to(target.position);
                    let angle = agent.angle_to(target.position);
                    let mut command = Command {
                        turn: angle,
                        ..Command::default()
                    };
                    if angle.abs() < rules.staff_sector / 2.0 {
                        command.action = ActionKind::Cast;
                        command.cast_angle = angle;
                        command.min_cast_distance =
                            distance - target.radius + rules.magic_missile_radius;
                    }
                    (command, Decision::new(Action::Attack, target.reason))
                }
                None => {
                    let target = next_waypoint(route, position, self.cfg.waypoint_radius);
                    (
                        steer_towards(agent, rules, target),
                        Decision {
                            action: Action::Advance,
                            reason: None,
                        },
                    )
                }
            }
        };
        command.strafe_speed = strafe;
        self.last = Some(decision);
        command
    }

    fn last_decision(&self) -> Option<Decision> {
        self.last
    }
}
