//! Target ranking and cast feasibility.

use wizard_arena_core::geometry::Point;
use wizard_arena_core::model::{ActionKind, Agent, GameRules};
use wizard_arena_core::unit::{HasLife, HasPosition, HasRadius};

use super::navigation::Pilot;

/// Minimum distance; the first candidate found wins ties.
pub fn nearest<'c, T, I>(candidates: I, from: Point) -> Option<&'c T>
where
    T: HasPosition + 'c,
    I: IntoIterator<Item = &'c T>,
{
    let mut best = None;
    let mut best_distance = f64::MAX;
    for candidate in candidates {
        let distance = candidate.distance_to_point(from);
        if distance < best_distance {
            best = Some(candidate);
            best_distance = distance;
        }
    }
    best
}

/// Whether a cast from the agent's current facing would be accepted.
#[inline]
pub fn in_cast_window(agent: &Agent, rules: &GameRules, target: Point) -> bool {
    agent.distance_to(target) < agent.cast_range
        && agent.angle_to(target).abs() < rules.staff_sector / 2.0
}

/// Weakest target that can be hit without turning or moving.
pub fn lowest_hp_reachable<'c, T, I>(
    candidates: I,
    agent: &Agent,
    rules: &GameRules,
) -> Option<&'c T>
where
    T: HasPosition + HasLife + 'c,
    I: IntoIterator<Item = &'c T>,
{
    let mut best: Option<&T> = None;
    for candidate in candidates {
        if !in_cast_window(agent, rules, candidate.position()) {
            continue;
        }
        match best {
            Some(current) if current.life() <= candidate.life() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

impl Pilot<'_> {
    /// Turns toward the target and casts when it is inside the cast window.
    /// Otherwise walks toward it if `allow_move`. Returns whether a cast was
    /// issued.
    pub fn attack<T: HasPosition + HasRadius>(&mut self, target: &T, allow_move: bool) -> bool {
        let position = target.position();
        let distance = self.agent.distance_to(position);
        let angle = self.agent.angle_to(position);
        self.command.turn = angle;

        if in_cast_window(self.agent, self.rules, position) {
            self.command.action = ActionKind::Cast;
            self.command.cast_angle = angle;
            self.command.min_cast_distance =
                distance - target.radius() + self.rules.magic_missile_radius;
            return true;
        }
        if allow_move {
            self.move_to(position);
        }
        false
    }

    /// Attack with movement, strafing while in combat.
    pub fn fight<T: HasPosition + HasRadius>(&mut self, target: &T) {
        self.attack(target, true);
        self.strafe();
    }

    /// Lowest-HP reachable target first, nearest otherwise. Returns `false`
    /// when there is nothing to fight.
    pub fn engage<T: HasPosition + HasRadius + HasLife>(&mut self, candidates: &[T]) -> bool {
        let target = lowest_hp_reachable(candidates, self.agent, self.rules)
            .or_else(|| nearest(candidates, self.agent.position()));
        match target {
            Some(target) => {
                self.fight(target);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::config::PolicyConfig;
    use crate::tactics::context::StrafeState;
    use crate::tactics::testkit::{agent_at, minion, wizard};
    use wizard_arena_core::model::Faction;

    #[test]
    fn nearest_prefers_first_on_ties() {
        let units = [
            minion(1, 200.0, 100.0, Faction::Renegades),
            minion(2, 100.0, 200.0, Faction::Renegades),
            minion(3, 120.0, 100.0, Faction::Renegades),
        ];
        let from = Point::new(100.0, 100.0);
        assert_eq!(nearest(&units, from).map(|unit| unit.id), Some(3));
        assert_eq!(nearest(&units[..2], from).map(|unit| unit.id), Some(1));
        assert!(nearest(&units[..0], from).is_none());
    }

    #[test]
    fn lowest_hp_reachable_filters_by_window() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let mut weak_behind = minion(1, 800.0, 1_000.0, Faction::Renegades);
        weak_behind.life = 5;
        let mut weak_far = minion(2, 1_700.0, 1_000.0, Faction::Renegades);
        weak_far.life = 5;
        let mut ahead = minion(3, 1_300.0, 1_020.0, Faction::Renegades);
        ahead.life = 60;
        let mut weaker_ahead = minion(4, 1_400.0, 980.0, Faction::Renegades);
        weaker_ahead.life = 40;
        let units = [weak_behind, weak_far, ahead, weaker_ahead];
        let target = lowest_hp_reachable(&units, &agent, &rules);
        assert_eq!(target.map(|unit| unit.id), Some(4));
        assert!(lowest_hp_reachable(&units[..2], &agent, &rules).is_none());
    }

    #[test]
    fn attack_casts_inside_window_with_projectile_edge_distance() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let mut strafe = StrafeState::default();
        let angle = 10_f64.to_radians();
        let target = wizard(
            9,
            1_000.0 + 50.0 * angle.cos(),
            1_000.0 + 50.0 * angle.sin(),
            Faction::Renegades,
            100,
        );
        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        assert!(pilot.attack(&target, true));
        let command = pilot.finish();
        assert_eq!(command.action, ActionKind::Cast);
        assert!((command.cast_angle - angle).abs() < 1e-9);
        assert!((command.turn - angle).abs() < 1e-9);
        assert!((command.min_cast_distance - (50.0 - target.radius + 10.0)).abs() < 1e-9);
        assert_eq!(command.speed, 0.0);
    }

    #[test]
    fn attack_out_of_window_turns_and_optionally_moves() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let target = minion(5, 1_000.0, 1_300.0, Faction::Renegades);

        let mut strafe = StrafeState::default();
        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        assert!(!pilot.attack(&target, false));
        let held = pilot.finish();
        assert_eq!(held.action, ActionKind::None);
        assert!((held.turn - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(held.speed, 0.0);

        let far = minion(6, 1_900.0, 1_000.0, Faction::Renegades);
        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        assert!(!pilot.attack(&far, true));
        assert_eq!(pilot.finish().speed, rules.wizard_forward_speed);
    }

    #[test]
    fn engage_strafes_and_reports_empty_candidates() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let mut strafe = StrafeState::default();

        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        let none: [wizard_arena_core::model::Minion; 0] = [];
        assert!(!pilot.engage(&none));
        assert!(pilot.finish().is_idle());

        let units = [minion(7, 1_200.0, 1_000.0, Faction::Renegades)];
        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        assert!(pilot.engage(&units));
        let command = pilot.finish();
        assert_eq!(command.action, ActionKind::Cast);
        assert_eq!(command.strafe_speed, rules.wizard_strafe_speed);
    }
}
