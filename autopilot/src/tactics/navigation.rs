//! Waypoint following, stall recovery and strafing.

use std::f64::consts::PI;

use wizard_arena_core::geometry::Point;
use wizard_arena_core::model::{Agent, Command, GameRules};
use wizard_arena_core::unit::HasPosition;

use super::config::PolicyConfig;
use super::context::StrafeState;
use super::perception::Contact;
use super::targeting::nearest;

/// Forward scan. Advances past a waypoint once inside `radius` of it, and
/// jumps straight to any waypoint already nearer the destination than the
/// agent is.
pub fn next_waypoint(route: &[Point], position: Point, radius: f64) -> Point {
    let Some((&last, rest)) = route.split_last() else {
        return position;
    };
    for (index, waypoint) in rest.iter().enumerate() {
        if waypoint.distance_to(position) <= radius {
            return route[index + 1];
        }
        if last.distance_to(*waypoint) < last.distance_to(position) {
            return *waypoint;
        }
    }
    last
}

/// Mirror of [`next_waypoint`], scanning from the destination back to the start.
pub fn previous_waypoint(route: &[Point], position: Point, radius: f64) -> Point {
    let Some(&first) = route.first() else {
        return position;
    };
    for index in (1..route.len()).rev() {
        let waypoint = route[index];
        if waypoint.distance_to(position) <= radius {
            return route[index - 1];
        }
        if first.distance_to(waypoint) < first.distance_to(position) {
            return waypoint;
        }
    }
    first
}

/// Forward-only steering: turn toward the point, step forward once it sits
/// inside a quarter of the staff sector.
pub fn steer_towards(agent: &Agent, rules: &GameRules, target: Point) -> Command {
    let angle = agent.angle_to(target);
    let speed = if angle.abs() < rules.staff_sector / 4.0 {
        rules.wizard_forward_speed
    } else {
        0.0
    };
    Command {
        turn: angle,
        speed,
        ..Command::default()
    }
}

/// Builds one tick's command. Borrowing the strafe state (not the whole
/// context) leaves lanes and routes readable while the pilot is live.
pub struct Pilot<'a> {
    pub(crate) agent: &'a Agent,
    pub(crate) rules: &'a GameRules,
    pub(crate) config: &'a PolicyConfig,
    obstacles: &'a [Contact],
    strafe: &'a mut StrafeState,
    stalled: bool,
    strafed: bool,
    pub(crate) command: Command,
}

impl<'a> Pilot<'a> {
    pub fn new(
        agent: &'a Agent,
        rules: &'a GameRules,
        config: &'a PolicyConfig,
        obstacles: &'a [Contact],
        strafe: &'a mut StrafeState,
        stalled: bool,
    ) -> Self {
        Self {
            agent,
            rules,
            config,
            obstacles,
            strafe,
            stalled,
            strafed: false,
            command: Command::default(),
        }
    }

    pub fn move_to(&mut self, target: Point) {
        let angle = self.agent.angle_to(target);
        let quarter = self.rules.staff_sector / 4.0;
        self.command.turn = angle;
        let mut speed = if angle.abs() < quarter {
            self.rules.wizard_forward_speed
        } else if angle.abs() > PI - quarter {
            -self.rules.wizard_backward_speed
        } else {
            0.0
        };

        if self.stalled {
            self.strafe();
            let position = self.agent.position();
            if let Some(obstacle) = nearest(self.obstacles, position).copied() {
                self.attack(&obstacle, false);
            }
            speed = -speed;
        }
        self.command.speed = speed;
    }

    pub fn advance_along(&mut self, route: &[Point]) {
        let target = next_waypoint(route, self.agent.position(), self.config.waypoint_radius);
        self.move_to(target);
    }

    pub fn retreat_along(&mut self, route: &[Point]) {
        let target = previous_waypoint(route, self.agent.position(), self.config.waypoint_radius);
        self.move_to(target);
    }

    /// At most one strafe step per tick.
    pub fn strafe(&mut self) {
        if self.strafed {
            return;
        }
        let step = self.rules.wizard_strafe_speed.abs();
        let limit = self.agent.radius * self.config.strafe_coefficient;
        self.command.strafe_speed = self.strafe.step(step, limit);
        self.strafed = true;
    }

    /// Ticks without strafing clear the accumulator.
    pub fn finish(self) -> Command {
        if !self.strafed {
            self.strafe.reset();
        }
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::perception::Category;
    use crate::tactics::testkit::agent_at;

    fn route() -> Vec<Point> {
        vec![
            Point::new(100.0, 3_900.0),
            Point::new(100.0, 3_600.0),
            Point::new(200.0, 3_200.0),
            Point::new(200.0, 2_000.0),
        ]
    }

    #[test]
    fn next_waypoint_advances_inside_radius() {
        let route = route();
        assert_eq!(
            next_waypoint(&route, Point::new(100.0, 3_850.0), 100.0),
            route[1]
        );
        assert_eq!(
            next_waypoint(&route, Point::new(120.0, 3_620.0), 100.0),
            route[2]
        );
    }

    #[test]
    fn next_waypoint_shortcuts_past_skipped_points() {
        let route = route();
        // closer to the destination than waypoint 1 but nowhere near it
        let position = Point::new(600.0, 3_300.0);
        assert_eq!(next_waypoint(&route, position, 100.0), route[2]);
        assert_eq!(
            next_waypoint(&route, Point::new(200.0, 1_900.0), 100.0),
            route[3]
        );
    }

    #[test]
    fn previous_waypoint_scans_backward() {
        let route = route();
        assert_eq!(
            previous_waypoint(&route, Point::new(200.0, 2_050.0), 100.0),
            route[2]
        );
        assert_eq!(
            previous_waypoint(&route, Point::new(250.0, 2_600.0), 100.0),
            route[2]
        );
        assert_eq!(
            previous_waypoint(&route, Point::new(100.0, 3_880.0), 100.0),
            route[0]
        );
    }

    #[test]
    fn empty_route_holds_position() {
        let here = Point::new(10.0, 20.0);
        assert_eq!(next_waypoint(&[], here, 100.0), here);
        assert_eq!(previous_waypoint(&[], here, 100.0), here);
    }

    #[test]
    fn steering_walks_forward_only_when_aligned() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let ahead = steer_towards(&agent, &rules, Point::new(1_200.0, 1_010.0));
        assert_eq!(ahead.speed, rules.wizard_forward_speed);
        let aside = steer_towards(&agent, &rules, Point::new(1_000.0, 1_200.0));
        assert_eq!(aside.speed, 0.0);
        assert!((aside.turn - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn move_to_backs_up_toward_points_behind() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let mut strafe = StrafeState::default();
        let mut pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        pilot.move_to(Point::new(700.0, 1_000.0));
        let command = pilot.finish();
        assert_eq!(command.speed, -rules.wizard_backward_speed);
        assert_eq!(command.strafe_speed, 0.0);
    }

    #[test]
    fn stall_recovery_strafes_clears_and_reverses() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let obstacle = Contact {
            id: 77,
            category: Category::Tree,
            x: 1_060.0,
            y: 1_000.0,
            radius: 30.0,
            life: 12,
            max_life: 12,
            is_base: false,
        };
        let obstacles = [obstacle];
        let mut strafe = StrafeState::default();
        let mut pilot = Pilot::new(&agent, &rules, &config, &obstacles, &mut strafe, true);
        pilot.move_to(Point::new(1_500.0, 1_000.0));
        let command = pilot.finish();
        assert_eq!(command.speed, -rules.wizard_forward_speed);
        assert_eq!(command.strafe_speed, rules.wizard_strafe_speed);
        assert_eq!(command.action, wizard_arena_core::model::ActionKind::Cast);
        assert!((command.min_cast_distance - (60.0 - 30.0 + 10.0)).abs() < 1e-9);
        assert_eq!(strafe.accumulated(), rules.wizard_strafe_speed);
    }

    #[test]
    fn finishing_without_strafe_resets_the_accumulator() {
        let agent = agent_at(1_000.0, 1_000.0);
        let rules = GameRules::default();
        let config = PolicyConfig::default();
        let mut strafe = StrafeState::default();
        strafe.step(3.0, 70.0);
        let pilot = Pilot::new(&agent, &rules, &config, &[], &mut strafe, false);
        let command = pilot.finish();
        assert!(command.is_idle());
        assert_eq!(strafe.accumulated(), 0.0);
    }
}
