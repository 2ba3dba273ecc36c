//! State carried between ticks. Created on the first tick of a session and
//! threaded through every later `tick` call by value.

use serde::Serialize;
use wizard_arena_core::geometry::Point;
use wizard_arena_core::model::TickInput;
use wizard_arena_core::rng::SeededRng;

use super::lanes::{draw_lane, lane_for_agent_id, Lane, LaneRoutes};
use super::selector::Decision;

/// Lateral oscillation. The accumulator counts strafe distance since the
/// last direction flip and is always below the flip limit between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StrafeState {
    accumulated: f64,
    direction: f64,
}

impl Default for StrafeState {
    fn default() -> Self {
        Self {
            accumulated: 0.0,
            direction: 1.0,
        }
    }
}

impl StrafeState {
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Returns the signed strafe speed for this tick.
    pub fn step(&mut self, step: f64, limit: f64) -> f64 {
        let speed = step * self.direction;
        self.accumulated += step;
        if self.accumulated >= limit {
            self.direction = -self.direction;
            self.accumulated = 0.0;
        }
        speed
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[derive(Clone, Debug)]
pub struct EngineContext {
    pub(crate) rng: SeededRng,
    routes: LaneRoutes,
    pub(crate) lane: Lane,
    pub(crate) previous_position: Point,
    pub(crate) previous_moved: bool,
    pub(crate) previous_decision: Option<Decision>,
    pub(crate) strafe: StrafeState,
    pub(crate) ticks: u64,
}

impl EngineContext {
    /// Seeds the generator, lays out the routes and assigns the opening lane.
    pub fn new(input: &TickInput) -> Self {
        let mut rng = SeededRng::from_host_seed(input.rules.random_seed);
        let routes = LaneRoutes::generate(input.rules.map_size, &mut rng);
        let lane = lane_for_agent_id(input.agent.id).unwrap_or_else(|| draw_lane(&mut rng));
        Self {
            rng,
            routes,
            lane,
            previous_position: input.agent.position(),
            previous_moved: false,
            previous_decision: None,
            strafe: StrafeState::default(),
            ticks: 0,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn routes(&self) -> &LaneRoutes {
        &self.routes
    }

    pub fn strafe(&self) -> StrafeState {
        self.strafe
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Draws a fresh lane when the agent jumped further than `threshold`
    /// since the previous tick.
    pub(crate) fn detect_respawn(&mut self, position: Point, threshold: f64) -> bool {
        if self.ticks == 0 || self.previous_position.distance_to(position) <= threshold {
            return false;
        }
        self.lane = draw_lane(&mut self.rng);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::testkit::{agent_at, input_with};

    #[test]
    fn strafe_flips_before_the_accumulator_passes_the_limit() {
        let mut strafe = StrafeState::default();
        let limit = 35.0 * 2.0;
        let mut flips = 0;
        let mut direction = strafe.direction();
        for _ in 0..200 {
            let speed = strafe.step(3.0, limit);
            assert_eq!(speed, 3.0 * direction);
            assert!(strafe.accumulated() < limit);
            if strafe.direction() != direction {
                flips += 1;
                assert_eq!(strafe.accumulated(), 0.0);
                direction = strafe.direction();
            }
        }
        // 24 steps of 3.0 reach 72 >= 70
        assert_eq!(flips, 200 / 24);
    }

    #[test]
    fn strafe_reset_keeps_direction() {
        let mut strafe = StrafeState::default();
        strafe.step(3.0, 70.0);
        strafe.reset();
        assert_eq!(strafe.accumulated(), 0.0);
        assert_eq!(strafe.direction(), 1.0);
    }

    #[test]
    fn known_ids_keep_their_lane_without_a_draw() {
        let mut input = input_with(agent_at(100.0, 3_900.0));
        input.agent.id = 3;
        let context = EngineContext::new(&input);
        assert_eq!(context.lane(), Lane::Middle);

        let mut rng = SeededRng::from_host_seed(input.rules.random_seed);
        LaneRoutes::generate(input.rules.map_size, &mut rng);
        assert_eq!(context.rng_state(), rng.state());
    }

    #[test]
    fn unknown_ids_draw_after_route_generation() {
        let mut input = input_with(agent_at(100.0, 3_900.0));
        input.agent.id = 42;
        input.rules.random_seed = 1_234;
        let context = EngineContext::new(&input);

        let mut rng = SeededRng::from_host_seed(1_234);
        LaneRoutes::generate(input.rules.map_size, &mut rng);
        assert_eq!(context.lane(), draw_lane(&mut rng));
    }

    #[test]
    fn respawn_redraws_only_past_the_jump_threshold() {
        let input = input_with(agent_at(2_000.0, 2_000.0));
        let mut context = EngineContext::new(&input);
        context.ticks = 5;
        let state = context.rng_state();

        assert!(!context.detect_respawn(Point::new(2_100.0, 2_100.0), 300.0));
        assert_eq!(context.rng_state(), state);

        let mut expected = context.rng;
        assert!(context.detect_respawn(Point::new(100.0, 3_900.0), 300.0));
        assert_eq!(context.lane(), draw_lane(&mut expected));
        assert_eq!(context.rng_state(), expected.state());
    }
}
