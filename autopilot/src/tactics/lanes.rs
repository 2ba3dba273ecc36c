//! Lane routes, bonus detours and lane assignment.
//!
//! Routes are laid out from the bottom-left base toward the top-right one and
//! are generated exactly once per session. Two coin flips are consumed, in
//! order: the middle lane's second waypoint, then the middle lane's bonus side.

use std::fmt;

use serde::Serialize;
use wizard_arena_core::geometry::Point;
use wizard_arena_core::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Top,
    Middle,
    Bottom,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Top, Lane::Middle, Lane::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-long route geometry. Fields are private so nothing can edit a
/// route after generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneRoutes {
    top: Vec<Point>,
    middle: Vec<Point>,
    bottom: Vec<Point>,
    top_bonus: Vec<Point>,
    middle_bonus: Vec<Point>,
    bottom_bonus: Vec<Point>,
    upper_bonus_selected: bool,
}

impl LaneRoutes {
    pub fn generate(map_size: f64, rng: &mut SeededRng) -> Self {
        let m = map_size;
        let p = Point::new;
        let start = p(100.0, m - 100.0);

        let middle_turn = if rng.next_bool() {
            p(600.0, m - 200.0)
        } else {
            p(200.0, m - 600.0)
        };
        let middle = vec![start, middle_turn, p(800.0, m - 800.0), p(m - 600.0, 600.0)];

        let top = vec![
            start,
            p(100.0, m - 400.0),
            p(200.0, m - 800.0),
            p(200.0, m * 0.75),
            p(200.0, m * 0.5),
            p(200.0, m * 0.25),
            p(200.0, 200.0),
            p(m * 0.25, 200.0),
            p(m * 0.5, 200.0),
            p(m * 0.75, 200.0),
            p(m - 200.0, 200.0),
        ];

        let bottom = vec![
            start,
            p(400.0, m - 100.0),
            p(800.0, m - 200.0),
            p(m * 0.25, m - 200.0),
            p(m * 0.5, m - 200.0),
            p(m * 0.75, m - 200.0),
            p(m - 200.0, m - 200.0),
            p(m - 200.0, m * 0.75),
            p(m - 200.0, m * 0.5),
            p(m - 200.0, m * 0.25),
            p(m - 200.0, 200.0),
        ];

        let [upper, lower] = bonus_spawns(m);
        let upper_bonus_selected = rng.next_bool();
        let middle_bonus = vec![
            p(m * 0.5, m * 0.5),
            if upper_bonus_selected { upper } else { lower },
        ];

        Self {
            top,
            middle,
            bottom,
            top_bonus: vec![p(200.0, m * 0.3), upper],
            middle_bonus,
            bottom_bonus: vec![p(m * 0.7, m - 200.0), lower],
            upper_bonus_selected,
        }
    }

    pub fn route(&self, lane: Lane) -> &[Point] {
        match lane {
            Lane::Top => &self.top,
            Lane::Middle => &self.middle,
            Lane::Bottom => &self.bottom,
        }
    }

    /// Detour from the lane to the bonus spawn the lane is assigned to.
    pub fn bonus_route(&self, lane: Lane) -> &[Point] {
        match lane {
            Lane::Top => &self.top_bonus,
            Lane::Middle => &self.middle_bonus,
            Lane::Bottom => &self.bottom_bonus,
        }
    }

    pub fn upper_bonus_selected(&self) -> bool {
        self.upper_bonus_selected
    }
}

/// Bonus spawn points: upper-left river crossing, then lower-right.
pub fn bonus_spawns(map_size: f64) -> [Point; 2] {
    [
        Point::new(map_size * 0.3, map_size * 0.3),
        Point::new(map_size * 0.7, map_size * 0.7),
    ]
}

/// Fixed lane assignment by wizard id.
pub fn lane_for_agent_id(id: i64) -> Option<Lane> {
    match id {
        1 | 2 | 6 | 7 => Some(Lane::Top),
        3 | 8 => Some(Lane::Middle),
        4 | 5 | 9 | 10 => Some(Lane::Bottom),
        _ => None,
    }
}

/// Weighted lane draw: top 1/4, middle 1/2, bottom 1/4.
pub fn draw_lane(rng: &mut SeededRng) -> Lane {
    match rng.next_int(4) {
        0 => Lane::Top,
        3 => Lane::Bottom,
        _ => Lane::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_share_the_start_and_fan_out() {
        let mut rng = SeededRng::new(7);
        let routes = LaneRoutes::generate(4_000.0, &mut rng);
        for lane in Lane::ALL {
            assert_eq!(routes.route(lane)[0], Point::new(100.0, 3_900.0));
        }
        assert_eq!(routes.route(Lane::Top).len(), 11);
        assert_eq!(routes.route(Lane::Bottom).len(), 11);
        assert_eq!(routes.route(Lane::Middle).len(), 4);
        assert_eq!(routes.route(Lane::Top)[10], Point::new(3_800.0, 200.0));
        assert_eq!(routes.route(Lane::Middle)[3], Point::new(3_400.0, 600.0));
    }

    #[test]
    fn coin_flips_pick_middle_turn_then_bonus_side() {
        let mut replay = SeededRng::new(42);
        let first = replay.next_bool();
        let second = replay.next_bool();

        let mut rng = SeededRng::new(42);
        let routes = LaneRoutes::generate(4_000.0, &mut rng);
        let expected_turn = if first {
            Point::new(600.0, 3_800.0)
        } else {
            Point::new(200.0, 3_400.0)
        };
        assert_eq!(routes.route(Lane::Middle)[1], expected_turn);
        assert_eq!(routes.upper_bonus_selected(), second);
        assert_eq!(rng, replay);
    }

    #[test]
    fn same_seed_same_geometry() {
        let a = LaneRoutes::generate(4_000.0, &mut SeededRng::from_host_seed(99));
        let b = LaneRoutes::generate(4_000.0, &mut SeededRng::from_host_seed(99));
        assert_eq!(a, b);
    }

    #[test]
    fn bonus_routes_end_on_a_spawn_point() {
        let routes = LaneRoutes::generate(4_000.0, &mut SeededRng::new(3));
        let spawns = bonus_spawns(4_000.0);
        for lane in Lane::ALL {
            let last = routes.bonus_route(lane).last().copied();
            assert!(last.is_some_and(|point| spawns.contains(&point)), "{lane}");
        }
    }

    #[test]
    fn lanes_by_id() {
        assert_eq!(lane_for_agent_id(1), Some(Lane::Top));
        assert_eq!(lane_for_agent_id(7), Some(Lane::Top));
        assert_eq!(lane_for_agent_id(3), Some(Lane::Middle));
        assert_eq!(lane_for_agent_id(8), Some(Lane::Middle));
        assert_eq!(lane_for_agent_id(5), Some(Lane::Bottom));
        assert_eq!(lane_for_agent_id(10), Some(Lane::Bottom));
        assert_eq!(lane_for_agent_id(11), None);
        assert_eq!(lane_for_agent_id(0), None);
    }

    #[test]
    fn weighted_draw_favours_middle() {
        let mut rng = SeededRng::new(12_345);
        let mut counts = [0_u32; 3];
        for _ in 0..4_000 {
            match draw_lane(&mut rng) {
                Lane::Top => counts[0] += 1,
                Lane::Middle => counts[1] += 1,
                Lane::Bottom => counts[2] += 1,
            }
        }
        assert!(counts[1] > counts[0] && counts[1] > counts[2], "{counts:?}");
        assert!(counts[0] > 700 && counts[2] > 700, "{counts:?}");
    }
}
