//! Planar helpers shared by the host model and the policy.
//!
//! Angles are radians, measured counter-clockwise from +x in map space
//! (y grows downward on the arena map, same as the host). Relative angles
//! are normalized into (-PI, PI].

use core::f64::consts::PI;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wraps into (-PI, PI] in constant time. Non-finite input stays non-finite.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Angle the unit at `from` facing `facing` must turn to look at `target`.
#[inline]
pub fn relative_angle(from: Point, facing: f64, target: Point) -> f64 {
    let absolute = (target.y - from.y).atan2(target.x - from.x);
    normalize_angle(absolute - facing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_into_half_open_range() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-12);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn huge_angles_wrap_without_looping() {
        for angle in [1.0e17, -1.0e17, f64::MAX, f64::MIN] {
            let wrapped = normalize_angle(angle);
            assert!(wrapped > -PI && wrapped <= PI, "angle={angle} wrapped={wrapped}");
        }
        assert!(normalize_angle(f64::NAN).is_nan());
        assert!(normalize_angle(f64::INFINITY).is_nan());
    }

    #[test]
    fn relative_angle_accounts_for_facing() {
        let origin = Point::new(0.0, 0.0);
        let east = Point::new(10.0, 0.0);
        let south = Point::new(0.0, 10.0);

        assert!(relative_angle(origin, 0.0, east).abs() < 1e-12);
        assert!((relative_angle(origin, 0.0, south) - PI / 2.0).abs() < 1e-12);
        assert!((relative_angle(origin, PI / 2.0, east) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
    }
}
