//! Capability traits over arena entities.
//!
//! Perception and target ranking are generic over these instead of a
//! shared entity type, so a routine asks only for what it reads.

use crate::geometry::Point;
use crate::model::{Agent, Bonus, Building, Faction, Minion, Tree, Wizard};

pub trait HasPosition {
    fn position(&self) -> Point;

    #[inline]
    fn distance_to_point(&self, point: Point) -> f64 {
        self.position().distance_to(point)
    }
}

pub trait HasRadius {
    fn radius(&self) -> f64;
}

pub trait HasLife {
    fn life(&self) -> i32;
    fn max_life(&self) -> i32;

    /// Remaining life in [0, 1]; zero when `max_life` is not positive.
    fn life_fraction(&self) -> f64 {
        let max_life = self.max_life();
        if max_life <= 0 {
            return 0.0;
        }
        (self.life().max(0) as f64 / max_life as f64).min(1.0)
    }
}

pub trait HasFaction {
    fn faction(&self) -> Faction;
}

/// Stable identity within a session, used to keep the agent out of its own buckets.
pub trait HasId {
    fn id(&self) -> i64;
}

macro_rules! impl_spatial {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasPosition for $ty {
                #[inline]
                fn position(&self) -> Point {
                    Point::new(self.x, self.y)
                }
            }

            impl HasRadius for $ty {
                #[inline]
                fn radius(&self) -> f64 {
                    self.radius
                }
            }

            impl HasId for $ty {
                #[inline]
                fn id(&self) -> i64 {
                    self.id
                }
            }
        )+
    };
}

macro_rules! impl_living {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasLife for $ty {
                #[inline]
                fn life(&self) -> i32 {
                    self.life
                }

                #[inline]
                fn max_life(&self) -> i32 {
                    self.max_life
                }
            }
        )+
    };
}

macro_rules! impl_faction_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasFaction for $ty {
                #[inline]
                fn faction(&self) -> Faction {
                    self.faction
                }
            }
        )+
    };
}

impl_spatial!(Agent, Building, Minion, Wizard, Tree, Bonus);
impl_living!(Agent, Building, Minion, Wizard, Tree);
impl_faction_field!(Agent, Building, Minion, Wizard);

impl HasFaction for Tree {
    #[inline]
    fn faction(&self) -> Faction {
        Faction::Other
    }
}

impl HasFaction for Bonus {
    #[inline]
    fn faction(&self) -> Faction {
        Faction::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MinionKind;

    fn orc(life: i32, max_life: i32) -> Minion {
        Minion {
            id: 1,
            x: 3.0,
            y: 4.0,
            radius: 25.0,
            life,
            max_life,
            faction: Faction::Neutral,
            kind: MinionKind::OrcWoodcutter,
        }
    }

    #[test]
    fn life_fraction_guards_degenerate_max_life() {
        assert_eq!(orc(50, 100).life_fraction(), 0.5);
        assert_eq!(orc(50, 0).life_fraction(), 0.0);
        assert_eq!(orc(-3, 100).life_fraction(), 0.0);
    }

    #[test]
    fn position_and_distance_come_from_coordinates() {
        let minion = orc(1, 1);
        assert_eq!(minion.position(), Point::new(3.0, 4.0));
        assert_eq!(minion.distance_to_point(Point::new(0.0, 0.0)), 5.0);
        assert_eq!(HasFaction::faction(&minion), Faction::Neutral);
    }
}
