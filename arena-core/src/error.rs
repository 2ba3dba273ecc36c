use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioError {
    Malformed { message: String },
    EmptyScenario,
    InvalidMapSize { map_size: f64 },
    InvalidStaffSector { staff_sector: f64 },
    MapSizeMismatch { frame: usize, rules: f64, world: f64 },
    NonMonotonicTick { frame: usize, previous: u32, found: u32 },
    LifeOutOfRange { frame: usize, life: i32, max_life: i32 },
    AgentOutOfBounds { frame: usize, x: f64, y: f64 },
    InvalidFacing { frame: usize, angle: f64 },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { message } => write!(f, "malformed scenario: {message}"),
            Self::EmptyScenario => write!(f, "scenario has no ticks"),
            Self::InvalidMapSize { map_size } => {
                write!(f, "map size must be finite and positive, got {map_size}")
            }
            Self::InvalidStaffSector { staff_sector } => write!(
                f,
                "staff sector must be within (0, 2pi] radians, got {staff_sector}"
            ),
            Self::MapSizeMismatch { frame, rules, world } => write!(
                f,
                "map size mismatch at frame {frame}: rules={rules}, world={world}"
            ),
            Self::NonMonotonicTick {
                frame,
                previous,
                found,
            } => write!(
                f,
                "tick index must increase: frame {frame} has tick {found} after tick {previous}"
            ),
            Self::LifeOutOfRange {
                frame,
                life,
                max_life,
            } => write!(
                f,
                "agent life out of range at frame {frame}: life={life}, max_life={max_life}"
            ),
            Self::AgentOutOfBounds { frame, x, y } => {
                write!(f, "agent outside the map at frame {frame}: ({x}, {y})")
            }
            Self::InvalidFacing { frame, angle } => {
                write!(f, "agent facing must be within [-pi, pi] at frame {frame}, got {angle}")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}
