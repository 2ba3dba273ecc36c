pub mod constants;
pub mod digest;
pub mod error;
pub mod geometry;
pub mod model;
pub mod rng;
pub mod scenario;
pub mod unit;

pub use error::ScenarioError;
pub use scenario::{parse_scenario, validate_scenario, Scenario, ScenarioSummary, TickFrame};
