//! The per-tick decision engine.
//!
//! `tick` is the single entry point: perception, conditions, then the
//! priority selector steering a [`Pilot`]. It never fails; the worst outcome
//! is the inert wait command.

pub mod conditions;
pub mod config;
pub mod context;
pub mod lanes;
pub mod navigation;
pub mod perception;
pub mod selector;
pub mod targeting;

#[cfg(test)]
mod testkit;

use serde::Serialize;
use tracing::{debug, info};
use wizard_arena_core::model::{Command, TickInput};

pub use conditions::Conditions;
pub use config::PolicyConfig;
pub use context::{EngineContext, StrafeState};
pub use lanes::{Lane, LaneRoutes};
pub use navigation::Pilot;
pub use perception::{Bucket, Perception};
pub use selector::{Action, Decision, Reason};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickOutcome {
    pub command: Command,
    pub decision: Decision,
    pub conditions: Conditions,
    /// New label when the decision differs from the previous tick's.
    pub label_changed: Option<String>,
    pub respawned: bool,
}

pub fn tick(
    context: Option<EngineContext>,
    input: &TickInput,
    config: &PolicyConfig,
) -> (EngineContext, TickOutcome) {
    let mut context = context.unwrap_or_else(|| EngineContext::new(input));
    let agent = &input.agent;
    let position = agent.position();

    let respawned = context.detect_respawn(position, config.spawn_jump_distance);
    if respawned {
        info!(
            tick = input.world.tick_index,
            lane = %context.lane,
            "respawn detected"
        );
    }

    let perception = Perception::gather(input, config);
    let conditions = Conditions::evaluate(input, &perception, config);
    debug!(tick = input.world.tick_index, ?conditions, "conditions");

    let stalled = !respawned
        && context.previous_moved
        && context.previous_position.distance_to(position) < config.min_move_distance;

    let mut strafe = context.strafe;
    let (decision, command) = {
        let lane = context.lane;
        let routes = context.routes();
        let mut pilot = Pilot::new(
            agent,
            &input.rules,
            config,
            perception.bucket(Bucket::Obstacles),
            &mut strafe,
            stalled,
        );
        let decision = selector::select(
            &mut pilot,
            &perception,
            &conditions,
            selector::Routes {
                lane: routes.route(lane),
                bonus: routes.bonus_route(lane),
            },
        );
        (decision, pilot.finish())
    };
    context.strafe = strafe;

    let label_changed = (context.previous_decision != Some(decision)).then(|| decision.to_string());
    if let Some(label) = &label_changed {
        info!(tick = input.world.tick_index, action = %label, "action changed");
    }

    context.previous_position = position;
    context.previous_moved = command.speed != 0.0;
    context.previous_decision = Some(decision);
    context.ticks += 1;

    let outcome = TickOutcome {
        command,
        decision,
        conditions,
        label_changed,
        respawned,
    };
    (context, outcome)
}
