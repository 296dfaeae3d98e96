//! The six locomotion states plus the per-step helpers they share.

mod climbing_up;
mod falling;
mod idle;
mod moving;
mod sliding;
mod vaulting;

pub use climbing_up::ClimbingUp;
pub use falling::Falling;
pub use idle::Idle;
pub use moving::Moving;
pub use sliding::Sliding;
pub use vaulting::Vaulting;

use nalgebra::Vector3;
use rapier3d::prelude::vector;

use super::collaborators::AudioCue;
use super::machine::{StateId, Step};

/// Applies the ground-stick value after a descent so the capsule stays
/// pressed against walkable geometry instead of bouncing between grounded
/// and airborne.
pub(super) fn settle_on_ground(step: &mut Step<'_>) {
    if step.ctx.vertical_velocity < 0.0 {
        step.ctx.vertical_velocity = step.config.movement.ground_stick_velocity;
    }
}

/// Displacement contributed by the accumulated vertical velocity this step.
pub(super) fn vertical_displacement(step: &Step<'_>) -> Vector3<f32> {
    vector![0.0, step.ctx.vertical_velocity * step.dt, 0.0]
}

/// Launches a jump: the request must already have been consumed by the
/// calling state.
pub(super) fn start_jump(step: &mut Step<'_>) {
    step.ctx.vertical_velocity = step.config.movement.jump_power;
    step.hooks.audio.play(AudioCue::Jump);
}

/// Walks along the current move input at full ground speed, keeping the
/// planar-velocity decomposition and the animation direction up to date.
pub(super) fn walk(step: &mut Step<'_>) {
    let Some(dir) = step.pose.direction_for(step.ctx.move_input) else {
        return;
    };
    let speed = step.config.movement.move_speed;
    step.ctx.set_planar_velocity(speed, dir);
    let displacement = dir * speed * step.dt + vertical_displacement(step);
    step.body.move_by(step.world, displacement, step.dt);
    step.hooks.animation.set_direction(step.ctx.move_input);
}

/// Scans ahead and, if the obstacle classifies, plans the traversal and
/// requests the matching state. The plan is parked in the context for the
/// traversal state's `enter` to take.
pub(super) fn try_begin_traversal(step: &mut Step<'_>, airborne: bool) -> Option<StateId> {
    let forward = step.pose.forward();
    let query = step.scanner.scan(step.world, step.body, forward, airborne)?;
    let start = step.body.center(step.world);
    let plan = step.planner.plan(&query, start, forward, step.body.height());
    step.ctx.planned_traversal = Some(plan);

    Some(match query.kind {
        super::scanner::TraversalKind::Vault => StateId::Vaulting,
        super::scanner::TraversalKind::Climb => StateId::ClimbingUp,
    })
}

/// End-of-traversal routing: grounded lands in Idle, otherwise the actor
/// keeps falling. Probes fresh so the decision never uses a stale flag.
pub(super) fn traversal_completion(step: &mut Step<'_>) -> StateId {
    if step.body.probe_ground(step.world) {
        StateId::Idle
    } else {
        StateId::Falling
    }
}
