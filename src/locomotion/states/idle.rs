use nalgebra::Vector2;

use super::super::machine::{LocomotionState, StateId, Step};
use super::{settle_on_ground, start_jump, vertical_displacement, walk};

/// Standing still: only the stick-to-ground vertical motion is applied.
pub struct Idle;

impl LocomotionState for Idle {
    fn enter(&mut self, step: &mut Step<'_>) {
        // Zero the horizontal target; direction is kept for slide fallbacks.
        step.ctx.horizontal_speed = 0.0;
        step.hooks.animation.set_state(StateId::Moving, false);
        step.hooks.animation.set_state(StateId::Sliding, false);
        step.hooks.animation.set_direction(Vector2::zeros());
    }

    fn execute(&mut self, step: &mut Step<'_>) -> Option<StateId> {
        if !step.body.is_grounded() {
            return Some(StateId::Falling);
        }
        settle_on_ground(step);

        if step.ctx.consume_jump() {
            start_jump(step);
            return Some(StateId::Falling);
        }

        if step.ctx.has_move_input() {
            // Walk on the very step the input arrives so the first
            // displacement is not lost to the transition.
            walk(step);
            return Some(StateId::Moving);
        }

        let displacement = vertical_displacement(step);
        step.body.move_by(step.world, displacement, step.dt);
        None
    }

    fn exit(&mut self, _step: &mut Step<'_>) {}
}
