use super::super::machine::{LocomotionState, StateId, Step};
use super::{settle_on_ground, start_jump, try_begin_traversal, walk};

/// Ground movement at full speed; the state that initiates vaults.
pub struct Moving;

impl LocomotionState for Moving {
    fn enter(&mut self, step: &mut Step<'_>) {
        step.hooks.animation.set_state(StateId::Moving, true);
        step.hooks.animation.set_state(StateId::Sliding, false);
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

        if !step.ctx.has_move_input() {
            return Some(StateId::Idle);
        }

        if step.ctx.crouch_active {
            return Some(StateId::Sliding);
        }

        // Obstacle ahead? Decide before moving so the traversal starts from
        // this step's pose.
        if let Some(next) = try_begin_traversal(step, false) {
            return Some(next);
        }

        walk(step);
        None
    }

    fn exit(&mut self, _step: &mut Step<'_>) {}
}
