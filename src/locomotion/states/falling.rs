use nalgebra::{Vector2, Vector3};

use super::super::collaborators::AudioCue;
use super::super::machine::{LocomotionState, StateId, Step};
use super::{start_jump, try_begin_traversal, vertical_displacement};

/// Airborne: gravity integration, air control, the coyote-jump window and
/// the airborne wall-climb check.
pub struct Falling;

impl LocomotionState for Falling {
    fn enter(&mut self, step: &mut Step<'_>) {
        step.ctx.fall_elapsed = 0.0;
        step.hooks.animation.set_state(StateId::Falling, true);
        step.hooks.camera.set_fov(step.config.camera.falling_fov);
    }

    fn execute(&mut self, step: &mut Step<'_>) -> Option<StateId> {
        step.ctx.fall_elapsed += step.dt;
        step.ctx.vertical_velocity -= step.config.movement.gravity * step.dt;

        // Coyote time: a buffered jump still fires while descending inside
        // the grace window after leaving the ground.
        if step.ctx.jump_requested
            && step.ctx.vertical_velocity <= 0.0
            && step.ctx.fall_elapsed <= step.config.movement.coyote_time
        {
            step.ctx.consume_jump();
            start_jump(step);
        }

        // Wall-climb geometry found while airborne
        if let Some(next) = try_begin_traversal(step, true) {
            return Some(next);
        }

        // Air control at full move speed
        let mut displacement = vertical_displacement(step);
        if let Some(dir) = step.pose.direction_for(step.ctx.move_input) {
            let speed = step.config.movement.move_speed;
            step.ctx.set_planar_velocity(speed, dir);
            displacement += dir * speed * step.dt;
            step.hooks.animation.set_direction(step.ctx.move_input);
        } else {
            step.ctx.set_planar_velocity(0.0, Vector3::zeros());
            step.hooks.animation.set_direction(Vector2::zeros());
        }
        step.body.move_by(step.world, displacement, step.dt);

        if step.body.is_grounded() && step.ctx.vertical_velocity <= 0.0 {
            return Some(process_landing(step));
        }
        None
    }

    fn exit(&mut self, step: &mut Step<'_>) {
        step.hooks.animation.set_state(StateId::Falling, false);
        step.hooks.camera.set_fov(step.config.camera.default_fov);
    }
}

/// Landing: stick the capsule to the ground, then route by crouch and input.
fn process_landing(step: &mut Step<'_>) -> StateId {
    step.ctx.vertical_velocity = step.config.movement.ground_stick_velocity;
    step.hooks.audio.play(AudioCue::Land);

    if step.ctx.crouch_active && step.ctx.has_move_input() {
        return StateId::Sliding;
    }
    if step.ctx.has_move_input() {
        return StateId::Moving;
    }
    // A crouch held through a stationary landing is dropped rather than
    // leaving the toggle armed.
    step.ctx.crouch_active = false;
    StateId::Idle
}
