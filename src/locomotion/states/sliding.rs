use super::super::collaborators::AudioCue;
use super::super::constants::movement as movement_consts;
use super::super::machine::{LocomotionState, StateId, Step};
use super::{settle_on_ground, start_jump, vertical_displacement};

/// Crouched slide: a burst of speed that decays, with the collider shrunk to
/// the sliding height. The slide cannot end while standing room is missing
/// overhead, no matter what the crouch toggle or the speed says.
pub struct Sliding;

impl LocomotionState for Sliding {
    fn enter(&mut self, step: &mut Step<'_>) {
        // Slide direction: input intent, else current velocity, else facing.
        // Never a zero vector.
        let dir = step
            .pose
            .direction_for(step.ctx.move_input)
            .or_else(|| {
                (step.ctx.horizontal_speed > movement_consts::EPSILON)
                    .then_some(step.ctx.horizontal_direction)
            })
            .unwrap_or_else(|| step.pose.forward());

        let speed = step.config.movement.move_speed * step.config.slide.initial_speed_multiplier;
        step.ctx.set_planar_velocity(speed, dir);

        step.body.set_height(step.world, step.config.capsule.sliding_height);

        step.hooks.animation.set_state(StateId::Sliding, true);
        step.hooks.animation.set_state(StateId::Moving, false);
        step.hooks.camera.set_follow_head(true);
        step.hooks.camera.set_fov(step.config.camera.sliding_fov);
        step.hooks.audio.play(AudioCue::Slide);
    }

    fn execute(&mut self, step: &mut Step<'_>) -> Option<StateId> {
        if !step.body.is_grounded() {
            return Some(StateId::Falling);
        }
        settle_on_ground(step);

        let speed =
            (step.ctx.horizontal_speed - step.config.slide.deceleration * step.dt).max(0.0);
        let dir = step.ctx.horizontal_direction;
        step.ctx.set_planar_velocity(speed, dir);

        // Every way out of the slide needs standing room overhead.
        if step.body.can_stand(step.world) {
            if step.ctx.jump_requested {
                step.ctx.consume_jump();
                start_jump(step);
                return Some(StateId::Falling);
            }
            if !step.ctx.crouch_active || speed <= step.config.slide.stop_speed {
                return Some(if step.ctx.has_move_input() {
                    StateId::Moving
                } else {
                    StateId::Idle
                });
            }
        }

        let displacement = dir * speed * step.dt + vertical_displacement(step);
        step.body.move_by(step.world, displacement, step.dt);
        None
    }

    fn exit(&mut self, step: &mut Step<'_>) {
        // Absolute restore: repeating this exit never drifts the collider.
        let standing = step.body.standing_height();
        step.body.set_height(step.world, standing);
        step.ctx.crouch_active = false;

        step.hooks.animation.set_state(StateId::Sliding, false);
        step.hooks.camera.set_follow_head(false);
        step.hooks.camera.set_fov(step.config.camera.default_fov);
    }
}
