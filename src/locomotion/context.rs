use nalgebra::{Vector2, Vector3};
use rapier3d::prelude::vector;

use super::constants::movement as movement_consts;
use super::machine::StateId;
use super::trajectory::TraversalPlan;

/// Input snapshot supplied by the host once per simulation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub move_input: Vector2<f32>,
    pub jump_pressed: bool,
    pub crouch_toggled: bool,
}

/// Actor orientation: yaw for the body, pitch for the look/head sub-object.
/// Position lives in the physics body and is only mutated through capsule
/// moves; rotation is only mutated through [`ActorPose::rotate`].
#[derive(Debug, Clone, Copy)]
pub struct ActorPose {
    pub yaw: f32,
    pitch: f32,
}

impl ActorPose {
    pub fn new(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Horizontal facing direction (unit length).
    pub fn forward(&self) -> Vector3<f32> {
        vector![self.yaw.sin(), 0.0, self.yaw.cos()]
    }

    /// Horizontal right direction (unit length).
    pub fn right(&self) -> Vector3<f32> {
        vector![self.yaw.cos(), 0.0, -self.yaw.sin()]
    }

    /// Transforms a 2D move input into a world-space horizontal unit vector.
    /// Returns `None` for a degenerate input.
    pub fn direction_for(&self, input: Vector2<f32>) -> Option<Vector3<f32>> {
        let world = self.right() * input.x + self.forward() * input.y;
        let norm = world.norm();
        if norm <= movement_consts::EPSILON {
            return None;
        }
        Some(world / norm)
    }

    /// Applies a look delta, clamping pitch to the given range (degrees).
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32, pitch_min: f32, pitch_max: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(pitch_min, pitch_max);
    }
}

/// Per-actor mutable movement state, shared by reference with every state.
/// The input collaborator writes the input fields; the active state writes
/// velocity and speed. Writers never contend on the same field within a step.
pub struct MovementContext {
    /// Last received horizontal intent; read-only to states
    pub move_input: Vector2<f32>,
    /// Accumulated vertical speed; integrated by gravity while airborne,
    /// reset to the stick value on landing
    pub vertical_velocity: f32,
    /// Magnitude of the current planar velocity, always >= 0
    pub horizontal_speed: f32,
    /// Unit-length planar direction whenever horizontal_speed > 0
    pub horizontal_direction: Vector3<f32>,
    /// Pending jump request; consumed by whichever state handles it
    pub jump_requested: bool,
    jump_buffer_remaining: f32,
    /// Slide toggle persisted across states
    pub crouch_active: bool,
    /// Set while a climb consumes no external input
    pub input_locked: bool,
    /// The one active state; written by the machine, never by states
    pub current_state: StateId,
    /// Seconds since the actor left solid ground (coyote window bookkeeping)
    pub fall_elapsed: f32,
    /// Handoff slot: written by the state that decides a traversal, taken by
    /// the traversal state's Enter
    pub planned_traversal: Option<TraversalPlan>,
}

impl MovementContext {
    pub fn new() -> Self {
        Self {
            move_input: Vector2::zeros(),
            vertical_velocity: 0.0,
            horizontal_speed: 0.0,
            horizontal_direction: vector![0.0, 0.0, 1.0],
            jump_requested: false,
            jump_buffer_remaining: 0.0,
            crouch_active: false,
            input_locked: false,
            current_state: StateId::Idle,
            fall_elapsed: 0.0,
            planned_traversal: None,
        }
    }

    /// Applies one input snapshot. Ignored entirely while input is locked
    /// (mid-climb), matching the disabled input map of the climb move.
    pub fn apply_input(&mut self, frame: &InputFrame, jump_buffer_secs: f32) {
        if self.input_locked {
            return;
        }
        self.move_input = frame.move_input;
        if frame.jump_pressed {
            self.jump_requested = true;
            self.jump_buffer_remaining = jump_buffer_secs;
        }
        if frame.crouch_toggled {
            self.crouch_active = !self.crouch_active;
        }
    }

    /// Advances the jump buffer and clears stale buffered jumps.
    pub fn tick_jump_buffer(&mut self, dt: f32) {
        if self.jump_requested {
            self.jump_buffer_remaining = (self.jump_buffer_remaining - dt).max(0.0);
            if self.jump_buffer_remaining <= 0.0 {
                self.jump_requested = false;
            }
        }
    }

    /// Consumes one pending jump request.
    pub fn consume_jump(&mut self) -> bool {
        if !self.jump_requested {
            return false;
        }
        self.jump_requested = false;
        self.jump_buffer_remaining = 0.0;
        true
    }

    pub fn has_move_input(&self) -> bool {
        self.move_input.norm_squared() > movement_consts::EPSILON * movement_consts::EPSILON
    }

    /// Clears everything transient after a forced reset: velocities, request
    /// flags, the input lock and any parked traversal plan.
    pub fn reset_transient(&mut self) {
        self.vertical_velocity = 0.0;
        self.horizontal_speed = 0.0;
        self.jump_requested = false;
        self.jump_buffer_remaining = 0.0;
        self.crouch_active = false;
        self.input_locked = false;
        self.fall_elapsed = 0.0;
        self.planned_traversal = None;
    }

    /// Updates the planar velocity decomposition, maintaining the invariants:
    /// speed >= 0, direction unit-length whenever speed > 0. A degenerate
    /// direction keeps the previous one.
    pub fn set_planar_velocity(&mut self, speed: f32, direction: Vector3<f32>) {
        self.horizontal_speed = speed.max(0.0);
        let norm = direction.norm();
        if norm > movement_consts::EPSILON {
            self.horizontal_direction = direction / norm;
        }
    }
}

impl Default for MovementContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn test_jump_buffer_expires() {
        let mut ctx = MovementContext::new();
        ctx.apply_input(
            &InputFrame {
                jump_pressed: true,
                ..Default::default()
            },
            0.15,
        );
        assert!(ctx.jump_requested);

        ctx.tick_jump_buffer(0.1);
        assert!(ctx.jump_requested, "Still inside the buffer window");
        ctx.tick_jump_buffer(0.1);
        assert!(!ctx.jump_requested, "Buffered jump should go stale");
    }

    #[test]
    fn test_input_locked_drops_frames() {
        let mut ctx = MovementContext::new();
        ctx.input_locked = true;
        ctx.apply_input(
            &InputFrame {
                move_input: Vector2::new(0.0, 1.0),
                jump_pressed: true,
                crouch_toggled: true,
            },
            0.15,
        );
        assert!(!ctx.has_move_input());
        assert!(!ctx.jump_requested);
        assert!(!ctx.crouch_active);
    }

    #[test]
    fn test_planar_velocity_invariants() {
        let mut ctx = MovementContext::new();
        ctx.set_planar_velocity(3.0, vector![0.0, 0.0, 2.0]);
        assert_eq!(ctx.horizontal_speed, 3.0);
        assert!((ctx.horizontal_direction.norm() - 1.0).abs() < 1e-6);

        let kept = ctx.horizontal_direction;
        ctx.set_planar_velocity(-1.0, Vector3::zeros());
        assert_eq!(ctx.horizontal_speed, 0.0, "Speed is clamped to zero");
        assert_eq!(ctx.horizontal_direction, kept, "Degenerate direction is ignored");
    }

    #[test]
    fn test_pose_directions_are_orthonormal() {
        let pose = ActorPose::new(0.7);
        assert!((pose.forward().norm() - 1.0).abs() < 1e-6);
        assert!((pose.right().norm() - 1.0).abs() < 1e-6);
        assert!(pose.forward().dot(&pose.right()).abs() < 1e-6);

        let dir = pose.direction_for(Vector2::new(0.0, 1.0)).unwrap();
        assert!((dir - pose.forward()).norm() < 1e-6);
        assert!(pose.direction_for(Vector2::zeros()).is_none());
    }
}
