use nalgebra::Point3;
use serde::Serialize;

use super::body::CapsuleBody;
use super::collaborators::Collaborators;
use super::context::{ActorPose, InputFrame, MovementContext};
use super::machine::{StateId, StateMachine, Step};
use super::physics::CollisionWorld;
use super::scanner::ObstacleScanner;
use super::trajectory::TrajectoryPlanner;
use crate::config::MovementConfig;

/// Point-in-time view of the actor for host-side display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocomotionSnapshot {
    pub state: StateId,
    pub position: [f32; 3],
    pub grounded: bool,
    pub horizontal_speed: f32,
    pub vertical_velocity: f32,
    pub crouch_active: bool,
}

/// The locomotion actor: capsule body, obstacle scanner, trajectory planner
/// and the state machine driving them, assembled over one collision world.
///
/// All dependencies arrive at construction; there is no global instance.
/// The host feeds input once per step via [`Actor::apply_input`] and then
/// calls [`Actor::tick`].
pub struct Actor {
    config: MovementConfig,
    world: CollisionWorld,
    body: CapsuleBody,
    pose: ActorPose,
    ctx: MovementContext,
    scanner: ObstacleScanner,
    planner: TrajectoryPlanner,
    machine: StateMachine,
    hooks: Collaborators,
}

impl Actor {
    pub fn new(config: &MovementConfig, hooks: Collaborators, spawn_center: Point3<f32>) -> Self {
        let config = *config;
        let mut world = CollisionWorld::new();
        let mut body = CapsuleBody::spawn(
            &mut world,
            spawn_center,
            config.capsule.radius,
            config.capsule.standing_height,
        );
        let mut pose = ActorPose::new(0.0);
        let mut ctx = MovementContext::new();
        let scanner = ObstacleScanner::new(&config);
        let planner = TrajectoryPlanner::new(&config);
        let mut machine = StateMachine::new();
        let mut hooks = hooks;

        {
            let mut step = Step {
                dt: 0.0,
                world: &mut world,
                body: &mut body,
                pose: &mut pose,
                ctx: &mut ctx,
                config: &config,
                scanner: &scanner,
                planner: &planner,
                hooks: &mut hooks,
            };
            machine.enter_initial(&mut step);
        }

        Self {
            config,
            world,
            body,
            pose,
            ctx,
            scanner,
            planner,
            machine,
            hooks,
        }
    }

    /// Applies one host input snapshot. Dropped entirely while a climb has
    /// input consumption locked.
    pub fn apply_input(&mut self, frame: &InputFrame) {
        self.ctx
            .apply_input(frame, self.config.movement.jump_buffer_secs);
    }

    /// Applies a look delta; the only rotation mutation path.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.pose.rotate(
            yaw_delta,
            pitch_delta,
            self.config.camera.pitch_min,
            self.config.camera.pitch_max,
        );
    }

    /// Advances the simulation one fixed step. Ordering: query refresh →
    /// jump-buffer tick → grounded probe → active-state logic (which moves
    /// the body) → transition. A transition therefore never runs against a
    /// stale grounded flag.
    pub fn tick(&mut self, dt: f32) {
        self.world.update_queries();
        self.ctx.tick_jump_buffer(dt);
        self.body.probe_ground(&self.world);

        let mut step = Step {
            dt,
            world: &mut self.world,
            body: &mut self.body,
            pose: &mut self.pose,
            ctx: &mut self.ctx,
            config: &self.config,
            scanner: &self.scanner,
            planner: &self.planner,
            hooks: &mut self.hooks,
        };
        self.machine.tick(&mut step);
    }

    /// Forced reset accepted from the host (out-of-bounds fall, death). The
    /// active state's `exit` runs before the actor is repositioned, so a
    /// reset mid-vault cannot leak the traversal layer or a shrunk collider.
    pub fn respawn(&mut self, center: Point3<f32>) {
        {
            let mut step = Step {
                dt: 0.0,
                world: &mut self.world,
                body: &mut self.body,
                pose: &mut self.pose,
                ctx: &mut self.ctx,
                config: &self.config,
                scanner: &self.scanner,
                planner: &self.planner,
                hooks: &mut self.hooks,
            };
            self.machine.transition_to(StateId::Idle, &mut step);
        }

        self.body.teleport(&mut self.world, center);
        self.ctx.reset_transient();
        self.world.update_queries();
        self.body.probe_ground(&self.world);
    }

    pub fn state(&self) -> StateId {
        self.machine.current()
    }

    /// Capsule center in world space.
    pub fn position(&self) -> Point3<f32> {
        self.body.center(&self.world)
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    pub fn pose(&self) -> &ActorPose {
        &self.pose
    }

    pub fn context(&self) -> &MovementContext {
        &self.ctx
    }

    pub fn body(&self) -> &CapsuleBody {
        &self.body
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Level geometry lives in the actor's collision world; the host builds
    /// it through this accessor.
    pub fn world_mut(&mut self) -> &mut CollisionWorld {
        &mut self.world
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn snapshot(&self) -> LocomotionSnapshot {
        let position = self.position();
        LocomotionSnapshot {
            state: self.state(),
            position: [position.x, position.y, position.z],
            grounded: self.is_grounded(),
            horizontal_speed: self.ctx.horizontal_speed,
            vertical_velocity: self.ctx.vertical_velocity,
            crouch_active: self.ctx.crouch_active,
        }
    }
}
