use serde::Serialize;

use super::body::CapsuleBody;
use super::collaborators::Collaborators;
use super::context::{ActorPose, MovementContext};
use super::physics::CollisionWorld;
use super::scanner::ObstacleScanner;
use super::states;
use super::trajectory::TrajectoryPlanner;
use crate::config::MovementConfig;

/// The six locomotion states. Exactly one is active at any time; the machine
/// enforces this, never the individual states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StateId {
    Idle,
    Moving,
    Falling,
    Sliding,
    Vaulting,
    ClimbingUp,
}

impl StateId {
    pub const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            StateId::Idle => 0,
            StateId::Moving => 1,
            StateId::Falling => 2,
            StateId::Sliding => 3,
            StateId::Vaulting => 4,
            StateId::ClimbingUp => 5,
        }
    }
}

/// Everything a state may touch during one simulation step, borrowed from
/// the actor. States receive their dependencies here instead of reaching for
/// globals.
pub struct Step<'a> {
    pub dt: f32,
    pub world: &'a mut CollisionWorld,
    pub body: &'a mut CapsuleBody,
    pub pose: &'a mut ActorPose,
    pub ctx: &'a mut MovementContext,
    pub config: &'a MovementConfig,
    pub scanner: &'a ObstacleScanner,
    pub planner: &'a TrajectoryPlanner,
    pub hooks: &'a mut Collaborators,
}

/// One locomotion state. `execute` returns the transition to take, if any;
/// the machine applies it so that an exiting state always runs its own
/// cleanup before the next state's `enter`.
pub trait LocomotionState {
    fn enter(&mut self, step: &mut Step<'_>);
    fn execute(&mut self, step: &mut Step<'_>) -> Option<StateId>;
    fn exit(&mut self, step: &mut Step<'_>);
}

/// Enum-indexed table of the six states plus the one-active-state invariant.
pub struct StateMachine {
    current: StateId,
    table: [Box<dyn LocomotionState>; StateId::COUNT],
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: StateId::Idle,
            table: [
                Box::new(states::Idle),
                Box::new(states::Moving),
                Box::new(states::Falling),
                Box::new(states::Sliding),
                Box::new(states::Vaulting::default()),
                Box::new(states::ClimbingUp::default()),
            ],
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    /// Runs the initial state's `enter`. Called once, right after the actor
    /// is assembled.
    pub fn enter_initial(&mut self, step: &mut Step<'_>) {
        step.ctx.current_state = self.current;
        self.table[self.current.index()].enter(step);
    }

    /// Delegates one simulation step to the active state and applies the
    /// transition it requests, if any.
    pub fn tick(&mut self, step: &mut Step<'_>) {
        if let Some(next) = self.table[self.current.index()].execute(step) {
            self.transition_to(next, step);
        }
    }

    /// Exits the current state, activates the target state's `enter`, and
    /// updates the shared state id. Never skipped: forced resets route
    /// through here too, so collider layer and posture cleanup always runs.
    pub fn transition_to(&mut self, next: StateId, step: &mut Step<'_>) {
        log::debug!("locomotion transition {:?} -> {:?}", self.current, next);
        self.table[self.current.index()].exit(step);
        self.current = next;
        step.ctx.current_state = next;
        self.table[self.current.index()].enter(step);
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
