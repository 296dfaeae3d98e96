pub mod actor;
pub mod body;
pub mod collaborators;
pub mod constants;
pub mod context;
pub mod machine;
pub mod physics;
pub mod scanner;
pub mod states;
pub mod trajectory;

pub use actor::{Actor, LocomotionSnapshot};
pub use body::CapsuleBody;
pub use collaborators::{AnimationSink, AudioCue, AudioSink, CameraRig, Collaborators};
pub use context::{ActorPose, InputFrame, MovementContext};
pub use machine::{LocomotionState, StateId, StateMachine, Step};
pub use physics::{CollisionWorld, SurfaceTag};
pub use scanner::{ObstacleQuery, ObstacleScanner, TraversalKind};
pub use trajectory::{TrajectoryPlanner, TraversalPlan};
