use nalgebra::Vector2;

use super::machine::StateId;

/// Discrete audio cues fired on state-transition edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    Land,
    Slide,
    Vault,
}

/// Animation collaborator: receives state toggles and the current planar
/// input direction. Fire-and-forget; the core never consumes a return value.
pub trait AnimationSink {
    fn set_state(&mut self, _state: StateId, _active: bool) {}
    fn set_direction(&mut self, _direction: Vector2<f32>) {}
}

/// Camera collaborator: follow-target and FOV pushes on specific transitions.
/// Purely cosmetic; no feedback into locomotion.
pub trait CameraRig {
    fn set_follow_head(&mut self, _head: bool) {}
    fn set_fov(&mut self, _fov: f32) {}
}

/// Audio collaborator: side-effect only.
pub trait AudioSink {
    fn play(&mut self, _cue: AudioCue) {}
}

struct NullAnimation;
impl AnimationSink for NullAnimation {}

struct NullCamera;
impl CameraRig for NullCamera {}

struct NullAudio;
impl AudioSink for NullAudio {}

/// The collaborator bundle injected into the actor at construction.
pub struct Collaborators {
    pub animation: Box<dyn AnimationSink>,
    pub camera: Box<dyn CameraRig>,
    pub audio: Box<dyn AudioSink>,
}

impl Collaborators {
    /// No-op collaborators for hosts (and tests) that do not care.
    pub fn none() -> Self {
        Self {
            animation: Box::new(NullAnimation),
            camera: Box::new(NullCamera),
            audio: Box::new(NullAudio),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::none()
    }
}
