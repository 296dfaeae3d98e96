use super::super::collaborators::AudioCue;
use super::super::machine::{LocomotionState, StateId, Step};
use super::super::trajectory::TraversalPlan;
use super::traversal_completion;

/// Procedural vault over a low obstacle. The collision layer is locked to
/// the non-blocking traversal group for the whole move; progress advances
/// every step and the move only ends at progress >= 1 (or a forced reset,
/// which still runs `exit`).
#[derive(Default)]
pub struct Vaulting {
    plan: Option<TraversalPlan>,
    elapsed: f32,
}

impl LocomotionState for Vaulting {
    fn enter(&mut self, step: &mut Step<'_>) {
        self.elapsed = 0.0;
        self.plan = step.ctx.planned_traversal.take();
        if self.plan.is_none() {
            log::debug!("vault entered without a planned trajectory");
        }

        step.body.set_traversal_lock(step.world, true);
        step.ctx.vertical_velocity = 0.0;

        step.hooks.animation.set_state(StateId::Vaulting, true);
        step.hooks.audio.play(AudioCue::Vault);
    }

    fn execute(&mut self, step: &mut Step<'_>) -> Option<StateId> {
        let Some(plan) = self.plan else {
            return Some(traversal_completion(step));
        };

        self.elapsed += step.dt;
        let progress = (self.elapsed / plan.duration).clamp(0.0, 1.0);

        let target = plan.sample(progress);
        let current = step.body.center(step.world);
        step.body.move_by(step.world, target - current, step.dt);

        if progress >= 1.0 {
            return Some(traversal_completion(step));
        }
        None
    }

    fn exit(&mut self, step: &mut Step<'_>) {
        self.plan = None;
        self.elapsed = 0.0;
        step.body.set_traversal_lock(step.world, false);
        step.hooks.animation.set_state(StateId::Vaulting, false);
    }
}
