//! Scenario tests for the locomotion state machine: ground movement,
//! landing, slides under low ceilings, coyote jumps and forced resets.
//!
//! Run with: cargo test --test locomotion_state_test -- --nocapture

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector2;
use rapier3d::prelude::{point, InteractionGroups};

use freerun::config::MovementConfig;
use freerun::locomotion::physics::{GROUP_CHARACTER, GROUP_STATIC};
use freerun::locomotion::{
    Actor, AnimationSink, AudioCue, AudioSink, CameraRig, Collaborators, InputFrame, StateId,
    SurfaceTag,
};

const DT: f32 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Recording collaborators
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recorder {
    anim_events: Vec<(StateId, bool)>,
    cues: Vec<AudioCue>,
}

struct RecordingAnim(Rc<RefCell<Recorder>>);
impl AnimationSink for RecordingAnim {
    fn set_state(&mut self, state: StateId, active: bool) {
        self.0.borrow_mut().anim_events.push((state, active));
    }
}

struct RecordingAudio(Rc<RefCell<Recorder>>);
impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.0.borrow_mut().cues.push(cue);
    }
}

struct SilentCamera;
impl CameraRig for SilentCamera {}

fn recording_collaborators() -> (Collaborators, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let collaborators = Collaborators {
        animation: Box::new(RecordingAnim(recorder.clone())),
        camera: Box::new(SilentCamera),
        audio: Box::new(RecordingAudio(recorder.clone())),
    };
    (collaborators, recorder)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Actor standing on a large floor whose top surface sits at Y = 0.
fn actor_on_floor(hooks: Collaborators) -> Actor {
    let config = MovementConfig::default();
    let mut actor = Actor::new(&config, hooks, point![0.0, 0.95, 0.0]);
    actor
        .world_mut()
        .add_obstacle(point![0.0, -0.5, 0.0], [40.0, 1.0, 40.0], SurfaceTag::Prop);
    actor
}

fn forward_input() -> InputFrame {
    InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        ..Default::default()
    }
}

fn tick_until<F: FnMut(&Actor) -> bool>(actor: &mut Actor, max_ticks: usize, mut done: F) -> usize {
    for i in 0..max_ticks {
        if done(actor) {
            return i;
        }
        actor.tick(DT);
    }
    max_ticks
}

// ---------------------------------------------------------------------------
// Scenario A: grounded actor with forward input starts moving in one step
// ---------------------------------------------------------------------------

#[test]
fn test_idle_to_moving_with_one_step_displacement() {
    let mut actor = actor_on_floor(Collaborators::none());
    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Idle, "No input keeps the actor idle");

    actor.apply_input(&forward_input());
    let before = actor.position();
    actor.tick(DT);

    assert_eq!(actor.state(), StateId::Moving, "Input must reach Moving within one step");
    let moved = actor.position() - before;
    let expected = actor.config().movement.move_speed * DT;
    assert!(
        (moved.z - expected).abs() < 1e-3,
        "Forward displacement should be moveSpeed*dt = {}, got {}",
        expected,
        moved.z
    );
    assert!(moved.x.abs() < 1e-4, "No sideways drift, got {}", moved.x);
}

// ---------------------------------------------------------------------------
// Scenario C: landing resets vertical velocity to the stick value
// ---------------------------------------------------------------------------

#[test]
fn test_landing_resets_vertical_velocity_to_stick_value() {
    let config = MovementConfig::default();
    let mut actor = Actor::new(&config, Collaborators::none(), point![0.0, 2.5, 0.0]);
    actor
        .world_mut()
        .add_obstacle(point![0.0, -0.5, 0.0], [40.0, 1.0, 40.0], SurfaceTag::Prop);

    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Falling, "Spawned in the air, must fall");

    let ticks = tick_until(&mut actor, 300, |a| a.state() == StateId::Idle);
    assert!(ticks < 300, "Actor must land");
    assert_eq!(
        actor.context().vertical_velocity,
        config.movement.ground_stick_velocity,
        "Landing sets the stick value, not zero"
    );
    assert!(actor.is_grounded());
}

// ---------------------------------------------------------------------------
// Scenario B: an overhead obstacle pins the actor in Sliding
// ---------------------------------------------------------------------------

#[test]
fn test_slide_persists_under_low_ceiling_until_it_clears() {
    let mut actor = actor_on_floor(Collaborators::none());
    // Low ceiling covering the slide path from z=2 onward: tall enough for
    // the sliding capsule, too low to stand under.
    let ceiling = actor.world_mut().add_obstacle(
        point![0.0, 1.35, 16.0],
        [40.0, 0.3, 28.0],
        SurfaceTag::Prop,
    );

    // Walk forward and start the slide.
    actor.apply_input(&InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        crouch_toggled: true,
        ..Default::default()
    });
    let ticks = tick_until(&mut actor, 10, |a| a.state() == StateId::Sliding);
    assert!(ticks < 10, "Crouch + input must start a slide");

    // Carry the slide under the ceiling, then release crouch and input.
    for _ in 0..60 {
        actor.tick(DT);
    }
    assert_eq!(actor.state(), StateId::Sliding);
    assert!(actor.position().z > 2.5, "Slide should have carried the actor under the ceiling");
    actor.apply_input(&InputFrame {
        move_input: Vector2::zeros(),
        crouch_toggled: true, // toggles crouch off
        ..Default::default()
    });
    assert!(!actor.context().crouch_active);

    // Crouch released and speed decaying to zero: the slide must persist as
    // long as there is no standing room overhead.
    for _ in 0..300 {
        actor.tick(DT);
        assert_eq!(
            actor.state(),
            StateId::Sliding,
            "Blocked overhead, the slide may not end"
        );
    }
    assert_eq!(actor.context().horizontal_speed, 0.0);

    // Clear the ceiling: the slide ends and the collider is standing again.
    actor.world_mut().remove_obstacle(ceiling);
    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Idle);
    assert_eq!(actor.body().height(), actor.config().capsule.standing_height);
}

// ---------------------------------------------------------------------------
// Jump and coyote time
// ---------------------------------------------------------------------------

#[test]
fn test_jump_from_ground_rises_and_lands() {
    let (hooks, recorder) = recording_collaborators();
    let mut actor = actor_on_floor(hooks);
    actor.tick(DT);

    actor.apply_input(&InputFrame {
        jump_pressed: true,
        ..Default::default()
    });
    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Falling, "A consumed jump goes airborne");
    assert!(actor.context().vertical_velocity > 0.0);
    assert!(recorder.borrow().cues.contains(&AudioCue::Jump));

    let mut apex = f32::MIN;
    let ticks = tick_until(&mut actor, 300, |a| {
        apex = apex.max(a.position().y);
        a.state() == StateId::Idle
    });
    assert!(ticks < 300, "Jump must come back down");
    // Apex roughly v²/2g above the rest height.
    let expected_rise = actor.config().movement.jump_power.powi(2)
        / (2.0 * actor.config().movement.gravity);
    assert!(
        (apex - 0.95 - expected_rise).abs() < 0.2,
        "Apex should rise ~{:.2}, peaked at {:.2}",
        expected_rise,
        apex - 0.95
    );
    assert!((actor.position().y - 0.95).abs() < 0.1, "Back at standing rest height");
    assert!(recorder.borrow().cues.contains(&AudioCue::Land));
}

#[test]
fn test_coyote_window_allows_late_jump() {
    let config = MovementConfig::default();
    let mut actor = Actor::new(&config, Collaborators::none(), point![0.0, 3.0, 0.0]);
    // No floor: a pure fall.

    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Falling);

    // Ten ticks in (~0.17s) we are still inside the 0.5s coyote window.
    for _ in 0..10 {
        actor.tick(DT);
    }
    assert!(actor.context().vertical_velocity < 0.0);
    actor.apply_input(&InputFrame {
        jump_pressed: true,
        ..Default::default()
    });
    actor.tick(DT);
    assert!(
        actor.context().vertical_velocity > 0.0,
        "A jump inside the coyote window must still fire"
    );
}

#[test]
fn test_jump_after_coyote_window_is_ignored() {
    let config = MovementConfig::default();
    let mut actor = Actor::new(&config, Collaborators::none(), point![0.0, 30.0, 0.0]);

    actor.tick(DT);
    assert_eq!(actor.state(), StateId::Falling);

    // Fall well past the coyote window before requesting the jump.
    let past_window = (config.movement.coyote_time / DT) as usize + 10;
    for _ in 0..past_window {
        actor.tick(DT);
    }
    actor.apply_input(&InputFrame {
        jump_pressed: true,
        ..Default::default()
    });
    // The buffered request must go stale without firing.
    for _ in 0..20 {
        actor.tick(DT);
    }
    assert!(
        actor.context().vertical_velocity < 0.0,
        "No jump may fire after the coyote window"
    );
}

#[test]
fn test_jump_out_of_slide_restores_standing_collider() {
    let mut actor = actor_on_floor(Collaborators::none());

    actor.apply_input(&InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        crouch_toggled: true,
        ..Default::default()
    });
    let ticks = tick_until(&mut actor, 10, |a| a.state() == StateId::Sliding);
    assert!(ticks < 10);

    actor.apply_input(&InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        jump_pressed: true,
        ..Default::default()
    });
    let ticks = tick_until(&mut actor, 20, |a| a.state() == StateId::Falling);
    assert!(ticks < 20, "A jump with standing room must end the slide");
    assert!(actor.context().vertical_velocity > 0.0);
    assert_eq!(
        actor.body().height(),
        actor.config().capsule.standing_height,
        "Slide exit restores the collider before going airborne"
    );
}

// ---------------------------------------------------------------------------
// Scenario E: forced reset mid-traversal restores layer and collider
// ---------------------------------------------------------------------------

#[test]
fn test_respawn_mid_vault_restores_collision_layer() {
    let mut actor = actor_on_floor(Collaborators::none());
    actor
        .world_mut()
        .add_obstacle(point![0.0, 0.35, 1.5], [4.0, 0.7, 0.5], SurfaceTag::Wall);

    let original_groups = actor
        .world()
        .collider_groups(actor.body().collider_handle())
        .unwrap();
    assert_eq!(original_groups, InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC));

    actor.apply_input(&forward_input());
    let ticks = tick_until(&mut actor, 20, |a| a.state() == StateId::Vaulting);
    assert!(ticks < 20, "Wall ahead must trigger a vault");

    // Mid-flight the capsule rides the non-blocking traversal layer.
    actor.tick(DT);
    actor.tick(DT);
    let locked_groups = actor
        .world()
        .collider_groups(actor.body().collider_handle())
        .unwrap();
    assert_ne!(locked_groups, original_groups, "Vault must lock the traversal layer");

    actor.respawn(point![0.0, 0.95, -3.0]);

    assert_eq!(actor.state(), StateId::Idle);
    let restored = actor
        .world()
        .collider_groups(actor.body().collider_handle())
        .unwrap();
    assert_eq!(restored, original_groups, "Reset must restore the pre-vault layer");
    assert_eq!(actor.body().height(), actor.config().capsule.standing_height);
    assert_eq!(actor.context().vertical_velocity, 0.0);
    assert!((actor.position().z - -3.0).abs() < 1e-4);
}

#[test]
fn test_respawn_mid_slide_restores_standing_height() {
    let mut actor = actor_on_floor(Collaborators::none());

    actor.apply_input(&InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        crouch_toggled: true,
        ..Default::default()
    });
    let ticks = tick_until(&mut actor, 10, |a| a.state() == StateId::Sliding);
    assert!(ticks < 10);
    assert_eq!(actor.body().height(), actor.config().capsule.sliding_height);

    actor.respawn(point![0.0, 0.95, 0.0]);
    assert_eq!(actor.state(), StateId::Idle);
    assert_eq!(actor.body().height(), actor.config().capsule.standing_height);
    assert!(!actor.context().crouch_active, "Slide exit clears the crouch toggle");

    // A second reset straight from Idle must not drift anything.
    actor.respawn(point![0.0, 0.95, 0.0]);
    assert_eq!(actor.body().height(), actor.config().capsule.standing_height);
}

// ---------------------------------------------------------------------------
// Enter/exit bookkeeping observed through the animation collaborator
// ---------------------------------------------------------------------------

#[test]
fn test_traversal_and_fall_anim_toggles_stay_balanced() {
    let (hooks, recorder) = recording_collaborators();
    let mut actor = actor_on_floor(hooks);
    actor
        .world_mut()
        .add_obstacle(point![0.0, 0.35, 1.5], [4.0, 0.7, 0.5], SurfaceTag::Wall);

    // Walk, vault, land, keep running, jump, land again — checking the
    // planar-velocity invariants on every step along the way.
    let assert_invariants = |actor: &Actor| {
        let ctx = actor.context();
        assert!(ctx.horizontal_speed >= 0.0);
        if ctx.horizontal_speed > 0.0 {
            assert!(
                (ctx.horizontal_direction.norm() - 1.0).abs() < 1e-4,
                "Direction must stay unit-length while moving"
            );
        }
    };
    actor.apply_input(&forward_input());
    for _ in 0..90 {
        actor.tick(DT);
        assert_invariants(&actor);
    }
    actor.apply_input(&InputFrame {
        move_input: Vector2::new(0.0, 1.0),
        jump_pressed: true,
        ..Default::default()
    });
    for _ in 0..110 {
        actor.tick(DT);
        assert_invariants(&actor);
    }
    assert!(actor.is_grounded(), "The run should end back on the ground");

    // Vaulting and Falling toggles are only touched by their own
    // enter/exit, so the activations must balance the deactivations.
    let recorder = recorder.borrow();
    for state in [StateId::Vaulting, StateId::Falling] {
        let on = recorder
            .anim_events
            .iter()
            .filter(|(s, a)| *s == state && *a)
            .count();
        let off = recorder
            .anim_events
            .iter()
            .filter(|(s, a)| *s == state && !*a)
            .count();
        assert!(on > 0, "{:?} should have been entered during the run", state);
        assert_eq!(on, off, "{:?} enter/exit toggles must balance", state);
    }
    assert!(recorder.cues.contains(&AudioCue::Vault));
}
