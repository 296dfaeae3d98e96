use nalgebra::{Point3, Vector3};
use rapier3d::control::EffectiveCharacterMovement;
use rapier3d::prelude::*;

use super::constants::capsule as capsule_consts;
use super::physics::{CollisionWorld, GROUP_CHARACTER, GROUP_STATIC, GROUP_TRAVERSAL};

/// Thin wrapper around the actor's kinematic capsule.
///
/// The body never initiates motion on its own: the locomotion state machine
/// owns every `move_by` call. Posture changes (slide crouch) preserve the
/// capsule's feet position so the actor neither sinks into the ground nor
/// floats above it.
pub struct CapsuleBody {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    radius: f32,
    standing_height: f32,
    height: f32,
    grounded: bool,
    traversal_locked: bool,
}

impl CapsuleBody {
    pub fn spawn(
        world: &mut CollisionWorld,
        center: Point3<f32>,
        radius: f32,
        standing_height: f32,
    ) -> Self {
        let (body, collider) = world.spawn_capsule(center, radius, standing_height);
        Self {
            body,
            collider,
            radius,
            standing_height,
            height: standing_height,
            grounded: false,
            traversal_locked: false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn standing_height(&self) -> f32 {
        self.standing_height
    }

    pub fn traversal_locked(&self) -> bool {
        self.traversal_locked
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    /// Capsule center in world space.
    pub fn center(&self, world: &CollisionWorld) -> Point3<f32> {
        world
            .body_translation(self.body)
            .unwrap_or_else(|| point![0.0, 0.0, 0.0])
    }

    /// World Y of the capsule's base.
    pub fn feet_y(&self, world: &CollisionWorld) -> f32 {
        self.center(world).y - self.height / 2.0
    }

    fn active_groups(&self) -> InteractionGroups {
        if self.traversal_locked {
            InteractionGroups::new(GROUP_TRAVERSAL, Group::NONE)
        } else {
            InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC)
        }
    }

    /// Performs a swept, collision-respecting translation. While the
    /// traversal layer is locked the sweep runs against nothing and the
    /// displacement is applied in full.
    pub fn move_by(
        &mut self,
        world: &mut CollisionWorld,
        displacement: Vector3<f32>,
        dt: f32,
    ) -> Option<EffectiveCharacterMovement> {
        let movement = world.move_capsule(self.body, self.collider, displacement, dt, self.active_groups())?;
        if !self.traversal_locked {
            self.grounded = movement.grounded;
        }
        Some(movement)
    }

    /// Refreshes the grounded flag with a downward probe, independent of the
    /// traversal layer lock. Runs once at the start of every step so state
    /// logic never sees a stale flag.
    pub fn probe_ground(&mut self, world: &CollisionWorld) -> bool {
        let center = self.center(world);
        let max = self.height / 2.0 + capsule_consts::GROUND_PROBE_MARGIN;
        let hit = world.cast_ray(center, vector![0.0, -1.0, 0.0], max, self.body);
        self.grounded = hit.is_some();
        self.grounded
    }

    /// Changes the capsule height, preserving the feet position.
    pub fn set_height(&mut self, world: &mut CollisionWorld, new_height: f32) {
        let center = self.center(world);
        let feet = center.y - self.height / 2.0;

        self.collider = world.rebuild_capsule(
            self.body,
            self.collider,
            self.radius,
            new_height,
            self.active_groups(),
        );
        self.height = new_height;

        let new_center = point![center.x, feet + new_height / 2.0, center.z];
        world.set_body_translation(self.body, new_center);
    }

    /// Locks or unlocks the non-blocking traversal collision layer.
    pub fn set_traversal_lock(&mut self, world: &mut CollisionWorld, locked: bool) {
        if self.traversal_locked == locked {
            return;
        }
        self.traversal_locked = locked;
        world.set_collider_groups(self.collider, self.active_groups());
    }

    /// Whether a standing-height capsule fits at the current feet position.
    /// Verified with a capsule intersection test, not a point check.
    pub fn can_stand(&self, world: &CollisionWorld) -> bool {
        if self.height >= self.standing_height {
            return true;
        }
        let center = self.center(world);
        let feet = center.y - self.height / 2.0;
        // Lifted slightly so the floor under the feet does not count as a blocker.
        let standing_center = point![center.x, feet + self.standing_height / 2.0 + 0.02, center.z];
        world.capsule_is_free(standing_center, self.radius, self.standing_height, self.body)
    }

    /// Teleports the capsule center, bypassing collision sweeps.
    pub fn teleport(&mut self, world: &mut CollisionWorld, center: Point3<f32>) {
        world.set_body_translation(self.body, center);
    }
}
