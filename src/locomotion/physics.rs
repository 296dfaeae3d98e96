use nalgebra::{Point3, Vector3};
use rapier3d::control::{
    CharacterAutostep, CharacterLength, EffectiveCharacterMovement, KinematicCharacterController,
};
use rapier3d::prelude::*;
use std::collections::HashMap;

use super::constants::capsule as capsule_consts;

// Collision groups for the locomotion core.
// The capsule collides with static level geometry only; during a traversal
// move it is switched to a group that collides with nothing.
pub const GROUP_STATIC: Group = Group::GROUP_1; // Walls, floors, obstacles
pub const GROUP_CHARACTER: Group = Group::GROUP_2; // The actor capsule
pub const GROUP_TRAVERSAL: Group = Group::GROUP_3; // Capsule while vaulting/climbing

/// Category attached to each static collider; the obstacle scanner only
/// considers `Wall`-tagged geometry traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTag {
    Wall,
    Prop,
}

/// A resolved ray hit against static geometry.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub collider: ColliderHandle,
    pub distance: f32,
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// Wrapper around the Rapier3D structures backing the locomotion core:
/// static level geometry plus the actor's kinematic capsule. The state
/// machine is the only caller of the movement entry points.
pub struct CollisionWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    island_manager: IslandManager,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    query_pipeline: QueryPipeline,
    /// Maps static colliders to their surface category
    tags: HashMap<ColliderHandle, SurfaceTag>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            query_pipeline: QueryPipeline::new(),
            tags: HashMap::new(),
        }
    }

    /// Refreshes the query structures after geometry or capsule changes.
    /// Called once at the start of every simulation step.
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Adds an axis-aligned box of static level geometry.
    pub fn add_obstacle(
        &mut self,
        center: Point3<f32>,
        size: [f32; 3],
        tag: SurfaceTag,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y, center.z])
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let [sx, sy, sz] = size;
        let collider = ColliderBuilder::cuboid(sx / 2.0, sy / 2.0, sz / 2.0)
            .collision_groups(InteractionGroups::new(GROUP_STATIC, Group::ALL))
            .build();
        let handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        self.tags.insert(handle, tag);
        handle
    }

    /// Removes a static obstacle together with its backing body.
    pub fn remove_obstacle(&mut self, handle: ColliderHandle) -> bool {
        self.tags.remove(&handle);
        let Some(parent) = self.collider_set.get(handle).and_then(|c| c.parent()) else {
            return false;
        };
        self.rigid_body_set.remove(
            parent,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    pub fn tag(&self, handle: ColliderHandle) -> Option<SurfaceTag> {
        self.tags.get(&handle).copied()
    }

    /// Extent of an obstacle's bounds measured along the given direction.
    pub fn obstacle_depth_along(
        &self,
        handle: ColliderHandle,
        direction: &Vector3<f32>,
    ) -> Option<f32> {
        let collider = self.collider_set.get(handle)?;
        let half_extents = collider.compute_aabb().half_extents();
        Some(half_extents.dot(direction).abs() * 2.0)
    }

    /// Casts a ray against static geometry, excluding the given body.
    pub fn cast_ray(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        exclude_body: RigidBodyHandle,
    ) -> Option<RayHit> {
        let ray = Ray::new(origin, direction);
        let filter = QueryFilter::default()
            .exclude_rigid_body(exclude_body)
            .exclude_sensors()
            .groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC));

        let (collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true, // solid
            filter,
        )?;

        Some(RayHit {
            collider,
            distance: hit.time_of_impact,
            point: ray.point_at(hit.time_of_impact),
            normal: hit.normal,
        })
    }

    /// Spawns the actor's kinematic capsule.
    /// Total height = 2 × half_height + 2 × radius, matching the collider builder.
    pub fn spawn_capsule(
        &mut self,
        center: Point3<f32>,
        radius: f32,
        height: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![center.x, center.y, center.z])
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let half_height = (height - 2.0 * radius).max(0.0) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC))
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        (body_handle, collider_handle)
    }

    /// Rebuilds the capsule collider with new dimensions, keeping its groups.
    /// The caller is responsible for adjusting the body translation so the
    /// feet stay put.
    pub fn rebuild_capsule(
        &mut self,
        body: RigidBodyHandle,
        old_collider: ColliderHandle,
        radius: f32,
        height: f32,
        groups: InteractionGroups,
    ) -> ColliderHandle {
        self.collider_set.remove(
            old_collider,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );

        let half_height = (height - 2.0 * radius).max(0.0) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(groups)
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set)
    }

    pub fn set_collider_groups(&mut self, handle: ColliderHandle, groups: InteractionGroups) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_collision_groups(groups);
        }
    }

    pub fn collider_groups(&self, handle: ColliderHandle) -> Option<InteractionGroups> {
        self.collider_set.get(handle).map(|c| c.collision_groups())
    }

    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Point3<f32>> {
        self.rigid_body_set.get(handle).map(|body| {
            let t = body.translation();
            point![t.x, t.y, t.z]
        })
    }

    pub fn set_body_translation(&mut self, handle: RigidBodyHandle, center: Point3<f32>) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![center.x, center.y, center.z], true);
        }
    }

    /// Whether a capsule of the given dimensions fits at `center` without
    /// touching static geometry. This is the clearance primitive behind the
    /// stand-up and climb checks (a capsule test, not a point check).
    pub fn capsule_is_free(
        &self,
        center: Point3<f32>,
        radius: f32,
        height: f32,
        exclude_body: RigidBodyHandle,
    ) -> bool {
        let half_height = (height - 2.0 * radius).max(0.0) / 2.0;
        let shape = Capsule::new_y(half_height, radius);
        let pos = Isometry::translation(center.x, center.y, center.z);

        let filter = QueryFilter::default()
            .exclude_rigid_body(exclude_body)
            .exclude_sensors()
            .groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC));

        let mut free = true;
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &pos,
            &shape,
            filter,
            |_handle| {
                free = false;
                false // stop at the first blocker
            },
        );
        free
    }

    /// Moves the capsule by the desired translation using the kinematic
    /// character controller, applying the effective (collision-respecting)
    /// translation immediately. `groups` selects the collision layer the
    /// sweep runs against; the traversal layer collides with nothing.
    pub fn move_capsule(
        &mut self,
        body: RigidBodyHandle,
        collider: ColliderHandle,
        desired: Vector3<f32>,
        dt: f32,
        groups: InteractionGroups,
    ) -> Option<EffectiveCharacterMovement> {
        let rb = self.rigid_body_set.get(body)?;
        let shape = self.collider_set.get(collider)?.shape();
        let current_pos = *rb.position();

        // Fresh controller each step keeps this stateless between calls.
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(capsule_consts::CONTROLLER_OFFSET),
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(capsule_consts::AUTOSTEP_MAX_HEIGHT),
                min_width: CharacterLength::Absolute(capsule_consts::AUTOSTEP_MIN_WIDTH),
                include_dynamic_bodies: false,
            }),
            max_slope_climb_angle: 45.0_f32.to_radians(),
            min_slope_slide_angle: 30.0_f32.to_radians(),
            snap_to_ground: Some(CharacterLength::Absolute(capsule_consts::SNAP_TO_GROUND)),
            ..Default::default()
        };

        let filter = QueryFilter::default()
            .exclude_rigid_body(body)
            .exclude_sensors()
            .groups(groups);

        let movement = controller.move_shape(
            dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            shape,
            &current_pos,
            desired,
            filter,
            |_collision| {},
        );

        let new_pos = current_pos.translation.vector + movement.translation;
        let rb = self.rigid_body_set.get_mut(body)?;
        rb.set_translation(new_pos, true);

        Some(movement)
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}
