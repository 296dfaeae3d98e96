use nalgebra::{Point3, Vector3};
use rapier3d::prelude::{point, vector};

use super::body::CapsuleBody;
use super::constants::traversal as traversal_consts;
use super::physics::{CollisionWorld, RayHit, SurfaceTag};
use crate::config::{CapsuleTuning, MovementConfig, TraversalTuning};

/// Which traversal move an obstacle qualifies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalKind {
    Vault,
    Climb,
}

/// Result of a forward obstacle scan. Recomputed fresh on every request;
/// never cached across steps, since no geometry is assumed stable between
/// scans.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleQuery {
    pub kind: TraversalKind,
    /// Point where the forward ray struck the obstacle face
    pub point: Point3<f32>,
    /// Surface normal at the strike point
    pub normal: Vector3<f32>,
    /// Distance from the feet-level ray origin to the strike point
    pub distance: f32,
    /// World Y of the obstacle's true top surface
    pub top_y: f32,
    /// Obstacle extent along the approach direction
    pub depth: f32,
    /// Top surface height measured from the feet-level ray origin
    pub height_above_feet: f32,
}

/// Classifies the obstacle directly ahead of the actor as vaultable or
/// climbable via a forward ray plus a downward top-surface ray. Any failed
/// secondary query aborts the attempt silently.
pub struct ObstacleScanner {
    traversal: TraversalTuning,
    capsule: CapsuleTuning,
}

impl ObstacleScanner {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            traversal: config.traversal,
            capsule: config.capsule,
        }
    }

    /// Whether an obstacle top at `height` above the feet is in the
    /// vaultable band. The upper bound is exclusive: an obstacle exactly at
    /// standing_height × can_vault_height_ratio is too tall.
    pub fn vault_height_in_range(&self, height: f32) -> bool {
        height >= self.traversal.min_vault_height
            && height < self.capsule.standing_height * self.traversal.can_vault_height_ratio
    }

    /// Scans ahead of the actor's feet along `forward`. The climb
    /// classification only runs while airborne or when the vault height
    /// check fails, and additionally requires a near-vertical wall faced
    /// head-on with standing clearance above the ledge.
    pub fn scan(
        &self,
        world: &CollisionWorld,
        body: &CapsuleBody,
        forward: Vector3<f32>,
        airborne: bool,
    ) -> Option<ObstacleQuery> {
        let center = body.center(world);
        let feet_origin = point![
            center.x,
            center.y - body.height() / 2.0 + traversal_consts::FEET_PROBE_LIFT,
            center.z
        ];

        let hit = world.cast_ray(
            feet_origin,
            forward,
            self.traversal.vault_check_distance,
            body.body_handle(),
        )?;
        if world.tag(hit.collider) != Some(SurfaceTag::Wall) {
            return None;
        }

        // Second ray downward from above the strike point resolves the
        // obstacle's true top surface (sloped or thin obstacles the first
        // ray alone cannot).
        let probe_height = self.traversal.max_wall_climb_height + 0.1;
        let top_origin = point![
            hit.point.x + forward.x * traversal_consts::TOP_PROBE_NUDGE,
            hit.point.y + probe_height,
            hit.point.z + forward.z * traversal_consts::TOP_PROBE_NUDGE
        ];
        let top = world.cast_ray(
            top_origin,
            vector![0.0, -1.0, 0.0],
            probe_height + 0.1,
            body.body_handle(),
        )?;

        let top_y = top.point.y;
        let height_above_feet = top_y - feet_origin.y;

        if !airborne && self.vault_height_in_range(height_above_feet) {
            let depth = world.obstacle_depth_along(hit.collider, &forward)?;
            return Some(ObstacleQuery {
                kind: TraversalKind::Vault,
                point: hit.point,
                normal: hit.normal,
                distance: hit.distance,
                top_y,
                depth,
                height_above_feet,
            });
        }

        self.classify_climb(world, body, forward, &hit, top_y, height_above_feet)
    }

    fn classify_climb(
        &self,
        world: &CollisionWorld,
        body: &CapsuleBody,
        forward: Vector3<f32>,
        hit: &RayHit,
        top_y: f32,
        height_above_feet: f32,
    ) -> Option<ObstacleQuery> {
        if height_above_feet < self.traversal.min_wall_climb_height
            || height_above_feet > self.traversal.max_wall_climb_height
        {
            return None;
        }
        // Must be a wall, not a ramp or ceiling
        if hit.normal.y.abs() > self.traversal.wall_normal_max_y {
            return None;
        }
        // Approach must oppose the wall
        if forward.dot(&hit.normal) > self.traversal.climb_facing_dot {
            return None;
        }

        // Standing clearance above the ledge, verified with a capsule test.
        let reach = self.capsule.radius + traversal_consts::FORWARD_MARGIN;
        let clear_center = point![
            hit.point.x + forward.x * reach,
            top_y + self.capsule.standing_height / 2.0 + 0.05,
            hit.point.z + forward.z * reach
        ];
        if !world.capsule_is_free(
            clear_center,
            self.capsule.radius,
            self.capsule.standing_height,
            body.body_handle(),
        ) {
            log::trace!("climb rejected: no standing clearance above ledge");
            return None;
        }

        let depth = world
            .obstacle_depth_along(hit.collider, &forward)
            .unwrap_or(self.capsule.radius);

        Some(ObstacleQuery {
            kind: TraversalKind::Climb,
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            top_y,
            depth,
            height_above_feet,
        })
    }
}
