use nalgebra::{Point3, Vector3};
use rapier3d::prelude::point;

use super::constants::traversal as traversal_consts;
use super::scanner::{ObstacleQuery, TraversalKind};
use crate::config::{CapsuleTuning, MovementConfig, TraversalTuning};

/// A planned traversal path: two linear segments in time, start→apex over
/// `[0, apex_fraction)` and apex→end over `[apex_fraction, 1]`. The apex is
/// reached exactly at the split regardless of duration, which keeps the
/// capsule clear of the obstacle lip at any playback speed.
#[derive(Debug, Clone, Copy)]
pub struct TraversalPlan {
    pub kind: TraversalKind,
    /// Capsule-center positions
    pub start: Point3<f32>,
    pub apex: Point3<f32>,
    pub end: Point3<f32>,
    pub duration: f32,
    pub apex_fraction: f32,
}

impl TraversalPlan {
    /// Samples the capsule-center position at `progress` in [0, 1].
    pub fn sample(&self, progress: f32) -> Point3<f32> {
        let p = progress.clamp(0.0, 1.0);
        let f = self.apex_fraction;
        let coords = if p < f {
            self.start.coords.lerp(&self.apex.coords, p / f)
        } else {
            self.apex.coords.lerp(&self.end.coords, (p - f) / (1.0 - f))
        };
        Point3::from(coords)
    }
}

/// Computes traversal durations, clearances and keyframe poses from an
/// obstacle query.
pub struct TrajectoryPlanner {
    traversal: TraversalTuning,
    capsule: CapsuleTuning,
}

impl TrajectoryPlanner {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            traversal: config.traversal,
            capsule: config.capsule,
        }
    }

    /// Vault duration from obstacle depth and height, clamped to the
    /// configured range.
    pub fn vault_duration(&self, depth: f32, height: f32) -> f32 {
        let raw = self.traversal.base_vault_duration
            + depth * self.traversal.duration_per_meter_depth
            + height * self.traversal.duration_per_meter_height;
        raw.clamp(
            self.traversal.min_vault_duration,
            self.traversal.max_vault_duration,
        )
    }

    /// Clearance height kept above the obstacle top at the apex.
    pub fn clearance_for(&self, height: f32) -> f32 {
        self.traversal.min_vault_clearance + height * self.traversal.vault_height_multiplier
    }

    /// Builds the traversal plan for a classified obstacle. `start` and the
    /// returned keyframes are capsule-center positions; `body_height` is the
    /// capsule height the move is performed with.
    pub fn plan(
        &self,
        query: &ObstacleQuery,
        start: Point3<f32>,
        forward: Vector3<f32>,
        body_height: f32,
    ) -> TraversalPlan {
        match query.kind {
            TraversalKind::Vault => self.plan_vault(query, start, forward, body_height),
            TraversalKind::Climb => self.plan_climb(query, start, forward, body_height),
        }
    }

    /// Up-then-over path across a low obstacle, landing back at the start
    /// elevation on the far side.
    fn plan_vault(
        &self,
        query: &ObstacleQuery,
        start: Point3<f32>,
        forward: Vector3<f32>,
        body_height: f32,
    ) -> TraversalPlan {
        let radius = self.capsule.radius;
        let half = body_height / 2.0;
        let clearance = self.clearance_for(query.height_above_feet);

        let apex_reach = radius + traversal_consts::FORWARD_MARGIN;
        let apex = point![
            query.point.x + forward.x * apex_reach,
            query.top_y + clearance + half,
            query.point.z + forward.z * apex_reach
        ];

        let landing_reach = query.depth + radius + traversal_consts::LANDING_MARGIN;
        let end = point![
            query.point.x + forward.x * landing_reach,
            start.y,
            query.point.z + forward.z * landing_reach
        ];

        TraversalPlan {
            kind: TraversalKind::Vault,
            start,
            apex,
            end,
            duration: self.vault_duration(query.depth, query.height_above_feet),
            apex_fraction: traversal_consts::VAULT_APEX_FRACTION,
        }
    }

    /// Up-and-onto path over a tall ledge: the apex clears the lip, the end
    /// pose puts the feet on the ledge top.
    fn plan_climb(
        &self,
        query: &ObstacleQuery,
        start: Point3<f32>,
        forward: Vector3<f32>,
        body_height: f32,
    ) -> TraversalPlan {
        let radius = self.capsule.radius;
        let half = body_height / 2.0;
        let clearance = self.traversal.min_vault_clearance;

        let lip_reach = radius + traversal_consts::FORWARD_MARGIN;
        let apex = point![
            query.point.x + forward.x * lip_reach,
            query.top_y + clearance + half,
            query.point.z + forward.z * lip_reach
        ];

        // Settle just past the lip so the feet land on the ledge even when
        // the obstacle is thin.
        let landing_reach = lip_reach + 0.05;
        let end = point![
            query.point.x + forward.x * landing_reach,
            query.top_y + half + 0.02,
            query.point.z + forward.z * landing_reach
        ];

        TraversalPlan {
            kind: TraversalKind::Climb,
            start,
            apex,
            end,
            duration: self.traversal.climb_duration,
            apex_fraction: traversal_consts::CLIMB_APEX_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier3d::prelude::vector;

    fn planner() -> TrajectoryPlanner {
        TrajectoryPlanner::new(&MovementConfig::default())
    }

    fn vault_query(depth: f32, height: f32) -> ObstacleQuery {
        ObstacleQuery {
            kind: TraversalKind::Vault,
            point: point![0.0, height / 2.0, 1.0],
            normal: vector![0.0, 0.0, -1.0],
            distance: 1.0,
            top_y: height,
            depth,
            height_above_feet: height,
        }
    }

    #[test]
    fn test_vault_duration_formula_and_clamp() {
        let planner = planner();
        // base 0.4 + 0.5*0.15 + 0.6*0.1 = 0.535, inside [0.3, 0.8]
        assert!((planner.vault_duration(0.5, 0.6) - 0.535).abs() < 1e-6);
        // Deep obstacle clamps to the maximum
        assert_eq!(planner.vault_duration(10.0, 1.0), 0.8);

        // A config with a tiny base clamps to the minimum
        let mut config = MovementConfig::default();
        config.traversal.base_vault_duration = 0.05;
        let planner = TrajectoryPlanner::new(&config);
        assert_eq!(planner.vault_duration(0.1, 0.1), 0.3);
    }

    #[test]
    fn test_sample_hits_keyframes() {
        let plan = planner().plan(
            &vault_query(0.5, 0.6),
            point![0.0, 0.9, 0.0],
            vector![0.0, 0.0, 1.0],
            1.8,
        );

        assert!((plan.sample(0.0) - plan.start).norm() < 1e-6);
        assert!((plan.sample(plan.apex_fraction) - plan.apex).norm() < 1e-6);
        assert!((plan.sample(1.0) - plan.end).norm() < 1e-6);
        // Out-of-range progress clamps
        assert!((plan.sample(1.5) - plan.end).norm() < 1e-6);
    }

    #[test]
    fn test_vault_apex_clears_obstacle_top() {
        let planner = planner();
        let height = 0.6;
        let plan = planner.plan(
            &vault_query(0.5, height),
            point![0.0, 0.9, 0.0],
            vector![0.0, 0.0, 1.0],
            1.8,
        );

        // Apex feet position must sit at least min_vault_clearance above the top.
        let apex_feet = plan.apex.y - 1.8 / 2.0;
        assert!(
            apex_feet >= height + MovementConfig::default().traversal.min_vault_clearance - 1e-6,
            "apex feet {} vs obstacle top {}",
            apex_feet,
            height
        );
    }

    #[test]
    fn test_vault_lands_at_start_elevation_past_obstacle() {
        let plan = planner().plan(
            &vault_query(0.5, 0.6),
            point![0.0, 0.9, 0.0],
            vector![0.0, 0.0, 1.0],
            1.8,
        );
        assert!((plan.end.y - 0.9).abs() < 1e-6);
        // depth 0.5 + radius 0.3 + landing margin 0.2 past the hit point
        assert!((plan.end.z - 2.0).abs() < 1e-6, "end z was {}", plan.end.z);
    }

    #[test]
    fn test_climb_ends_on_ledge_top() {
        let query = ObstacleQuery {
            kind: TraversalKind::Climb,
            point: point![0.0, 0.75, 1.0],
            normal: vector![0.0, 0.0, -1.0],
            distance: 1.0,
            top_y: 1.5,
            depth: 0.5,
            height_above_feet: 1.45,
        };
        let plan = planner().plan(&query, point![0.0, 0.9, 0.0], vector![0.0, 0.0, 1.0], 1.8);

        assert_eq!(plan.kind, TraversalKind::Climb);
        assert!((plan.duration - 0.7).abs() < 1e-6);
        assert_eq!(plan.apex_fraction, 0.6);
        let end_feet = plan.end.y - 0.9;
        assert!(
            (end_feet - 1.5).abs() < 0.05,
            "climb should land with feet on the ledge, feet at {}",
            end_feet
        );
    }
}
