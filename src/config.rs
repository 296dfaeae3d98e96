//! Movement configuration parsing from movement.toml files
//!
//! All tunables live in one immutable [`MovementConfig`] handed to the actor
//! at construction. Per-actor mutable state is kept separate (see
//! `locomotion::context`).

use serde::Deserialize;
use std::path::Path;

use crate::locomotion::constants::{camera, capsule, movement, slide, traversal};

/// Core movement tunables: speeds, gravity, jump timing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Ground movement speed in m/s
    pub move_speed: f32,
    /// Upward launch speed applied when a jump is consumed
    pub jump_power: f32,
    /// Downward acceleration in m/s²
    pub gravity: f32,
    /// Small negative vertical speed applied on landing so the capsule stays
    /// pressed against the ground
    pub ground_stick_velocity: f32,
    /// Grace window after leaving the ground during which a jump request
    /// still succeeds
    pub coyote_time: f32,
    /// How long a jump request stays buffered before it goes stale
    pub jump_buffer_secs: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: movement::MOVE_SPEED,
            jump_power: movement::JUMP_POWER,
            gravity: movement::GRAVITY,
            ground_stick_velocity: movement::GROUND_STICK_VELOCITY,
            coyote_time: movement::COYOTE_TIME,
            jump_buffer_secs: movement::JUMP_BUFFER_SECS,
        }
    }
}

/// Capsule collider dimensions and posture heights.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CapsuleTuning {
    /// Total capsule height while standing
    pub standing_height: f32,
    /// Total capsule height while sliding
    pub sliding_height: f32,
    /// Capsule radius
    pub radius: f32,
}

impl Default for CapsuleTuning {
    fn default() -> Self {
        Self {
            standing_height: capsule::STANDING_HEIGHT,
            sliding_height: capsule::SLIDING_HEIGHT,
            radius: capsule::RADIUS,
        }
    }
}

/// Slide behavior tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SlideTuning {
    /// Initial slide speed = move_speed × this multiplier
    pub initial_speed_multiplier: f32,
    /// Slide deceleration in m/s²
    pub deceleration: f32,
    /// Below this speed the slide is considered finished
    pub stop_speed: f32,
}

impl Default for SlideTuning {
    fn default() -> Self {
        Self {
            initial_speed_multiplier: slide::INITIAL_SPEED_MULTIPLIER,
            deceleration: slide::DECELERATION,
            stop_speed: slide::STOP_SPEED,
        }
    }
}

/// Vault and climb classification and trajectory tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TraversalTuning {
    /// Forward scan distance for obstacles ahead of the feet
    pub vault_check_distance: f32,
    /// Obstacles at or above standing_height × this ratio are too tall to vault
    pub can_vault_height_ratio: f32,
    /// Obstacles below this height are stepped over, not vaulted
    pub min_vault_height: f32,
    /// Base vault duration before depth/height contributions
    pub base_vault_duration: f32,
    /// Extra duration per meter of obstacle depth
    pub duration_per_meter_depth: f32,
    /// Extra duration per meter of obstacle height
    pub duration_per_meter_height: f32,
    /// Lower clamp for the computed vault duration
    pub min_vault_duration: f32,
    /// Upper clamp for the computed vault duration
    pub max_vault_duration: f32,
    /// Minimum clearance above the obstacle top at the apex
    pub min_vault_clearance: f32,
    /// Extra clearance per meter of obstacle height
    pub vault_height_multiplier: f32,
    /// Ledges shorter than this are not climbable
    pub min_wall_climb_height: f32,
    /// Ledges taller than this are not climbable
    pub max_wall_climb_height: f32,
    /// Fixed duration of the climb-up move
    pub climb_duration: f32,
    /// A climbable surface must be near-vertical: |normal.y| at most this
    pub wall_normal_max_y: f32,
    /// dot(approach, wall normal) must be at most this (approach opposes wall)
    pub climb_facing_dot: f32,
}

impl Default for TraversalTuning {
    fn default() -> Self {
        Self {
            vault_check_distance: traversal::VAULT_CHECK_DISTANCE,
            can_vault_height_ratio: traversal::CAN_VAULT_HEIGHT_RATIO,
            min_vault_height: traversal::MIN_VAULT_HEIGHT,
            base_vault_duration: traversal::BASE_VAULT_DURATION,
            duration_per_meter_depth: traversal::DURATION_PER_METER_DEPTH,
            duration_per_meter_height: traversal::DURATION_PER_METER_HEIGHT,
            min_vault_duration: traversal::MIN_VAULT_DURATION,
            max_vault_duration: traversal::MAX_VAULT_DURATION,
            min_vault_clearance: traversal::MIN_VAULT_CLEARANCE,
            vault_height_multiplier: traversal::VAULT_HEIGHT_MULTIPLIER,
            min_wall_climb_height: traversal::MIN_WALL_CLIMB_HEIGHT,
            max_wall_climb_height: traversal::MAX_WALL_CLIMB_HEIGHT,
            climb_duration: traversal::CLIMB_DURATION,
            wall_normal_max_y: traversal::WALL_NORMAL_MAX_Y,
            climb_facing_dot: traversal::CLIMB_FACING_DOT,
        }
    }
}

/// Cosmetic camera targets pushed to the camera collaborator on transitions.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub default_fov: f32,
    pub sliding_fov: f32,
    pub falling_fov: f32,
    /// Look pitch clamp in degrees
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            default_fov: camera::DEFAULT_FOV,
            sliding_fov: camera::SLIDING_FOV,
            falling_fov: camera::FALLING_FOV,
            pitch_min: camera::PITCH_MIN,
            pitch_max: camera::PITCH_MAX,
        }
    }
}

/// Movement configuration from movement.toml
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub movement: MovementTuning,
    pub capsule: CapsuleTuning,
    pub slide: SlideTuning,
    pub traversal: TraversalTuning,
    pub camera: CameraTuning,
}

impl MovementConfig {
    /// Load movement configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Tallest obstacle height (above the feet) that still classifies as vaultable
    pub fn max_vaultable_height(&self) -> f32 {
        self.capsule.standing_height * self.traversal.can_vault_height_ratio
    }
}

/// Errors that can occur when loading movement configuration
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "Failed to read {}: {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
