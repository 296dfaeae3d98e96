//! Locomotion tuning constants.
//! Centralizing these prevents bugs from duplicated hardcoded values; the
//! `MovementConfig` defaults are built from them.

/// Core movement constants
pub mod movement {
    /// Ground movement speed in m/s
    pub const MOVE_SPEED: f32 = 5.0;

    /// Upward launch speed for a consumed jump
    pub const JUMP_POWER: f32 = 5.0;

    /// Downward acceleration in m/s²
    pub const GRAVITY: f32 = 9.81;

    /// Vertical speed applied on landing so the capsule stays pressed to the ground
    pub const GROUND_STICK_VELOCITY: f32 = -2.0;

    /// Grace window after leaving the ground during which a jump still succeeds
    pub const COYOTE_TIME: f32 = 0.5;

    /// How long a jump request stays buffered before it goes stale
    pub const JUMP_BUFFER_SECS: f32 = 0.15;

    /// Small epsilon for float comparisons
    pub const EPSILON: f32 = 0.001;
}

/// Capsule collider constants
pub mod capsule {
    /// Total capsule height while standing
    pub const STANDING_HEIGHT: f32 = 1.8;

    /// Total capsule height while sliding
    pub const SLIDING_HEIGHT: f32 = 0.9;

    /// Capsule radius
    pub const RADIUS: f32 = 0.3;

    /// Character controller contact offset (keeps the capsule from sticking to walls)
    pub const CONTROLLER_OFFSET: f32 = 0.05;

    /// Character controller autostep max height
    pub const AUTOSTEP_MAX_HEIGHT: f32 = 0.3;

    /// Character controller autostep min width
    pub const AUTOSTEP_MIN_WIDTH: f32 = 0.05;

    /// Character controller snap to ground distance
    pub const SNAP_TO_GROUND: f32 = 0.2;

    /// Extra reach below the feet accepted by the grounded probe
    pub const GROUND_PROBE_MARGIN: f32 = 0.1;
}

/// Slide constants
pub mod slide {
    /// Initial slide speed = move speed × this multiplier
    pub const INITIAL_SPEED_MULTIPLIER: f32 = 1.5;

    /// Slide deceleration in m/s²
    pub const DECELERATION: f32 = 2.0;

    /// Below this speed the slide is considered finished
    pub const STOP_SPEED: f32 = 0.1;
}

/// Vault and climb constants
pub mod traversal {
    /// Forward scan distance for obstacles ahead of the feet
    pub const VAULT_CHECK_DISTANCE: f32 = 1.5;

    /// Obstacles at or above standing height × this ratio are too tall to vault
    pub const CAN_VAULT_HEIGHT_RATIO: f32 = 0.7;

    /// Obstacles below this height are stepped over, not vaulted
    pub const MIN_VAULT_HEIGHT: f32 = 0.1;

    /// Base vault duration before depth/height contributions
    pub const BASE_VAULT_DURATION: f32 = 0.4;

    /// Extra vault duration per meter of obstacle depth
    pub const DURATION_PER_METER_DEPTH: f32 = 0.15;

    /// Extra vault duration per meter of obstacle height
    pub const DURATION_PER_METER_HEIGHT: f32 = 0.1;

    /// Lower clamp for the computed vault duration
    pub const MIN_VAULT_DURATION: f32 = 0.3;

    /// Upper clamp for the computed vault duration
    pub const MAX_VAULT_DURATION: f32 = 0.8;

    /// Minimum clearance above the obstacle top at the trajectory apex
    pub const MIN_VAULT_CLEARANCE: f32 = 0.15;

    /// Extra apex clearance per meter of obstacle height
    pub const VAULT_HEIGHT_MULTIPLIER: f32 = 0.3;

    /// Ledges shorter than this are not climbable
    pub const MIN_WALL_CLIMB_HEIGHT: f32 = 1.3;

    /// Ledges taller than this are not climbable
    pub const MAX_WALL_CLIMB_HEIGHT: f32 = 2.2;

    /// Fixed duration of the climb-up move
    pub const CLIMB_DURATION: f32 = 0.7;

    /// Fraction of the climb spent rising to the apex (the rest settles onto the ledge)
    pub const CLIMB_APEX_FRACTION: f32 = 0.6;

    /// Fraction of the vault spent rising to the apex
    pub const VAULT_APEX_FRACTION: f32 = 0.5;

    /// A climbable surface must be near-vertical: |normal.y| at most this
    pub const WALL_NORMAL_MAX_Y: f32 = 0.3;

    /// dot(approach, wall normal) must be at most this for a climb
    pub const CLIMB_FACING_DOT: f32 = -0.5;

    /// Forward offset past the obstacle face used for apex placement
    pub const FORWARD_MARGIN: f32 = 0.1;

    /// Extra forward room left when placing the landing point
    pub const LANDING_MARGIN: f32 = 0.2;

    /// Forward nudge applied to the top-surface probe so it lands on the obstacle
    pub const TOP_PROBE_NUDGE: f32 = 0.05;

    /// Height above the feet at which the forward scan ray starts
    pub const FEET_PROBE_LIFT: f32 = 0.05;
}

/// Camera collaborator targets
pub mod camera {
    pub const DEFAULT_FOV: f32 = 60.0;
    pub const SLIDING_FOV: f32 = 70.0;
    pub const FALLING_FOV: f32 = 65.0;

    /// Look pitch clamp in degrees
    pub const PITCH_MIN: f32 = -85.0;
    pub const PITCH_MAX: f32 = 85.0;
}
