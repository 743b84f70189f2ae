//! Tuning constants for the pool simulation.
//!
//! ## Coordinate conventions
//!
//! The water surface spans the plane `x, z ∈ [-1, 1]` at rest height `y = 0`.
//! The pool floor sits at `y = -1` and the rim at `y = POOL_HEIGHT - 1`.
//! Heights stored in the field are offsets from the rest level.

/// Default height-field resolution (cells per side).
pub const DEFAULT_RESOLUTION: usize = 256;

/// Velocity damping applied once per wave step.
pub const WAVE_DAMPING: f32 = 0.995;

/// Wave steps per rendered frame.
///
/// Two substeps double the simulated time per frame without changing the
/// per-step numerics.
pub const SUBSTEPS_PER_FRAME: usize = 2;

/// Gravity used by the sphere integrator (pool units / s²).
pub const SPHERE_GRAVITY: [f32; 3] = [0.0, -4.0, 0.0];

/// Radius of the draggable sphere.
pub const SPHERE_RADIUS: f32 = 0.25;

/// Starting sphere position, resting near the floor.
pub const SPHERE_START: [f32; 3] = [-0.4, -0.75, 0.2];

/// Vertical restitution on floor contact.
pub const FLOOR_RESTITUTION: f32 = 0.7;

/// Buoyancy factor: effective gravity is `1 - BUOYANCY * submersion`.
pub const BUOYANCY: f32 = 1.1;

/// Highest point the sphere can be dragged to.
pub const SPHERE_MAX_HEIGHT: f32 = 10.0;

/// Drop radius in texture space.
pub const DROP_RADIUS: f32 = 0.03;

/// Drop strength injected by the pointer.
pub const DROP_STRENGTH: f32 = 0.01;

/// Number of random drops seeded at startup.
pub const INITIAL_DROPS: usize = 20;

/// Scale from sphere overlap to displaced height.
pub const SPHERE_DISPLACEMENT_SCALE: f32 = 0.1;

// =============================================================================
// OPTICS
// =============================================================================

pub const IOR_AIR: f32 = 1.0;
pub const IOR_WATER: f32 = 1.333;

/// Pool wall height measured from the floor.
pub const POOL_HEIGHT: f32 = 1.0;

/// Caustic intensity of undisturbed water.
pub const CAUSTIC_BASE_INTENSITY: f32 = 0.2;

/// Default light direction (towards the light, normalized at use).
pub const LIGHT_DIRECTION: [f32; 3] = [2.0, 2.0, -1.0];

// =============================================================================
// CAMERA
// =============================================================================

/// Initial camera pitch in degrees.
pub const CAMERA_ANGLE_X: f32 = -25.0;
/// Initial camera yaw in degrees.
pub const CAMERA_ANGLE_Y: f32 = -200.5;
/// Pitch limit in degrees.
pub const CAMERA_PITCH_LIMIT: f32 = 89.999;
pub const CAMERA_DISTANCE: f32 = 4.0;
pub const CAMERA_FOV: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 100.0;

/// Longest frame delta fed to the physics (seconds).
pub const MAX_FRAME_DT: f32 = 1.0;
