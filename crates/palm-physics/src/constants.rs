//! Default constants for the particle field
//!
//! Every tunable that a `SimulationConfig` may leave unset resolves to one of these.
//! Values are in simulation units (roughly "one unit per centimetre of hand travel").

// Initialization
/// Per-axis bound of the uniform random initial velocity
pub const INITIAL_VELOCITY_RANGE: f32 = 0.4;

// Responsive / cohesive integration
/// Per-axis bound of the isotropic random jitter added every tick
pub const JITTER_RANGE: f32 = 0.025;

/// Velocity multiplier applied to a clipped axis (inelastic bounce)
pub const BOUNCE_DAMPING: f32 = -0.8;

/// Strength of the weak pull toward the origin in cohesive mode
pub const ORIGIN_PULL: f32 = 0.01;

/// Cohesion only samples every n-th particle.
/// Approximates all-pairs cohesion at a tenth of the cost.
pub const COHESION_STRIDE: usize = 10;

pub const DEFAULT_ATTRACTION_STRENGTH: f32 = 0.05;
pub const DEFAULT_INTERACTION_RADIUS: f32 = 12.0;
pub const DEFAULT_COHESION_STRENGTH: f32 = 0.002;
pub const DEFAULT_COHESION_RADIUS: f32 = 6.0;

pub const DEFAULT_VISCOSITY: f32 = 0.95;
pub const DEFAULT_BOUNDARY: f32 = 20.0;
pub const DEFAULT_PARTICLE_SIZE: f32 = 0.3;
pub const DEFAULT_PARTICLE_COUNT: usize = 2000;

// Needle sphere
pub const DEFAULT_BASE_RADIUS: f32 = 6.0;
pub const DEFAULT_OUTER_RADIUS_MULTIPLIER: f32 = 1.5;
pub const DEFAULT_RADIUS_HAND_SCALE: f32 = 0.5;
pub const DEFAULT_NEEDLE_LENGTH: f32 = 1.6;

/// Driving distance used when exactly one hand is tracked
pub const ONE_HAND_DRIVING_DISTANCE: f32 = 15.0;

/// Driving distance used when no hand is tracked
pub const IDLE_DRIVING_DISTANCE: f32 = 10.0;

// Swimming wave
/// Phase offset between consecutive particles
pub const SWIM_PHASE_STEP: f32 = 0.01;

/// Angular speed of the travelling wave (radians per second)
pub const SWIM_WAVE_SPEED: f32 = 0.4;

pub const DEFAULT_SWIM_STRENGTH: f32 = 0.02;

/// |radial . up| above this uses the fallback axis for the tangent basis
pub const VERTICAL_THRESHOLD: f32 = 0.99;

// Needle swarm
pub const SWARM_SHELL_RADIUS: f32 = 12.0;
pub const SWARM_OUTER_MULTIPLIER: f32 = 1.8;

/// Off-shell distance under which a particle snaps exactly onto its shell
pub const SNAP_DISTANCE: f32 = 0.5;

/// Fraction of the remaining distance covered per tick while converging
pub const CONVERGENCE_RATE: f32 = 0.4;

/// An alternative center must be closer than `current * HYSTERESIS_RATIO` to steal a particle
pub const HYSTERESIS_RATIO: f32 = 0.8;

/// Vertical offset of the meditation rig below the palm it follows
pub const RIG_VERTICAL_OFFSET: f32 = -3.0;

// Numerics
/// Squared length under which a vector is considered degenerate
pub const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// Largest elapsed time fed to a behavior in one tick (seconds)
pub const MAX_DELTA_TIME: f32 = 1.0 / 15.0;
