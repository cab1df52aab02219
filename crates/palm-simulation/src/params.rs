//! Simulation configuration
//!
//! A `SimulationConfig` is fixed for the lifetime of an instance. Optional
//! tunables resolve to the defaults in `palm_physics::constants`.

use catppuccin::PALETTE;
use palm_physics::constants::*;
use palm_physics::linear_rgb;

/// Motion regime of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Responsive,
    Cohesive,
    NeedleSphere,
    NeedleSwarm,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 4] = [
        BehaviorKind::Responsive,
        BehaviorKind::Cohesive,
        BehaviorKind::NeedleSphere,
        BehaviorKind::NeedleSwarm,
    ];

    /// Sphere-constrained modes keep a radial direction per particle
    pub fn uses_direction(self) -> bool {
        matches!(self, BehaviorKind::NeedleSphere | BehaviorKind::NeedleSwarm)
    }

    pub fn label(self) -> &'static str {
        match self {
            BehaviorKind::Responsive => "responsive",
            BehaviorKind::Cohesive => "cohesive",
            BehaviorKind::NeedleSphere => "needle-sphere",
            BehaviorKind::NeedleSwarm => "needle-swarm",
        }
    }
}

/// Mesh drawn for every particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Sphere-like blob, translate only
    Blob,
    /// Handle + guard + blade, oriented toward the shell center
    Needle,
}

/// Variant specific tunables. `None` means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tunables {
    pub attraction_strength: Option<f32>,
    pub interaction_radius: Option<f32>,
    pub cohesion_strength: Option<f32>,
    pub cohesion_radius: Option<f32>,
    pub cohesion_stride: Option<usize>,
    pub base_radius: Option<f32>,
    pub outer_radius_multiplier: Option<f32>,
    pub radius_hand_scale: Option<f32>,
    pub needle_length: Option<f32>,
    pub swim_strength: Option<f32>,
    pub swarm_radius: Option<f32>,
    pub swarm_outer_multiplier: Option<f32>,
}

/// A set tunable counts only when it is a finite number
fn finite_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

impl Tunables {
    pub fn attraction_strength(&self) -> f32 {
        finite_or(self.attraction_strength, DEFAULT_ATTRACTION_STRENGTH)
    }

    pub fn interaction_radius(&self) -> f32 {
        finite_or(self.interaction_radius, DEFAULT_INTERACTION_RADIUS)
    }

    pub fn cohesion_strength(&self) -> f32 {
        finite_or(self.cohesion_strength, DEFAULT_COHESION_STRENGTH)
    }

    pub fn cohesion_radius(&self) -> f32 {
        finite_or(self.cohesion_radius, DEFAULT_COHESION_RADIUS)
    }

    /// Never zero
    pub fn cohesion_stride(&self) -> usize {
        self.cohesion_stride.unwrap_or(COHESION_STRIDE).max(1)
    }

    pub fn base_radius(&self) -> f32 {
        finite_or(self.base_radius, DEFAULT_BASE_RADIUS)
    }

    /// Never negative
    pub fn outer_radius_multiplier(&self) -> f32 {
        finite_or(self.outer_radius_multiplier, DEFAULT_OUTER_RADIUS_MULTIPLIER).max(0.0)
    }

    pub fn radius_hand_scale(&self) -> f32 {
        finite_or(self.radius_hand_scale, DEFAULT_RADIUS_HAND_SCALE)
    }

    pub fn needle_length(&self) -> f32 {
        finite_or(self.needle_length, DEFAULT_NEEDLE_LENGTH)
    }

    pub fn swim_strength(&self) -> f32 {
        finite_or(self.swim_strength, DEFAULT_SWIM_STRENGTH)
    }

    pub fn swarm_radius(&self) -> f32 {
        finite_or(self.swarm_radius, SWARM_SHELL_RADIUS)
    }

    /// Never negative
    pub fn swarm_outer_multiplier(&self) -> f32 {
        finite_or(self.swarm_outer_multiplier, SWARM_OUTER_MULTIPLIER).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Linear RGB
    pub color: [f32; 3],
    pub count: usize,
    /// Visual scale of each particle
    pub size: f32,
    /// Half-extent of the bounding cube
    pub boundary: f32,
    /// Velocity multiplier applied every tick
    pub viscosity: f32,
    pub behavior: BehaviorKind,
    pub geometry: GeometryKind,
    pub tunables: Tunables,
    /// Fixed RNG seed, OS entropy when `None`
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::responsive()
    }
}

/// Linear RGB of a palette color
pub fn palette_linear(color: &catppuccin::Color) -> [f32; 3] {
    linear_rgb(color.rgb.r, color.rgb.g, color.rgb.b)
}

impl SimulationConfig {
    pub fn responsive() -> Self {
        Self {
            color: palette_linear(&PALETTE.mocha.colors.sky),
            count: DEFAULT_PARTICLE_COUNT,
            size: DEFAULT_PARTICLE_SIZE,
            boundary: DEFAULT_BOUNDARY,
            viscosity: DEFAULT_VISCOSITY,
            behavior: BehaviorKind::Responsive,
            geometry: GeometryKind::Blob,
            tunables: Tunables::default(),
            seed: None,
        }
    }

    pub fn cohesive() -> Self {
        Self {
            color: palette_linear(&PALETTE.mocha.colors.mauve),
            count: 1500,
            behavior: BehaviorKind::Cohesive,
            ..Self::responsive()
        }
    }

    pub fn needle_sphere() -> Self {
        Self {
            color: palette_linear(&PALETTE.mocha.colors.peach),
            count: 1200,
            size: 0.25,
            viscosity: 0.9,
            behavior: BehaviorKind::NeedleSphere,
            geometry: GeometryKind::Needle,
            ..Self::responsive()
        }
    }

    pub fn needle_swarm() -> Self {
        Self {
            color: palette_linear(&PALETTE.mocha.colors.green),
            count: 1200,
            size: 0.25,
            viscosity: 0.9,
            behavior: BehaviorKind::NeedleSwarm,
            geometry: GeometryKind::Needle,
            ..Self::responsive()
        }
    }

    /// The four reference instances, one per behavior
    pub fn reference_set() -> [Self; 4] {
        [
            Self::responsive(),
            Self::cohesive(),
            Self::needle_sphere(),
            Self::needle_swarm(),
        ]
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tunables(mut self, tunables: Tunables) -> Self {
        self.tunables = tunables;
        self
    }

    /// Rough radius of everything this instance will draw, for camera framing
    pub fn extent(&self) -> f32 {
        let t = &self.tunables;
        match self.behavior {
            BehaviorKind::Responsive | BehaviorKind::Cohesive => self.boundary * 3f32.sqrt(),
            BehaviorKind::NeedleSphere => {
                (t.base_radius() + IDLE_DRIVING_DISTANCE * t.radius_hand_scale())
                    * t.outer_radius_multiplier()
            }
            BehaviorKind::NeedleSwarm => t.swarm_radius() * t.swarm_outer_multiplier(),
        }
    }
}
