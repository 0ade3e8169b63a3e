// Scene units are arbitrary world units; time is in seconds of host frame time.

/// Smallest radius allowed in radius-dependent formulas (orbital shear, tidal pull)
pub const MIN_RADIUS: f32 = 1e-3;

/// Valid range of the global particle count
pub const PARTICLE_COUNT_RANGE: (u32, u32) = (2_000, 20_000);

/// Valid range of the per-particle visual size
pub const PARTICLE_SIZE_RANGE: (f32, f32) = (0.005, 0.08);

/// Valid range of the animation speed multiplier
pub const ANIMATION_SPEED_RANGE: (f32, f32) = (0.1, 3.0);

/// Valid range of the planet trail length (samples)
pub const TRAIL_LENGTH_RANGE: (u32, u32) = (0, 300);

pub const GLOW_INTENSITY_RANGE: (f32, f32) = (0.2, 3.0);
pub const CAMERA_DISTANCE_RANGE: (f32, f32) = (15.0, 250.0);
pub const HELIX_AMPLITUDE_RANGE: (f32, f32) = (0.0, 8.0);
pub const ORBIT_INCLINATION_RANGE: (f32, f32) = (0.0, 0.8);
pub const ATMOSPHERE_OPACITY_RANGE: (f32, f32) = (0.1, 1.0);
pub const STAR_DENSITY_RANGE: (f32, f32) = (0.3, 2.0);
pub const BLACK_HOLE_GRAVITY_RANGE: (f32, f32) = (0.3, 3.0);
pub const COLLISION_SPEED_RANGE: (f32, f32) = (0.2, 3.0);
pub const COMET_TAIL_LENGTH_RANGE: (f32, f32) = (20.0, 200.0);
pub const COMET_SPEED_RANGE: (f32, f32) = (0.1, 5.0);
pub const COMET_SIZE_RANGE: (f32, f32) = (0.5, 3.0);

// Defaults for the scene-specific settings, used whenever a field is absent.
pub const DEFAULT_HELIX_AMPLITUDE: f32 = 3.0;
pub const DEFAULT_ORBIT_INCLINATION: f32 = 0.3;
pub const DEFAULT_STAR_DENSITY: f32 = 1.0;
pub const DEFAULT_ATMOSPHERE_OPACITY: f32 = 0.5;
pub const DEFAULT_BLACK_HOLE_GRAVITY: f32 = 1.0;
pub const DEFAULT_COLLISION_SPEED: f32 = 1.0;
pub const DEFAULT_COMET_TAIL_LENGTH: f32 = 50.0;
pub const DEFAULT_COMET_SPEED: f32 = 1.0;
pub const DEFAULT_COMET_SIZE: f32 = 1.0;

/// Background stars per unit of star density
pub const BACKGROUND_STARS_PER_DENSITY: f32 = 12_000.0;

/// Lateral widening of the comet dust cone per unit of tail distance
pub const TAIL_DISPERSION: f32 = 0.25;
