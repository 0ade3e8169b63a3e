use std::f32::consts::{PI, TAU};

use cosmos_core::TAIL_DISPERSION;
use rand::Rng;

/// Uniform scalar in [0, 1)
pub fn unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..1.0)
}

/// Uniform scalar in [-0.5, 0.5) scaled by `scale`
pub fn jitter(rng: &mut impl Rng, scale: f32) -> f32 {
    (unit(rng) - 0.5) * scale
}

/// Power-skewed scalar in [0, 1): exponents above 1 bunch toward 0, below 1 toward 1
pub fn skewed(rng: &mut impl Rng, exponent: f32) -> f32 {
    unit(rng).powf(exponent)
}

/// Cartesian point from a radius and spherical angles (`theta` azimuth, `phi` polar)
pub fn spherical(radius: f32, theta: f32, phi: f32) -> [f32; 3] {
    [
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    ]
}

/// Area-uniform spherical angles: `theta = U(0, 2π)`, `phi = acos(2U - 1)`
pub fn sphere_angles(rng: &mut impl Rng) -> (f32, f32) {
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * unit(rng) - 1.0).acos();
    (theta, phi)
}

/// Point in a ball with radius `max_radius * U^exponent`.
/// Returns the point and its radius.
pub fn ball_point(rng: &mut impl Rng, max_radius: f32, exponent: f32) -> ([f32; 3], f32) {
    let r = max_radius * skewed(rng, exponent);
    let (theta, phi) = sphere_angles(rng);
    (spherical(r, theta, phi), r)
}

/// Point in a spherical shell with radius `inner + U * thickness`
pub fn shell_point(rng: &mut impl Rng, inner: f32, thickness: f32) -> ([f32; 3], f32) {
    let r = inner + unit(rng) * thickness;
    let (theta, phi) = sphere_angles(rng);
    (spherical(r, theta, phi), r)
}

/// Area-uniform offset inside a disk of `radius`
pub fn disk_offset(rng: &mut impl Rng, radius: f32) -> [f32; 2] {
    let r = unit(rng).sqrt() * radius;
    let theta = rng.gen_range(0.0..TAU);
    [r * theta.cos(), r * theta.sin()]
}

/// Point of a flat ring in the XZ plane.
/// Radius is `inner + width * U^exponent`; `height` maps the radius to the
/// full height of the vertical jitter.
pub fn ring_point(
    rng: &mut impl Rng,
    inner: f32,
    width: f32,
    exponent: f32,
    height: impl Fn(f32) -> f32,
) -> ([f32; 3], f32) {
    let angle = rng.gen_range(0.0..TAU);
    let r = inner + width * skewed(rng, exponent);
    let y = jitter(rng, height(r));
    ([angle.cos() * r, y, angle.sin() * r], r)
}

/// Evenly spaced points on a circle in the XZ plane
pub fn circle_points(count: usize, radius: f32) -> impl Iterator<Item = [f32; 3]> {
    (0..count).map(move |i| {
        let a = i as f32 / count as f32 * TAU;
        [a.cos() * radius, 0.0, a.sin() * radius]
    })
}

/// Evenly spaced points on the segment from `a` to `b`, both ends included
pub fn segment_points(a: [f32; 3], b: [f32; 3], count: usize) -> impl Iterator<Item = [f32; 3]> {
    let last = count.saturating_sub(1).max(1) as f32;
    (0..count).map(move |i| {
        let t = i as f32 / last;
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ]
    })
}

/// Logarithmic-looking spiral arms in the XZ plane
#[derive(Debug, Clone, Copy)]
pub struct SpiralArms {
    pub arms: u32,
    /// Extra angle per unit of distance
    pub winding: f32,
    /// Horizontal scatter as a fraction of distance
    pub scatter: f32,
}

impl SpiralArms {
    /// Point on a random arm at `distance` from the center, height excluded
    pub fn sample(&self, rng: &mut impl Rng, distance: f32) -> [f32; 2] {
        let arm = rng.gen_range(0..self.arms.max(1));
        let base = arm as f32 / self.arms.max(1) as f32 * TAU;
        let angle = base + distance * self.winding;
        // one scatter for both axes smears the arm along the diagonal
        let scatter = jitter(rng, self.scatter * distance);
        [angle.cos() * distance + scatter, angle.sin() * distance + scatter]
    }
}

/// Lateral radius of the dust cone at `distance` down the tail
pub fn spread_at_distance(base_spread: f32, distance: f32) -> f32 {
    base_spread + distance * TAIL_DISPERSION
}

/// Point in the dust cone: `z` along the tail, `x`/`y` inside the widening disk
pub fn tail_point(rng: &mut impl Rng, tail_length: f32, base_spread: f32) -> [f32; 3] {
    let distance = unit(rng) * tail_length;
    let [x, y] = disk_offset(rng, spread_at_distance(base_spread, distance));
    [x, y, distance]
}

/// Approximate latitude and longitude in degrees for spherical angles
pub fn lat_lon(theta: f32, phi: f32) -> (f32, f32) {
    let lat = (phi / PI - 0.5) * 180.0;
    let lon = (theta / TAU - 0.5) * 360.0;
    (lat, lon)
}

/// Rectangular lat/lon region where land is accepted with a fixed probability
#[derive(Debug, Clone, Copy)]
pub struct Continent {
    pub name: &'static str,
    pub lon: (f32, f32),
    pub lat: (f32, f32),
    /// Probability that a sample inside the box becomes land
    pub accept: f32,
}

impl Continent {
    pub fn contains(&self, lat: f32, lon: f32) -> bool {
        lon > self.lon.0 && lon < self.lon.1 && lat > self.lat.0 && lat < self.lat.1
    }
}

pub const CONTINENTS: [Continent; 5] = [
    Continent { name: "North America", lon: (-170.0, -50.0), lat: (15.0, 70.0), accept: 0.6 },
    Continent { name: "South America", lon: (-80.0, -35.0), lat: (-55.0, 15.0), accept: 0.5 },
    Continent { name: "Europe and Africa", lon: (-20.0, 60.0), lat: (-35.0, 70.0), accept: 0.55 },
    Continent { name: "Asia", lon: (60.0, 150.0), lat: (0.0, 75.0), accept: 0.65 },
    Continent { name: "Australia", lon: (110.0, 155.0), lat: (-45.0, -10.0), accept: 0.5 },
];

/// Roll for land at a lat/lon. Every box that contains the point rolls
/// again and the last roll wins.
pub fn land_roll(rng: &mut impl Rng, continents: &[Continent], lat: f32, lon: f32) -> bool {
    let mut land = false;
    for continent in continents {
        if continent.contains(lat, lon) {
            land = unit(rng) < continent.accept;
        }
    }
    land
}
