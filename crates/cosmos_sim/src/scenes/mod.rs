pub mod background;
pub mod black_hole;
pub mod earth_moon;
pub mod galaxy_collision;
pub mod halley_comet;
pub mod helix_nebula;
pub mod orion;
pub mod solar_system;

pub use background::Background;
pub use black_hole::BlackHole;
pub use earth_moon::EarthMoon;
pub use galaxy_collision::GalaxyCollision;
pub use halley_comet::HalleyComet;
pub use helix_nebula::HelixNebula;
pub use orion::OrionConstellation;
pub use solar_system::SolarSystem;

use cosmos_core::{ParticleBuffer, Rgb};

/// Buffer of `count` particles built from a per-index sampler
pub(crate) fn fill(count: usize, mut sample: impl FnMut(usize) -> ([f32; 3], Rgb)) -> ParticleBuffer {
    let mut buf = ParticleBuffer::new(count);
    for i in 0..count {
        let (p, c) = sample(i);
        buf.set_position(i, p);
        buf.set_color(i, c);
    }
    buf
}

/// Like [`fill`], with `stride` random scalars per particle written by the sampler
pub(crate) fn fill_with_randoms(
    count: usize,
    stride: usize,
    mut sample: impl FnMut(usize, &mut [f32]) -> ([f32; 3], Rgb),
) -> ParticleBuffer {
    let mut buf = ParticleBuffer::with_randoms(count, stride);
    let mut scratch = vec![0.0; stride];
    for i in 0..count {
        let (p, c) = sample(i, &mut scratch);
        buf.set_position(i, p);
        buf.set_color(i, c);
        buf.set_random(i, &scratch);
    }
    buf
}

/// Share of the global particle count, rounded down
pub(crate) fn share(particle_count: u32, fraction: f32) -> usize {
    (particle_count as f32 * fraction).floor() as usize
}
