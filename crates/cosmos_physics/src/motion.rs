//! Per-frame update kernels over flat position/color slices.
//!
//! Every kernel is O(n) in the slice length and allocation-free. Kernels that
//! take an `original` slice read formation positions from it and write into
//! `live`; both must have the same length.

use cosmos_core::MIN_RADIUS;
use rand::Rng;

use crate::sampling::disk_offset;

/// Angular speed of a disk particle at `radius` under differential rotation
pub fn angular_rate(radius: f32, rate: f32) -> f32 {
    rate / radius.max(MIN_RADIUS).sqrt()
}

/// Differential rotation in the XZ plane around the origin.
/// Each particle's angle advances by `t * rate / sqrt(r)` from its original
/// angle; inner particles orbit faster. Heights are left untouched.
pub fn orbital_shear(live: &mut [f32], original: &[f32], t: f32, rate: f32) {
    for (p, o) in live.chunks_exact_mut(3).zip(original.chunks_exact(3)) {
        let (x, z) = (o[0], o[2]);
        let radius = (x * x + z * z).sqrt();
        let angle = z.atan2(x) + t * angular_rate(radius, rate);
        p[0] = angle.cos() * radius;
        p[2] = angle.sin() * radius;
    }
}

/// Scale every particle about the origin by `1 + sin(rate * t + r0) * amplitude`,
/// where `r0` is the particle's original distance from the origin
pub fn radial_pulse(live: &mut [f32], original: &[f32], t: f32, rate: f32, amplitude: f32) {
    for (p, o) in live.chunks_exact_mut(3).zip(original.chunks_exact(3)) {
        let r0 = (o[0] * o[0] + o[1] * o[1] + o[2] * o[2]).sqrt();
        let k = 1.0 + (rate * t + r0).sin() * amplitude;
        p[0] = o[0] * k;
        p[1] = o[1] * k;
        p[2] = o[2] * k;
    }
}

/// Uniform scale factor `1 + sin(t * rate) * amplitude` for a whole structure
pub fn pulse_factor(t: f32, rate: f32, amplitude: f32) -> f32 {
    1.0 + (t * rate).sin() * amplitude
}

/// Stretch a body toward `direction` as it falls in.
/// `x`/`z` grow along the direction by `stretch * progress`, `y` flattens.
pub fn tidal_stretch(live: &mut [f32], original: &[f32], direction: [f32; 3], progress: f32) {
    let stretch = 1.0 + 3.0 * progress;
    let k = stretch * progress;
    for (p, o) in live.chunks_exact_mut(3).zip(original.chunks_exact(3)) {
        p[0] = o[0] + direction[0] * o[0] * k;
        p[1] = o[1] * (1.0 - 0.5 * progress);
        p[2] = o[2] + direction[2] * o[2] * k;
    }
}

/// Outward pull on galaxy arm particles during an approach.
/// Leading-edge particles (`x * direction > 0`) are pulled three times harder
/// than trailing ones; the pull grows with distance from the galaxy center.
pub fn tidal_pull(live: &mut [f32], original: &[f32], collision: f32, direction: f32) {
    for (p, o) in live.chunks_exact_mut(3).zip(original.chunks_exact(3)) {
        let (x, z) = (o[0], o[2]);
        let dist = (x * x + z * z).sqrt();
        let edge = if x * direction > 0.0 { 1.5 } else { 0.5 };
        let pull = collision * 0.015 * edge * (dist / 20.0);
        p[0] = x + pull * direction * 10.0;
    }
}

/// Move particles along Y away from the origin at per-particle `speeds`.
/// Particles past `bound` restart at `restart` on the same side.
pub fn eject(live: &mut [f32], speeds: &[f32], step: f32, bound: f32, restart: f32) {
    for (p, speed) in live.chunks_exact_mut(3).zip(speeds) {
        let sign = if p[1] > 0.0 { 1.0 } else { -1.0 };
        p[1] += sign * speed * step;
        if p[1].abs() > bound {
            p[1] = sign * restart;
        }
    }
}

/// Comet dust drift along +Z with lateral dispersion.
///
/// `drift` holds three scalars per particle in [-0.5, 0.5]. Particles that pass
/// `tail_length` return to `z = 0` at a fresh point of the emission disk of
/// radius `base_spread`.
pub fn drift_and_recycle(
    live: &mut [f32],
    drift: &[f32],
    speed: f32,
    tail_length: f32,
    base_spread: f32,
    rng: &mut impl Rng,
) {
    for (p, d) in live.chunks_exact_mut(3).zip(drift.chunks_exact(3)) {
        p[2] += (1.0 + d[2] * 0.5) * speed * 0.3;
        p[0] += d[0] * 0.06 * speed;
        p[1] += d[1] * 0.06 * speed;
        if p[2] > tail_length {
            let [x, y] = disk_offset(rng, base_spread);
            p[0] = x;
            p[1] = y;
            p[2] = 0.0;
        }
    }
}

/// Straight-line drift with per-particle velocities (three per particle).
/// Particles farther than `bound` from the origin are handed to `respawn`.
pub fn wander<R: Rng>(
    live: &mut [f32],
    velocities: &[f32],
    step: f32,
    bound: f32,
    rng: &mut R,
    mut respawn: impl FnMut(&mut R) -> [f32; 3],
) {
    let bound_sq = bound * bound;
    for (p, v) in live.chunks_exact_mut(3).zip(velocities.chunks_exact(3)) {
        p[0] += v[0] * step;
        p[1] += v[1] * step;
        p[2] += v[2] * step;
        if p[0] * p[0] + p[1] * p[1] + p[2] * p[2] > bound_sq {
            p.copy_from_slice(&respawn(rng));
        }
    }
}

/// Hermite smoothstep; edges may be given in either order
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn angle_of(p: &[f32]) -> f32 {
        p[2].atan2(p[0])
    }

    fn wrap(a: f32) -> f32 {
        let tau = std::f32::consts::TAU;
        ((a % tau) + tau) % tau
    }

    #[test]
    fn inner_particles_orbit_faster() {
        let original = [4.0, 0.0, 0.0, 16.0, 0.0, 0.0];
        let mut live = original;
        for t in [0.1, 0.5, 1.0, 2.0] {
            orbital_shear(&mut live, &original, t, 0.5);
            let inner = wrap(angle_of(&live[0..3]));
            let outer = wrap(angle_of(&live[3..6]));
            assert!(inner > outer, "t={} inner {} outer {}", t, inner, outer);
        }
    }

    #[test]
    fn doubling_the_rate_doubles_the_angle() {
        let original = [9.0, 0.0, 0.0];
        let mut once = original;
        let mut twice = original;
        orbital_shear(&mut once, &original, 1.0, 0.5);
        orbital_shear(&mut twice, &original, 1.0, 1.0);
        let a1 = angle_of(&once);
        let a2 = angle_of(&twice);
        assert!((a2 - 2.0 * a1).abs() < 1e-5, "{} vs 2 * {}", a2, a1);
    }

    #[test]
    fn shear_at_the_center_stays_finite() {
        let original = [0.0; 6];
        let mut live = [1.0; 6];
        orbital_shear(&mut live, &original, 3.0, 0.5);
        assert!(live.iter().all(|v| v.is_finite()));
        assert!(angular_rate(0.0, 1.0).is_finite());
    }

    #[test]
    fn shear_preserves_radius_and_height() {
        let original = [3.0, 0.7, 4.0];
        let mut live = original;
        orbital_shear(&mut live, &original, 2.5, 0.5);
        let r = (live[0] * live[0] + live[2] * live[2]).sqrt();
        assert!((r - 5.0).abs() < 1e-4);
        assert_eq!(live[1], 0.7);
    }

    #[test]
    fn ejected_particles_restart_on_their_side() {
        let mut live = [0.0, 44.9, 0.0, 0.0, -44.9, 0.0, 0.0, 10.0, 0.0];
        let speeds = [0.5, 0.5, 0.3];
        eject(&mut live, &speeds, 1.0, 45.0, 4.0);
        assert_eq!(live[1], 4.0);
        assert_eq!(live[4], -4.0);
        assert!((live[7] - 10.3).abs() < 1e-5);
    }

    #[test]
    fn dust_never_lingers_past_the_tail() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tail = 50.0;
        let spread = 0.4;
        let count = 500;
        let mut live = vec![0.0; count * 3];
        let mut drift = vec![0.0; count * 3];
        for i in 0..count {
            live[i * 3 + 2] = rng.gen_range(0.0..tail);
            for k in 0..3 {
                drift[i * 3 + k] = rng.gen_range(-0.5..0.5);
            }
        }
        let speed = 2.0;
        let max_step = 1.25 * speed * 0.3;
        for _ in 0..400 {
            let before: Vec<f32> = live.chunks_exact(3).map(|p| p[2]).collect();
            drift_and_recycle(&mut live, &drift, speed, tail, spread, &mut rng);
            for (i, p) in live.chunks_exact(3).enumerate() {
                assert!(p[2] <= tail + max_step, "particle {} at z={}", i, p[2]);
                if before[i] + max_step > tail && p[2] < before[i] {
                    assert_eq!(p[2], 0.0);
                    assert!((p[0] * p[0] + p[1] * p[1]).sqrt() <= spread + 1e-5);
                }
            }
        }
    }

    #[test]
    fn wandering_particles_respawn_inside_the_box() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut live = [49.9, 0.0, 0.0];
        let velocities = [0.5, 0.0, 0.0];
        wander(&mut live, &velocities, 1.0, 50.0, &mut rng, |_| [1.0, 2.0, 3.0]);
        assert_eq!(live, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn tidal_pull_favours_the_leading_edge() {
        let original = [10.0, 0.0, 0.0, -10.0, 0.0, 0.0];
        let mut live = original;
        tidal_pull(&mut live, &original, 1.0, 1.0);
        let lead = live[0] - original[0];
        let trail = live[3] - original[3];
        assert!((lead - 3.0 * trail).abs() < 1e-5, "lead {} trail {}", lead, trail);
    }

    #[test]
    fn smoothstep_handles_reversed_edges() {
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(1.0, 0.4, 1.0), 0.0);
        assert_eq!(smoothstep(1.0, 0.4, 0.2), 1.0);
    }
}
