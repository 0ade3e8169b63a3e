use cosmos_core::{Pose, RenderParams, Rgb, SceneId, SceneSettings, lerp_rgb, rgb8, scale_rgb};
use cosmos_physics::motion::{tidal_pull, wander};
use cosmos_physics::sampling::{SpiralArms, ball_point, jitter, skewed, unit};

use super::{fill, fill_with_randoms, share};
use crate::clock::FrameTime;
use crate::scene::{MotionState, Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

struct Galaxy {
    name: &'static str,
    start: [f32; 3],
    tilt: [f32; 3],
    inner: Rgb,
    outer: Rgb,
    /// +1 approaches from the left, -1 from the right
    direction: f32,
}

const GALAXIES: [Galaxy; 2] = [
    Galaxy {
        name: "Milky Way",
        start: [-28.0, 0.0, 0.0],
        tilt: [0.3, 0.0, 0.2],
        inner: rgb8(0xff, 0xfa, 0xcd),
        outer: rgb8(0x4a, 0x9e, 0xff),
        direction: 1.0,
    },
    Galaxy {
        name: "Andromeda",
        start: [28.0, 5.0, 12.0],
        tilt: [-0.2, 0.0, -0.3],
        inner: rgb8(0xff, 0xd7, 0x00),
        outer: rgb8(0xff, 0x6b, 0x6b),
        direction: -1.0,
    },
];

const ARMS: SpiralArms = SpiralArms {
    arms: 4,
    winding: 0.4,
    scatter: 0.25,
};

const CORE_RADIUS: f32 = 3.0;
const DEBRIS_BOUND: f32 = 50.0;
/// Collision factor above which arms start to deform
const TIDAL_ONSET: f32 = 0.2;

const DEBRIS: usize = 4;
const STAR_FORMATION: usize = 5;

/// Core and arms of galaxy `g` sit at `2g` and `2g + 1`
fn core_index(g: usize) -> usize {
    g * 2
}

fn arms_index(g: usize) -> usize {
    g * 2 + 1
}

/// Two spiral galaxies approaching each other, with debris and star formation
pub struct GalaxyCollision {
    structures: Vec<SubStructure>,
    labels: [SceneLabel; 2],
    spin: [f32; 2],
}

fn debris_spawn(rng: &mut SceneRng) -> [f32; 3] {
    [jitter(rng, 15.0), jitter(rng, 8.0), jitter(rng, 15.0)]
}

impl GalaxyCollision {
    fn galaxy(galaxy: &Galaxy, count: usize, rng: &mut SceneRng) -> [SubStructure; 2] {
        let core_count = (count as f32 * 0.2).floor() as usize;
        let core = fill(core_count, |_| {
            let ([x, y, z], r) = ball_point(rng, CORE_RADIUS, 2.0);
            let b = 1.0 - r / CORE_RADIUS;
            let c = scale_rgb(galaxy.inner, b);
            ([x, y * 0.3, z], [c[0] + 0.3, c[1] + 0.2, c[2]])
        });
        let arms = fill(count - core_count, |_| {
            let distance = 3.0 + skewed(rng, 0.6) * 18.0;
            let [x, z] = ARMS.sample(rng, distance);
            let height = jitter(rng, 1.5 / (distance * 0.1 + 1.0));
            let mixed = lerp_rgb(galaxy.inner, galaxy.outer, distance / 21.0);
            ([x, height, z], scale_rgb(mixed, 0.6 + unit(rng) * 0.4))
        });
        let pose = Pose {
            translation: galaxy.start,
            rotation: galaxy.tilt,
            scale: 1.0,
        };
        [
            SubStructure::new("galaxy core", core, RenderParams::points(4.0)).with_pose(pose),
            SubStructure::anchored("galaxy arms", arms, RenderParams::points(2.5).with_opacity(0.9))
                .with_pose(pose),
        ]
    }
}

impl Scene for GalaxyCollision {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let per_galaxy = share(settings.particle_count, 0.3);
        let mut structures = Vec::with_capacity(6);
        for galaxy in &GALAXIES {
            structures.extend(Self::galaxy(galaxy, per_galaxy, rng));
        }

        let debris = fill_with_randoms(share(settings.particle_count, 0.15), 3, |_, v| {
            for k in v.iter_mut() {
                *k = jitter(rng, 0.08);
            }
            (debris_spawn(rng), [1.0, 0.6 + unit(rng) * 0.3, 0.3])
        });
        structures.push(SubStructure::new("debris", debris, RenderParams::points(2.0).with_opacity(0.7)));

        let forming = fill_with_randoms(500, 1, |_, b| {
            b[0] = unit(rng);
            let p = [jitter(rng, 25.0), jitter(rng, 6.0), jitter(rng, 25.0)];
            (p, [1.0, 0.4 + unit(rng) * 0.3, 0.6 + unit(rng) * 0.4])
        });
        structures.push(SubStructure::new(
            "star formation",
            forming,
            RenderParams::points(3.0).with_opacity(0.6),
        ));

        Self {
            structures,
            labels: [
                SceneLabel::above(GALAXIES[0].name, core_index(0), 10.0),
                SceneLabel::above(GALAXIES[1].name, core_index(1), 10.0),
            ],
            spin: [0.0; 2],
        }
    }

    fn id(&self) -> SceneId {
        SceneId::GalaxyCollision
    }

    fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    fn labels(&self) -> &[SceneLabel] {
        &self.labels
    }

    fn update(&mut self, time: FrameTime, settings: &SceneSettings, rng: &mut SceneRng) {
        let speed = settings.animation_speed;
        let tau = time.elapsed * settings.collision_speed() * 0.08;
        let collision = (tau * 0.4).min(1.0);

        for (g, galaxy) in GALAXIES.iter().enumerate() {
            self.spin[g] += (0.001 + collision * 0.003) * speed * galaxy.direction;
            let translation = [
                galaxy.start[0] * (1.0 - collision * 0.75),
                galaxy.start[1],
                galaxy.start[2] + (tau * 0.5).sin() * 3.0 * galaxy.direction,
            ];
            let rotation = [galaxy.tilt[0], galaxy.tilt[1] + self.spin[g], galaxy.tilt[2]];
            for i in [core_index(g), arms_index(g)] {
                let pose = &mut self.structures[i].pose;
                pose.translation = translation;
                pose.rotation = rotation;
            }

            if collision > TIDAL_ONSET {
                if let Some((live, original)) = self.structures[arms_index(g)].anchored_mut() {
                    tidal_pull(live.positions_mut(), original.as_slice(), collision, galaxy.direction);
                    live.mark_positions_dirty();
                }
            }
        }

        let debris = &mut self.structures[DEBRIS].particles;
        let (live, velocities) = debris.positions_and_randoms_mut();
        wander(live, velocities, speed, DEBRIS_BOUND, rng, debris_spawn);
        debris.mark_positions_dirty();

        let t = time.scaled(speed);
        let glow = settings.glow_intensity;
        let forming = &mut self.structures[STAR_FORMATION].particles;
        for i in 0..forming.len() {
            let b = forming.random(i)[0];
            let pulse = 0.5 + (t * 3.0 + b * 10.0).sin() * 0.5;
            let intensity = pulse * glow;
            forming.set_color(i, [intensity, 0.3 * intensity + 0.2, 0.8 * intensity]);
        }
        forming.mark_colors_dirty();
    }

    fn motion_state(&self) -> MotionState {
        MotionState {
            angles: self.spin.to_vec(),
            progress: None,
        }
    }

    fn resume(&mut self, state: &MotionState, _time: FrameTime, _settings: &SceneSettings) {
        for (g, &spin) in state.angles.iter().take(GALAXIES.len()).enumerate() {
            self.spin[g] = spin;
            for i in [core_index(g), arms_index(g)] {
                self.structures[i].pose.rotation[1] = GALAXIES[g].tilt[1] + spin;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run(settings: &SceneSettings, seconds: f32) -> GalaxyCollision {
        let mut rng = SceneRng::seed_from_u64(51);
        let mut scene = GalaxyCollision::generate(settings, &mut rng);
        let frames = (seconds * 60.0) as u64;
        for frame in 1..=frames {
            scene.update(FrameTime { elapsed: frame as f32 / 60.0, frame }, settings, &mut rng);
        }
        scene
    }

    #[test]
    fn galaxy_budget_splits_core_and_arms() {
        let mut settings = SceneSettings::preset(SceneId::GalaxyCollision);
        settings.particle_count = 10000;
        let scene = GalaxyCollision::generate(&settings, &mut SceneRng::seed_from_u64(52));
        assert_eq!(scene.structures[core_index(0)].len(), 600);
        assert_eq!(scene.structures[arms_index(0)].len(), 2400);
        assert_eq!(scene.structures[DEBRIS].len(), 1500);
        assert_eq!(scene.structures[STAR_FORMATION].len(), 500);
    }

    #[test]
    fn galaxies_approach_each_other() {
        let settings = SceneSettings::preset(SceneId::GalaxyCollision);
        let scene = run(&settings, 10.0);
        let a = scene.structures[core_index(0)].pose.translation[0];
        let b = scene.structures[core_index(1)].pose.translation[0];
        assert!(a > -28.0 && b < 28.0, "galaxies at {} and {}", a, b);
    }

    #[test]
    fn arms_stay_put_before_tidal_onset() {
        let settings = SceneSettings::preset(SceneId::GalaxyCollision);
        // tau = 1 * 0.08 * 1 s, collision = 0.032
        let scene = run(&settings, 1.0);
        let arms = &scene.structures[arms_index(0)];
        let Some(original) = arms.original() else {
            panic!("arms have no snapshot");
        };
        assert_eq!(arms.particles.positions(), original.as_slice());
    }

    #[test]
    fn debris_stays_bounded() {
        let mut settings = SceneSettings::preset(SceneId::GalaxyCollision);
        settings.animation_speed = 3.0;
        let scene = run(&settings, 20.0);
        let debris = &scene.structures[DEBRIS].particles;
        for i in 0..debris.len() {
            let p = debris.position(i);
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!(r <= DEBRIS_BOUND, "debris at {}", r);
        }
    }
}
