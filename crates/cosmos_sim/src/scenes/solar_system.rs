use std::f32::consts::{FRAC_PI_4, TAU};

use cosmos_core::{
    ParticleBuffer, Pose, RenderParams, Rgb, SceneId, SceneSettings, SettingField, rgb8, scale_rgb,
};
use cosmos_physics::motion::radial_pulse;
use cosmos_physics::sampling::{ball_point, circle_points, jitter, shell_point, unit};
use cosmos_physics::{OrbitAccumulator, TrailRing};

use super::{fill, share};
use crate::clock::FrameTime;
use crate::scene::{MotionState, Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

struct Planet {
    name: &'static str,
    particles: usize,
    distance: f32,
    color: Rgb,
    speed: f32,
    size: f32,
    rings: bool,
}

const PLANETS: [Planet; 8] = [
    Planet { name: "Mercury", particles: 200, distance: 6.0, color: rgb8(0xb5, 0xb5, 0xb5), speed: 4.15, size: 0.4, rings: false },
    Planet { name: "Venus", particles: 300, distance: 9.0, color: rgb8(0xe6, 0xc8, 0x7a), speed: 1.62, size: 0.6, rings: false },
    Planet { name: "Earth", particles: 400, distance: 12.0, color: rgb8(0x4a, 0x9e, 0xff), speed: 1.0, size: 0.65, rings: false },
    Planet { name: "Mars", particles: 280, distance: 16.0, color: rgb8(0xcd, 0x5c, 0x5c), speed: 0.53, size: 0.5, rings: false },
    Planet { name: "Jupiter", particles: 800, distance: 24.0, color: rgb8(0xd4, 0xa5, 0x74), speed: 0.084, size: 1.8, rings: false },
    Planet { name: "Saturn", particles: 700, distance: 32.0, color: rgb8(0xf4, 0xd5, 0x9e), speed: 0.034, size: 1.5, rings: true },
    Planet { name: "Uranus", particles: 500, distance: 40.0, color: rgb8(0xb5, 0xe3, 0xe3), speed: 0.012, size: 1.0, rings: false },
    Planet { name: "Neptune", particles: 500, distance: 48.0, color: rgb8(0x41, 0x69, 0xe1), speed: 0.006, size: 0.95, rings: false },
];

const SUN_CORE_PARTICLES: usize = 3000;
const SUN_CORONA_PARTICLES: usize = 2000;
const SUN_RADIUS: f32 = 2.5;
const ORBIT_RING_POINTS: usize = 200;
const SATURN_RING_PARTICLES: usize = 800;
const TRAIL_COLOR: Rgb = rgb8(0x4a, 0x9e, 0xff);

const SUN_CORE: usize = 0;
const SUN_CORONA: usize = 1;
const ORBIT_RINGS: usize = 2;
const FIRST_PLANET: usize = 3;
const SATURN_RINGS: usize = FIRST_PLANET + PLANETS.len();
const FIRST_TRAIL: usize = SATURN_RINGS + 1;
const ASTEROIDS: usize = FIRST_TRAIL + PLANETS.len();

/// The Sun, eight planets on helical orbits with trails, and the asteroid belt
pub struct SolarSystem {
    structures: Vec<SubStructure>,
    labels: Vec<SceneLabel>,
    orbits: [OrbitAccumulator; 8],
    trails: [TrailRing; 8],
    inclination: f32,
}

impl SolarSystem {
    fn sun_core(rng: &mut SceneRng) -> SubStructure {
        let particles = fill(SUN_CORE_PARTICLES, |_| {
            let (p, r) = ball_point(rng, SUN_RADIUS, 1.0);
            let heat = 1.0 - r / SUN_RADIUS;
            (p, [1.0, 0.6 + heat * 0.4, heat * 0.3])
        });
        SubStructure::anchored("sun core", particles, RenderParams::points(4.0))
    }

    fn sun_corona(rng: &mut SceneRng) -> SubStructure {
        let particles = fill(SUN_CORONA_PARTICLES, |_| {
            let (p, r) = shell_point(rng, SUN_RADIUS, 2.0);
            let d = (r - SUN_RADIUS) / 2.0;
            (p, [1.0, 0.8 - d * 0.3, 0.2 - d * 0.2])
        });
        SubStructure::new("sun corona", particles, RenderParams::points(3.0).with_opacity(0.6))
    }

    fn orbit_rings() -> SubStructure {
        let mut particles = ParticleBuffer::new(PLANETS.len() * ORBIT_RING_POINTS);
        let points = PLANETS
            .iter()
            .flat_map(|planet| circle_points(ORBIT_RING_POINTS, planet.distance));
        for (i, p) in points.enumerate() {
            particles.set_position(i, p);
        }
        particles.fill_color(TRAIL_COLOR);
        let render = RenderParams::points(1.0).fixed(0.5).flat().with_opacity(0.2);
        SubStructure::new("orbit rings", particles, render)
    }

    fn planet(planet: &Planet, rng: &mut SceneRng) -> SubStructure {
        let particles = fill(planet.particles, |_| {
            let (p, _) = ball_point(rng, planet.size, 1.0);
            (p, scale_rgb(planet.color, 0.8 + unit(rng) * 0.4))
        });
        SubStructure::new(planet.name, particles, RenderParams::points(2.0).with_opacity(0.95))
    }

    fn saturn_rings(size: f32, rng: &mut SceneRng) -> SubStructure {
        let particles = fill(SATURN_RING_PARTICLES, |_| {
            let angle = unit(rng) * TAU;
            let r = size * 1.5 + unit(rng) * size * 1.2;
            let p = [angle.cos() * r, jitter(rng, 0.1), angle.sin() * r];
            let c = [0.8 + unit(rng) * 0.2, 0.7 + unit(rng) * 0.2, 0.5 + unit(rng) * 0.2];
            (p, c)
        });
        SubStructure::new("saturn rings", particles, RenderParams::points(1.5).with_opacity(0.8))
    }

    fn asteroid_belt(count: usize, rng: &mut SceneRng) -> SubStructure {
        let particles = fill(count, |_| {
            let angle = unit(rng) * TAU;
            let distance = 18.0 + unit(rng) * 4.0;
            let p = [angle.cos() * distance, jitter(rng, 1.5), angle.sin() * distance];
            let b = 0.5 + unit(rng) * 0.5;
            (p, [b, b * 0.9, b * 0.7])
        });
        SubStructure::new("asteroid belt", particles, RenderParams::points(1.5).with_opacity(0.9))
    }

    fn planet_position(index: usize, angle: f32, t: f32, helix: f32) -> [f32; 3] {
        let planet = &PLANETS[index];
        [
            angle.cos() * planet.distance,
            (t * 0.5 + index as f32).sin() * helix,
            angle.sin() * planet.distance,
        ]
    }
}

impl Scene for SolarSystem {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let mut structures = vec![Self::sun_core(rng), Self::sun_corona(rng), Self::orbit_rings()];
        structures[ORBIT_RINGS].visible = settings.show_orbits;

        let orbits: [OrbitAccumulator; 8] =
            std::array::from_fn(|i| OrbitAccumulator::new(i as f32 * TAU / PLANETS.len() as f32));
        let helix = settings.helix_amplitude();

        for (i, planet) in PLANETS.iter().enumerate() {
            let start = Self::planet_position(i, orbits[i].angle(), 0.0, helix);
            structures.push(Self::planet(planet, rng).with_pose(Pose::at(start)));
        }

        let saturn = PLANETS.iter().position(|p| p.rings).unwrap_or(5);
        let ring_pose = Pose {
            rotation: [FRAC_PI_4, 0.0, 0.0],
            ..structures[FIRST_PLANET + saturn].pose
        };
        structures.push(Self::saturn_rings(PLANETS[saturn].size, rng).with_pose(ring_pose));

        let trail_len = settings.trail_length as usize;
        let trails = [TrailRing::new(trail_len); 8];
        for i in 0..PLANETS.len() {
            let mut particles = ParticleBuffer::new(trail_len);
            let start = structures[FIRST_PLANET + i].pose.translation;
            for k in 0..trail_len {
                particles.set_position(k, start);
            }
            particles.fill_color(TRAIL_COLOR);
            let render = RenderParams::points(1.0).with_opacity(0.4);
            structures.push(SubStructure::new("trail", particles, render));
        }

        structures.push(Self::asteroid_belt(share(settings.particle_count, 0.2), rng));

        let mut labels = vec![SceneLabel::fixed("Sun", [0.0, 5.0, 0.0])];
        labels.extend(
            PLANETS
                .iter()
                .enumerate()
                .map(|(i, p)| SceneLabel::above(p.name, FIRST_PLANET + i, p.size + 1.5)),
        );

        Self {
            structures,
            labels,
            orbits,
            trails,
            inclination: settings.orbit_inclination(),
        }
    }

    fn id(&self) -> SceneId {
        SceneId::SolarSystem
    }

    fn root(&self) -> Pose {
        Pose::rotated([self.inclination, 0.0, 0.0])
    }

    fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    fn labels(&self) -> &[SceneLabel] {
        &self.labels
    }

    fn update(&mut self, time: FrameTime, settings: &SceneSettings, _rng: &mut SceneRng) {
        let speed = settings.animation_speed;
        let t = time.scaled(speed);
        self.inclination = settings.orbit_inclination();

        let core = &mut self.structures[SUN_CORE];
        core.pose.rotation[1] = t * 0.1;
        if let Some((live, original)) = core.anchored_mut() {
            radial_pulse(live.positions_mut(), original.as_slice(), t, 3.0, 0.05 * settings.glow_intensity);
            live.mark_positions_dirty();
        }
        self.structures[SUN_CORONA].pose.rotation[1] = -t * 0.05;
        self.structures[ORBIT_RINGS].visible = settings.show_orbits;

        let helix = settings.helix_amplitude();
        for (i, planet) in PLANETS.iter().enumerate() {
            let angle = self.orbits[i].advance(planet.speed * 0.008 * speed);
            let position = Self::planet_position(i, angle, t, helix);

            let body = &mut self.structures[FIRST_PLANET + i];
            body.pose.translation = position;
            body.pose.rotation[1] += 0.01 * speed;
            if planet.rings {
                self.structures[SATURN_RINGS].pose.translation = position;
            }

            let trail = &mut self.structures[FIRST_TRAIL + i].particles;
            if !trail.is_empty() {
                self.trails[i].push(trail.positions_mut(), position);
                trail.mark_positions_dirty();
            }
        }

        self.structures[ASTEROIDS].pose.rotation[1] += 0.0003 * speed;
    }

    fn baked_fields(&self) -> &'static [SettingField] {
        &[SettingField::ParticleCount, SettingField::TrailLength]
    }

    fn motion_state(&self) -> MotionState {
        MotionState {
            angles: self.orbits.iter().map(OrbitAccumulator::angle).collect(),
            progress: None,
        }
    }

    fn resume(&mut self, state: &MotionState, time: FrameTime, settings: &SceneSettings) {
        let t = time.scaled(settings.animation_speed);
        let helix = settings.helix_amplitude();
        for (i, &angle) in state.angles.iter().take(PLANETS.len()).enumerate() {
            self.orbits[i] = OrbitAccumulator::new(angle);
            let position = Self::planet_position(i, angle, t, helix);
            self.structures[FIRST_PLANET + i].pose.translation = position;
            if PLANETS[i].rings {
                self.structures[SATURN_RINGS].pose.translation = position;
            }
            // a fresh trail starts collapsed onto its planet
            let trail = &mut self.structures[FIRST_TRAIL + i].particles;
            for k in 0..trail.len() {
                trail.set_position(k, position);
            }
            trail.mark_positions_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn scene(settings: &SceneSettings) -> SolarSystem {
        SolarSystem::generate(settings, &mut SceneRng::seed_from_u64(21))
    }

    #[test]
    fn sun_core_and_planet_counts_are_fixed() {
        let mut settings = SceneSettings::preset(SceneId::SolarSystem);
        settings.particle_count = 8000;
        let s = scene(&settings);
        assert_eq!(s.structures[SUN_CORE].particles.positions().len(), 3000 * 3);
        for (i, planet) in PLANETS.iter().enumerate() {
            assert_eq!(s.structures[FIRST_PLANET + i].len(), planet.particles, "{}", planet.name);
        }
        assert_eq!(s.structures[FIRST_PLANET].len(), 200, "Mercury");
    }

    #[test]
    fn planet_counts_ignore_global_particle_count() {
        let mut small = SceneSettings::preset(SceneId::SolarSystem);
        small.particle_count = 2000;
        let mut large = small.clone();
        large.particle_count = 20000;
        let a = scene(&small);
        let b = scene(&large);
        for i in 0..PLANETS.len() {
            assert_eq!(a.structures[FIRST_PLANET + i].len(), b.structures[FIRST_PLANET + i].len());
        }
        assert_eq!(a.structures[ASTEROIDS].len(), 400);
        assert_eq!(b.structures[ASTEROIDS].len(), 4000);
    }

    #[test]
    fn trails_follow_their_planets() {
        let settings = SceneSettings::preset(SceneId::SolarSystem);
        let mut s = scene(&settings);
        let mut rng = SceneRng::seed_from_u64(0);
        let mut last = FrameTime::default();
        for frame in 1..=10 {
            last = FrameTime { elapsed: frame as f32 / 60.0, frame };
            s.update(last, &settings, &mut rng);
        }
        let earth = FIRST_PLANET + 2;
        let head = s.trails[2].newest_first().next().unwrap_or(0);
        let trail = &s.structures[FIRST_TRAIL + 2].particles;
        assert_eq!(trail.len(), settings.trail_length as usize);
        assert_eq!(trail.position(head), s.structures[earth].pose.translation);
        assert!(last.frame == 10);
    }

    #[test]
    fn orbit_rings_follow_the_toggle_without_reallocating() {
        let mut settings = SceneSettings::preset(SceneId::SolarSystem);
        let mut s = scene(&settings);
        let len = s.structures[ORBIT_RINGS].len();
        settings.show_orbits = false;
        s.update(FrameTime::default(), &settings, &mut SceneRng::seed_from_u64(0));
        assert!(!s.structures[ORBIT_RINGS].visible);
        assert_eq!(s.structures[ORBIT_RINGS].len(), len);
    }

    #[test]
    fn resume_places_planets_at_carried_angles() {
        let settings = SceneSettings::preset(SceneId::SolarSystem);
        let mut s = scene(&settings);
        let state = MotionState {
            angles: vec![2.0; PLANETS.len()],
            progress: None,
        };
        let now = FrameTime { elapsed: 1.0, frame: 60 };
        s.resume(&state, now, &settings);
        assert_eq!(s.motion_state(), state);
        let earth = FIRST_PLANET + 2;
        let t = now.scaled(settings.animation_speed);
        let expected = SolarSystem::planet_position(2, 2.0, t, settings.helix_amplitude());
        assert_eq!(s.structures[earth].pose.translation, expected);
        let trail = &s.structures[FIRST_TRAIL + 2].particles;
        assert_eq!(trail.position(0), expected);
    }

    #[test]
    fn zero_trail_length_is_allowed() {
        let mut settings = SceneSettings::preset(SceneId::SolarSystem);
        settings.trail_length = 0;
        let mut s = scene(&settings);
        s.update(FrameTime { elapsed: 0.1, frame: 1 }, &settings, &mut SceneRng::seed_from_u64(0));
        assert!(s.structures[FIRST_TRAIL].is_empty());
    }
}
