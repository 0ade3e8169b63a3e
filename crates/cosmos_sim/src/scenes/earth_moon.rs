use std::f32::consts::TAU;

use cosmos_core::{ParticleBuffer, Pose, RenderParams, Rgb, SceneId, SceneSettings, rgb8};
use cosmos_physics::OrbitAccumulator;
use cosmos_physics::sampling::{
    CONTINENTS, ball_point, lat_lon, land_roll, shell_point, sphere_angles, spherical, unit,
};

use super::fill;
use crate::clock::FrameTime;
use crate::scene::{MotionState, Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

const EARTH_RADIUS: f32 = 5.0;
const LAND_RADIUS: f32 = 5.02;
const AXIAL_TILT: f32 = 0.41;
const MOON_DISTANCE: f32 = 12.0;
const ATMOSPHERE_COLOR: Rgb = rgb8(0x4a, 0x9e, 0xff);

const OCEAN: usize = 0;
const LAND: usize = 1;
const CLOUDS: usize = 2;
const ATMOSPHERE: usize = 3;
const MOON: usize = 4;
const MOON_ORBIT: usize = 5;

/// Earth with oceans, continents, clouds and atmosphere, and the orbiting Moon
pub struct EarthMoon {
    structures: Vec<SubStructure>,
    labels: [SceneLabel; 2],
    moon_orbit: OrbitAccumulator,
}

/// Point on the moon's orbit at `angle`
fn moon_path(angle: f32) -> [f32; 3] {
    [
        angle.cos() * MOON_DISTANCE,
        (angle * 0.5).sin() * 1.5,
        angle.sin() * MOON_DISTANCE,
    ]
}

fn terrain_color(rng: &mut SceneRng) -> Rgb {
    let terrain = unit(rng);
    if terrain > 0.7 {
        [0.85, 0.75, 0.5]
    } else if terrain > 0.3 {
        [0.15 + unit(rng) * 0.1, 0.4 + unit(rng) * 0.2, 0.15]
    } else {
        [0.4, 0.35, 0.3]
    }
}

impl EarthMoon {
    fn ocean(rng: &mut SceneRng) -> ParticleBuffer {
        fill(3000, |_| {
            let (theta, phi) = sphere_angles(rng);
            let depth = 0.5 + unit(rng) * 0.5;
            (spherical(EARTH_RADIUS, theta, phi), [0.1 * depth, 0.3 * depth, 0.8 * depth])
        })
    }

    /// Fixed-length land buffer; samples that miss every continent stay at the origin
    fn land(rng: &mut SceneRng) -> ParticleBuffer {
        fill(2000, |_| {
            let (theta, phi) = sphere_angles(rng);
            let (lat, lon) = lat_lon(theta, phi);
            if land_roll(rng, &CONTINENTS, lat, lon) {
                (spherical(LAND_RADIUS, theta, phi), terrain_color(rng))
            } else {
                ([0.0; 3], [0.0; 3])
            }
        })
    }

    fn moon(rng: &mut SceneRng) -> ParticleBuffer {
        fill(1500, |_| {
            let (p, _) = ball_point(rng, 1.5, 1.0);
            let c = if unit(rng) > 0.85 {
                [0.4, 0.4, 0.45]
            } else {
                let b = 0.65 + unit(rng) * 0.2;
                [b, b, b * 1.05]
            };
            (p, c)
        })
    }

    fn moon_orbit() -> ParticleBuffer {
        let count = 150;
        let mut buf = ParticleBuffer::new(count);
        for i in 0..count {
            buf.set_position(i, moon_path(i as f32 / count as f32 * TAU));
        }
        buf.fill_color(ATMOSPHERE_COLOR);
        buf
    }
}

impl Scene for EarthMoon {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let atmosphere_opacity = settings.atmosphere_opacity();

        let clouds = fill(800, |_| (shell_point(rng, 5.15, 0.1).0, [1.0; 3]));
        let atmosphere = fill(1500, |_| (shell_point(rng, 5.5, 0.5).0, ATMOSPHERE_COLOR));

        let mut structures = vec![
            SubStructure::new("ocean", Self::ocean(rng), RenderParams::points(3.0)),
            SubStructure::new("land", Self::land(rng), RenderParams::points(4.0))
                .with_pose(Pose::rotated([0.0, 0.0, AXIAL_TILT])),
            SubStructure::new(
                "clouds",
                clouds,
                RenderParams::points(3.0).with_opacity(atmosphere_opacity),
            ),
            SubStructure::new(
                "atmosphere",
                atmosphere,
                RenderParams::glow(2.0, atmosphere_opacity * 0.3),
            ),
            SubStructure::new("moon", Self::moon(rng), RenderParams::points(3.0))
                .with_pose(Pose::at(moon_path(0.0))),
            SubStructure::new(
                "moon orbit",
                Self::moon_orbit(),
                RenderParams::points(1.0).fixed(0.8).flat().with_opacity(0.3),
            ),
        ];
        structures[MOON_ORBIT].visible = settings.show_orbits;

        Self {
            structures,
            labels: [
                SceneLabel::fixed("Earth", [0.0, 7.0, 0.0]),
                SceneLabel::above("Moon", MOON, 2.5),
            ],
            moon_orbit: OrbitAccumulator::new(0.0),
        }
    }

    fn id(&self) -> SceneId {
        SceneId::EarthMoon
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
        let atmosphere_opacity = settings.atmosphere_opacity();

        self.structures[OCEAN].pose.rotation[1] = t * 0.1;
        self.structures[LAND].pose.rotation[1] = t * 0.1;
        let clouds = &mut self.structures[CLOUDS];
        clouds.pose.rotation[1] = t * 0.12;
        clouds.render.opacity = atmosphere_opacity;
        let atmosphere = &mut self.structures[ATMOSPHERE];
        atmosphere.pose.rotation[1] = t * 0.05;
        atmosphere.render.opacity = atmosphere_opacity * 0.3;

        let angle = self.moon_orbit.advance(0.003 * speed);
        let moon = &mut self.structures[MOON];
        moon.pose.translation = moon_path(angle);
        moon.pose.rotation[1] += 0.001 * speed;

        self.structures[MOON_ORBIT].visible = settings.show_orbits;
    }

    fn motion_state(&self) -> MotionState {
        MotionState {
            angles: vec![self.moon_orbit.angle()],
            progress: None,
        }
    }

    fn resume(&mut self, state: &MotionState, _time: FrameTime, _settings: &SceneSettings) {
        if let Some(&angle) = state.angles.first() {
            self.moon_orbit = OrbitAccumulator::new(angle);
            self.structures[MOON].pose.translation = moon_path(angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn land_keeps_its_length_with_rejects_at_origin() {
        let settings = SceneSettings::preset(SceneId::EarthMoon);
        let scene = EarthMoon::generate(&settings, &mut SceneRng::seed_from_u64(31));
        let land = &scene.structures[LAND].particles;
        assert_eq!(land.len(), 2000);
        let mut rejected = 0;
        for i in 0..land.len() {
            let p = land.position(i);
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            if r == 0.0 {
                rejected += 1;
            } else {
                assert!((r - LAND_RADIUS).abs() < 1e-3, "land point at radius {}", r);
            }
        }
        assert!(rejected > 0 && rejected < land.len(), "rejected {}", rejected);
    }

    #[test]
    fn moon_accumulates_along_its_orbit() {
        let settings = SceneSettings::preset(SceneId::EarthMoon);
        let mut rng = SceneRng::seed_from_u64(32);
        let mut scene = EarthMoon::generate(&settings, &mut rng);
        for frame in 1..=100 {
            scene.update(FrameTime { elapsed: frame as f32 / 60.0, frame }, &settings, &mut rng);
        }
        assert!((scene.moon_orbit.angle() - 0.3).abs() < 1e-4);
        let p = scene.structures[MOON].pose.translation;
        let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
        assert!((r - MOON_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn resumed_moon_picks_up_its_angle() {
        let settings = SceneSettings::preset(SceneId::EarthMoon);
        let mut rng = SceneRng::seed_from_u64(34);
        let mut scene = EarthMoon::generate(&settings, &mut rng);
        let state = MotionState { angles: vec![1.5], progress: None };
        scene.resume(&state, FrameTime::default(), &settings);
        assert_eq!(scene.structures[MOON].pose.translation, moon_path(1.5));
        scene.update(FrameTime { elapsed: 1.0 / 60.0, frame: 1 }, &settings, &mut rng);
        assert!((scene.moon_orbit.angle() - 1.503).abs() < 1e-4);
    }

    #[test]
    fn atmosphere_opacity_is_live() {
        let mut settings = SceneSettings::preset(SceneId::EarthMoon);
        let mut rng = SceneRng::seed_from_u64(33);
        let mut scene = EarthMoon::generate(&settings, &mut rng);
        settings.atmosphere_opacity = Some(1.0);
        scene.update(FrameTime::default(), &settings, &mut rng);
        assert_eq!(scene.structures[CLOUDS].render.opacity, 1.0);
        assert!((scene.structures[ATMOSPHERE].render.opacity - 0.3).abs() < 1e-6);
    }
}
