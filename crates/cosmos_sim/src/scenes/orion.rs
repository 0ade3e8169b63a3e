use std::f32::consts::{PI, TAU};

use cosmos_core::{ParticleBuffer, RenderParams, Rgb, SceneId, SceneSettings, rgb8, scale_rgb};
use cosmos_physics::sampling::{segment_points, spherical, unit};

use super::fill;
use crate::clock::FrameTime;
use crate::scene::{Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

struct Star {
    name: &'static str,
    position: [f32; 3],
    color: Rgb,
    magnitude: f32,
    label: &'static str,
}

const BLUE_WHITE: Rgb = rgb8(0xcc, 0xcc, 0xff);
const BLUE: Rgb = rgb8(0xaa, 0xaa, 0xff);

const STARS: [Star; 18] = [
    Star { name: "Betelgeuse", position: [-10.0, 15.0, 0.0], color: rgb8(0xff, 0x8c, 0x00), magnitude: 4.5, label: "Betelgeuse (α Ori)" },
    Star { name: "Rigel", position: [8.0, -15.0, 2.0], color: BLUE, magnitude: 4.8, label: "Rigel (β Ori)" },
    Star { name: "Bellatrix", position: [12.0, 10.0, -5.0], color: BLUE_WHITE, magnitude: 3.5, label: "Bellatrix (γ Ori)" },
    Star { name: "Saiph", position: [-8.0, -14.0, -2.0], color: BLUE, magnitude: 3.8, label: "Saiph (κ Ori)" },
    Star { name: "Alnitak", position: [-5.0, 0.0, 5.0], color: BLUE_WHITE, magnitude: 4.0, label: "Alnitak (ζ Ori)" },
    Star { name: "Alnilam", position: [0.0, 1.0, 0.0], color: BLUE_WHITE, magnitude: 4.2, label: "Alnilam (ε Ori)" },
    Star { name: "Mintaka", position: [5.0, 2.0, -5.0], color: BLUE_WHITE, magnitude: 3.8, label: "Mintaka (δ Ori)" },
    Star { name: "Meissa", position: [2.0, 18.0, -2.0], color: BLUE_WHITE, magnitude: 3.2, label: "Meissa (λ Ori)" },
    Star { name: "Pi1", position: [16.0, 14.0, 5.0], color: BLUE_WHITE, magnitude: 2.0, label: "" },
    Star { name: "Pi2", position: [19.0, 10.0, 5.0], color: BLUE_WHITE, magnitude: 2.2, label: "" },
    Star { name: "Pi3", position: [20.0, 5.0, 5.0], color: BLUE_WHITE, magnitude: 2.5, label: "Tabit (π3 Ori)" },
    Star { name: "Pi4", position: [19.0, 0.0, 5.0], color: BLUE_WHITE, magnitude: 2.2, label: "" },
    Star { name: "Pi5", position: [17.0, -5.0, 5.0], color: BLUE_WHITE, magnitude: 2.1, label: "" },
    Star { name: "Pi6", position: [14.0, -9.0, 5.0], color: BLUE_WHITE, magnitude: 2.0, label: "" },
    Star { name: "Mu", position: [-16.0, 22.0, -2.0], color: rgb8(0xff, 0xcc, 0xaa), magnitude: 2.2, label: "" },
    Star { name: "Nu", position: [-14.0, 20.0, -2.0], color: BLUE_WHITE, magnitude: 2.2, label: "" },
    Star { name: "Xi", position: [-12.0, 25.0, -2.0], color: BLUE_WHITE, magnitude: 2.2, label: "" },
    Star { name: "Chi1", position: [-13.0, 27.0, -2.0], color: BLUE_WHITE, magnitude: 2.1, label: "" },
];

const LINES: [(&str, &str); 20] = [
    ("Betelgeuse", "Alnitak"),
    ("Bellatrix", "Mintaka"),
    ("Alnitak", "Alnilam"),
    ("Alnilam", "Mintaka"),
    ("Alnitak", "Saiph"),
    ("Mintaka", "Rigel"),
    ("Betelgeuse", "Bellatrix"),
    ("Saiph", "Rigel"),
    ("Betelgeuse", "Meissa"),
    ("Bellatrix", "Meissa"),
    ("Bellatrix", "Pi3"),
    ("Pi1", "Pi2"),
    ("Pi2", "Pi3"),
    ("Pi3", "Pi4"),
    ("Pi4", "Pi5"),
    ("Pi5", "Pi6"),
    ("Betelgeuse", "Nu"),
    ("Nu", "Mu"),
    ("Nu", "Xi"),
    ("Xi", "Chi1"),
];

const POINTS_PER_LINE: usize = 24;
const LINE_COLOR: Rgb = [0.39, 0.59, 1.0];
const NEBULA_CENTER: [f32; 3] = [-3.0, -5.0, 3.0];

const STAR_POINTS: usize = 0;
const HALOS: usize = 1;
const CONSTELLATION_LINES: usize = 2;
const NEBULA: usize = 3;

/// Orion's named stars with halos, the constellation figure and the M42 nebula
pub struct OrionConstellation {
    structures: Vec<SubStructure>,
    labels: Vec<SceneLabel>,
}

fn star_position(name: &str) -> Option<[f32; 3]> {
    STARS.iter().find(|s| s.name == name).map(|s| s.position)
}

/// Height of a star label above the star for the given particle size
fn label_height(magnitude: f32, particle_size: f32) -> f32 {
    magnitude * particle_size * 30.0 + 1.0
}

fn star_labels(particle_size: f32) -> impl Iterator<Item = SceneLabel> {
    STARS.iter().filter(|s| !s.label.is_empty()).map(move |s| {
        let [x, y, z] = s.position;
        SceneLabel::fixed(s.label, [x, y + label_height(s.magnitude, particle_size), z])
    })
}

impl OrionConstellation {
    fn stars() -> ParticleBuffer {
        let mut buf = ParticleBuffer::with_randoms(STARS.len(), 1);
        for (i, star) in STARS.iter().enumerate() {
            buf.set_position(i, star.position);
            buf.set_color(i, star.color);
            buf.set_random(i, &[star.magnitude]);
        }
        buf
    }

    fn lines() -> ParticleBuffer {
        let segments: Vec<([f32; 3], [f32; 3])> = LINES
            .iter()
            .filter_map(|(a, b)| Some((star_position(a)?, star_position(b)?)))
            .collect();
        let mut buf = ParticleBuffer::new(segments.len() * POINTS_PER_LINE);
        let points = segments
            .iter()
            .flat_map(|(a, b)| segment_points(*a, *b, POINTS_PER_LINE));
        for (i, p) in points.enumerate() {
            buf.set_position(i, p);
        }
        buf.fill_color(LINE_COLOR);
        buf
    }

    fn nebula(rng: &mut SceneRng) -> ParticleBuffer {
        fill(3000, |_| {
            let r = unit(rng) * 3.0;
            let theta = unit(rng) * TAU;
            // polar angle sampled uniformly, so the cloud bunches at the poles
            let phi = unit(rng) * PI;
            let [x, y, z] = spherical(r, theta, phi);
            let p = [NEBULA_CENTER[0] + x, NEBULA_CENTER[1] + y * 1.5, NEBULA_CENTER[2] + z];
            let c = if unit(rng) > 0.6 { [1.0, 0.4, 0.6] } else { [0.6, 0.2, 0.8] };
            (p, c)
        })
    }
}

impl Scene for OrionConstellation {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let glow = settings.glow_intensity;
        let mut structures = vec![
            SubStructure::new(
                "stars",
                Self::stars(),
                RenderParams::glow(40.0, 0.9).soft().sized_per_particle(),
            ),
            SubStructure::new(
                "halos",
                Self::stars(),
                RenderParams::glow(100.0, 0.3 * glow).soft().sized_per_particle(),
            ),
            SubStructure::new(
                "constellation lines",
                Self::lines(),
                RenderParams::points(1.0).fixed(0.8).flat().with_opacity(0.3),
            ),
            SubStructure::new("m42", Self::nebula(rng), RenderParams::glow(3.0, 0.6)),
        ];
        structures[CONSTELLATION_LINES].visible = settings.show_orbits;

        let mut labels: Vec<SceneLabel> = star_labels(settings.particle_size).collect();
        labels.push(SceneLabel::fixed("M42 (Nebula)", [-3.0, -8.0, 3.0]));

        Self { structures, labels }
    }

    fn id(&self) -> SceneId {
        SceneId::Orion
    }

    fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    fn labels(&self) -> &[SceneLabel] {
        &self.labels
    }

    fn update(&mut self, time: FrameTime, settings: &SceneSettings, _rng: &mut SceneRng) {
        let elapsed = time.elapsed;

        let stars = &mut self.structures[STAR_POINTS].particles;
        for (i, star) in STARS.iter().enumerate() {
            let flicker = 1.0 + (elapsed * 8.0 + star.position[0]).sin() * 0.1;
            stars.set_color(i, scale_rgb(star.color, flicker));
        }
        stars.mark_colors_dirty();

        self.structures[HALOS].render.opacity = 0.3 * settings.glow_intensity;
        self.structures[CONSTELLATION_LINES].visible = settings.show_orbits;
        self.structures[NEBULA].pose.rotation[1] = (elapsed * 0.05).sin() * 0.1;

        for (label, fresh) in self.labels.iter_mut().zip(star_labels(settings.particle_size)) {
            *label = fresh;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn every_line_joins_known_stars() {
        for (a, b) in LINES {
            assert!(star_position(a).is_some(), "unknown star {}", a);
            assert!(star_position(b).is_some(), "unknown star {}", b);
        }
        assert_eq!(OrionConstellation::lines().len(), LINES.len() * POINTS_PER_LINE);
    }

    #[test]
    fn labelled_stars_plus_nebula() {
        let settings = SceneSettings::preset(SceneId::Orion);
        let scene = OrionConstellation::generate(&settings, &mut SceneRng::seed_from_u64(61));
        let named = STARS.iter().filter(|s| !s.label.is_empty()).count();
        assert_eq!(scene.labels().len(), named + 1);
        assert_eq!(scene.structures[STAR_POINTS].len(), 18);
        assert_eq!(scene.structures[NEBULA].len(), 3000);
    }

    #[test]
    fn flicker_stays_within_ten_percent() {
        let settings = SceneSettings::preset(SceneId::Orion);
        let mut rng = SceneRng::seed_from_u64(62);
        let mut scene = OrionConstellation::generate(&settings, &mut rng);
        for frame in 1..=120 {
            scene.update(FrameTime { elapsed: frame as f32 / 60.0, frame }, &settings, &mut rng);
            let stars = &scene.structures[STAR_POINTS].particles;
            for (i, star) in STARS.iter().enumerate() {
                let c = stars.color(i);
                for k in 0..3 {
                    let base = star.color[k];
                    assert!(c[k] >= base * 0.9 - 1e-5 && c[k] <= base * 1.1 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn label_tracks_particle_size() {
        let mut settings = SceneSettings::preset(SceneId::Orion);
        let mut rng = SceneRng::seed_from_u64(63);
        let mut scene = OrionConstellation::generate(&settings, &mut rng);
        settings.particle_size = 0.08;
        scene.update(FrameTime::default(), &settings, &mut rng);
        let betelgeuse = scene.labels()[0];
        assert!((betelgeuse.offset[1] - (15.0 + label_height(4.5, 0.08))).abs() < 1e-4);
    }
}
