use std::f32::consts::{PI, TAU};

use cosmos_core::{Pose, RenderParams, Rgb, SceneId, SceneSettings, rgb8};
use cosmos_physics::motion::pulse_factor;
use cosmos_physics::sampling::{ball_point, jitter, skewed, unit};

use super::{fill, share};
use crate::clock::FrameTime;
use crate::scene::{Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

const SHELL_DEPTH: f32 = 30.0;

const SHELL: usize = 0;
const SMOKE: usize = 1;
const CENTRAL_STAR: usize = 2;
const STAR_GLOW: usize = 3;

/// Planetary nebula: a ragged elliptical shell around a pulsing white dwarf
pub struct HelixNebula {
    structures: Vec<SubStructure>,
    labels: [SceneLabel; 1],
}

/// Inner edge of the shell at angle `a`
fn inner_radius(a: f32) -> f32 {
    10.0 + (a * 5.0).sin() * 2.0 + (a * 12.0).cos() * 1.5 + (a * 30.0).sin() * 0.5
}

/// Teal near the inner edge, gold through the middle, red on the rim
fn shell_color(rng: &mut SceneRng, depth: f32) -> Rgb {
    if depth < 0.2 {
        [0.2 + unit(rng) * 0.2, 0.6 + unit(rng) * 0.4, 0.8 + unit(rng) * 0.2]
    } else if depth < 0.6 {
        [1.0, 0.4 + unit(rng) * 0.4, 0.1]
    } else {
        [0.8 + unit(rng) * 0.2, 0.1, 0.3 + unit(rng) * 0.3]
    }
}

impl Scene for HelixNebula {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let glow = settings.glow_intensity;

        let shell = fill(share(settings.particle_count, 1.5), |_| {
            let a = unit(rng) * TAU;
            let min_r = inner_radius(a);
            let mut r = min_r + skewed(rng, 0.6) * SHELL_DEPTH;
            if (a * 8.0).sin() + (a * 20.0).cos() > 1.0 {
                r += jitter(rng, 2.0);
            }
            let p = [
                a.cos() * r + jitter(rng, 1.5),
                a.sin() * r * 0.7 + jitter(rng, 1.5),
                jitter(rng, 8.0) * (1.0 - r / 50.0) + (a * 2.0 + r * 0.1).sin() * 3.0,
            ];
            (p, shell_color(rng, (r - min_r) / SHELL_DEPTH))
        });

        let smoke = fill(2000, |_| {
            let a = unit(rng) * TAU;
            let r = 10.0 + unit(rng) * 25.0;
            let p = [
                a.cos() * r + jitter(rng, 3.0),
                a.sin() * r * 0.7 + jitter(rng, 3.0),
                jitter(rng, 25.0),
            ];
            let c = if r < 20.0 { [0.2, 0.4, 0.5] } else { [0.5, 0.2, 0.2] };
            (p, c)
        });

        let star = fill(400, |_| (ball_point(rng, 0.5, 1.0).0, rgb8(0xaa, 0xbb, 0xff)));
        let star_glow = fill(600, |_| (ball_point(rng, 2.0, 1.0).0, rgb8(0x88, 0x99, 0xff)));

        let knots = fill(500, |_| {
            let a = unit(rng) * TAU;
            let r = 35.0 + unit(rng) * 15.0;
            ([a.cos() * r, a.sin() * r, jitter(rng, 5.0)], [0.5, 0.1, 0.1])
        });

        let structures = vec![
            SubStructure::new("shell", shell, RenderParams::glow(3.0, 0.5 * glow)),
            SubStructure::new("smoke", smoke, RenderParams::glow(25.0, 0.2 * glow).soft()),
            SubStructure::new("white dwarf", star, RenderParams::points(4.0)),
            SubStructure::new("white dwarf glow", star_glow, RenderParams::glow(3.0, 0.3)),
            SubStructure::new("cometary knots", knots, RenderParams::points(2.0).with_opacity(0.8))
                .with_pose(Pose::rotated([PI * 0.15, 0.0, 0.0])),
        ];

        Self {
            structures,
            labels: [SceneLabel::fixed("White Dwarf", [0.0, 2.0, 0.0])],
        }
    }

    fn id(&self) -> SceneId {
        SceneId::HelixNebula
    }

    fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    fn labels(&self) -> &[SceneLabel] {
        &self.labels
    }

    fn update(&mut self, time: FrameTime, settings: &SceneSettings, _rng: &mut SceneRng) {
        let elapsed = time.elapsed;
        let t = time.scaled(settings.animation_speed);
        let glow = settings.glow_intensity;

        let shell = &mut self.structures[SHELL];
        shell.pose.rotation[2] = t * 0.02;
        shell.pose.rotation[0] = (elapsed * 0.1).sin() * 0.05;
        shell.render.opacity = 0.5 * glow;

        self.structures[SMOKE].render.opacity = 0.2 * glow;
        self.structures[CENTRAL_STAR].pose.scale = pulse_factor(elapsed, 2.0, 0.05);
        self.structures[STAR_GLOW].pose.scale = pulse_factor(elapsed, 2.0, 0.05);
    }
}
