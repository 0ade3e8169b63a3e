use std::f32::consts::TAU;

use cosmos_core::{CometPalette, ParticleBuffer, RenderParams, Rgb, SceneId, SceneSettings, SettingField};
use cosmos_physics::motion::{drift_and_recycle, pulse_factor, smoothstep};
use cosmos_physics::sampling::{ball_point, jitter, shell_point, tail_point, unit};

use super::{fill, fill_with_randoms};
use crate::clock::FrameTime;
use crate::scene::{Scene, SceneRng};
use crate::structure::SubStructure;

const ION_SHEET_COUNT: usize = 1200;

const NUCLEUS: usize = 0;
const COMA: usize = 1;
const ION_TAIL_FLAT: usize = 2;
const ION_TAIL_UPRIGHT: usize = 3;
const DUST_TAIL: usize = 4;

const BAKED: [SettingField; 3] = [
    SettingField::ParticleCount,
    SettingField::CometTailLength,
    SettingField::CometSize,
];

/// Which plane an ion sheet spans besides the tail axis
#[derive(Clone, Copy)]
enum Sheet {
    Flat,
    Upright,
}

/// Halley's comet: nucleus, coma, twin ion sheets and a recycling dust tail
pub struct HalleyComet {
    structures: Vec<SubStructure>,
    palette: CometPalette,
    /// Elapsed time of the last painted frame
    elapsed: f32,
}

fn nucleus_color(palette: &CometPalette, seed: f32, elapsed: f32) -> Rgb {
    let n = (seed * TAU + elapsed * 0.2).sin();
    let k = 0.6 + 0.4 * n;
    [palette.nucleus[0] * k, palette.nucleus[1] * k, palette.nucleus[2] * k]
}

/// Ion sheet color at along-tail `u` and across-tail `v`, both in [0, 1]
fn ion_color(ion: Rgb, u: f32, v: f32, elapsed: f32) -> Rgb {
    let flow = 0.5 + 0.5 * (u * 20.0 - elapsed * 8.0).sin();
    let fade = smoothstep(0.0, 0.1, u) * smoothstep(1.0, 0.4, u);
    let core = smoothstep(0.0, 1.0, 1.0 - (2.0 * v - 1.0).abs());
    let k = fade * core * 0.8;
    let lift = 0.5 * flow * core;
    [(ion[0] + lift) * k, (ion[1] + lift) * k, (ion[2] + lift) * k]
}

impl HalleyComet {
    fn ion_sheet(rng: &mut SceneRng, sheet: Sheet, tail_length: f32, size: f32) -> ParticleBuffer {
        fill_with_randoms(ION_SHEET_COUNT, 2, |_, uv| {
            let u = unit(rng);
            let v = unit(rng);
            uv[0] = u;
            uv[1] = v;
            let across = (v - 0.5) * 2.0 * size;
            let p = match sheet {
                Sheet::Flat => [across, 0.0, u * tail_length],
                Sheet::Upright => [0.0, across, u * tail_length],
            };
            (p, [0.0; 3])
        })
    }

    fn paint_nucleus(&mut self, elapsed: f32) {
        let nucleus = &mut self.structures[NUCLEUS].particles;
        for i in 0..nucleus.len() {
            let seed = nucleus.random(i)[0];
            nucleus.set_color(i, nucleus_color(&self.palette, seed, elapsed));
        }
        nucleus.mark_colors_dirty();
    }

    fn paint_ion_tails(&mut self, elapsed: f32) {
        let ion = self.palette.ion;
        for index in [ION_TAIL_FLAT, ION_TAIL_UPRIGHT] {
            let sheet = &mut self.structures[index].particles;
            for i in 0..sheet.len() {
                let (u, v) = (sheet.random(i)[0], sheet.random(i)[1]);
                sheet.set_color(i, ion_color(ion, u, v, elapsed));
            }
            sheet.mark_colors_dirty();
        }
    }
}

impl Scene for HalleyComet {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let palette = settings.comet_composition().palette();
        let size = settings.comet_size();
        let tail_length = settings.comet_tail_length();

        let nucleus = fill_with_randoms(500, 1, |_, seed| {
            seed[0] = unit(rng);
            (ball_point(rng, size, 1.0).0, nucleus_color(&palette, seed[0], 0.0))
        });

        let coma = fill(1500, |_| (shell_point(rng, 2.6 * size, 0.2 * size).0, palette.nucleus));

        let flat = Self::ion_sheet(rng, Sheet::Flat, tail_length, size);
        let upright = Self::ion_sheet(rng, Sheet::Upright, tail_length, size);

        let base_spread = size * 0.4;
        let dust = fill_with_randoms(settings.particle_count as usize, 3, |_, drift| {
            for d in drift.iter_mut() {
                *d = jitter(rng, 1.0);
            }
            (tail_point(rng, tail_length, base_spread), palette.tail)
        });

        let mut comet = Self {
            structures: vec![
                SubStructure::new("nucleus", nucleus, RenderParams::points(1.5)),
                SubStructure::new("coma", coma, RenderParams::glow(2.0, 0.35)),
                SubStructure::new("ion tail", flat, RenderParams::glow(1.5, 0.8)),
                SubStructure::new("ion tail", upright, RenderParams::glow(1.5, 0.8)),
                SubStructure::new("dust tail", dust, RenderParams::glow(1.0, 0.5)),
            ],
            palette,
            elapsed: 0.0,
        };
        comet.paint_ion_tails(0.0);
        comet
    }

    fn id(&self) -> SceneId {
        SceneId::HalleyComet
    }

    fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    fn update(&mut self, time: FrameTime, settings: &SceneSettings, rng: &mut SceneRng) {
        let elapsed = time.elapsed;
        self.elapsed = elapsed;
        let speed = settings.comet_speed();

        let nucleus = &mut self.structures[NUCLEUS];
        nucleus.pose.rotation[1] += 0.05 * speed;
        nucleus.pose.rotation[2] += 0.02 * speed;
        self.paint_nucleus(elapsed);

        self.structures[COMA].pose.scale = pulse_factor(elapsed, 2.0, 0.05);
        self.paint_ion_tails(elapsed);

        let base_spread = settings.comet_size() * 0.4;
        let dust = &mut self.structures[DUST_TAIL].particles;
        let (live, drift) = dust.positions_and_randoms_mut();
        drift_and_recycle(live, drift, speed, settings.comet_tail_length(), base_spread, rng);
        dust.mark_positions_dirty();
    }

    fn recolor(&mut self, settings: &SceneSettings) {
        self.palette = settings.comet_composition().palette();
        self.paint_nucleus(self.elapsed);
        self.paint_ion_tails(self.elapsed);
        for (index, color) in [(COMA, self.palette.nucleus), (DUST_TAIL, self.palette.tail)] {
            let buf = &mut self.structures[index].particles;
            buf.fill_color(color);
            buf.mark_colors_dirty();
        }
    }

    fn baked_fields(&self) -> &'static [SettingField] {
        &BAKED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_core::CometComposition;
    use cosmos_physics::sampling::spread_at_distance;
    use rand::SeedableRng;

    fn frame(n: u64) -> FrameTime {
        FrameTime { elapsed: n as f32 / 60.0, frame: n }
    }

    #[test]
    fn dust_tail_takes_the_whole_particle_count() {
        let mut settings = SceneSettings::preset(SceneId::HalleyComet);
        settings.particle_count = 6000;
        let scene = HalleyComet::generate(&settings, &mut SceneRng::seed_from_u64(81));
        assert_eq!(scene.structures[DUST_TAIL].len(), 6000);
        assert_eq!(scene.structures[ION_TAIL_FLAT].len(), ION_SHEET_COUNT);
    }

    #[test]
    fn dust_stays_inside_the_cone() {
        let settings = SceneSettings::preset(SceneId::HalleyComet);
        let mut rng = SceneRng::seed_from_u64(82);
        let mut scene = HalleyComet::generate(&settings, &mut rng);
        let tail_length = settings.comet_tail_length();
        let base_spread = settings.comet_size() * 0.4;
        for n in 1..=600 {
            scene.update(frame(n), &settings, &mut rng);
        }
        let dust = &scene.structures[DUST_TAIL].particles;
        for i in 0..dust.len() {
            let [x, y, z] = dust.position(i);
            assert!((0.0..=tail_length).contains(&z), "dust at z={}", z);
            // lateral drift per unit of z never outruns the cone
            let lateral = (x * x + y * y).sqrt();
            assert!(lateral <= spread_at_distance(base_spread, z) + 1e-3, "dust {} wide at z={}", lateral, z);
        }
    }

    #[test]
    fn composition_change_recolors_in_place() {
        let mut settings = SceneSettings::preset(SceneId::HalleyComet);
        let mut rng = SceneRng::seed_from_u64(83);
        let mut scene = HalleyComet::generate(&settings, &mut rng);
        scene.update(frame(1), &settings, &mut rng);

        let dust = &scene.structures[DUST_TAIL].particles;
        let ptr = dust.positions().as_ptr();
        let position_revision = dust.position_revision();
        let color_revision = dust.color_revision();

        settings.comet_composition = Some(CometComposition::Carbon);
        scene.recolor(&settings);

        let dust = &scene.structures[DUST_TAIL].particles;
        assert_eq!(dust.positions().as_ptr(), ptr);
        assert_eq!(dust.position_revision(), position_revision);
        assert!(dust.color_revision() > color_revision);
        assert_eq!(dust.color(0), CometComposition::Carbon.palette().tail);
    }

    #[test]
    fn recolor_keeps_the_current_frame_phase() {
        let mut settings = SceneSettings::preset(SceneId::HalleyComet);
        let mut rng = SceneRng::seed_from_u64(84);
        let mut scene = HalleyComet::generate(&settings, &mut rng);
        let now = frame(90);
        scene.update(now, &settings, &mut rng);

        settings.comet_composition = Some(CometComposition::Sodium);
        scene.recolor(&settings);

        let palette = CometComposition::Sodium.palette();
        let nucleus = &scene.structures[NUCLEUS].particles;
        for i in 0..nucleus.len() {
            let seed = nucleus.random(i)[0];
            assert_eq!(nucleus.color(i), nucleus_color(&palette, seed, now.elapsed));
        }
        let sheet = &scene.structures[ION_TAIL_FLAT].particles;
        for i in 0..sheet.len() {
            let (u, v) = (sheet.random(i)[0], sheet.random(i)[1]);
            assert_eq!(sheet.color(i), ion_color(palette.ion, u, v, now.elapsed));
        }
    }

    #[test]
    fn ion_sheet_fades_at_both_ends() {
        let ion = [0.0, 0.7, 1.0];
        assert_eq!(ion_color(ion, 0.0, 0.5, 1.0), [0.0; 3]);
        assert_eq!(ion_color(ion, 1.0, 0.5, 1.0), [0.0; 3]);
        assert_eq!(ion_color(ion, 0.3, 0.0, 1.0), [0.0; 3]);
        let mid = ion_color(ion, 0.2, 0.5, 0.0);
        assert!(mid[2] > 0.0);
    }
}
