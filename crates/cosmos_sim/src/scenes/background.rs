use cosmos_core::{BACKGROUND_STARS_PER_DENSITY, RenderParams, Rgb, SceneSettings};
use cosmos_physics::sampling::{shell_point, unit};

use super::{fill, fill_with_randoms};
use crate::scene::SceneRng;
use crate::structure::SubStructure;

const STARS: usize = 0;

/// Star field and faint haze drawn behind every scene
pub struct Background {
    structures: Vec<SubStructure>,
}

/// Spectral class roll: color and apparent size
fn star_class(rng: &mut SceneRng) -> (Rgb, f32) {
    let temp = unit(rng);
    if temp > 0.95 {
        ([0.7, 0.8, 1.0], 0.8 + unit(rng) * 1.5)
    } else if temp > 0.85 {
        ([1.0, 0.95, 0.7], 0.5 + unit(rng))
    } else if temp > 0.75 {
        ([1.0, 0.6, 0.5], 0.6 + unit(rng) * 1.2)
    } else {
        ([1.0; 3], 0.2 + unit(rng) * 0.5)
    }
}

fn haze_color(rng: &mut SceneRng) -> Rgb {
    let hue = unit(rng);
    if hue > 0.7 {
        [0.3, 0.1, 0.5]
    } else if hue > 0.4 {
        [0.1, 0.2, 0.4]
    } else {
        [0.2, 0.05, 0.3]
    }
}

impl Background {
    pub fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let count = (BACKGROUND_STARS_PER_DENSITY * settings.star_density()).floor() as usize;
        let stars = fill_with_randoms(count, 1, |_, size| {
            let (p, _) = shell_point(rng, 200.0, 400.0);
            let (color, s) = star_class(rng);
            size[0] = s;
            (p, color)
        });
        let haze = fill(3000, |_| (shell_point(rng, 150.0, 200.0).0, haze_color(rng)));

        Self {
            structures: vec![
                SubStructure::new(
                    "background stars",
                    stars,
                    RenderParams::points(1.0).fixed(1.5).flat().with_opacity(0.95).sized_per_particle(),
                ),
                SubStructure::new(
                    "background haze",
                    haze,
                    RenderParams::points(1.0).fixed(4.0).flat().with_opacity(0.15),
                ),
            ],
        }
    }

    pub fn update(&mut self) {
        self.structures[STARS].pose.rotation[1] += 0.00005;
    }

    pub fn structures(&self) -> &[SubStructure] {
        &self.structures
    }

    pub fn star_count(&self) -> usize {
        self.structures[STARS].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn star_count_follows_density() {
        let mut settings = SceneSettings::default();
        settings.star_density = Some(0.5);
        let background = Background::generate(&settings, &mut SceneRng::seed_from_u64(91));
        assert_eq!(background.star_count(), 6000);
    }

    #[test]
    fn stars_sit_in_the_far_shell() {
        let settings = SceneSettings::default();
        let background = Background::generate(&settings, &mut SceneRng::seed_from_u64(92));
        let stars = &background.structures()[STARS].particles;
        for i in 0..stars.len() {
            let p = stars.position(i);
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((199.9..=600.1).contains(&r), "star at {}", r);
            let size = stars.random(i)[0];
            assert!((0.2..2.3).contains(&size));
        }
    }
}
