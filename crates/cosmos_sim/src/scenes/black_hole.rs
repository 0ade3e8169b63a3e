use std::f32::consts::{FRAC_PI_4, TAU};

use cosmos_core::{Pose, RenderParams, SceneId, SceneSettings};
use cosmos_physics::LoopProgress;
use cosmos_physics::motion::{eject, orbital_shear, tidal_stretch};
use cosmos_physics::orbit::{infall_path, toward_origin};
use cosmos_physics::sampling::{ball_point, ring_point, shell_point, unit};

use super::{fill, fill_with_randoms, share};
use crate::clock::FrameTime;
use crate::scene::{MotionState, Scene, SceneRng};
use crate::structure::{SceneLabel, SubStructure};

const EVENT_HORIZON_RADIUS: f32 = 2.8;
const DISK_INNER: f32 = 4.0;
const DISK_WIDTH: f32 = 18.0;
const JET_BASE: f32 = 4.0;
const JET_BOUND: f32 = 45.0;

const EVENT_HORIZON: usize = 0;
const ACCRETION_DISK: usize = 1;
const FALLING_STAR: usize = 2;
const JETS: usize = 3;

/// Accretion disk with differential rotation, a star spiralling in, and polar jets
pub struct BlackHole {
    structures: Vec<SubStructure>,
    labels: [SceneLabel; 2],
    infall: LoopProgress,
}

/// Hot inner disk fades through magenta to a cold blue rim
fn disk_color(radius: f32) -> [f32; 3] {
    let temp = 1.0 - (radius - DISK_INNER) / DISK_WIDTH;
    if temp > 0.7 {
        [1.0, 0.6 + temp * 0.4, 0.2]
    } else if temp > 0.4 {
        [1.0 - (0.7 - temp), 0.4, 0.6]
    } else {
        [0.3, 0.4, 1.0]
    }
}

impl BlackHole {
    /// Move the star along the infall path and stretch it toward the hole
    fn place_star(&mut self, progress: f32) {
        let star = &mut self.structures[FALLING_STAR];
        let position = infall_path(progress);
        star.pose.translation = position;
        if let Some((live, original)) = star.anchored_mut() {
            tidal_stretch(live.positions_mut(), original.as_slice(), toward_origin(position), progress);
            live.mark_positions_dirty();
        }
    }
}

impl Scene for BlackHole {
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self {
        let horizon = fill(2000, |_| {
            let (p, _) = shell_point(rng, EVENT_HORIZON_RADIUS, 0.4);
            let edge = unit(rng);
            (p, [0.1 * edge, 0.0, 0.15 * edge])
        });

        let disk = fill(share(settings.particle_count, 0.4), |_| {
            let (p, r) = ring_point(rng, DISK_INNER, DISK_WIDTH, 0.5, |r| 2.0 / (r * 0.15));
            (p, disk_color(r))
        });

        let star = fill(600, |_| {
            let (p, _) = ball_point(rng, 1.2, 1.0);
            (p, [1.0, 0.7 + unit(rng) * 0.3, 0.2])
        });

        let jets = fill_with_randoms(share(settings.particle_count, 0.15), 1, |_, speed| {
            let t = unit(rng);
            let spread = t * 2.0;
            let angle = unit(rng) * TAU;
            let side = if unit(rng) > 0.5 { 1.0 } else { -1.0 };
            speed[0] = 0.2 + unit(rng) * 0.3;
            let b = 1.0 - t * 0.5;
            let p = [
                angle.cos() * spread * 0.3,
                side * (JET_BASE + t * 35.0),
                angle.sin() * spread * 0.3,
            ];
            (p, [0.6 * b, 0.4 * b, b])
        });

        let structures = vec![
            SubStructure::new("event horizon", horizon, RenderParams::points(2.0).with_opacity(0.8)),
            SubStructure::anchored("accretion disk", disk, RenderParams::points(2.5).with_opacity(0.9))
                .with_pose(Pose::rotated([FRAC_PI_4, 0.0, 0.0])),
            SubStructure::anchored("falling star", star, RenderParams::points(4.0))
                .with_pose(Pose::at(infall_path(0.0))),
            SubStructure::new("jets", jets, RenderParams::points(2.0).with_opacity(0.7)),
        ];

        Self {
            structures,
            labels: [
                SceneLabel::fixed("Black Hole", [0.0, 6.0, 0.0]),
                SceneLabel::above("Star", FALLING_STAR, 2.0),
            ],
            infall: LoopProgress::default(),
        }
    }

    fn id(&self) -> SceneId {
        SceneId::BlackHole
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
        let gravity = settings.black_hole_gravity();

        self.structures[EVENT_HORIZON].pose.rotation[1] = t * 0.1;

        if let Some((live, original)) = self.structures[ACCRETION_DISK].anchored_mut() {
            orbital_shear(live.positions_mut(), original.as_slice(), t, 0.5 * gravity);
            live.mark_positions_dirty();
        }

        let progress = self.infall.advance(0.001 * speed * gravity);
        self.place_star(progress);

        let jets = &mut self.structures[JETS].particles;
        let (live, speeds) = jets.positions_and_randoms_mut();
        eject(live, speeds, speed, JET_BOUND, JET_BASE);
        jets.mark_positions_dirty();
    }

    fn motion_state(&self) -> MotionState {
        MotionState {
            angles: Vec::new(),
            progress: Some(self.infall.value()),
        }
    }

    fn resume(&mut self, state: &MotionState, _time: FrameTime, _settings: &SceneSettings) {
        if let Some(progress) = state.progress {
            self.infall = LoopProgress::at(progress);
            self.place_star(self.infall.value());
        }
    }

    fn occluder_radius(&self) -> Option<f32> {
        Some(EVENT_HORIZON_RADIUS)
    }
}
