use cosmos_core::{Pose, SceneId, SceneSettings, SettingField};
use rand_chacha::ChaCha8Rng;

use crate::clock::FrameTime;
use crate::scenes::{
    BlackHole, EarthMoon, GalaxyCollision, HalleyComet, HelixNebula, OrionConstellation,
    SolarSystem,
};
use crate::structure::{SceneLabel, SubStructure};

/// Random source shared by generators and update rules
pub type SceneRng = ChaCha8Rng;

/// Per-frame accumulators carried across a rebuild of the same scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionState {
    /// Accumulated angles, one per orbiting body
    pub angles: Vec<f32>,
    /// Looping progress, where the scene has one
    pub progress: Option<f32>,
}

/// A selectable scene: a fixed list of sub-structures plus their update rules
pub trait Scene: Send + Sync {
    /// Build every sub-structure from a settings snapshot
    fn generate(settings: &SceneSettings, rng: &mut SceneRng) -> Self
    where
        Self: Sized;

    fn id(&self) -> SceneId;

    /// Transform of the whole scene
    fn root(&self) -> Pose {
        Pose::IDENTITY
    }

    fn structures(&self) -> &[SubStructure];

    fn labels(&self) -> &[SceneLabel] {
        &[]
    }

    /// Advance every sub-structure by one frame, mutating buffers in place
    fn update(&mut self, time: FrameTime, settings: &SceneSettings, rng: &mut SceneRng);

    /// Remap colors after a color-only settings change
    fn recolor(&mut self, _settings: &SceneSettings) {}

    /// Snapshot of the accumulators the update rules advance
    fn motion_state(&self) -> MotionState {
        MotionState::default()
    }

    /// Continue from a previous build's accumulators and place bodies to match
    fn resume(&mut self, _state: &MotionState, _time: FrameTime, _settings: &SceneSettings) {}

    /// Radius of an opaque sphere hiding what lies behind the scene center
    fn occluder_radius(&self) -> Option<f32> {
        None
    }

    /// Structural fields this scene bakes into its buffers
    fn baked_fields(&self) -> &'static [SettingField] {
        &[SettingField::ParticleCount]
    }

    fn particle_count(&self) -> usize {
        self.structures().iter().map(SubStructure::len).sum()
    }
}

/// Constructor stored in the registry
pub type SceneBuilder = fn(&SceneSettings, &mut SceneRng) -> Box<dyn Scene>;

fn build<S: Scene + 'static>(settings: &SceneSettings, rng: &mut SceneRng) -> Box<dyn Scene> {
    Box::new(S::generate(settings, rng))
}

/// One builder per scene, in [`SceneId::ALL`] order
const REGISTRY: [(SceneId, SceneBuilder); 7] = [
    (SceneId::SolarSystem, build::<SolarSystem> as SceneBuilder),
    (SceneId::EarthMoon, build::<EarthMoon> as SceneBuilder),
    (SceneId::BlackHole, build::<BlackHole> as SceneBuilder),
    (SceneId::GalaxyCollision, build::<GalaxyCollision> as SceneBuilder),
    (SceneId::Orion, build::<OrionConstellation> as SceneBuilder),
    (SceneId::HelixNebula, build::<HelixNebula> as SceneBuilder),
    (SceneId::HalleyComet, build::<HalleyComet> as SceneBuilder),
];

/// Builder for a scene identifier
pub fn builder(id: SceneId) -> SceneBuilder {
    REGISTRY[id.index()].1
}

/// Generate a fresh scene for `id`
pub fn generate(id: SceneId, settings: &SceneSettings, rng: &mut SceneRng) -> Box<dyn Scene> {
    builder(id)(settings, rng)
}
