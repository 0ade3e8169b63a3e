use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use cosmos_core::{SceneId, SceneSettings, Sensitivity, SettingField};
use rand::SeedableRng;

use crate::clock::{FrameClock, FrameTime};
use crate::scene::{self, Scene, SceneRng};
use crate::scenes::Background;

/// What [`Engine::apply_settings`] did with a new settings snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// Nothing the engine tracks changed
    Unchanged,
    /// Only fields the update rules read every frame changed
    Live,
    /// Colors were remapped in place
    Recolored,
    /// Only the background starfield was regenerated
    BackgroundRebuilt,
    /// The active scene was regenerated
    Rebuilt,
}

/// Engine façade: owns the active scene, the background and the frame clock.
///
/// The renderer watches `generation` and `background_generation` to know when
/// to respawn meshes; everything else flows through buffer revisions.
#[derive(Resource)]
pub struct Engine {
    settings: SceneSettings,
    scene_id: SceneId,
    scene: Box<dyn Scene>,
    background: Background,
    rng: SceneRng,
    clock: FrameClock,
    /// Incremented on every scene (re)build
    pub generation: u32,
    /// Incremented on every background (re)build
    pub background_generation: u32,
    running: bool,
}

fn field_names(fields: &[SettingField]) -> Vec<&'static str> {
    fields.iter().map(|f| f.name()).collect()
}

fn build_scene(id: SceneId, settings: &SceneSettings, rng: &mut SceneRng) -> Box<dyn Scene> {
    let scene = scene::generate(id, settings, rng);
    info!(
        "Generated {}: {} structures, {} particles",
        id,
        scene.structures().len(),
        scene.particle_count()
    );
    for s in scene.structures() {
        debug!("  {} = {} particles", s.name, s.len());
    }
    scene
}

fn build_background(settings: &SceneSettings, rng: &mut SceneRng) -> Background {
    let background = Background::generate(settings, rng);
    debug!("Background starfield: {} stars", background.star_count());
    background
}

impl Engine {
    /// Engine with an entropy-seeded generator
    pub fn new(settings: SceneSettings, id: SceneId) -> Self {
        Self::with_seed(settings, id, rand::random())
    }

    /// Engine with a fixed seed, for reproducible scenes
    pub fn with_seed(settings: SceneSettings, id: SceneId, seed: u64) -> Self {
        let settings = sanitize(settings);
        let mut rng = SceneRng::seed_from_u64(seed);
        let scene = build_scene(id, &settings, &mut rng);
        let background = build_background(&settings, &mut rng);
        Self {
            settings,
            scene_id: id,
            scene,
            background,
            rng,
            clock: FrameClock::default(),
            generation: 0,
            background_generation: 0,
            running: true,
        }
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn now(&self) -> FrameTime {
        self.clock.now()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Switch to another scene with the current settings
    pub fn select_scene(&mut self, id: SceneId) {
        if id == self.scene_id {
            return;
        }
        self.switch(id);
    }

    /// Switch to another scene and replace the settings in one step
    pub fn select_scene_with(&mut self, id: SceneId, settings: SceneSettings) {
        if id == self.scene_id {
            self.apply_settings(settings);
            return;
        }
        let settings = sanitize(settings);
        if self.settings.star_density() != settings.star_density() {
            self.settings = settings;
            self.rebuild_background();
        } else {
            self.settings = settings;
        }
        self.switch(id);
    }

    fn switch(&mut self, id: SceneId) {
        info!("Switching scene {} -> {}", self.scene_id, id);
        self.scene_id = id;
        self.clock.reset();
        self.rebuild_scene();
    }

    fn rebuild_scene(&mut self) {
        self.scene = build_scene(self.scene_id, &self.settings, &mut self.rng);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Rebuild the active scene in place, continuing its accumulators
    fn regenerate(&mut self) {
        let state = self.scene.motion_state();
        self.rebuild_scene();
        self.scene.resume(&state, self.clock.now(), &self.settings);
    }

    fn rebuild_background(&mut self) {
        self.background = build_background(&self.settings, &mut self.rng);
        self.background_generation = self.background_generation.wrapping_add(1);
    }

    /// Replace the settings wholesale.
    ///
    /// Values are clamped into range first. Structural fields the active scene
    /// bakes into its buffers trigger a regeneration that keeps orbits and
    /// infall where they were; a composition change
    /// remaps colors in place; everything else is picked up by the next tick.
    pub fn apply_settings(&mut self, settings: SceneSettings) -> SettingsOutcome {
        let settings = sanitize(settings);
        let changed = self.settings.changed_fields(&settings);
        self.settings = settings;
        if changed.is_empty() {
            return SettingsOutcome::Unchanged;
        }

        let mut outcome = SettingsOutcome::Live;
        if changed.contains(&SettingField::StarDensity) {
            self.rebuild_background();
            outcome = SettingsOutcome::BackgroundRebuilt;
        }

        let baked = self.scene.baked_fields();
        let structural: Vec<SettingField> = changed
            .iter()
            .copied()
            .filter(|f| f.sensitivity() == Sensitivity::Rebuild && baked.contains(f))
            .collect();
        if !structural.is_empty() {
            info!("Rebuilding {} for {:?}", self.scene_id, field_names(&structural));
            self.regenerate();
            return SettingsOutcome::Rebuilt;
        }

        if changed.iter().any(|f| f.sensitivity() == Sensitivity::Recolor) {
            info!("Recoloring {} ({})", self.scene_id, self.settings.comet_composition());
            self.scene.recolor(&self.settings);
            return SettingsOutcome::Recolored;
        }

        outcome
    }

    /// Advance the clock by a host frame delta and run every update rule once
    pub fn tick(&mut self, delta: f32) {
        if !self.running {
            return;
        }
        let time = self.clock.advance(delta);
        self.scene.update(time, &self.settings, &mut self.rng);
        self.background.update();
    }

    /// Stop ticking. Buffers stay readable until the engine is dropped.
    pub fn shutdown(&mut self) {
        if self.running {
            info!("Engine shutdown after {} frames of {}", self.clock.now().frame, self.scene_id);
            self.running = false;
        }
    }
}

fn sanitize(settings: SceneSettings) -> SceneSettings {
    let (settings, clamped) = settings.sanitized();
    if !clamped.is_empty() {
        warn!("Clamped out-of-range settings: {:?}", field_names(&clamped));
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_core::CometComposition;

    const DUST_TAIL: usize = 4;
    const SUN_CORE: usize = 0;

    fn engine(id: SceneId) -> Engine {
        Engine::with_seed(SceneSettings::preset(id), id, 7)
    }

    fn lengths(engine: &Engine) -> Vec<usize> {
        engine.scene().structures().iter().map(|s| s.len()).collect()
    }

    #[test]
    fn composition_change_keeps_dust_buffer() {
        let mut engine = engine(SceneId::HalleyComet);
        engine.tick(1.0 / 60.0);
        let dust = &engine.scene().structures()[DUST_TAIL].particles;
        let ptr = dust.positions().as_ptr();
        let generation = engine.generation;

        let mut settings = engine.settings().clone();
        settings.comet_composition = Some(CometComposition::Sodium);
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::Recolored);

        let dust = &engine.scene().structures()[DUST_TAIL].particles;
        assert_eq!(dust.positions().as_ptr(), ptr);
        assert_eq!(engine.generation, generation);
    }

    #[test]
    fn particle_count_change_reallocates() {
        let mut engine = engine(SceneId::HalleyComet);
        let mut settings = engine.settings().clone();
        settings.particle_count = 12000;
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::Rebuilt);
        assert_eq!(engine.scene().structures()[DUST_TAIL].len(), 12000);
        assert_eq!(engine.generation, 1);
    }

    #[test]
    fn rebuild_keeps_planets_moving_forward() {
        let mut engine = engine(SceneId::SolarSystem);
        for _ in 0..100 {
            engine.tick(1.0 / 60.0);
        }
        let before = engine.scene().motion_state().angles;

        let mut settings = engine.settings().clone();
        settings.particle_count += 500;
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::Rebuilt);
        assert_eq!(engine.scene().motion_state().angles, before);

        engine.tick(1.0 / 60.0);
        let after = engine.scene().motion_state().angles;
        assert_eq!(after.len(), before.len());
        for (planet, (a, b)) in before.iter().zip(&after).enumerate() {
            assert!(b > a, "planet {} went from {} to {}", planet, a, b);
        }
    }

    #[test]
    fn rebuild_keeps_the_falling_star_in_place() {
        let mut engine = engine(SceneId::BlackHole);
        for _ in 0..100 {
            engine.tick(1.0 / 60.0);
        }
        let Some(before) = engine.scene().motion_state().progress else {
            panic!("black hole should report infall progress");
        };
        assert!(before > 0.0);

        let mut settings = engine.settings().clone();
        settings.particle_count = 2000;
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::Rebuilt);
        assert_eq!(engine.scene().motion_state().progress, Some(before));

        engine.tick(1.0 / 60.0);
        assert!(engine.scene().motion_state().progress > Some(before));
    }

    #[test]
    fn switching_scene_starts_accumulators_fresh() {
        let mut engine = engine(SceneId::EarthMoon);
        for _ in 0..100 {
            engine.tick(1.0 / 60.0);
        }
        engine.select_scene(SceneId::BlackHole);
        engine.select_scene(SceneId::EarthMoon);
        assert_eq!(engine.scene().motion_state().angles, vec![0.0]);
    }

    #[test]
    fn unbaked_structural_field_stays_live() {
        // the black hole has no planet trails
        let mut engine = engine(SceneId::BlackHole);
        let mut settings = engine.settings().clone();
        settings.trail_length = 10;
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::Live);
        assert_eq!(engine.generation, 0);
    }

    #[test]
    fn star_density_rebuilds_only_the_background() {
        let mut engine = engine(SceneId::EarthMoon);
        let mut settings = engine.settings().clone();
        settings.star_density = Some(0.5);
        assert_eq!(engine.apply_settings(settings), SettingsOutcome::BackgroundRebuilt);
        assert_eq!(engine.background().star_count(), 6000);
        assert_eq!(engine.background_generation, 1);
        assert_eq!(engine.generation, 0);
    }

    #[test]
    fn switching_away_and_back_regenerates_same_layout() {
        let mut engine = engine(SceneId::SolarSystem);
        let first = lengths(&engine);
        engine.select_scene(SceneId::BlackHole);
        assert_eq!(engine.scene().id(), SceneId::BlackHole);
        engine.select_scene(SceneId::SolarSystem);
        assert_eq!(lengths(&engine), first);
        assert_eq!(engine.scene().structures()[SUN_CORE].particles.positions().len(), 9000);
        assert_eq!(engine.generation, 2);
    }

    #[test]
    fn clock_resets_on_switch_but_not_on_rebuild() {
        let mut engine = engine(SceneId::SolarSystem);
        for _ in 0..30 {
            engine.tick(0.1);
        }
        let mut settings = engine.settings().clone();
        settings.particle_count = 4000;
        engine.apply_settings(settings);
        assert!((engine.now().elapsed - 3.0).abs() < 1e-4);

        engine.select_scene(SceneId::HelixNebula);
        assert_eq!(engine.now(), FrameTime::default());
    }

    #[test]
    fn reselecting_the_active_scene_is_a_no_op() {
        let mut engine = engine(SceneId::Orion);
        engine.tick(0.5);
        engine.select_scene(SceneId::Orion);
        assert_eq!(engine.generation, 0);
        assert_eq!(engine.now().frame, 1);
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let mut engine = engine(SceneId::GalaxyCollision);
        let mut settings = engine.settings().clone();
        settings.particle_count = 100_000;
        settings.animation_speed = f32::NAN;
        engine.apply_settings(settings);
        assert_eq!(engine.settings().particle_count, 20000);
        assert!(engine.settings().animation_speed.is_finite());
    }

    #[test]
    fn shutdown_stops_ticking() {
        let mut engine = engine(SceneId::HelixNebula);
        engine.tick(0.1);
        engine.shutdown();
        engine.tick(0.1);
        assert!(!engine.is_running());
        assert_eq!(engine.now().frame, 1);
    }
}
