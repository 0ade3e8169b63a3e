use bevy::app::AppExit;
use bevy::prelude::*;
use cosmos_sim::pipeline::engine_tick;

use super::camera;
use super::particles::{self, ParticleRenderState};
use super::texture;
use super::ui;

/// Render plugin: meshes, camera, HUD, labels and keyboard controls
pub struct CosmosRenderPlugin;

impl Plugin for CosmosRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::HudThrottle>()
            .init_resource::<ui::LabelState>()
            .init_resource::<ParticleRenderState>()
            .add_systems(
                Startup,
                (camera::spawn_camera, ui::spawn_hud, texture::init_soft_texture),
            )
            .add_systems(
                Update,
                (
                    ui::settings_input_system.before(engine_tick),
                    particles::sync_particle_visuals.after(engine_tick),
                    particles::update_particle_visuals.after(particles::sync_particle_visuals),
                    ui::sync_scene_labels.after(engine_tick),
                    ui::update_scene_labels.after(ui::sync_scene_labels),
                    camera::follow_camera_distance.after(ui::settings_input_system),
                    ui::update_hud.after(engine_tick),
                ),
            )
            .add_systems(Last, texture::release_soft_texture.run_if(on_event::<AppExit>));
    }
}
