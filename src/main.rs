use bevy::prelude::*;
use cosmos_core::{SceneId, SceneSettings};
use cosmos_render::CosmosRenderPlugin;
use cosmos_sim::Engine;
use cosmos_sim::pipeline::SimulationPlugin;

fn main() {
    // Logging only starts with the app, so a bad argument is reported from a startup system
    let (scene, rejected) = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<SceneId>() {
            Ok(id) => (id, None),
            Err(err) => (SceneId::default(), Some(err)),
        },
        None => (SceneId::default(), None),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cosmos Particle Scenes".into(),
                resolution: (1920.0, 1080.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 8.0 / 255.0)))
        .insert_resource(Engine::new(SceneSettings::preset(scene), scene))
        .add_plugins(SimulationPlugin)
        .add_plugins(CosmosRenderPlugin)
        .add_systems(Startup, move || {
            if let Some(err) = &rejected {
                warn!("{}, starting with {}", err, scene);
            }
        })
        .run();
}
