use bevy::app::AppExit;
use bevy::prelude::*;

use super::engine::Engine;

/// Bevy plugin driving the engine once per rendered frame
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, engine_tick)
            .add_systems(Last, engine_shutdown.run_if(on_event::<AppExit>));
    }
}

/// Main simulation tick: every update rule runs exactly once per frame
pub fn engine_tick(mut engine: ResMut<Engine>, time: Res<Time>) {
    engine.tick(time.delta_secs());
}

fn engine_shutdown(mut engine: ResMut<Engine>) {
    engine.shutdown();
}
