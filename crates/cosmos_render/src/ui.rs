use bevy::prelude::*;
use cosmos_core::{SceneId, SceneSettings};
use cosmos_sim::Engine;

use super::camera::SceneCamera;
use super::particles::pose_transform;

/// Marker for the HUD text
#[derive(Component)]
pub struct HudText;

/// Screen-space text following one scene label
#[derive(Component)]
pub struct SceneLabelText {
    pub index: usize,
}

/// Scene generation the label nodes were spawned for
#[derive(Resource, Default)]
pub struct LabelState {
    pub generation: Option<u32>,
}

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Cosmos"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(0.7, 0.85, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            max_width: Val::Px(520.0),
            ..default()
        },
        HudText,
    ));
}

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

fn settings_summary(id: SceneId, s: &SceneSettings) -> String {
    let mut line = format!(
        "Particles: {} | Size: {:.3} | Speed: {:.1}x | Glow: {:.1} | Camera: {:.0}",
        s.particle_count, s.particle_size, s.animation_speed, s.glow_intensity, s.camera_distance
    );
    let extra = match id {
        SceneId::SolarSystem => format!(
            "Helix: {:.1} | Inclination: {:.2} | Trails: {}",
            s.helix_amplitude(),
            s.orbit_inclination(),
            s.trail_length
        ),
        SceneId::EarthMoon => format!(
            "Atmosphere: {:.2} | Stars: {:.1}x",
            s.atmosphere_opacity(),
            s.star_density()
        ),
        SceneId::BlackHole => format!("Gravity: {:.1}", s.black_hole_gravity()),
        SceneId::GalaxyCollision => format!("Collision: {:.1}x", s.collision_speed()),
        SceneId::HalleyComet => format!(
            "Tail: {:.0} | Comet speed: {:.1} | Size: {:.1} | {}",
            s.comet_tail_length(),
            s.comet_speed(),
            s.comet_size(),
            s.comet_composition()
        ),
        SceneId::Orion | SceneId::HelixNebula => String::new(),
    };
    if !extra.is_empty() {
        line.push('\n');
        line.push_str(&extra);
    }
    line
}

/// Update HUD text every 10th frame
pub fn update_hud(
    engine: Res<Engine>,
    mut throttle: ResMut<HudThrottle>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 10 != 0 {
        return;
    }
    let Ok(mut text) = hud_query.get_single_mut() else {
        return;
    };

    let id = engine.scene_id();
    let settings = engine.settings();
    let flag = |on: bool| if on { "on" } else { "off" };

    **text = format!(
        "{} [{}/{}]\n\
         {}\n\
         \n\
         {}\n\
         Orbits: {} | Labels: {} | {} particles\n\
         \n\
         [1-7] Scene  [O] Orbits  [L] Labels  [R] Reset\n\
         [Up/Down] Count  [Left/Right] Speed  [-/=] Zoom  [C] Composition",
        id.name(),
        id.index() + 1,
        SceneId::ALL.len(),
        id.description(),
        settings_summary(id, settings),
        flag(settings.show_orbits),
        flag(settings.show_labels),
        engine.scene().particle_count(),
    );
}

/// Respawn the label nodes after the scene was rebuilt
pub fn sync_scene_labels(
    mut commands: Commands,
    engine: Res<Engine>,
    mut state: ResMut<LabelState>,
    existing: Query<Entity, With<SceneLabelText>>,
) {
    if state.generation == Some(engine.generation) {
        return;
    }
    state.generation = Some(engine.generation);
    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }
    for (index, label) in engine.scene().labels().iter().enumerate() {
        commands.spawn((
            Text::new(label.text),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            SceneLabelText { index },
        ));
    }
}

/// Project each label into the viewport; hide it when labels are off or it is off screen
pub fn update_scene_labels(
    engine: Res<Engine>,
    camera_query: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
    mut labels: Query<(&SceneLabelText, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let scene = engine.scene();
    let root = pose_transform(&scene.root());
    let show = engine.settings().show_labels;

    for (text, mut node, mut visibility) in labels.iter_mut() {
        let Some(label) = scene.labels().get(text.index) else {
            continue;
        };
        let world = root.transform_point(Vec3::from(label.local_position(scene.structures())));
        let screen = if show {
            camera.world_to_viewport(camera_transform, world).ok()
        } else {
            None
        };
        match screen {
            Some(pos) => {
                node.left = Val::Px(pos.x);
                node.top = Val::Px(pos.y);
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

/// What a key press asks of the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Switch scene, loading its preset
    Select(SceneId),
    /// Replace the settings of the active scene
    Apply(SceneSettings),
}

const SCENE_KEYS: [KeyCode; 7] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
];

/// Map a key to a control, or `None` when the key is unbound here
pub fn control_for_key(key: KeyCode, id: SceneId, current: &SceneSettings) -> Option<Control> {
    if let Some(slot) = SCENE_KEYS.iter().position(|k| *k == key) {
        return Some(Control::Select(SceneId::ALL[slot]));
    }

    let mut s = current.clone();
    match key {
        KeyCode::KeyO => s.show_orbits = !s.show_orbits,
        KeyCode::KeyL => s.show_labels = !s.show_labels,
        KeyCode::ArrowUp => s.particle_count = s.particle_count.saturating_add(500),
        KeyCode::ArrowDown => s.particle_count = s.particle_count.saturating_sub(500),
        KeyCode::ArrowRight => s.animation_speed += 0.1,
        KeyCode::ArrowLeft => s.animation_speed -= 0.1,
        KeyCode::Equal => s.camera_distance -= 5.0,
        KeyCode::Minus => s.camera_distance += 5.0,
        KeyCode::KeyC if id == SceneId::HalleyComet => {
            s.comet_composition = Some(s.comet_composition().next());
        }
        KeyCode::KeyR => s = SceneSettings::preset(id),
        _ => return None,
    }
    Some(Control::Apply(s))
}

/// Keyboard controls: every change replaces the settings wholesale
pub fn settings_input_system(keyboard: Res<ButtonInput<KeyCode>>, mut engine: ResMut<Engine>) {
    for key in keyboard.get_just_pressed() {
        let control = control_for_key(*key, engine.scene_id(), engine.settings());
        match control {
            Some(Control::Select(id)) => engine.select_scene_with(id, SceneSettings::preset(id)),
            Some(Control::Apply(settings)) => {
                engine.apply_settings(settings);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_core::CometComposition;

    #[test]
    fn digits_select_scenes_in_picker_order() {
        let s = SceneSettings::default();
        assert_eq!(
            control_for_key(KeyCode::Digit1, SceneId::Orion, &s),
            Some(Control::Select(SceneId::SolarSystem))
        );
        assert_eq!(
            control_for_key(KeyCode::Digit7, SceneId::Orion, &s),
            Some(Control::Select(SceneId::HalleyComet))
        );
    }

    #[test]
    fn toggles_flip_one_field() {
        let s = SceneSettings::preset(SceneId::SolarSystem);
        let Some(Control::Apply(next)) = control_for_key(KeyCode::KeyO, SceneId::SolarSystem, &s) else {
            panic!("orbit toggle should apply settings");
        };
        assert_eq!(next.show_orbits, !s.show_orbits);
        assert_eq!(s.changed_fields(&next).len(), 1);
    }

    #[test]
    fn composition_cycles_only_on_the_comet() {
        let s = SceneSettings::preset(SceneId::HalleyComet);
        let Some(Control::Apply(next)) = control_for_key(KeyCode::KeyC, SceneId::HalleyComet, &s) else {
            panic!("composition key should apply settings on the comet");
        };
        assert_eq!(next.comet_composition(), CometComposition::Ice.next());
        assert_eq!(control_for_key(KeyCode::KeyC, SceneId::BlackHole, &s), None);
    }

    #[test]
    fn reset_restores_the_preset() {
        let mut s = SceneSettings::preset(SceneId::BlackHole);
        s.particle_count = 2000;
        s.black_hole_gravity = Some(2.5);
        assert_eq!(
            control_for_key(KeyCode::KeyR, SceneId::BlackHole, &s),
            Some(Control::Apply(SceneSettings::preset(SceneId::BlackHole)))
        );
    }

    #[test]
    fn summary_lists_scene_fields() {
        let s = SceneSettings::preset(SceneId::HalleyComet);
        let summary = settings_summary(SceneId::HalleyComet, &s);
        assert!(summary.contains("Particles: 8000"));
        assert!(summary.contains("Tail: 50"));
        assert!(!settings_summary(SceneId::Orion, &s).contains('\n'));
    }
}
