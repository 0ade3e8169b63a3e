use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use cosmos_sim::Engine;

/// Height of the viewpoint above the scene plane
pub const CAMERA_HEIGHT: f32 = 30.0;
/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 60.0;
/// Far clip plane, past the outer background shell
pub const CAMERA_FAR: f32 = 2000.0;

/// Marker for the fixed scene camera
#[derive(Component)]
pub struct SceneCamera {
    /// Distance the transform was last placed at
    pub distance: f32,
}

/// Viewpoint for a camera distance, looking at the origin
pub fn camera_position(distance: f32) -> Vec3 {
    Vec3::new(0.0, CAMERA_HEIGHT, distance)
}

pub fn spawn_camera(mut commands: Commands, engine: Res<Engine>) {
    let distance = engine.settings().camera_distance;
    let pos = camera_position(distance);

    info!("Camera spawned at ({:.0}, {:.0}, {:.0})", pos.x, pos.y, pos.z);

    commands.spawn((
        Camera3d::default(),
        IsDefaultUiCamera,
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            far: CAMERA_FAR,
            ..default()
        }),
        DistanceFog {
            color: Color::srgb(0.0, 0.0, 8.0 / 255.0),
            falloff: FogFalloff::Linear {
                start: 100.0,
                end: 500.0,
            },
            ..default()
        },
        Transform::from_translation(pos).looking_at(Vec3::ZERO, Vec3::Y),
        SceneCamera { distance },
    ));
}

/// Move the camera when `cameraDistance` changes
pub fn follow_camera_distance(
    engine: Res<Engine>,
    mut query: Query<(&mut Transform, &mut SceneCamera)>,
) {
    let distance = engine.settings().camera_distance;
    for (mut transform, mut camera) in query.iter_mut() {
        if camera.distance == distance {
            continue;
        }
        camera.distance = distance;
        *transform = Transform::from_translation(camera_position(distance)).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
