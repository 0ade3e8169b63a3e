use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use cosmos_core::{Blend, ParticleBuffer, Pose, RenderParams, SceneSettings};
use cosmos_sim::{Engine, SubStructure};

use super::camera::{CAMERA_FOV_DEGREES, camera_position};
use super::texture::SoftParticleTexture;

/// Each particle is drawn as three perpendicular quads
pub const SPLAT_VERTICES: usize = 12;

/// World size of one pixel per unit of distance, at a 1080-pixel-high view
const PIXEL_ANGLE: f32 = CAMERA_FOV_DEGREES * std::f32::consts::PI / 180.0 / 1080.0;

const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
const PLANE_NORMALS: [[f32; 3]; 3] = [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Which engine-owned structure list a visual mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Scene,
    Background,
}

/// Parent entity of one layer; carries the scene root pose
#[derive(Component)]
pub struct LayerRoot(pub Layer);

/// Mesh entity mirroring one sub-structure
#[derive(Component)]
pub struct StructureVisual {
    pub layer: Layer,
    pub index: usize,
    len: usize,
    position_revision: u64,
    color_revision: u64,
    scale: SplatScale,
    opacity: f32,
}

/// Engine generations the spawned visuals belong to
#[derive(Resource, Default)]
pub struct ParticleRenderState {
    pub scene_generation: Option<u32>,
    pub background_generation: Option<u32>,
}

/// Splat size resolved from the live settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatScale {
    /// Half extent: world units, or pixels for screen-sized points
    pub half: f32,
    /// Eye position when the size is in pixels
    pub eye: Option<Vec3>,
}

impl SplatScale {
    pub fn resolve(render: &RenderParams, settings: &SceneSettings) -> Self {
        let half = render.size.resolve(settings.particle_size) * 0.5;
        let eye = (!render.size_attenuation).then(|| camera_position(settings.camera_distance));
        Self { half, eye }
    }

    /// Half extent in world units for a splat centered at `p`
    pub fn half_at(&self, p: Vec3) -> f32 {
        match self.eye {
            Some(eye) => self.half * PIXEL_ANGLE * eye.distance(p),
            None => self.half,
        }
    }
}

fn corner_offset(plane: usize, corner: [f32; 2], half: f32) -> Vec3 {
    let [a, b] = [corner[0] * half, corner[1] * half];
    match plane {
        0 => Vec3::new(a, b, 0.0),
        1 => Vec3::new(0.0, b, a),
        _ => Vec3::new(a, 0.0, b),
    }
}

pub fn splat_positions(buf: &ParticleBuffer, render: &RenderParams, scale: SplatScale) -> Vec<[f32; 3]> {
    let mut out = Vec::with_capacity(buf.len() * SPLAT_VERTICES);
    for i in 0..buf.len() {
        let p = Vec3::from(buf.position(i));
        let mut half = scale.half_at(p);
        if render.per_particle_size {
            if let Some(k) = buf.random(i).first() {
                half *= k;
            }
        }
        for plane in 0..3 {
            for corner in CORNERS {
                out.push((p + corner_offset(plane, corner, half)).to_array());
            }
        }
    }
    out
}

pub fn splat_colors(buf: &ParticleBuffer) -> Vec<[f32; 4]> {
    let mut out = Vec::with_capacity(buf.len() * SPLAT_VERTICES);
    for &[r, g, b] in buf.color_triplets() {
        out.extend(std::iter::repeat_n([r, g, b, 1.0], SPLAT_VERTICES));
    }
    out
}

fn splat_uvs(count: usize) -> Vec<[f32; 2]> {
    (0..count * 3).flat_map(|_| CORNER_UVS).collect()
}

fn splat_normals(count: usize) -> Vec<[f32; 3]> {
    (0..count)
        .flat_map(|_| PLANE_NORMALS)
        .flat_map(|n| std::iter::repeat_n(n, 4))
        .collect()
}

fn splat_indices(count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(count * 18);
    for quad in 0..(count * 3) as u32 {
        let b = quad * 4;
        indices.extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
    }
    indices
}

pub fn splat_mesh(buf: &ParticleBuffer, render: &RenderParams, scale: SplatScale) -> Mesh {
    let count = buf.len();
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, splat_positions(buf, render, scale))
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, splat_normals(count))
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, splat_uvs(count))
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, splat_colors(buf))
        .with_inserted_indices(bevy::render::mesh::Indices::U32(splat_indices(count)))
}

fn alpha_mode(render: &RenderParams) -> AlphaMode {
    match render.blend {
        Blend::Additive => AlphaMode::Add,
        Blend::Normal if render.opacity < 1.0 || render.soft_texture => AlphaMode::Blend,
        Blend::Normal => AlphaMode::Opaque,
    }
}

fn splat_material(render: &RenderParams, soft: Option<&SoftParticleTexture>) -> StandardMaterial {
    let texture = if render.soft_texture { soft.map(|t| t.0.clone()) } else { None };
    StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, render.opacity),
        base_color_texture: texture,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: alpha_mode(render),
        ..default()
    }
}

/// Black sphere drawn over whatever sits behind the scene center
fn occluder_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::BLACK,
        unlit: true,
        alpha_mode: AlphaMode::Opaque,
        ..default()
    }
}

fn layer_occluder(engine: &Engine, layer: Layer) -> Option<f32> {
    match layer {
        Layer::Scene => engine.scene().occluder_radius(),
        Layer::Background => None,
    }
}

pub fn pose_transform(pose: &Pose) -> Transform {
    let [x, y, z] = pose.rotation;
    Transform {
        translation: Vec3::from(pose.translation),
        rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
        scale: Vec3::splat(pose.scale),
    }
}

fn visibility_of(visible: bool) -> Visibility {
    if visible { Visibility::Inherited } else { Visibility::Hidden }
}

fn layer_structures(engine: &Engine, layer: Layer) -> &[SubStructure] {
    match layer {
        Layer::Scene => engine.scene().structures(),
        Layer::Background => engine.background().structures(),
    }
}

fn spawn_layer(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    soft: Option<&SoftParticleTexture>,
    engine: &Engine,
    layer: Layer,
) {
    let settings = engine.settings();
    let root = match layer {
        Layer::Scene => pose_transform(&engine.scene().root()),
        Layer::Background => Transform::IDENTITY,
    };
    let structures = layer_structures(engine, layer);
    let occluder = layer_occluder(engine, layer);
    let mut spawned = 0;

    commands
        .spawn((LayerRoot(layer), root, Visibility::default()))
        .with_children(|parent| {
            for (index, s) in structures.iter().enumerate() {
                // nothing to draw, and an empty mesh has no bounds
                if s.is_empty() {
                    continue;
                }
                let scale = SplatScale::resolve(&s.render, settings);
                let mesh = meshes.add(splat_mesh(&s.particles, &s.render, scale));
                let material = materials.add(splat_material(&s.render, soft));
                parent.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    pose_transform(&s.pose),
                    visibility_of(s.visible),
                    Name::new(s.name),
                    StructureVisual {
                        layer,
                        index,
                        len: s.len(),
                        position_revision: s.particles.position_revision(),
                        color_revision: s.particles.color_revision(),
                        scale,
                        opacity: s.render.opacity,
                    },
                ));
                spawned += 1;
            }
            if let Some(radius) = occluder {
                parent.spawn((
                    Mesh3d(meshes.add(Sphere::new(radius).mesh().uv(32, 32))),
                    MeshMaterial3d(materials.add(occluder_material())),
                    Transform::IDENTITY,
                    Name::new("occluder"),
                ));
            }
        });

    info!("Spawned {} {:?} visuals", spawned, layer);
}

fn despawn_layer(commands: &mut Commands, roots: &Query<(Entity, &LayerRoot)>, layer: Layer) {
    for (entity, root) in roots.iter() {
        if root.0 == layer {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Respawn the meshes of a layer whenever the engine rebuilt it
pub fn sync_particle_visuals(
    mut commands: Commands,
    engine: Res<Engine>,
    soft: Option<Res<SoftParticleTexture>>,
    mut state: ResMut<ParticleRenderState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<(Entity, &LayerRoot)>,
) {
    let soft = soft.as_deref();
    if state.scene_generation != Some(engine.generation) {
        state.scene_generation = Some(engine.generation);
        despawn_layer(&mut commands, &roots, Layer::Scene);
        spawn_layer(&mut commands, &mut meshes, &mut materials, soft, &engine, Layer::Scene);
    }
    if state.background_generation != Some(engine.background_generation) {
        state.background_generation = Some(engine.background_generation);
        despawn_layer(&mut commands, &roots, Layer::Background);
        spawn_layer(&mut commands, &mut meshes, &mut materials, soft, &engine, Layer::Background);
    }
}

/// Upload changed buffers and apply poses, visibility and opacity
pub fn update_particle_visuals(
    engine: Res<Engine>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut roots: Query<(&LayerRoot, &mut Transform), Without<StructureVisual>>,
    mut visuals: Query<(
        &mut StructureVisual,
        &Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
        &mut Transform,
        &mut Visibility,
    )>,
) {
    for (root, mut transform) in roots.iter_mut() {
        if root.0 == Layer::Scene {
            transform.set_if_neq(pose_transform(&engine.scene().root()));
        }
    }

    let settings = engine.settings();
    for (mut visual, mesh, material, mut transform, mut visibility) in visuals.iter_mut() {
        let Some(s) = layer_structures(&engine, visual.layer).get(visual.index) else {
            continue;
        };
        if s.len() != visual.len {
            continue;
        }
        transform.set_if_neq(pose_transform(&s.pose));
        visibility.set_if_neq(visibility_of(s.visible));

        let buf = &s.particles;
        let scale = SplatScale::resolve(&s.render, settings);
        let moved = visual.position_revision != buf.position_revision() || visual.scale != scale;
        let recolored = visual.color_revision != buf.color_revision();
        if moved || recolored {
            if let Some(mesh) = meshes.get_mut(&mesh.0) {
                if moved {
                    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, splat_positions(buf, &s.render, scale));
                }
                if recolored {
                    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, splat_colors(buf));
                }
            }
            visual.position_revision = buf.position_revision();
            visual.color_revision = buf.color_revision();
            visual.scale = scale;
        }

        if visual.opacity != s.render.opacity {
            if let Some(material) = materials.get_mut(&material.0) {
                material.base_color = Color::srgba(1.0, 1.0, 1.0, s.render.opacity);
                material.alpha_mode = alpha_mode(&s.render);
            }
            visual.opacity = s.render.opacity;
        }
    }
}
