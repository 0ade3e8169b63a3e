use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// Side of the soft particle sprite in pixels
pub const SOFT_TEXTURE_SIZE: u32 = 32;

/// Radial-gradient sprite shared by every structure that asks for soft points.
/// Inserted at startup and released on app exit.
#[derive(Resource)]
pub struct SoftParticleTexture(pub Handle<Image>);

/// Gradient alpha at normalized distance `d` from the sprite center:
/// 1 at the center, 0.2 at half radius, 0 at the rim
pub fn soft_alpha(d: f32) -> f32 {
    if d <= 0.0 {
        1.0
    } else if d < 0.5 {
        1.0 - 1.6 * d
    } else if d < 1.0 {
        0.2 * (1.0 - d) * 2.0
    } else {
        0.0
    }
}

/// RGBA8 pixels of the sprite, white with gradient alpha
pub fn soft_pixels(size: u32) -> Vec<u8> {
    let half = size as f32 / 2.0;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let d = (dx * dx + dy * dy).sqrt() / half;
            let a = (soft_alpha(d) * 255.0).round() as u8;
            data.extend_from_slice(&[255, 255, 255, a]);
        }
    }
    data
}

pub fn init_soft_texture(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let image = Image::new(
        Extent3d {
            width: SOFT_TEXTURE_SIZE,
            height: SOFT_TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        soft_pixels(SOFT_TEXTURE_SIZE),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    commands.insert_resource(SoftParticleTexture(images.add(image)));
    info!("Soft particle texture ready ({0}x{0})", SOFT_TEXTURE_SIZE);
}

pub fn release_soft_texture(
    mut commands: Commands,
    texture: Option<Res<SoftParticleTexture>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(texture) = texture else {
        return;
    };
    images.remove(&texture.0);
    commands.remove_resource::<SoftParticleTexture>();
    info!("Soft particle texture released");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_stops() {
        assert_eq!(soft_alpha(0.0), 1.0);
        assert!((soft_alpha(0.5) - 0.2).abs() < 1e-6);
        assert_eq!(soft_alpha(1.0), 0.0);
        assert_eq!(soft_alpha(1.4), 0.0);
    }

    #[test]
    fn sprite_is_bright_in_the_middle_and_clear_in_the_corners() {
        let size = SOFT_TEXTURE_SIZE;
        let pixels = soft_pixels(size);
        assert_eq!(pixels.len(), (size * size * 4) as usize);
        let alpha = |x: u32, y: u32| pixels[((y * size + x) * 4 + 3) as usize];
        assert!(alpha(size / 2, size / 2) > 230);
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(size - 1, size - 1), 0);
    }
}
