use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Linear RGB color, each channel nominally in [0, 1]
pub type Rgb = [f32; 3];

/// Build a color from 8-bit channels (hex palette entries)
pub const fn rgb8(r: u8, g: u8, b: u8) -> Rgb {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Component-wise scale of a color
pub fn scale_rgb(c: Rgb, k: f32) -> Rgb {
    [c[0] * k, c[1] * k, c[2] * k]
}

/// Linear interpolation between two colors
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// The closed set of selectable scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneId {
    #[default]
    SolarSystem,
    EarthMoon,
    BlackHole,
    GalaxyCollision,
    #[serde(rename = "orion-constellation")]
    Orion,
    HelixNebula,
    HalleyComet,
}

impl SceneId {
    pub const ALL: [SceneId; 7] = [
        SceneId::SolarSystem,
        SceneId::EarthMoon,
        SceneId::BlackHole,
        SceneId::GalaxyCollision,
        SceneId::Orion,
        SceneId::HelixNebula,
        SceneId::HalleyComet,
    ];

    /// Position in [`SceneId::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier used on the command line and in serialized settings
    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::SolarSystem => "solar-system",
            SceneId::EarthMoon => "earth-moon",
            SceneId::BlackHole => "black-hole",
            SceneId::GalaxyCollision => "galaxy-collision",
            SceneId::Orion => "orion-constellation",
            SceneId::HelixNebula => "helix-nebula",
            SceneId::HalleyComet => "halley-comet",
        }
    }

    /// Human-readable name for the scene picker
    pub fn name(self) -> &'static str {
        match self {
            SceneId::SolarSystem => "Solar System",
            SceneId::EarthMoon => "Earth and Moon",
            SceneId::BlackHole => "Black Hole",
            SceneId::GalaxyCollision => "Galaxy Collision",
            SceneId::Orion => "Orion Constellation",
            SceneId::HelixNebula => "Helix Nebula",
            SceneId::HalleyComet => "Halley's Comet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneId::SolarSystem => {
                "The Sun and the eight planets on helical orbits with the asteroid belt"
            }
            SceneId::EarthMoon => "Earth with continents, oceans and atmosphere, with the Moon in orbit",
            SceneId::BlackHole => "A star being swallowed by a supermassive black hole",
            SceneId::GalaxyCollision => "The Milky Way and Andromeda colliding with star formation",
            SceneId::Orion => "Orion's main stars and the M42 nebula",
            SceneId::HelixNebula => "The Eye of God nebula with its central white dwarf",
            SceneId::HalleyComet => "The famous periodic comet with its ion and dust tails",
        }
    }

    /// Next scene in picker order, wrapping around
    pub fn next(self) -> SceneId {
        SceneId::ALL[(self.index() + 1) % SceneId::ALL.len()]
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SceneId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownScene(needle.to_string()))
    }
}

/// Chemical makeup of the comet, which only drives its palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CometComposition {
    #[default]
    Ice,
    Dust,
    Carbon,
    Sodium,
}

/// Colors of the comet parts for one composition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CometPalette {
    pub nucleus: Rgb,
    pub tail: Rgb,
    pub ion: Rgb,
}

impl CometComposition {
    pub const ALL: [CometComposition; 4] = [
        CometComposition::Ice,
        CometComposition::Dust,
        CometComposition::Carbon,
        CometComposition::Sodium,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CometComposition::Ice => "Ice",
            CometComposition::Dust => "Dust",
            CometComposition::Carbon => "Carbon",
            CometComposition::Sodium => "Sodium",
        }
    }

    pub fn palette(self) -> CometPalette {
        match self {
            CometComposition::Ice => CometPalette {
                nucleus: rgb8(0xa4, 0xeb, 0xf3),
                tail: rgb8(0x80, 0xd8, 0xff),
                ion: rgb8(0x00, 0xb0, 0xff),
            },
            CometComposition::Dust => CometPalette {
                nucleus: rgb8(0xff, 0xf5, 0x9d),
                tail: rgb8(0xff, 0xf1, 0x76),
                ion: rgb8(0xff, 0xeb, 0x3b),
            },
            CometComposition::Carbon => CometPalette {
                nucleus: rgb8(0xef, 0x9a, 0x9a),
                tail: rgb8(0xff, 0xcd, 0xd2),
                ion: rgb8(0xff, 0x52, 0x52),
            },
            CometComposition::Sodium => CometPalette {
                nucleus: rgb8(0xff, 0xcc, 0x80),
                tail: rgb8(0xff, 0xe0, 0xb2),
                ion: rgb8(0xff, 0x98, 0x00),
            },
        }
    }

    pub fn next(self) -> CometComposition {
        let i = CometComposition::ALL.iter().position(|c| *c == self).unwrap_or(0);
        CometComposition::ALL[(i + 1) % CometComposition::ALL.len()]
    }
}

impl fmt::Display for CometComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CometComposition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CometComposition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownComposition(needle.to_string()))
    }
}

/// Group transform of a sub-structure, relative to its scene root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: [f32; 3],
    /// Euler angles in radians, applied in XYZ order
    pub rotation: [f32; 3],
    pub scale: f32,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        translation: [0.0; 3],
        rotation: [0.0; 3],
        scale: 1.0,
    };

    pub const fn at(translation: [f32; 3]) -> Pose {
        Pose {
            translation,
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }

    pub const fn rotated(rotation: [f32; 3]) -> Pose {
        Pose {
            translation: [0.0; 3],
            rotation,
            scale: 1.0,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::IDENTITY
    }
}

/// How a structure's points combine with what is behind them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    Additive,
}

/// Visual size of a structure's points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSize {
    /// Multiple of the live `particleSize` setting
    Scaled(f32),
    /// Size that ignores `particleSize`; in pixels when attenuation is off
    Fixed(f32),
}

impl PointSize {
    pub fn resolve(self, particle_size: f32) -> f32 {
        match self {
            PointSize::Scaled(k) => k * particle_size,
            PointSize::Fixed(size) => size,
        }
    }
}

/// Per-structure render parameters handed to the rendering backend.
/// Opacity may be rewritten every frame by the owning scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub size: PointSize,
    pub blend: Blend,
    pub opacity: f32,
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub soft_texture: bool,
    /// First random scalar of each particle multiplies its size
    pub per_particle_size: bool,
}

impl RenderParams {
    /// Opaque points scaled by the particle size
    pub fn points(size: f32) -> Self {
        Self {
            size: PointSize::Scaled(size),
            blend: Blend::Normal,
            opacity: 1.0,
            size_attenuation: true,
            depth_write: true,
            soft_texture: false,
            per_particle_size: false,
        }
    }

    /// Translucent additive glow scaled by the particle size
    pub fn glow(size: f32, opacity: f32) -> Self {
        Self {
            size: PointSize::Scaled(size),
            blend: Blend::Additive,
            opacity,
            size_attenuation: true,
            depth_write: false,
            soft_texture: false,
            per_particle_size: false,
        }
    }

    pub fn fixed(mut self, size: f32) -> Self {
        self.size = PointSize::Fixed(size);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn soft(mut self) -> Self {
        self.soft_texture = true;
        self
    }

    pub fn sized_per_particle(mut self) -> Self {
        self.per_particle_size = true;
        self
    }

    pub fn flat(mut self) -> Self {
        self.size_attenuation = false;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0 || self.blend == Blend::Additive
    }
}
