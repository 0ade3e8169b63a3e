use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::{CometComposition, SceneId};

/// Live scene configuration, replaced wholesale by the settings producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    pub particle_count: u32,
    pub particle_size: f32,
    /// Multiplies all time-based motion
    pub animation_speed: f32,
    /// Planet trail samples in the solar system
    pub trail_length: u32,
    pub glow_intensity: f32,
    pub camera_distance: f32,
    /// Orbit rings, or constellation lines in Orion
    pub show_orbits: bool,
    pub show_labels: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helix_amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_inclination: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_density: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_hole_gravity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comet_tail_length: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comet_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comet_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comet_composition: Option<CometComposition>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings::preset(SceneId::SolarSystem)
    }
}

impl SceneSettings {
    fn base(
        particle_count: u32,
        particle_size: f32,
        animation_speed: f32,
        trail_length: u32,
        glow_intensity: f32,
        camera_distance: f32,
        show_orbits: bool,
    ) -> Self {
        Self {
            particle_count,
            particle_size,
            animation_speed,
            trail_length,
            glow_intensity,
            camera_distance,
            show_orbits,
            show_labels: true,
            helix_amplitude: None,
            orbit_inclination: None,
            atmosphere_opacity: None,
            star_density: None,
            black_hole_gravity: None,
            collision_speed: None,
            comet_tail_length: None,
            comet_speed: None,
            comet_size: None,
            comet_composition: None,
        }
    }

    /// Default settings shown when a scene is picked
    pub fn preset(scene: SceneId) -> Self {
        match scene {
            SceneId::SolarSystem => Self {
                helix_amplitude: Some(3.0),
                orbit_inclination: Some(0.3),
                ..Self::base(8000, 0.03, 1.0, 150, 1.0, 60.0, true)
            },
            SceneId::EarthMoon => Self {
                atmosphere_opacity: Some(0.6),
                star_density: Some(1.0),
                ..Self::base(6000, 0.025, 1.0, 80, 1.2, 35.0, true)
            },
            SceneId::BlackHole => Self {
                black_hole_gravity: Some(1.0),
                ..Self::base(12000, 0.02, 1.0, 200, 1.5, 50.0, false)
            },
            SceneId::GalaxyCollision => Self {
                collision_speed: Some(1.0),
                ..Self::base(15000, 0.015, 0.8, 100, 1.0, 80.0, false)
            },
            SceneId::Orion => Self {
                star_density: Some(0.8),
                ..Self::base(10000, 0.03, 1.0, 0, 1.2, 40.0, true)
            },
            SceneId::HelixNebula => Self::base(20000, 0.012, 1.0, 0, 1.8, 45.0, false),
            SceneId::HalleyComet => Self {
                comet_tail_length: Some(DEFAULT_COMET_TAIL_LENGTH),
                comet_speed: Some(DEFAULT_COMET_SPEED),
                comet_size: Some(DEFAULT_COMET_SIZE),
                comet_composition: Some(CometComposition::Ice),
                ..Self::base(8000, 0.03, 1.0, 0, 1.2, 40.0, false)
            },
        }
    }

    pub fn helix_amplitude(&self) -> f32 {
        self.helix_amplitude.unwrap_or(DEFAULT_HELIX_AMPLITUDE)
    }

    pub fn orbit_inclination(&self) -> f32 {
        self.orbit_inclination.unwrap_or(DEFAULT_ORBIT_INCLINATION)
    }

    pub fn atmosphere_opacity(&self) -> f32 {
        self.atmosphere_opacity.unwrap_or(DEFAULT_ATMOSPHERE_OPACITY)
    }

    pub fn star_density(&self) -> f32 {
        self.star_density.unwrap_or(DEFAULT_STAR_DENSITY)
    }

    pub fn black_hole_gravity(&self) -> f32 {
        self.black_hole_gravity.unwrap_or(DEFAULT_BLACK_HOLE_GRAVITY)
    }

    pub fn collision_speed(&self) -> f32 {
        self.collision_speed.unwrap_or(DEFAULT_COLLISION_SPEED)
    }

    pub fn comet_tail_length(&self) -> f32 {
        self.comet_tail_length.unwrap_or(DEFAULT_COMET_TAIL_LENGTH)
    }

    pub fn comet_speed(&self) -> f32 {
        self.comet_speed.unwrap_or(DEFAULT_COMET_SPEED)
    }

    pub fn comet_size(&self) -> f32 {
        self.comet_size.unwrap_or(DEFAULT_COMET_SIZE)
    }

    pub fn comet_composition(&self) -> CometComposition {
        self.comet_composition.unwrap_or_default()
    }

    /// Copy with every numeric field clamped into its valid range.
    /// Also returns the fields that had to change.
    pub fn sanitized(&self) -> (SceneSettings, Vec<SettingField>) {
        let mut out = self.clone();
        let mut clamped = Vec::new();

        let count = self.particle_count.clamp(PARTICLE_COUNT_RANGE.0, PARTICLE_COUNT_RANGE.1);
        if count != self.particle_count {
            out.particle_count = count;
            clamped.push(SettingField::ParticleCount);
        }
        let trail = self.trail_length.clamp(TRAIL_LENGTH_RANGE.0, TRAIL_LENGTH_RANGE.1);
        if trail != self.trail_length {
            out.trail_length = trail;
            clamped.push(SettingField::TrailLength);
        }

        let mut fix = |field: SettingField, value: &mut f32, range: (f32, f32), default: f32| {
            let fixed = clamp_or(*value, range, default);
            if fixed != *value {
                *value = fixed;
                clamped.push(field);
            }
        };
        let preset = SceneSettings::default();
        fix(SettingField::ParticleSize, &mut out.particle_size, PARTICLE_SIZE_RANGE, preset.particle_size);
        fix(SettingField::AnimationSpeed, &mut out.animation_speed, ANIMATION_SPEED_RANGE, preset.animation_speed);
        fix(SettingField::GlowIntensity, &mut out.glow_intensity, GLOW_INTENSITY_RANGE, preset.glow_intensity);
        fix(SettingField::CameraDistance, &mut out.camera_distance, CAMERA_DISTANCE_RANGE, preset.camera_distance);

        let optional: [(SettingField, &mut Option<f32>, (f32, f32), f32); 9] = [
            (SettingField::HelixAmplitude, &mut out.helix_amplitude, HELIX_AMPLITUDE_RANGE, DEFAULT_HELIX_AMPLITUDE),
            (SettingField::OrbitInclination, &mut out.orbit_inclination, ORBIT_INCLINATION_RANGE, DEFAULT_ORBIT_INCLINATION),
            (SettingField::AtmosphereOpacity, &mut out.atmosphere_opacity, ATMOSPHERE_OPACITY_RANGE, DEFAULT_ATMOSPHERE_OPACITY),
            (SettingField::StarDensity, &mut out.star_density, STAR_DENSITY_RANGE, DEFAULT_STAR_DENSITY),
            (SettingField::BlackHoleGravity, &mut out.black_hole_gravity, BLACK_HOLE_GRAVITY_RANGE, DEFAULT_BLACK_HOLE_GRAVITY),
            (SettingField::CollisionSpeed, &mut out.collision_speed, COLLISION_SPEED_RANGE, DEFAULT_COLLISION_SPEED),
            (SettingField::CometTailLength, &mut out.comet_tail_length, COMET_TAIL_LENGTH_RANGE, DEFAULT_COMET_TAIL_LENGTH),
            (SettingField::CometSpeed, &mut out.comet_speed, COMET_SPEED_RANGE, DEFAULT_COMET_SPEED),
            (SettingField::CometSize, &mut out.comet_size, COMET_SIZE_RANGE, DEFAULT_COMET_SIZE),
        ];
        for (field, slot, range, default) in optional {
            if let Some(value) = slot.as_mut() {
                fix(field, value, range, default);
            }
        }

        (out, clamped)
    }

    /// Fields whose effective value differs between `self` and `other`.
    /// An absent optional field compares as its default.
    pub fn changed_fields(&self, other: &SceneSettings) -> Vec<SettingField> {
        SettingField::ALL
            .into_iter()
            .filter(|field| self.value_of(*field) != other.value_of(*field))
            .collect()
    }

    fn value_of(&self, field: SettingField) -> FieldValue {
        use FieldValue::*;
        match field {
            SettingField::ParticleCount => Int(self.particle_count),
            SettingField::ParticleSize => Float(self.particle_size),
            SettingField::AnimationSpeed => Float(self.animation_speed),
            SettingField::TrailLength => Int(self.trail_length),
            SettingField::GlowIntensity => Float(self.glow_intensity),
            SettingField::CameraDistance => Float(self.camera_distance),
            SettingField::ShowOrbits => Flag(self.show_orbits),
            SettingField::ShowLabels => Flag(self.show_labels),
            SettingField::HelixAmplitude => Float(self.helix_amplitude()),
            SettingField::OrbitInclination => Float(self.orbit_inclination()),
            SettingField::AtmosphereOpacity => Float(self.atmosphere_opacity()),
            SettingField::StarDensity => Float(self.star_density()),
            SettingField::BlackHoleGravity => Float(self.black_hole_gravity()),
            SettingField::CollisionSpeed => Float(self.collision_speed()),
            SettingField::CometTailLength => Float(self.comet_tail_length()),
            SettingField::CometSpeed => Float(self.comet_speed()),
            SettingField::CometSize => Float(self.comet_size()),
            SettingField::CometComposition => Composition(self.comet_composition()),
        }
    }
}

fn clamp_or(value: f32, range: (f32, f32), default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(range.0, range.1)
    } else {
        default
    }
}

#[derive(PartialEq)]
enum FieldValue {
    Int(u32),
    Float(f32),
    Flag(bool),
    Composition(CometComposition),
}

/// How a settings field change reaches the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Baked into buffer layout, needs full regeneration
    Rebuild,
    /// Color-only remap of existing buffers
    Recolor,
    /// Read by the update rules every frame
    Live,
}

/// Every field of [`SceneSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    ParticleCount,
    ParticleSize,
    AnimationSpeed,
    TrailLength,
    GlowIntensity,
    CameraDistance,
    ShowOrbits,
    ShowLabels,
    HelixAmplitude,
    OrbitInclination,
    AtmosphereOpacity,
    StarDensity,
    BlackHoleGravity,
    CollisionSpeed,
    CometTailLength,
    CometSpeed,
    CometSize,
    CometComposition,
}

impl SettingField {
    pub const ALL: [SettingField; 18] = [
        SettingField::ParticleCount,
        SettingField::ParticleSize,
        SettingField::AnimationSpeed,
        SettingField::TrailLength,
        SettingField::GlowIntensity,
        SettingField::CameraDistance,
        SettingField::ShowOrbits,
        SettingField::ShowLabels,
        SettingField::HelixAmplitude,
        SettingField::OrbitInclination,
        SettingField::AtmosphereOpacity,
        SettingField::StarDensity,
        SettingField::BlackHoleGravity,
        SettingField::CollisionSpeed,
        SettingField::CometTailLength,
        SettingField::CometSpeed,
        SettingField::CometSize,
        SettingField::CometComposition,
    ];

    pub fn sensitivity(self) -> Sensitivity {
        match self {
            SettingField::ParticleCount
            | SettingField::TrailLength
            | SettingField::StarDensity
            | SettingField::CometTailLength
            | SettingField::CometSize => Sensitivity::Rebuild,
            SettingField::CometComposition => Sensitivity::Recolor,
            _ => Sensitivity::Live,
        }
    }

    /// Serialized field name
    pub fn name(self) -> &'static str {
        match self {
            SettingField::ParticleCount => "particleCount",
            SettingField::ParticleSize => "particleSize",
            SettingField::AnimationSpeed => "animationSpeed",
            SettingField::TrailLength => "trailLength",
            SettingField::GlowIntensity => "glowIntensity",
            SettingField::CameraDistance => "cameraDistance",
            SettingField::ShowOrbits => "showOrbits",
            SettingField::ShowLabels => "showLabels",
            SettingField::HelixAmplitude => "helixAmplitude",
            SettingField::OrbitInclination => "orbitInclination",
            SettingField::AtmosphereOpacity => "atmosphereOpacity",
            SettingField::StarDensity => "starDensity",
            SettingField::BlackHoleGravity => "blackHoleGravity",
            SettingField::CollisionSpeed => "collisionSpeed",
            SettingField::CometTailLength => "cometTailLength",
            SettingField::CometSpeed => "cometSpeed",
            SettingField::CometSize => "cometSize",
            SettingField::CometComposition => "cometComposition",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serialize_with_camel_case_names() {
        let comet = SceneSettings::preset(SceneId::HalleyComet);
        let json = serde_json::to_string(&comet).unwrap();
        assert!(json.contains("\"particleCount\":8000"), "{}", json);
        assert!(json.contains("\"cometTailLength\":50.0"), "{}", json);
        assert!(json.contains("\"cometComposition\":\"Ice\""), "{}", json);
        assert!(!json.contains("helixAmplitude"), "absent fields are skipped: {}", json);

        let back: SceneSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comet);
    }

    #[test]
    fn settings_deserialize_without_scene_fields() {
        let json = r#"{
            "particleCount": 4000,
            "particleSize": 0.02,
            "animationSpeed": 1.5,
            "trailLength": 40,
            "glowIntensity": 1.0,
            "cameraDistance": 50.0,
            "showOrbits": false,
            "showLabels": true
        }"#;
        let s: SceneSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.particle_count, 4000);
        assert_eq!(s.trail_length, 40);
        assert_eq!(s.comet_composition, None);
        assert_eq!(s.comet_tail_length(), DEFAULT_COMET_TAIL_LENGTH);
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let s = SceneSettings::preset(SceneId::HelixNebula);
        assert_eq!(s.helix_amplitude(), 3.0);
        assert_eq!(s.orbit_inclination(), 0.3);
        assert_eq!(s.star_density(), 1.0);
        assert_eq!(s.atmosphere_opacity(), 0.5);
        assert_eq!(s.black_hole_gravity(), 1.0);
        assert_eq!(s.collision_speed(), 1.0);
        assert_eq!(s.comet_tail_length(), 50.0);
        assert_eq!(s.comet_speed(), 1.0);
        assert_eq!(s.comet_size(), 1.0);
        assert_eq!(s.comet_composition(), CometComposition::Ice);
    }

    #[test]
    fn presets_are_already_in_range() {
        for id in SceneId::ALL {
            let preset = SceneSettings::preset(id);
            let (clean, clamped) = preset.sanitized();
            assert!(clamped.is_empty(), "{} preset clamps {:?}", id, clamped);
            assert_eq!(clean, preset);
        }
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut s = SceneSettings::default();
        s.particle_count = 50;
        s.particle_size = f32::NAN;
        s.black_hole_gravity = Some(-4.0);
        let (clean, clamped) = s.sanitized();
        assert_eq!(clean.particle_count, 2000);
        assert_eq!(clean.particle_size, 0.03);
        assert_eq!(clean.black_hole_gravity, Some(0.3));
        assert!(clamped.contains(&SettingField::ParticleCount));
        assert!(clamped.contains(&SettingField::ParticleSize));
        assert!(clamped.contains(&SettingField::BlackHoleGravity));
    }

    #[test]
    fn explicit_default_is_not_a_change() {
        let a = SceneSettings::preset(SceneId::HelixNebula);
        let mut b = a.clone();
        b.comet_tail_length = Some(DEFAULT_COMET_TAIL_LENGTH);
        assert!(a.changed_fields(&b).is_empty());
        b.comet_composition = Some(CometComposition::Carbon);
        assert_eq!(a.changed_fields(&b), vec![SettingField::CometComposition]);
    }

    #[test]
    fn sensitivity_table() {
        assert_eq!(SettingField::ParticleCount.sensitivity(), Sensitivity::Rebuild);
        assert_eq!(SettingField::CometTailLength.sensitivity(), Sensitivity::Rebuild);
        assert_eq!(SettingField::CometSize.sensitivity(), Sensitivity::Rebuild);
        assert_eq!(SettingField::CometComposition.sensitivity(), Sensitivity::Recolor);
        for live in [
            SettingField::AnimationSpeed,
            SettingField::GlowIntensity,
            SettingField::CameraDistance,
            SettingField::ShowOrbits,
            SettingField::ShowLabels,
            SettingField::CometSpeed,
            SettingField::CollisionSpeed,
            SettingField::BlackHoleGravity,
        ] {
            assert_eq!(live.sensitivity(), Sensitivity::Live, "{} should be live", live.name());
        }
    }
}
