use cosmos_core::{OriginalPositions, ParticleBuffer, Pose, RenderParams};

/// One visually distinct particle group of a scene.
///
/// Owns its live buffer and, for structures whose update rule works from
/// formation positions, the immutable snapshot taken at generation time.
#[derive(Debug, Clone)]
pub struct SubStructure {
    pub name: &'static str,
    pub particles: ParticleBuffer,
    original: Option<OriginalPositions>,
    pub pose: Pose,
    pub render: RenderParams,
    pub visible: bool,
}

impl SubStructure {
    pub fn new(name: &'static str, particles: ParticleBuffer, render: RenderParams) -> Self {
        Self {
            name,
            particles,
            original: None,
            pose: Pose::IDENTITY,
            render,
            visible: true,
        }
    }

    /// Structure that keeps a snapshot of its generated positions
    pub fn anchored(name: &'static str, particles: ParticleBuffer, render: RenderParams) -> Self {
        let original = OriginalPositions::snapshot(&particles);
        Self {
            original: Some(original),
            ..Self::new(name, particles, render)
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn original(&self) -> Option<&OriginalPositions> {
        self.original.as_ref()
    }

    /// Live buffer together with its formation snapshot
    pub fn anchored_mut(&mut self) -> Option<(&mut ParticleBuffer, &OriginalPositions)> {
        let original = self.original.as_ref()?;
        Some((&mut self.particles, original))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Text label pinned above a structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLabel {
    pub text: &'static str,
    /// Structure whose pose translation the label follows; `None` pins it to the scene root
    pub anchor: Option<usize>,
    pub offset: [f32; 3],
}

impl SceneLabel {
    pub const fn fixed(text: &'static str, offset: [f32; 3]) -> Self {
        Self { text, anchor: None, offset }
    }

    pub const fn above(text: &'static str, anchor: usize, height: f32) -> Self {
        Self {
            text,
            anchor: Some(anchor),
            offset: [0.0, height, 0.0],
        }
    }

    /// Position in scene-root coordinates
    pub fn local_position(&self, structures: &[SubStructure]) -> [f32; 3] {
        let base = self
            .anchor
            .and_then(|i| structures.get(i))
            .map(|s| s.pose.translation)
            .unwrap_or([0.0; 3]);
        [
            base[0] + self.offset[0],
            base[1] + self.offset[1],
            base[2] + self.offset[2],
        ]
    }
}
