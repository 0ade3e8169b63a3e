use crate::types::Rgb;

/// Fixed-length particle storage of one sub-structure.
///
/// Positions and colors are flat `xyz`/`rgb` triplets of the same length.
/// An optional randoms channel holds `stride` scalars per particle. The
/// length is set at construction and never changes; mutation goes through
/// slices so nothing can resize the storage. Every mutation of a channel
/// must be followed by the matching `mark_*_dirty` call so the renderer
/// re-uploads it.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    randoms: Vec<f32>,
    random_stride: usize,
    position_revision: u64,
    color_revision: u64,
}

impl ParticleBuffer {
    /// Zeroed positions, white colors, no randoms channel
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![1.0; count * 3],
            randoms: Vec::new(),
            random_stride: 0,
            position_revision: 0,
            color_revision: 0,
        }
    }

    /// Like [`ParticleBuffer::new`] with `stride` random scalars per particle
    pub fn with_randoms(count: usize, stride: usize) -> Self {
        Self {
            randoms: vec![0.0; count * stride],
            random_stride: stride,
            ..Self::new(count)
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut [f32] {
        &mut self.colors
    }

    pub fn randoms(&self) -> &[f32] {
        &self.randoms
    }

    pub fn random_stride(&self) -> usize {
        self.random_stride
    }

    /// Positions and randoms borrowed together, for kernels that read one
    /// while writing the other
    pub fn positions_and_randoms_mut(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.positions, &self.randoms)
    }

    pub fn positions_and_randoms_both_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.positions, &mut self.randoms)
    }

    /// Random scalars of particle `i`
    pub fn random(&self, i: usize) -> &[f32] {
        let s = self.random_stride;
        &self.randoms[i * s..(i + 1) * s]
    }

    pub fn set_random(&mut self, i: usize, values: &[f32]) {
        let s = self.random_stride;
        self.randoms[i * s..(i + 1) * s].copy_from_slice(&values[..s]);
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        ]
    }

    pub fn set_position(&mut self, i: usize, p: [f32; 3]) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&p);
    }

    pub fn color(&self, i: usize) -> Rgb {
        [self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2]]
    }

    pub fn set_color(&mut self, i: usize, c: Rgb) {
        self.colors[i * 3..i * 3 + 3].copy_from_slice(&c);
    }

    /// Paint every particle the same color
    pub fn fill_color(&mut self, c: Rgb) {
        for chunk in self.colors.chunks_exact_mut(3) {
            chunk.copy_from_slice(&c);
        }
    }

    pub fn mark_positions_dirty(&mut self) {
        self.position_revision += 1;
    }

    pub fn mark_colors_dirty(&mut self) {
        self.color_revision += 1;
    }

    /// Bumped on every position mutation; the renderer re-uploads on change
    pub fn position_revision(&self) -> u64 {
        self.position_revision
    }

    pub fn color_revision(&self) -> u64 {
        self.color_revision
    }

    /// Positions viewed as vertex triplets
    pub fn vertices(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors viewed as rgb triplets
    pub fn color_triplets(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.colors)
    }

    /// True when no channel holds NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(&self.colors)
            .chain(&self.randoms)
            .all(|v| v.is_finite())
    }
}

/// Immutable snapshot of a buffer's generated positions
#[derive(Debug, Clone)]
pub struct OriginalPositions(Box<[f32]>);

impl OriginalPositions {
    pub fn snapshot(buffer: &ParticleBuffer) -> Self {
        Self(buffer.positions().into())
    }

    pub fn len(&self) -> usize {
        self.0.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.0[i * 3], self.0[i * 3 + 1], self.0[i * 3 + 2]]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_hold_three_floats_per_particle() {
        let buf = ParticleBuffer::with_randoms(10, 2);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.positions().len(), 30);
        assert_eq!(buf.colors().len(), 30);
        assert_eq!(buf.randoms().len(), 20);
        assert_eq!(buf.vertices().len(), 10);
    }

    #[test]
    fn setters_address_the_right_triplet() {
        let mut buf = ParticleBuffer::new(3);
        buf.set_position(1, [1.0, 2.0, 3.0]);
        buf.set_color(2, [0.1, 0.2, 0.3]);
        assert_eq!(buf.positions()[3..6], [1.0, 2.0, 3.0]);
        assert_eq!(buf.color(2), [0.1, 0.2, 0.3]);
        assert_eq!(buf.vertices()[1], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn revisions_track_dirty_marks() {
        let mut buf = ParticleBuffer::new(4);
        assert_eq!(buf.position_revision(), 0);
        buf.mark_positions_dirty();
        buf.mark_positions_dirty();
        buf.mark_colors_dirty();
        assert_eq!(buf.position_revision(), 2);
        assert_eq!(buf.color_revision(), 1);
    }

    #[test]
    fn snapshot_is_independent_of_live_buffer() {
        let mut buf = ParticleBuffer::new(2);
        buf.set_position(0, [5.0, 0.0, 0.0]);
        let original = OriginalPositions::snapshot(&buf);
        buf.set_position(0, [9.0, 9.0, 9.0]);
        assert_eq!(original.position(0), [5.0, 0.0, 0.0]);
        assert_eq!(original.len(), buf.len());
    }

    #[test]
    fn finite_check_catches_nan() {
        let mut buf = ParticleBuffer::new(2);
        assert!(buf.is_finite());
        buf.set_position(1, [f32::NAN, 0.0, 0.0]);
        assert!(!buf.is_finite());
    }
}
