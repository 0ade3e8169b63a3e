use std::f32::consts::PI;

/// Angle that accumulates a per-frame step instead of being derived from the
/// clock, so changing the speed never makes the body jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitAccumulator {
    angle: f32,
}

impl OrbitAccumulator {
    pub fn new(start: f32) -> Self {
        Self { angle: start }
    }

    /// Advance by one frame's step and return the new angle
    pub fn advance(&mut self, step: f32) -> f32 {
        self.angle += step;
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

/// Looping progress scalar in [0, 1] that restarts at 0 after passing 1
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopProgress {
    value: f32,
}

impl LoopProgress {
    /// Progress resumed at `value`, clamped into [0, 1]
    pub fn at(value: f32) -> Self {
        Self { value: value.clamp(0.0, 1.0) }
    }

    pub fn advance(&mut self, step: f32) -> f32 {
        self.value += step;
        if self.value > 1.0 {
            self.value = 0.0;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Group position along the decaying infall spiral at `progress` in [0, 1]
pub fn infall_path(progress: f32) -> [f32; 3] {
    let radius = 28.0 * (1.0 - progress * 0.85);
    let angle = progress * PI * 10.0;
    [
        angle.cos() * radius,
        (progress * PI).sin() * 8.0 * (1.0 - progress),
        angle.sin() * radius,
    ]
}

/// Unit vector from `p` toward the origin; zero when `p` is the origin
pub fn toward_origin(p: [f32; 3]) -> [f32; 3] {
    let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
    if len > 0.0 {
        [-p[0] / len, -p[1] / len, -p[2] / len]
    } else {
        [0.0; 3]
    }
}

/// Write head over a fixed set of trail slots.
///
/// Each push overwrites the oldest slot, so a frame costs O(1) regardless of
/// trail length. The slot storage is a flat position slice owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrailRing {
    head: usize,
    capacity: usize,
}

impl TrailRing {
    pub fn new(capacity: usize) -> Self {
        Self { head: 0, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record `p` into `slots` (three floats per slot). No-op for an empty ring.
    pub fn push(&mut self, slots: &mut [f32], p: [f32; 3]) {
        if self.capacity == 0 {
            return;
        }
        let i = self.head * 3;
        slots[i..i + 3].copy_from_slice(&p);
        self.head = (self.head + 1) % self.capacity;
    }

    /// Slot indices from newest to oldest
    pub fn newest_first(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.capacity).map(move |k| (self.head + self.capacity - k) % self.capacity)
    }
}
