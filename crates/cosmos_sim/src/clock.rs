/// Time handed to the update rules for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the scene was selected
    pub elapsed: f32,
    /// Frames since the scene was selected
    pub frame: u64,
}

impl FrameTime {
    /// Scene time: elapsed seconds scaled by the animation speed
    pub fn scaled(&self, animation_speed: f32) -> f32 {
        self.elapsed * animation_speed
    }
}

/// Accumulates host frame deltas. Reset when another scene is selected.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: f32,
    frame: u64,
}

impl FrameClock {
    /// Advance by one host frame. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta: f32) -> FrameTime {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
        self.frame += 1;
        self.now()
    }

    pub fn now(&self) -> FrameTime {
        FrameTime {
            elapsed: self.elapsed,
            frame: self.frame,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
