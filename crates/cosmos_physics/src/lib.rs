pub mod motion;
pub mod orbit;
pub mod sampling;

pub use orbit::{LoopProgress, OrbitAccumulator, TrailRing};
