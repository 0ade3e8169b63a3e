pub mod clock;
pub mod engine;
pub mod pipeline;
pub mod scene;
pub mod scenes;
pub mod structure;

pub use clock::{FrameClock, FrameTime};
pub use engine::{Engine, SettingsOutcome};
pub use scene::{MotionState, Scene, SceneRng};
pub use structure::{SceneLabel, SubStructure};
