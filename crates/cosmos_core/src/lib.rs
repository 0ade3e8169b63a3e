pub mod buffer;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use buffer::{OriginalPositions, ParticleBuffer};
pub use config::{SceneSettings, Sensitivity, SettingField};
pub use constants::*;
pub use error::ParseError;
pub use types::*;
