pub mod camera;
pub mod particles;
pub mod plugin;
pub mod texture;
pub mod ui;

pub use plugin::CosmosRenderPlugin;
