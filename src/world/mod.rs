//! World module housing the demo scene: ground, light, camera, actor, and content.
pub mod components;
pub mod content;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
