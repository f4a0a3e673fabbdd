//! Proximity-driven interaction: the registry, interactable variants, carry, and teleports.

pub mod carry;
pub mod components;
pub mod door;
pub mod events;
pub mod plugin;
pub mod registry;
pub mod systems;
pub mod telemetry;
pub mod teleport;

pub use plugin::InteractionPlugin;
