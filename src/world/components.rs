//! Components used by the world module.
use bevy::prelude::*;

/// Marker component identifying the main directional light (the "sun").
#[derive(Component, Default)]
pub struct PrimarySun;

/// Marker for entities spawned from scene content.
#[derive(Component, Debug, Clone, Copy)]
pub struct ContentBody;
