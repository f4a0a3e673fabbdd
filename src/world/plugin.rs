//! WorldPlugin spawns the demo scene and its interactable content.
use bevy::prelude::*;

use crate::world::{
    content::SceneContent,
    systems::{spawn_scene_content, spawn_world_environment},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let content = SceneContent::load_or_default();
        info!(
            "Scene content loaded: {} doors, {} npcs, {} books, {} items",
            content.doors.len(),
            content.npcs.len(),
            content.books.len(),
            content.items.len()
        );

        app.insert_resource(content).add_systems(
            Startup,
            (spawn_world_environment, spawn_scene_content),
        );
    }
}
