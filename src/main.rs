use bevy::prelude::*;

mod book;
mod core;
mod dialogue;
mod interaction;
mod player;
mod ui;
mod world;

use crate::{
    book::BookPlugin, core::CorePlugin, dialogue::DialoguePlugin, interaction::InteractionPlugin,
    player::PlayerPlugin, ui::UiPlugin, world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            InteractionPlugin,
            DialoguePlugin,
            BookPlugin,
            PlayerPlugin,
            WorldPlugin,
            UiPlugin, // Reads state the modal plugins update
        ))
        .run();
}
