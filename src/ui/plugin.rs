// src/ui/plugin.rs
//
// UiPlugin coordinates the HUD, dialogue panel, and book panel.

use bevy::prelude::*;

use crate::core::plugin::InteractionSet;

use super::{
    book_panel::{
        components::BookPanelState,
        systems::{spawn_book_panel, update_book_panel},
    },
    dialogue_panel::{
        components::DialoguePanelSettings,
        systems::{spawn_dialogue_panel, update_dialogue_panel},
    },
    hud::{
        components::PromptFade,
        systems::{
            spawn_hud, update_carried_item_hud, update_fade_overlay, update_prompt_panel,
        },
    },
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(DialoguePanelSettings::default())
            .init_resource::<PromptFade>()
            .init_resource::<BookPanelState>()
            .add_systems(Startup, (spawn_hud, spawn_dialogue_panel, spawn_book_panel))
            .add_systems(
                Update,
                (
                    update_prompt_panel,
                    update_carried_item_hud,
                    update_dialogue_panel,
                    update_book_panel,
                    update_fade_overlay,
                )
                    .in_set(InteractionSet::Presentation),
            );
    }
}
