//! Dialogue plugin wiring the engine resource and its systems.
use bevy::prelude::*;

use crate::core::{config::InteractionSettings, InteractionSet};

use super::{
    engine::DialogueEngine,
    systems::{close_dialogue_on_exit, start_requested_dialogues, tick_dialogue},
};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<InteractionSettings>()
            .map(|settings| settings.dialogue.clone())
            .unwrap_or_else(|| InteractionSettings::load_or_default().dialogue);

        app.insert_resource(DialogueEngine::new(&settings))
            .add_systems(Startup, log_dialogue_settings)
            .add_systems(
                Update,
                (
                    start_requested_dialogues,
                    close_dialogue_on_exit,
                    tick_dialogue,
                )
                    .chain()
                    .in_set(InteractionSet::Modal),
            );
    }
}

fn log_dialogue_settings(settings: Res<InteractionSettings>) {
    info!(
        "DialoguePlugin initialised: {:.0} chars/s, {:.2}s minimum per line, {:.2}s switch delay",
        settings.dialogue.chars_per_second,
        settings.dialogue.min_line_seconds,
        settings.dialogue.switch_delay_seconds,
    );
}
