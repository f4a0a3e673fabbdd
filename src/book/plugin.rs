//! Book plugin wiring the reader resource and its systems.
use bevy::prelude::*;

use crate::core::{config::InteractionSettings, InteractionSet};

use super::{
    components::CursorCapture,
    reader::BookReader,
    systems::{handle_book_input, open_requested_books, tick_book_reader},
};

pub struct BookPlugin;

impl Plugin for BookPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<InteractionSettings>()
            .map(|settings| settings.book.clone())
            .unwrap_or_else(|| InteractionSettings::load_or_default().book);

        info!(
            "BookPlugin initialised: panel fade {:.3}s, flip phase {:.3}s",
            settings.panel_fade_seconds, settings.flip_phase_seconds
        );

        app.insert_resource(BookReader::new(&settings))
            .init_resource::<CursorCapture>()
            .add_systems(
                Update,
                (open_requested_books, handle_book_input, tick_book_reader)
                    .chain()
                    .in_set(InteractionSet::Modal),
            );
    }
}
