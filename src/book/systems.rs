//! Systems routing book requests, paging input, and input capture.
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::{
    core::{
        input::{ActionInput, InteractionAction},
        modal::{ModalCoordinator, ModalKind},
        plugin::SimulationClock,
    },
    interaction::events::{BookRequested, InteractionFaulted, ModalTransitioned},
};

use super::{
    components::{BookControl, CursorCapture},
    reader::{BookMilestone, BookReader},
};

/// Opens the reader for each book activation and takes input capture.
#[allow(clippy::too_many_arguments)]
pub fn open_requested_books(
    mut requests: MessageReader<BookRequested>,
    mut reader: ResMut<BookReader>,
    mut modal: ResMut<ModalCoordinator>,
    mut clock: ResMut<SimulationClock>,
    mut cursor: Option<Single<&mut CursorOptions>>,
    mut capture: ResMut<CursorCapture>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
    mut faults: MessageWriter<InteractionFaulted>,
) {
    for request in requests.read() {
        if let Err(fault) = reader.open(request.source, request.book.clone(), &mut modal) {
            debug!(target: "book", "Book request from {} ignored: {}", request.source, fault);
            faults.write(InteractionFaulted {
                source: "book",
                fault,
            });
            continue;
        }

        clock.pause();
        if let Some(cursor) = cursor.as_mut() {
            capture.saved = Some((cursor.visible, cursor.grab_mode));
            cursor.visible = true;
            cursor.grab_mode = CursorGrabMode::None;
        }
        modal_changes.write(ModalTransitioned {
            kind: ModalKind::BookReader,
            opened: true,
        });
    }
}

/// Pages and closes the reader from keys and panel buttons.
#[allow(clippy::type_complexity)]
pub fn handle_book_input(
    input: Res<ActionInput>,
    mut reader: ResMut<BookReader>,
    buttons: Query<(&Interaction, &BookControl), (Changed<Interaction>, With<Button>)>,
) {
    if !reader.is_open() {
        return;
    }

    let mut requested = Vec::new();
    if input.pressed(InteractionAction::Cancel) {
        requested.push(BookControl::Close);
    }
    if input.pressed(InteractionAction::PagePrevious) {
        requested.push(BookControl::Previous);
    }
    if input.pressed(InteractionAction::PageNext) {
        requested.push(BookControl::Next);
    }
    requested.extend(
        buttons
            .iter()
            .filter(|(interaction, _)| **interaction == Interaction::Pressed)
            .map(|(_, control)| *control),
    );

    for control in requested {
        match control {
            BookControl::Previous => {
                reader.previous();
            }
            BookControl::Next => {
                reader.next();
            }
            BookControl::Close => reader.close(),
        }
    }
}

/// Steps the reader on real time and releases capture once the close fade ends.
pub fn tick_book_reader(
    mut reader: ResMut<BookReader>,
    mut modal: ResMut<ModalCoordinator>,
    mut clock: ResMut<SimulationClock>,
    mut cursor: Option<Single<&mut CursorOptions>>,
    mut capture: ResMut<CursorCapture>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
) {
    match reader.tick(clock.real_secs(), &mut modal) {
        Some(BookMilestone::Closed) => {
            clock.resume();
            if let (Some(cursor), Some((visible, grab_mode))) =
                (cursor.as_mut(), capture.saved.take())
            {
                cursor.visible = visible;
                cursor.grab_mode = grab_mode;
            }
            modal_changes.write(ModalTransitioned {
                kind: ModalKind::BookReader,
                opened: false,
            });
        }
        Some(BookMilestone::PageShown(index)) => {
            debug!(target: "book", "Showing page {} of {}", index + 1, reader.page_count());
        }
        None => {}
    }
}
