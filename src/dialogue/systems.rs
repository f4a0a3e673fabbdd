//! Systems feeding requests, exits, and the advance action into the dialogue engine.
use bevy::prelude::*;

use crate::{
    core::{
        input::{ActionInput, InteractionAction},
        modal::{ModalCoordinator, ModalKind},
        plugin::SimulationClock,
    },
    interaction::events::{DialogueRequested, InteractionFaulted, ModalTransitioned, OverlapEnded},
};

use super::engine::{DialogueEngine, DialogueMilestone};

/// Opens dialogue for each NPC activation. Requests arriving while a
/// conversation runs are dropped.
pub fn start_requested_dialogues(
    mut requests: MessageReader<DialogueRequested>,
    mut engine: ResMut<DialogueEngine>,
    mut modal: ResMut<ModalCoordinator>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
    mut faults: MessageWriter<InteractionFaulted>,
) {
    for request in requests.read() {
        match engine.start(
            request.npc,
            request.speaker.clone(),
            request.lines.clone(),
            &mut modal,
        ) {
            Ok(()) => {
                modal_changes.write(ModalTransitioned {
                    kind: ModalKind::Dialogue,
                    opened: true,
                });
            }
            Err(fault) => {
                debug!(target: "dialogue", "Dialogue request from {} ignored: {}", request.npc, fault);
                faults.write(InteractionFaulted {
                    source: "dialogue",
                    fault,
                });
            }
        }
    }
}

/// Closes the conversation when the actor leaves the speaking NPC.
pub fn close_dialogue_on_exit(
    mut exits: MessageReader<OverlapEnded>,
    mut engine: ResMut<DialogueEngine>,
) {
    for exit in exits.read() {
        engine.on_npc_left(exit.interactable);
    }
}

/// Steps the engine with the scaled delta and the advance action.
///
/// Runs while closed too so the prompt gate can finish fading back in.
pub fn tick_dialogue(
    clock: Res<SimulationClock>,
    input: Res<ActionInput>,
    mut engine: ResMut<DialogueEngine>,
    mut modal: ResMut<ModalCoordinator>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
) {
    let advance = input.state(InteractionAction::Advance);
    match engine.tick(clock.scaled_secs(), advance, &mut modal) {
        Some(DialogueMilestone::LineStarted(index)) => {
            debug!(target: "dialogue", "{} line {}", engine.speaker(), index + 1);
        }
        Some(DialogueMilestone::Closed) => {
            modal_changes.write(ModalTransitioned {
                kind: ModalKind::Dialogue,
                opened: false,
            });
        }
        Some(DialogueMilestone::LineRevealed(_) | DialogueMilestone::MovementRestored) | None => {}
    }
}
