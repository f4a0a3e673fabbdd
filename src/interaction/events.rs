//! Messages exchanged between the overlap source, the registry, and the modals.
use bevy::prelude::*;

use crate::core::{errors::InteractionFault, modal::ModalKind};

use super::components::{BookContent, InteractableId};

/// The actor's detection volume started overlapping an interactable.
#[derive(Message, Debug, Clone)]
pub struct OverlapBegan {
    pub actor: Entity,
    pub interactable: InteractableId,
}

/// The actor's detection volume stopped overlapping an interactable.
#[derive(Message, Debug, Clone)]
pub struct OverlapEnded {
    pub actor: Entity,
    pub interactable: InteractableId,
}

/// An NPC was activated and wants its dialogue opened.
#[derive(Message, Debug, Clone)]
pub struct DialogueRequested {
    pub npc: InteractableId,
    pub speaker: String,
    pub lines: Vec<String>,
}

/// A book was activated and wants the reader opened.
#[derive(Message, Debug, Clone)]
pub struct BookRequested {
    pub source: InteractableId,
    pub book: BookContent,
}

/// An interactable ran its activation.
#[derive(Message, Debug, Clone)]
pub struct InteractableActivated {
    pub interactable: InteractableId,
    pub outcome: &'static str,
}

/// A subsystem absorbed a fault.
#[derive(Message, Debug, Clone)]
pub struct InteractionFaulted {
    pub source: &'static str,
    pub fault: InteractionFault,
}

/// A modal opened or fully closed.
#[derive(Message, Debug, Clone)]
pub struct ModalTransitioned {
    pub kind: ModalKind,
    pub opened: bool,
}
