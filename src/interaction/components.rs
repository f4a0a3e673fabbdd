//! Interactable records, their arena, and the ECS markers that point at them.
use std::fmt;

use bevy::prelude::*;
use serde::Serialize;

use crate::core::errors::InteractionFault;

use super::door::{DoorLock, DoorOutcome};

/// Stable handle into the [`InteractableArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InteractableId(u32);

impl InteractableId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[allow(dead_code)]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InteractableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IA-{:04}", self.0)
    }
}

/// Component linking a world entity to its arena record.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractableRef(pub InteractableId);

/// Spherical overlap volume around an interactable.
///
/// `inside` tracks whether the actor overlapped it last tick; begin and end
/// messages fire only when it flips.
#[derive(Component, Debug, Clone, Copy)]
pub struct TriggerVolume {
    pub radius: f32,
    pub inside: bool,
}

impl TriggerVolume {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            inside: false,
        }
    }
}

/// Reference to a carriable item. The id doubles as a door key id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ItemRef {
    pub id: String,
    pub display_name: String,
}

impl ItemRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Static book content: a title and one image reference per page.
#[derive(Debug, Clone, PartialEq)]
pub struct BookContent {
    pub title: String,
    pub pages: Vec<String>,
}

impl BookContent {
    pub fn new(title: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            title: title.into(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// NPC that opens a dialogue when activated.
#[derive(Debug, Clone)]
pub struct DialogueNpc {
    pub name: String,
    pub lines: Vec<String>,
    pub prompt: String,
}

/// Book lying in the world.
#[derive(Debug, Clone)]
pub struct BookInteractable {
    pub book: BookContent,
    pub prompt: String,
}

/// Item waiting to be picked up.
#[derive(Debug, Clone)]
pub struct ItemPickup {
    pub item: ItemRef,
    pub prompt: String,
}

/// Closed set of interactable variants.
#[derive(Debug, Clone)]
pub enum Interactable {
    Door(DoorLock),
    Npc(DialogueNpc),
    Book(BookInteractable),
    Pickup(ItemPickup),
}

/// What the activated interactable wants to happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    DoorUnlocked,
    DoorStillLocked,
    Teleport { target: Vec3 },
    OpenDialogue { speaker: String, lines: Vec<String> },
    OpenBook(BookContent),
    PickUp(ItemRef),
}

impl ActivationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DoorUnlocked => "door_unlocked",
            Self::DoorStillLocked => "door_still_locked",
            Self::Teleport { .. } => "teleport",
            Self::OpenDialogue { .. } => "open_dialogue",
            Self::OpenBook(_) => "open_book",
            Self::PickUp(_) => "pick_up",
        }
    }
}

impl Interactable {
    pub fn prompt(&self) -> &str {
        match self {
            Self::Door(door) => door.prompt(),
            Self::Npc(npc) => &npc.prompt,
            Self::Book(book) => &book.prompt,
            Self::Pickup(pickup) => &pickup.prompt,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Door(_) => "door",
            Self::Npc(_) => "npc",
            Self::Book(_) => "book",
            Self::Pickup(_) => "pickup",
        }
    }

    /// Runs the variant's activation against whatever the actor is carrying.
    pub fn activate(
        &mut self,
        carried: Option<&ItemRef>,
    ) -> Result<ActivationOutcome, InteractionFault> {
        match self {
            Self::Door(door) => door.activate(carried).map(|outcome| match outcome {
                DoorOutcome::Unlocked => ActivationOutcome::DoorUnlocked,
                DoorOutcome::StillLocked => ActivationOutcome::DoorStillLocked,
                DoorOutcome::Teleport { target } => ActivationOutcome::Teleport { target },
            }),
            Self::Npc(npc) => {
                if npc.lines.is_empty() {
                    return Err(InteractionFault::missing("dialogue lines"));
                }
                Ok(ActivationOutcome::OpenDialogue {
                    speaker: npc.name.clone(),
                    lines: npc.lines.clone(),
                })
            }
            Self::Book(book) => Ok(ActivationOutcome::OpenBook(book.book.clone())),
            Self::Pickup(pickup) => {
                if carried.is_some() {
                    return Err(InteractionFault::conflict("pick up", "hands are full"));
                }
                Ok(ActivationOutcome::PickUp(pickup.item.clone()))
            }
        }
    }

    pub fn on_proximity_exit(&mut self) {
        if let Self::Door(door) = self {
            door.on_proximity_exit();
        }
    }
}

/// Arena owning every interactable record, addressed by stable id.
#[derive(Resource, Debug, Default)]
pub struct InteractableArena {
    records: Vec<Interactable>,
}

impl InteractableArena {
    pub fn insert(&mut self, interactable: Interactable) -> InteractableId {
        let id = InteractableId::new(self.records.len() as u32);
        self.records.push(interactable);
        id
    }

    pub fn get(&self, id: InteractableId) -> Option<&Interactable> {
        self.records.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.records.get_mut(id.0 as usize)
    }

    pub fn contains(&self, id: InteractableId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn librarian() -> Interactable {
        Interactable::Npc(DialogueNpc {
            name: "Librarian".to_string(),
            lines: vec!["Hush.".to_string(), "Books are upstairs.".to_string()],
            prompt: "Press [E] to talk".to_string(),
        })
    }

    #[test]
    fn arena_hands_out_sequential_ids() {
        let mut arena = InteractableArena::default();
        let first = arena.insert(librarian());
        let second = arena.insert(Interactable::Pickup(ItemPickup {
            item: ItemRef::new("lantern", "Lantern"),
            prompt: "Press [F] to pick up".to_string(),
        }));

        assert_eq!(arena.get(second).map(Interactable::kind_label), Some("pickup"));
        assert_eq!(arena.insert(librarian()), InteractableId::new(2));
        assert_eq!(arena.len(), 3);
        assert!(!arena.contains(InteractableId::new(3)));
        assert_eq!(first.to_string(), "IA-0000");
    }

    #[test]
    fn npc_activation_hands_lines_to_dialogue() {
        let mut npc = librarian();
        let outcome = npc.activate(None).unwrap();
        assert_eq!(
            outcome,
            ActivationOutcome::OpenDialogue {
                speaker: "Librarian".to_string(),
                lines: vec!["Hush.".to_string(), "Books are upstairs.".to_string()],
            }
        );
        assert_eq!(npc.prompt(), "Press [E] to talk");
    }

    #[test]
    fn pickup_refused_with_full_hands() {
        let mut pickup = Interactable::Pickup(ItemPickup {
            item: ItemRef::new("lantern", "Lantern"),
            prompt: "Press [F] to pick up".to_string(),
        });
        let held = ItemRef::new("key", "Key");

        assert!(matches!(
            pickup.activate(Some(&held)),
            Err(InteractionFault::StateConflict { .. })
        ));
        assert_eq!(
            pickup.activate(None),
            Ok(ActivationOutcome::PickUp(ItemRef::new("lantern", "Lantern")))
        );
    }

    #[test]
    fn silent_npc_is_a_missing_reference() {
        let mut npc = Interactable::Npc(DialogueNpc {
            name: "Statue".to_string(),
            lines: Vec::new(),
            prompt: "Press [E] to talk".to_string(),
        });
        assert_eq!(npc.activate(None), Err(InteractionFault::missing("dialogue lines")));
    }
}
