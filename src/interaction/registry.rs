//! Proximity registry: overlapping candidates and the single active selection.
use bevy::prelude::*;

use crate::core::modal::ModalFlags;

use super::components::{InteractableArena, InteractableId};

/// Prompt the registry wants on screen this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PromptText {
    #[default]
    Hidden,
    Drop(String),
    Interactable(String),
}

impl PromptText {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Drop(text) | Self::Interactable(text) => Some(text),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Prompt resolved this tick, read by the prompt panel.
#[derive(Resource, Debug, Default)]
pub struct ProximityPrompt {
    pub current: PromptText,
}

/// Candidates currently overlapping the actor, in first-seen order.
#[derive(Resource, Debug)]
pub struct ProximityRegistry {
    candidates: Vec<InteractableId>,
    active: Option<InteractableId>,
    hysteresis_margin: f32,
    suppressed: bool,
}

impl ProximityRegistry {
    pub fn new(hysteresis_margin: f32) -> Self {
        Self {
            candidates: Vec::new(),
            active: None,
            hysteresis_margin: hysteresis_margin.max(0.0),
            suppressed: false,
        }
    }

    /// Adds a candidate. Returns `false` if it was already registered.
    pub fn register(&mut self, id: InteractableId) -> bool {
        if self.candidates.contains(&id) {
            return false;
        }
        self.candidates.push(id);
        true
    }

    /// Removes a candidate, clearing the active selection if it was active.
    pub fn unregister(&mut self, id: InteractableId) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|candidate| *candidate != id);
        if self.active == Some(id) {
            self.active = None;
        }
        self.candidates.len() != before
    }

    /// Drops every candidate. Used when the actor moves without exit events.
    pub fn clear_all(&mut self) {
        self.candidates.clear();
        self.active = None;
    }

    pub fn candidates(&self) -> &[InteractableId] {
        &self.candidates
    }

    pub fn active(&self) -> Option<InteractableId> {
        if self.suppressed {
            None
        } else {
            self.active
        }
    }

    /// Per-tick resolution.
    ///
    /// `locate` returns a candidate's position, or `None` once its backing object
    /// is gone. While `suppressed` (a book is open) nothing is active.
    pub fn resolve(
        &mut self,
        actor: Vec3,
        suppressed: bool,
        locate: impl Fn(InteractableId) -> Option<Vec3>,
    ) -> Option<InteractableId> {
        self.candidates.retain(|candidate| locate(*candidate).is_some());
        if let Some(active) = self.active {
            if !self.candidates.contains(&active) {
                self.active = None;
            }
        }

        self.suppressed = suppressed;
        if suppressed {
            self.active = None;
            return None;
        }

        let mut nearest: Option<(InteractableId, f32)> = None;
        for candidate in &self.candidates {
            let Some(position) = locate(*candidate) else {
                continue;
            };
            let distance = actor.distance(position);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((*candidate, distance)),
            }
        }

        let chosen = match (self.active, nearest) {
            (Some(current), Some((closest, closest_distance))) if current != closest => {
                let keep_current = locate(current)
                    .map(|position| {
                        actor.distance(position) <= closest_distance + self.hysteresis_margin
                    })
                    .unwrap_or(false);
                if keep_current {
                    Some(current)
                } else {
                    Some(closest)
                }
            }
            (_, nearest) => nearest.map(|(id, _)| id),
        };

        if chosen != self.active {
            debug!(target: "interaction", "Active interactable: {:?} -> {:?}", self.active, chosen);
        }
        self.active = chosen;
        self.active
    }

    /// Prompt derived from the active selection and the carry state.
    pub fn prompt(&self, arena: &InteractableArena, carrying: bool, drop_prompt: &str) -> PromptText {
        if self.suppressed {
            return PromptText::Hidden;
        }

        match self.active.and_then(|id| arena.get(id)) {
            Some(interactable) => PromptText::Interactable(interactable.prompt().to_string()),
            None if carrying => PromptText::Drop(drop_prompt.to_string()),
            None => PromptText::Hidden,
        }
    }

    /// The interactable an activation press would reach, if input is not blocked.
    pub fn activation_target(&self, flags: ModalFlags) -> Option<InteractableId> {
        if flags.blocks_activation() {
            return None;
        }
        self.active()
    }
}

impl Default for ProximityRegistry {
    fn default() -> Self {
        Self::new(0.25)
    }
}
