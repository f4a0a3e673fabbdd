//! Single-slot carry state held by the actor.
use bevy::prelude::*;

use crate::core::errors::InteractionFault;

use super::components::{InteractableId, ItemRef};

/// What the actor is holding and which pickup is within reach.
#[derive(Resource, Debug, Default)]
pub struct CarryState {
    carried: Option<(InteractableId, ItemRef)>,
    nearby_pickup: Option<InteractableId>,
}

impl CarryState {
    pub fn carried(&self) -> Option<&ItemRef> {
        self.carried.as_ref().map(|(_, item)| item)
    }

    pub fn is_carrying(&self) -> bool {
        self.carried.is_some()
    }

    pub fn nearby_pickup(&self) -> Option<InteractableId> {
        self.nearby_pickup
    }

    pub fn set_nearby_pickup(&mut self, id: InteractableId) {
        self.nearby_pickup = Some(id);
    }

    /// Forgets the nearby pickup, but only if it is still `id`.
    pub fn leave_pickup(&mut self, id: InteractableId) {
        if self.nearby_pickup == Some(id) {
            self.nearby_pickup = None;
        }
    }

    pub fn clear_nearby_pickup(&mut self) {
        self.nearby_pickup = None;
    }

    /// Puts `item` in the slot. Refused while the hands are full.
    pub fn pick_up(&mut self, source: InteractableId, item: ItemRef) -> Result<(), InteractionFault> {
        if let Some((_, held)) = &self.carried {
            debug!(
                target: "interaction",
                "Refusing to pick up {} while holding {}", item.display_name, held.display_name
            );
            return Err(InteractionFault::conflict("pick up", "hands are full"));
        }

        if self.nearby_pickup == Some(source) {
            self.nearby_pickup = None;
        }
        self.carried = Some((source, item));
        Ok(())
    }

    /// Empties the slot, returning what was held.
    pub fn drop_item(&mut self) -> Option<(InteractableId, ItemRef)> {
        self.carried.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_holds_a_single_item() {
        let mut carry = CarryState::default();
        let lantern = InteractableId::new(3);
        carry.set_nearby_pickup(lantern);

        carry
            .pick_up(lantern, ItemRef::new("lantern", "Lantern"))
            .expect("empty hands");
        assert!(carry.is_carrying());
        assert_eq!(carry.nearby_pickup(), None);

        let refused = carry.pick_up(InteractableId::new(4), ItemRef::new("key", "Key"));
        assert!(refused.is_err());
        assert_eq!(carry.carried().map(|item| item.id.as_str()), Some("lantern"));

        let dropped = carry.drop_item();
        assert_eq!(dropped.map(|(source, _)| source), Some(lantern));
        assert!(!carry.is_carrying());
        assert!(carry.drop_item().is_none());
    }

    #[test]
    fn leaving_a_different_pickup_keeps_the_current_one() {
        let mut carry = CarryState::default();
        carry.set_nearby_pickup(InteractableId::new(1));
        carry.leave_pickup(InteractableId::new(2));
        assert_eq!(carry.nearby_pickup(), Some(InteractableId::new(1)));
        carry.leave_pickup(InteractableId::new(1));
        assert_eq!(carry.nearby_pickup(), None);
    }
}
