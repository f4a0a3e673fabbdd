//! Key-gated door state machine.
use bevy::math::Vec3;

use crate::core::errors::InteractionFault;

use super::components::ItemRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Locked,
    Unlocked,
}

/// What a door activation asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorOutcome {
    Unlocked,
    StillLocked,
    Teleport { target: Vec3 },
}

#[derive(Debug, Clone)]
pub struct DoorLock {
    state: DoorState,
    required_key: Option<String>,
    open_prompt: String,
    locked_prompt: String,
    prompt: String,
    teleport_target: Option<Vec3>,
}

impl DoorLock {
    pub fn new(
        open_prompt: impl Into<String>,
        locked_prompt: impl Into<String>,
        teleport_target: Option<Vec3>,
    ) -> Self {
        let open_prompt = open_prompt.into();
        Self {
            state: DoorState::Unlocked,
            required_key: None,
            prompt: open_prompt.clone(),
            open_prompt,
            locked_prompt: locked_prompt.into(),
            teleport_target,
        }
    }

    /// Starts locked; only an actor carrying `key_id` can open it.
    pub fn locked_with(mut self, key_id: impl Into<String>) -> Self {
        self.state = DoorState::Locked;
        self.required_key = Some(key_id.into());
        self
    }

    #[allow(dead_code)]
    pub fn state(&self) -> DoorState {
        self.state
    }

    #[allow(dead_code)]
    pub fn is_locked(&self) -> bool {
        self.state == DoorState::Locked
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn activate(&mut self, carried: Option<&ItemRef>) -> Result<DoorOutcome, InteractionFault> {
        match self.state {
            DoorState::Locked => {
                let has_key = match (&self.required_key, carried) {
                    (Some(required), Some(item)) => item.id == *required,
                    _ => false,
                };

                if has_key {
                    self.state = DoorState::Unlocked;
                    self.prompt = self.open_prompt.clone();
                    Ok(DoorOutcome::Unlocked)
                } else {
                    self.prompt = self.locked_prompt.clone();
                    Ok(DoorOutcome::StillLocked)
                }
            }
            DoorState::Unlocked => self
                .teleport_target
                .map(|target| DoorOutcome::Teleport { target })
                .ok_or(InteractionFault::missing("door teleport target")),
        }
    }

    /// Leaving the door resets the prompt whatever the lock state.
    pub fn on_proximity_exit(&mut self) {
        self.prompt = self.open_prompt.clone();
    }
}
