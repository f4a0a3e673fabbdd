//! Named actions sampled once per tick from keyboard and mouse state.
use std::collections::HashMap;

use bevy::prelude::*;

/// Fixed set of actions the interaction core listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionAction {
    Interact,
    Advance,
    Pickup,
    Drop,
    Cancel,
    PageNext,
    PagePrevious,
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
}

/// Edge state of one action for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    /// Went down this tick.
    pub pressed: bool,
    /// Down at the end of this tick.
    pub held: bool,
    /// Went up this tick and nothing else bound to the action is still down.
    pub released: bool,
}

impl ActionState {
    pub const IDLE: Self = Self {
        pressed: false,
        held: false,
        released: false,
    };

    pub const PRESSED: Self = Self {
        pressed: true,
        held: true,
        released: false,
    };

    pub const HELD: Self = Self {
        pressed: false,
        held: true,
        released: false,
    };

    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
        released: true,
    };

    /// Merges the states of several physical inputs bound to one action.
    pub fn combine(states: impl IntoIterator<Item = ActionState>) -> Self {
        let mut merged = Self::IDLE;
        let mut any_released = false;
        for state in states {
            merged.pressed |= state.pressed;
            merged.held |= state.held;
            any_released |= state.released;
        }
        merged.released = any_released && !merged.held;
        merged
    }
}

/// Physical input bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Action-to-input mapping.
#[derive(Resource, Debug, Clone)]
pub struct InputBindings {
    bindings: Vec<(InteractionAction, Vec<InputSource>)>,
}

impl InputBindings {
    pub fn sources(&self, action: InteractionAction) -> &[InputSource] {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == action)
            .map(|(_, sources)| sources.as_slice())
            .unwrap_or(&[])
    }

    pub fn actions(&self) -> impl Iterator<Item = InteractionAction> + '_ {
        self.bindings.iter().map(|(action, _)| *action)
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        use InputSource::{Key, Mouse};
        Self {
            bindings: vec![
                (InteractionAction::Interact, vec![Key(KeyCode::KeyE)]),
                (
                    InteractionAction::Advance,
                    vec![
                        Key(KeyCode::Enter),
                        Key(KeyCode::NumpadEnter),
                        Mouse(MouseButton::Left),
                    ],
                ),
                (InteractionAction::Pickup, vec![Key(KeyCode::KeyF)]),
                (InteractionAction::Drop, vec![Key(KeyCode::KeyG)]),
                (InteractionAction::Cancel, vec![Key(KeyCode::Escape)]),
                (InteractionAction::PageNext, vec![Key(KeyCode::ArrowRight)]),
                (InteractionAction::PagePrevious, vec![Key(KeyCode::ArrowLeft)]),
                (
                    InteractionAction::MoveForward,
                    vec![Key(KeyCode::KeyW), Key(KeyCode::ArrowUp)],
                ),
                (
                    InteractionAction::MoveBack,
                    vec![Key(KeyCode::KeyS), Key(KeyCode::ArrowDown)],
                ),
                (
                    InteractionAction::MoveLeft,
                    vec![Key(KeyCode::KeyA), Key(KeyCode::ArrowLeft)],
                ),
                (
                    InteractionAction::MoveRight,
                    vec![Key(KeyCode::KeyD), Key(KeyCode::ArrowRight)],
                ),
            ],
        }
    }
}

/// Per-tick action states, written once by [`sample_action_input`].
#[derive(Resource, Debug, Default, Clone)]
pub struct ActionInput {
    states: HashMap<InteractionAction, ActionState>,
}

impl ActionInput {
    pub fn state(&self, action: InteractionAction) -> ActionState {
        self.states.get(&action).copied().unwrap_or_default()
    }

    pub fn pressed(&self, action: InteractionAction) -> bool {
        self.state(action).pressed
    }

    pub fn held(&self, action: InteractionAction) -> bool {
        self.state(action).held
    }

    pub fn released(&self, action: InteractionAction) -> bool {
        self.state(action).released
    }

    pub fn set(&mut self, action: InteractionAction, state: ActionState) {
        self.states.insert(action, state);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// Samples every bound action from Bevy's button inputs.
pub fn sample_action_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<InputBindings>,
    mut input: ResMut<ActionInput>,
) {
    input.clear();
    for action in bindings.actions() {
        let state = ActionState::combine(bindings.sources(action).iter().map(|source| {
            match *source {
                InputSource::Key(key) => ActionState {
                    pressed: keyboard.just_pressed(key),
                    held: keyboard.pressed(key),
                    released: keyboard.just_released(key),
                },
                InputSource::Mouse(button) => ActionState {
                    pressed: mouse.just_pressed(button),
                    held: mouse.pressed(button),
                    released: mouse.just_released(button),
                },
            }
        }));
        input.set(action, state);
    }
}
