//! Line sequencing, typewriter reveal, and advance debounce for NPC dialogue.
use bevy::prelude::*;

use crate::{
    core::{
        config::DialogueSettings,
        errors::InteractionFault,
        input::ActionState,
        modal::{ModalCoordinator, ModalFlag, ModalKind, ModalTicket},
        transition::TransitionSlot,
    },
    interaction::components::InteractableId,
};

const OWNED_FLAGS: [ModalFlag; 3] = [
    ModalFlag::MovementLocked,
    ModalFlag::DialogueOpen,
    ModalFlag::NpcBlockingInteract,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    Closed,
    /// Prompt fading out; the panel appears once the switch delay has passed.
    Opening,
    Typing,
    LineComplete,
    /// Panel fading out, then the switch delay before the prompt returns.
    Closing,
}

impl DialoguePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Typing => "typing",
            Self::LineComplete => "line complete",
            Self::Closing => "closing",
        }
    }
}

/// Noteworthy step taken during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueMilestone {
    LineStarted(usize),
    LineRevealed(usize),
    MovementRestored,
    Closed,
}

/// Dialogue state machine. One conversation at a time.
#[derive(Resource, Debug)]
pub struct DialogueEngine {
    phase: DialoguePhase,
    npc: Option<InteractableId>,
    speaker: String,
    lines: Vec<String>,
    line_index: usize,
    line_elapsed: f32,
    revealed_chars: usize,
    advance_lock: bool,
    phase_elapsed: f32,
    movement_restored: bool,
    ticket: Option<ModalTicket>,
    panel_alpha: TransitionSlot<f32>,
    prompt_gate: TransitionSlot<f32>,
    chars_per_second: f32,
    min_line_seconds: f32,
    switch_delay_seconds: f32,
    fade_seconds: f32,
}

impl DialogueEngine {
    pub fn new(settings: &DialogueSettings) -> Self {
        Self {
            phase: DialoguePhase::Closed,
            npc: None,
            speaker: String::new(),
            lines: Vec::new(),
            line_index: 0,
            line_elapsed: 0.0,
            revealed_chars: 0,
            advance_lock: false,
            phase_elapsed: 0.0,
            movement_restored: true,
            ticket: None,
            panel_alpha: TransitionSlot::new(0.0),
            prompt_gate: TransitionSlot::new(1.0),
            chars_per_second: settings.chars_per_second.max(1.0),
            min_line_seconds: settings.min_line_seconds.max(0.0),
            switch_delay_seconds: settings.switch_delay_seconds.max(0.0),
            fade_seconds: settings.fade_seconds.max(0.0),
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialoguePhase::Closed
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn current_line(&self) -> Option<&str> {
        match self.phase {
            DialoguePhase::Typing | DialoguePhase::LineComplete | DialoguePhase::Closing => {
                self.lines.get(self.line_index).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Text revealed so far on the current line.
    pub fn visible_text(&self) -> &str {
        let Some(line) = self.current_line() else {
            return "";
        };
        match line.char_indices().nth(self.revealed_chars) {
            Some((byte, _)) => &line[..byte],
            None => line,
        }
    }

    pub fn panel_alpha(&self) -> f32 {
        self.panel_alpha.value()
    }

    /// Opacity multiplier for the proximity prompt while a conversation runs.
    pub fn prompt_gate(&self) -> f32 {
        self.prompt_gate.value()
    }

    /// Whether the carried-item HUD should be hidden.
    pub fn suppresses_sibling_panel(&self) -> bool {
        !self.movement_restored
    }

    /// Opens a conversation with `npc`.
    pub fn start(
        &mut self,
        npc: InteractableId,
        speaker: impl Into<String>,
        lines: Vec<String>,
        modal: &mut ModalCoordinator,
    ) -> Result<(), InteractionFault> {
        if self.phase != DialoguePhase::Closed {
            return Err(InteractionFault::conflict(
                "start dialogue",
                self.phase.label(),
            ));
        }
        if lines.is_empty() {
            return Err(InteractionFault::missing("dialogue lines"));
        }

        let ticket = modal.acquire(ModalKind::Dialogue)?;
        self.ticket = Some(ticket);
        self.set_owned_flags(modal, true);

        self.npc = Some(npc);
        self.speaker = speaker.into();
        self.lines = lines;
        self.line_index = 0;
        self.revealed_chars = 0;
        self.phase_elapsed = 0.0;
        self.movement_restored = false;
        self.phase = DialoguePhase::Opening;
        self.prompt_gate.start(0.0, self.fade_seconds);

        info!(
            target: "dialogue",
            "Dialogue with {} ({}) opened: {} line(s)", self.speaker, npc, self.lines.len()
        );
        Ok(())
    }

    /// Starts the close sequence. Ignored unless a conversation is showing.
    pub fn close(&mut self) {
        match self.phase {
            DialoguePhase::Opening | DialoguePhase::Typing | DialoguePhase::LineComplete => {
                self.phase = DialoguePhase::Closing;
                self.phase_elapsed = 0.0;
                self.panel_alpha.start(0.0, self.fade_seconds);
                debug!(target: "dialogue", "Closing dialogue with {}", self.speaker);
            }
            DialoguePhase::Closing | DialoguePhase::Closed => {}
        }
    }

    /// Force-closes when the actor walks out of the speaking NPC's trigger.
    pub fn on_npc_left(&mut self, npc: InteractableId) {
        if self.npc == Some(npc) && self.phase != DialoguePhase::Closing {
            debug!(target: "dialogue", "Actor left {} mid-dialogue", npc);
            self.close();
        }
    }

    /// Advances timers, the typewriter, and the advance debounce.
    pub fn tick(
        &mut self,
        delta_seconds: f32,
        advance: ActionState,
        modal: &mut ModalCoordinator,
    ) -> Option<DialogueMilestone> {
        let delta = delta_seconds.max(0.0);
        self.panel_alpha.tick(delta);
        self.prompt_gate.tick(delta);

        match self.phase {
            DialoguePhase::Closed => None,
            DialoguePhase::Opening => {
                self.phase_elapsed += delta;
                if self.phase_elapsed < self.switch_delay_seconds {
                    return None;
                }
                self.panel_alpha.start(1.0, self.fade_seconds);
                Some(self.begin_line(0))
            }
            DialoguePhase::Typing | DialoguePhase::LineComplete => {
                self.line_elapsed += delta;
                let mut milestone = self.advance_typewriter();
                if let Some(step) = self.handle_advance(advance) {
                    milestone = Some(step);
                }
                milestone
            }
            DialoguePhase::Closing => {
                self.phase_elapsed += delta;
                self.step_close(modal)
            }
        }
    }

    fn begin_line(&mut self, index: usize) -> DialogueMilestone {
        self.line_index = index;
        self.line_elapsed = 0.0;
        self.revealed_chars = 0;
        self.advance_lock = true;
        self.phase = DialoguePhase::Typing;
        if self.line_len() == 0 {
            self.phase = DialoguePhase::LineComplete;
        }
        DialogueMilestone::LineStarted(index)
    }

    fn line_len(&self) -> usize {
        self.lines
            .get(self.line_index)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    fn advance_typewriter(&mut self) -> Option<DialogueMilestone> {
        if self.phase != DialoguePhase::Typing {
            return None;
        }

        let total = self.line_len();
        let revealed = (self.line_elapsed * self.chars_per_second).floor() as usize;
        self.revealed_chars = revealed.min(total);
        if self.revealed_chars >= total {
            self.phase = DialoguePhase::LineComplete;
            return Some(DialogueMilestone::LineRevealed(self.line_index));
        }
        None
    }

    fn handle_advance(&mut self, advance: ActionState) -> Option<DialogueMilestone> {
        if self.advance_lock && !advance.held {
            self.advance_lock = false;
        }

        if self.line_elapsed < self.min_line_seconds {
            return None;
        }
        if self.advance_lock || !advance.pressed {
            return None;
        }
        self.advance_lock = true;

        match self.phase {
            DialoguePhase::Typing => {
                self.revealed_chars = self.line_len();
                self.phase = DialoguePhase::LineComplete;
                Some(DialogueMilestone::LineRevealed(self.line_index))
            }
            DialoguePhase::LineComplete => {
                let next = self.line_index + 1;
                if next < self.lines.len() {
                    Some(self.begin_line(next))
                } else {
                    self.close();
                    None
                }
            }
            _ => None,
        }
    }

    fn step_close(&mut self, modal: &mut ModalCoordinator) -> Option<DialogueMilestone> {
        let mut milestone = None;

        if !self.movement_restored && self.phase_elapsed >= self.fade_seconds {
            self.set_flag(modal, ModalFlag::MovementLocked, false);
            self.set_flag(modal, ModalFlag::DialogueOpen, false);
            self.movement_restored = true;
            info!(target: "dialogue", "Movement restored after dialogue with {}", self.speaker);
            milestone = Some(DialogueMilestone::MovementRestored);
        }

        if self.phase_elapsed >= self.fade_seconds.max(self.switch_delay_seconds) {
            self.prompt_gate.start(1.0, self.fade_seconds);
            self.set_flag(modal, ModalFlag::NpcBlockingInteract, false);
            if let Some(ticket) = self.ticket.take() {
                modal.release(ticket);
            }
            self.phase = DialoguePhase::Closed;
            self.npc = None;
            self.lines.clear();
            self.line_index = 0;
            self.revealed_chars = 0;
            milestone = Some(DialogueMilestone::Closed);
        }

        milestone
    }

    fn set_owned_flags(&self, modal: &mut ModalCoordinator, value: bool) {
        for flag in OWNED_FLAGS {
            self.set_flag(modal, flag, value);
        }
    }

    fn set_flag(&self, modal: &mut ModalCoordinator, flag: ModalFlag, value: bool) {
        let Some(ticket) = &self.ticket else {
            warn!(target: "dialogue", "Cannot set {:?} without a modal ticket", flag);
            return;
        };
        if let Err(fault) = modal.set_flag(ticket, flag, value) {
            warn!(target: "dialogue", "Failed to set {:?}: {}", flag, fault);
        }
    }
}

impl Default for DialogueEngine {
    fn default() -> Self {
        Self::new(&crate::core::config::InteractionSettings::default().dialogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn settings() -> DialogueSettings {
        DialogueSettings {
            chars_per_second: 45.0,
            min_line_seconds: 1.0,
            switch_delay_seconds: 1.0,
            fade_seconds: 0.25,
        }
    }

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    /// Ticks with no input until `seconds` have passed.
    fn idle(engine: &mut DialogueEngine, modal: &mut ModalCoordinator, seconds: f32) {
        let mut waited = 0.0;
        while waited < seconds {
            engine.tick(DT, ActionState::IDLE, modal);
            waited += DT;
        }
    }

    /// A full press-release cycle: one pressed tick then one released tick.
    fn tap(engine: &mut DialogueEngine, modal: &mut ModalCoordinator) {
        engine.tick(DT, ActionState::PRESSED, modal);
        engine.tick(DT, ActionState::RELEASED, modal);
    }

    fn opened(texts: &[&str]) -> (DialogueEngine, ModalCoordinator) {
        let mut engine = DialogueEngine::new(&settings());
        let mut modal = ModalCoordinator::default();
        engine
            .start(InteractableId::new(1), "Mira", lines(texts), &mut modal)
            .expect("dialogue should open");
        (engine, modal)
    }

    #[test]
    fn opening_locks_movement_and_waits_for_switch_delay() {
        let (mut engine, mut modal) = opened(&["Hello there."]);
        assert!(modal.movement_locked());
        assert!(modal.dialogue_open());
        assert!(modal.npc_blocking_interact());
        assert!(engine.suppresses_sibling_panel());
        assert_eq!(engine.phase(), DialoguePhase::Opening);

        idle(&mut engine, &mut modal, 0.9);
        assert_eq!(engine.phase(), DialoguePhase::Opening);
        assert_eq!(engine.visible_text(), "");

        idle(&mut engine, &mut modal, 0.2);
        assert_eq!(engine.phase(), DialoguePhase::Typing);
    }

    #[test]
    fn typewriter_reveals_by_characters() {
        let (mut engine, mut modal) = opened(&["héllo wörld"]);
        idle(&mut engine, &mut modal, 1.0 + DT);
        assert_eq!(engine.phase(), DialoguePhase::Typing);

        engine.tick(0.1, ActionState::IDLE, &mut modal);
        let shown = engine.visible_text().chars().count();
        assert!((4..=6).contains(&shown), "revealed {shown} chars");
        assert!("héllo wörld".starts_with(engine.visible_text()));

        idle(&mut engine, &mut modal, 0.3);
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);
        assert_eq!(engine.visible_text(), "héllo wörld");
    }

    #[test]
    fn skip_reveals_exactly_the_full_line_and_does_not_advance() {
        let long = "This line is far too long to finish typing within a single second.";
        let (mut engine, mut modal) = opened(&[long, "Second."]);
        idle(&mut engine, &mut modal, 1.0 + DT);
        idle(&mut engine, &mut modal, 1.0);
        assert_eq!(engine.phase(), DialoguePhase::Typing);

        tap(&mut engine, &mut modal);
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);
        assert_eq!(engine.visible_text(), long);
        assert_eq!(engine.line_index(), 0);
    }

    #[test]
    fn advance_is_blocked_before_minimum_line_time() {
        let (mut engine, mut modal) = opened(&["Hi.", "Bye."]);
        idle(&mut engine, &mut modal, 1.0 + DT);
        idle(&mut engine, &mut modal, 0.5);
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);

        tap(&mut engine, &mut modal);
        assert_eq!(engine.line_index(), 0);

        idle(&mut engine, &mut modal, 0.5);
        tap(&mut engine, &mut modal);
        assert_eq!(engine.line_index(), 1);
    }

    #[test]
    fn held_advance_never_repeats() {
        let (mut engine, mut modal) = opened(&["One.", "Two.", "Three."]);
        idle(&mut engine, &mut modal, 1.0 + DT);
        idle(&mut engine, &mut modal, 1.0);

        engine.tick(DT, ActionState::PRESSED, &mut modal);
        assert_eq!(engine.line_index(), 1);
        for _ in 0..300 {
            engine.tick(DT, ActionState::HELD, &mut modal);
        }
        assert_eq!(engine.line_index(), 1);
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);
    }

    #[test]
    fn three_lines_close_and_unlock_after_fade() {
        let (mut engine, mut modal) = opened(&["Welcome.", "The archive is east.", "Good luck."]);
        idle(&mut engine, &mut modal, 1.0 + DT);

        for expected in 0..3 {
            assert_eq!(engine.line_index(), expected);
            idle(&mut engine, &mut modal, 1.0);
            assert_eq!(engine.phase(), DialoguePhase::LineComplete);
            tap(&mut engine, &mut modal);
        }

        assert_eq!(engine.phase(), DialoguePhase::Closing);
        assert!(modal.movement_locked());

        idle(&mut engine, &mut modal, 0.2);
        assert!(modal.movement_locked(), "unlocked before the close fade finished");
        assert!(engine.suppresses_sibling_panel());

        idle(&mut engine, &mut modal, 0.1);
        assert!(!modal.movement_locked());
        assert!(!modal.dialogue_open());
        assert!(!engine.suppresses_sibling_panel());
        assert!(modal.npc_blocking_interact());
        assert_eq!(modal.holder(), Some(ModalKind::Dialogue));

        idle(&mut engine, &mut modal, 0.8);
        assert_eq!(engine.phase(), DialoguePhase::Closed);
        assert!(!modal.npc_blocking_interact());
        assert_eq!(modal.holder(), None);

        // The proximity prompt fades back in after the switch delay.
        assert!(engine.prompt_gate() < 1.0);
        idle(&mut engine, &mut modal, 0.3);
        assert_eq!(engine.prompt_gate(), 1.0);
    }

    #[test]
    fn leaving_the_npc_force_closes() {
        let (mut engine, mut modal) = opened(&["Wait, come back!"]);
        idle(&mut engine, &mut modal, 1.5);

        engine.on_npc_left(InteractableId::new(9));
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);

        engine.on_npc_left(InteractableId::new(1));
        assert_eq!(engine.phase(), DialoguePhase::Closing);
        idle(&mut engine, &mut modal, 1.1);
        assert_eq!(engine.phase(), DialoguePhase::Closed);
        assert!(!modal.movement_locked());
    }

    #[test]
    fn start_is_refused_while_open_and_for_empty_lines() {
        let (mut engine, mut modal) = opened(&["Hello."]);
        assert!(matches!(
            engine.start(InteractableId::new(2), "Other", lines(&["Hi"]), &mut modal),
            Err(InteractionFault::StateConflict { .. })
        ));

        let mut fresh = DialogueEngine::new(&settings());
        let mut other_modal = ModalCoordinator::default();
        assert_eq!(
            fresh.start(InteractableId::new(2), "Statue", Vec::new(), &mut other_modal),
            Err(InteractionFault::missing("dialogue lines"))
        );
        assert_eq!(other_modal.holder(), None);
    }

    #[test]
    fn start_is_refused_while_another_modal_holds_the_ticket() {
        let mut modal = ModalCoordinator::default();
        let _book = modal.acquire(ModalKind::BookReader).unwrap();
        let mut engine = DialogueEngine::new(&settings());
        assert!(engine
            .start(InteractableId::new(1), "Mira", lines(&["Hi"]), &mut modal)
            .is_err());
        assert!(!engine.is_open());
        assert!(!modal.movement_locked());
    }

    #[test]
    fn empty_line_is_complete_immediately() {
        let (mut engine, mut modal) = opened(&["", "After the pause."]);
        idle(&mut engine, &mut modal, 1.0 + DT);
        assert_eq!(engine.phase(), DialoguePhase::LineComplete);
        assert_eq!(engine.visible_text(), "");
    }

    proptest! {
        #[test]
        fn one_transition_per_press_release_cycle(
            holds in prop::collection::vec(1usize..40, 1..12),
        ) {
            let texts = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m"];
            let (mut engine, mut modal) = opened(&texts);
            idle(&mut engine, &mut modal, 1.0 + DT);

            for hold in holds {
                idle(&mut engine, &mut modal, 1.0);
                let before = engine.line_index();
                engine.tick(DT, ActionState::PRESSED, &mut modal);
                for _ in 0..hold {
                    engine.tick(DT, ActionState::HELD, &mut modal);
                }
                engine.tick(DT, ActionState::RELEASED, &mut modal);
                prop_assert!(engine.line_index() <= before + 1);
            }
        }
    }
}
