//! Modal exclusivity coordinator.
//!
//! Replaces global static flags with one resource. Every flag has exactly one
//! owning subsystem, and a flag can only be written by the holder of the single
//! exclusive modal ticket whose kind owns it.
use std::fmt;

use bevy::prelude::*;
use serde::Serialize;

use super::errors::InteractionFault;

/// Subsystems that can hold the exclusive modal ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Dialogue,
    BookReader,
    Teleport,
}

impl ModalKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue open",
            Self::BookReader => "book open",
            Self::Teleport => "teleport in flight",
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Individually owned modal flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFlag {
    MovementLocked,
    DialogueOpen,
    BookOpen,
    NpcBlockingInteract,
}

impl ModalFlag {
    /// The only subsystem allowed to set or clear this flag.
    pub fn authority(self) -> ModalKind {
        match self {
            Self::MovementLocked | Self::DialogueOpen | Self::NpcBlockingInteract => {
                ModalKind::Dialogue
            }
            Self::BookOpen => ModalKind::BookReader,
        }
    }
}

/// Snapshot of the modal flags, readable by anyone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModalFlags {
    pub movement_locked: bool,
    pub dialogue_open: bool,
    pub book_open: bool,
    pub npc_blocking_interact: bool,
}

impl ModalFlags {
    fn get(&self, flag: ModalFlag) -> bool {
        match flag {
            ModalFlag::MovementLocked => self.movement_locked,
            ModalFlag::DialogueOpen => self.dialogue_open,
            ModalFlag::BookOpen => self.book_open,
            ModalFlag::NpcBlockingInteract => self.npc_blocking_interact,
        }
    }

    fn slot(&mut self, flag: ModalFlag) -> &mut bool {
        match flag {
            ModalFlag::MovementLocked => &mut self.movement_locked,
            ModalFlag::DialogueOpen => &mut self.dialogue_open,
            ModalFlag::BookOpen => &mut self.book_open,
            ModalFlag::NpcBlockingInteract => &mut self.npc_blocking_interact,
        }
    }

    /// Activation input is swallowed while either of these is raised.
    pub fn blocks_activation(&self) -> bool {
        self.npc_blocking_interact || self.book_open
    }
}

/// Proof of owning the exclusive modal slot. Not `Clone`; one exists per acquisition.
#[derive(Debug, PartialEq, Eq)]
pub struct ModalTicket {
    kind: ModalKind,
    serial: u64,
}

impl ModalTicket {
    pub fn kind(&self) -> ModalKind {
        self.kind
    }
}

/// Resource that hands out the single modal ticket and guards flag writes.
#[derive(Resource, Debug, Default)]
pub struct ModalCoordinator {
    flags: ModalFlags,
    holder: Option<(ModalKind, u64)>,
    next_serial: u64,
}

impl ModalCoordinator {
    /// Claims the exclusive modal slot, refusing if another modal holds it.
    pub fn acquire(&mut self, kind: ModalKind) -> Result<ModalTicket, InteractionFault> {
        if let Some((held, _)) = self.holder {
            return Err(InteractionFault::conflict("open a modal", held.label()));
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.holder = Some((kind, serial));
        debug!(target: "modal", "Modal ticket #{} acquired by {:?}", serial, kind);
        Ok(ModalTicket { kind, serial })
    }

    /// Returns the ticket. Flags owned by the holder are expected to be cleared
    /// already; any left raised are cleared here and reported.
    pub fn release(&mut self, ticket: ModalTicket) {
        if self.holder != Some((ticket.kind, ticket.serial)) {
            warn!(
                target: "modal",
                "Ignoring stale modal ticket #{} for {:?}", ticket.serial, ticket.kind
            );
            return;
        }

        for flag in [
            ModalFlag::MovementLocked,
            ModalFlag::DialogueOpen,
            ModalFlag::BookOpen,
            ModalFlag::NpcBlockingInteract,
        ] {
            if flag.authority() == ticket.kind && self.flags.get(flag) {
                warn!(target: "modal", "{:?} still raised on release; clearing", flag);
                *self.flags.slot(flag) = false;
            }
        }

        self.holder = None;
        debug!(target: "modal", "Modal ticket #{} released by {:?}", ticket.serial, ticket.kind);
    }

    /// Writes a flag on behalf of the ticket holder.
    pub fn set_flag(
        &mut self,
        ticket: &ModalTicket,
        flag: ModalFlag,
        value: bool,
    ) -> Result<(), InteractionFault> {
        if self.holder != Some((ticket.kind, ticket.serial)) {
            return Err(InteractionFault::conflict("write a modal flag", "ticket is stale"));
        }
        if flag.authority() != ticket.kind {
            return Err(InteractionFault::conflict(
                "write a modal flag",
                "not the owning subsystem",
            ));
        }

        *self.flags.slot(flag) = value;
        Ok(())
    }

    pub fn flags(&self) -> ModalFlags {
        self.flags
    }

    pub fn holder(&self) -> Option<ModalKind> {
        self.holder.map(|(kind, _)| kind)
    }

    pub fn movement_locked(&self) -> bool {
        self.flags.movement_locked
    }

    pub fn book_open(&self) -> bool {
        self.flags.book_open
    }

    pub fn dialogue_open(&self) -> bool {
        self.flags.dialogue_open
    }

    pub fn npc_blocking_interact(&self) -> bool {
        self.flags.npc_blocking_interact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_modal_at_a_time() {
        let mut modal = ModalCoordinator::default();
        let dialogue = modal.acquire(ModalKind::Dialogue).expect("slot is free");

        let refused = modal.acquire(ModalKind::BookReader);
        assert_eq!(
            refused,
            Err(InteractionFault::conflict("open a modal", "dialogue open"))
        );

        modal.release(dialogue);
        assert!(modal.acquire(ModalKind::BookReader).is_ok());
        assert_eq!(modal.holder(), Some(ModalKind::BookReader));
    }

    #[test]
    fn flags_are_writable_only_by_their_owner() {
        let mut modal = ModalCoordinator::default();
        let book = modal.acquire(ModalKind::BookReader).unwrap();

        assert!(modal.set_flag(&book, ModalFlag::BookOpen, true).is_ok());
        assert!(modal
            .set_flag(&book, ModalFlag::MovementLocked, true)
            .is_err());
        assert!(modal.book_open());
        assert!(!modal.movement_locked());
        assert!(modal.flags().blocks_activation());
    }

    #[test]
    fn release_clears_leftover_flags_and_ignores_stale_tickets() {
        let mut modal = ModalCoordinator::default();
        let first = modal.acquire(ModalKind::Dialogue).unwrap();
        modal
            .set_flag(&first, ModalFlag::NpcBlockingInteract, true)
            .unwrap();
        modal.release(first);
        assert_eq!(modal.flags(), ModalFlags::default());

        let teleport = modal.acquire(ModalKind::Teleport).unwrap();
        let forged = ModalTicket {
            kind: ModalKind::Teleport,
            serial: teleport.serial + 7,
        };
        modal.release(forged);
        assert_eq!(modal.holder(), Some(ModalKind::Teleport));
        modal.release(teleport);
        assert_eq!(modal.holder(), None);
    }
}
