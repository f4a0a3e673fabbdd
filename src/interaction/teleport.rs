//! Door teleport: fade out, relocate, confirm arrival, fade in.
use bevy::prelude::*;

use crate::core::{
    config::TeleportSettings,
    errors::InteractionFault,
    modal::{ModalCoordinator, ModalKind, ModalTicket},
    transition::{TransitionSlot, TransitionStatus},
};

use super::{carry::CarryState, components::InteractableId, registry::ProximityRegistry};

/// Actor transform service used by the teleport. Physics and locomotion live
/// behind this boundary.
pub trait ActorTransformControl {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn set_collision_enabled(&mut self, enabled: bool);
}

/// Full-screen fade overlay opacity.
#[derive(Resource, Debug)]
pub struct ScreenFader {
    alpha: TransitionSlot<f32>,
    fade_out_seconds: f32,
    fade_in_seconds: f32,
}

impl ScreenFader {
    pub fn new(fade_out_seconds: f32, fade_in_seconds: f32) -> Self {
        Self {
            alpha: TransitionSlot::new(0.0),
            fade_out_seconds,
            fade_in_seconds,
        }
    }

    pub fn from_settings(settings: &TeleportSettings) -> Self {
        Self::new(settings.fade_out_seconds, settings.fade_in_seconds)
    }

    /// Fades to black. Supersedes any running fade.
    pub fn fade_out(&mut self) {
        self.alpha.start(1.0, self.fade_out_seconds);
    }

    /// Fades back to clear. Supersedes any running fade.
    pub fn fade_in(&mut self) {
        self.alpha.start(0.0, self.fade_in_seconds);
    }

    pub fn tick(&mut self, delta_seconds: f32) -> Option<TransitionStatus<f32>> {
        self.alpha.tick(delta_seconds)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.value()
    }

    pub fn is_fading(&self) -> bool {
        self.alpha.is_animating()
    }
}

impl Default for ScreenFader {
    fn default() -> Self {
        Self::new(0.4, 0.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TeleportPhase {
    FadingOut,
    Confirming { waited: f32 },
    FadingIn { arrived: bool },
}

/// Result of one teleport step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportProgress {
    InFlight,
    Finished { arrived: bool },
}

/// One teleport in flight.
#[derive(Debug, Clone)]
pub struct TeleportSequence {
    door: InteractableId,
    target: Vec3,
    phase: TeleportPhase,
    arrival_epsilon: f32,
    confirm_timeout: f32,
}

impl TeleportSequence {
    pub fn new(door: InteractableId, target: Vec3, settings: &TeleportSettings) -> Self {
        Self {
            door,
            target,
            phase: TeleportPhase::FadingOut,
            arrival_epsilon: settings.arrival_epsilon,
            confirm_timeout: settings.confirm_timeout_seconds,
        }
    }

    pub fn door(&self) -> InteractableId {
        self.door
    }

    #[allow(dead_code)]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Advances the sequence. The fader is ticked by its owner before this runs.
    pub fn step(
        &mut self,
        delta_seconds: f32,
        fader: &mut ScreenFader,
        actor: &mut impl ActorTransformControl,
        registry: &mut ProximityRegistry,
        carry: &mut CarryState,
    ) -> TeleportProgress {
        match self.phase {
            TeleportPhase::FadingOut => {
                if fader.is_fading() {
                    return TeleportProgress::InFlight;
                }

                // Teleporting skips exit notifications; drop overlap state by hand.
                registry.clear_all();
                carry.clear_nearby_pickup();

                actor.set_collision_enabled(false);
                actor.set_position(self.target);
                actor.set_collision_enabled(true);

                info!(target: "teleport", "Actor moved through {} to {:?}", self.door, self.target);
                self.phase = TeleportPhase::Confirming { waited: 0.0 };
                TeleportProgress::InFlight
            }
            TeleportPhase::Confirming { waited } => {
                if actor.position().distance(self.target) <= self.arrival_epsilon {
                    fader.fade_in();
                    self.phase = TeleportPhase::FadingIn { arrived: true };
                    return TeleportProgress::InFlight;
                }

                let waited = waited + delta_seconds.max(0.0);
                if waited >= self.confirm_timeout {
                    let fault = InteractionFault::timeout(waited);
                    warn!(target: "teleport", "Arrival at {:?} unconfirmed: {}", self.target, fault);
                    fader.fade_in();
                    self.phase = TeleportPhase::FadingIn { arrived: false };
                } else {
                    self.phase = TeleportPhase::Confirming { waited };
                }
                TeleportProgress::InFlight
            }
            TeleportPhase::FadingIn { arrived } => {
                if fader.is_fading() {
                    TeleportProgress::InFlight
                } else {
                    TeleportProgress::Finished { arrived }
                }
            }
        }
    }

    #[allow(dead_code)]
    pub fn is_fading_in(&self) -> bool {
        matches!(self.phase, TeleportPhase::FadingIn { .. })
    }
}

/// Owns the teleport in flight, if any, and its modal ticket.
#[derive(Resource, Debug, Default)]
pub struct TeleportController {
    active: Option<(TeleportSequence, ModalTicket)>,
}

impl TeleportController {
    pub fn is_in_flight(&self) -> bool {
        self.active.is_some()
    }

    #[allow(dead_code)]
    pub fn current(&self) -> Option<&TeleportSequence> {
        self.active.as_ref().map(|(sequence, _)| sequence)
    }

    /// Starts a teleport. Refused while another teleport or any modal is active.
    pub fn begin(
        &mut self,
        door: InteractableId,
        target: Vec3,
        settings: &TeleportSettings,
        modal: &mut ModalCoordinator,
        fader: &mut ScreenFader,
    ) -> Result<(), InteractionFault> {
        if self.active.is_some() {
            return Err(InteractionFault::conflict("teleport", "teleport in flight"));
        }

        let ticket = modal.acquire(ModalKind::Teleport)?;
        fader.fade_out();
        self.active = Some((TeleportSequence::new(door, target, settings), ticket));
        info!(target: "teleport", "Teleport through {} started", door);
        Ok(())
    }

    /// Advances the teleport, releasing the modal ticket when it finishes.
    pub fn step(
        &mut self,
        delta_seconds: f32,
        modal: &mut ModalCoordinator,
        fader: &mut ScreenFader,
        actor: &mut impl ActorTransformControl,
        registry: &mut ProximityRegistry,
        carry: &mut CarryState,
    ) -> Option<TeleportProgress> {
        let (sequence, _) = self.active.as_mut()?;
        let progress = sequence.step(delta_seconds, fader, actor, registry, carry);

        if let TeleportProgress::Finished { arrived } = progress {
            if let Some((sequence, ticket)) = self.active.take() {
                modal.release(ticket);
                debug!(
                    target: "teleport",
                    "Teleport through {} finished (arrived: {})", sequence.door(), arrived
                );
            }
        }
        Some(progress)
    }
}
