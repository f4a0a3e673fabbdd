//! CorePlugin wires timing, modal coordination, input sampling, and tick ordering.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

use super::{
    config::InteractionSettings,
    input::{sample_action_input, ActionInput, InputBindings},
    modal::ModalCoordinator,
};

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Per-tick ordering shared by every interaction plugin.
///
/// Proximity resolution runs before anything consumes input, and modal
/// consumers run before presentation reads their state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    Input,
    Overlap,
    Proximity,
    Activation,
    Modal,
    Presentation,
}

/// Tracks scaled simulation time derived from real frame deltas.
///
/// Gameplay reads the scaled delta; modal UI reads the real delta so it keeps
/// animating while the simulation is paused.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    paused: bool,
    last_real_delta: Duration,
    last_scaled_delta: Duration,
    elapsed: Duration,
}

impl SimulationClock {
    /// Creates a new clock with the provided time-scale multiplier.
    pub fn new(time_scale: f32) -> Self {
        let clamped = time_scale.max(MIN_TIME_SCALE);
        Self {
            time_scale: clamped,
            paused: false,
            last_real_delta: Duration::ZERO,
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the time-scale multiplier (clamped to a small positive minimum).
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    /// Returns the current time-scale multiplier.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Freezes scaled time. Real deltas keep flowing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Last real (unscaled) delta reported by Bevy's Time resource.
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Last scaled delta after applying the multiplier; zero while paused.
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    pub fn real_secs(&self) -> f32 {
        self.last_real_delta.as_secs_f32()
    }

    pub fn scaled_secs(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    /// Returns the total scaled duration elapsed since the clock was initialised.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Applies a real delta to the clock, storing both the real and scaled durations.
    pub fn tick(&mut self, real_delta: Duration) {
        self.last_real_delta = real_delta;
        self.last_scaled_delta = if self.paused {
            Duration::ZERO
        } else {
            real_delta.mul_f32(self.time_scale)
        };
        self.elapsed += self.last_scaled_delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers timing, configuration, modal coordination, and input sampling.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    /// Creates a CorePlugin with the provided time-scale multiplier.
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .insert_resource(InteractionSettings::load_or_default())
            .init_resource::<ModalCoordinator>()
            .init_resource::<InputBindings>()
            .init_resource::<ActionInput>()
            .configure_sets(
                Update,
                (
                    InteractionSet::Input,
                    InteractionSet::Overlap,
                    InteractionSet::Proximity,
                    InteractionSet::Activation,
                    InteractionSet::Modal,
                    InteractionSet::Presentation,
                )
                    .chain(),
            )
            .add_systems(Startup, log_startup_configuration)
            .add_systems(
                Update,
                (update_simulation_clock, sample_action_input).in_set(InteractionSet::Input),
            );

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_scaled_ticks.after(InteractionSet::Modal));
        }
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_configuration(clock: Res<SimulationClock>, settings: Res<InteractionSettings>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}",
        clock.time_scale()
    );
    info!(
        "Interaction configured: hysteresis {:.2}, typewriter {:.0} chars/s, teleport epsilon {:.3} (timeout {:.2}s)",
        settings.proximity.hysteresis_margin,
        settings.dialogue.chars_per_second,
        settings.teleport.arrival_epsilon,
        settings.teleport.confirm_timeout_seconds,
    );
}

#[cfg(feature = "core_debug")]
fn log_scaled_ticks(
    mut timer: ResMut<DebugTickTimer>,
    clock: Res<SimulationClock>,
    modal: Res<ModalCoordinator>,
) {
    if timer.timer.tick(clock.last_real_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Sim elapsed: {:.2}s | paused: {} | real dt: {:.4}s | scaled dt: {:.4}s | modal: {:?} {:?}",
            clock.elapsed().as_secs_f32(),
            clock.is_paused(),
            clock.last_real_delta().as_secs_f32(),
            clock.last_scaled_delta().as_secs_f32(),
            modal.holder(),
            modal.flags(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_scales_delta_with_multiplier() {
        let mut clock = SimulationClock::new(2.5);
        clock.tick(Duration::from_secs_f32(1.2));

        assert_eq!(clock.time_scale(), 2.5);
        assert_eq!(clock.last_real_delta(), Duration::from_secs_f32(1.2));
        assert_eq!(
            clock.last_scaled_delta(),
            Duration::from_secs_f32(1.2).mul_f32(2.5)
        );
        assert_eq!(clock.elapsed(), clock.last_scaled_delta());
    }

    #[test]
    fn clock_clamps_min_time_scale() {
        let mut clock = SimulationClock::new(0.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);

        clock.set_time_scale(-5.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn paused_clock_keeps_real_delta_only() {
        let mut clock = SimulationClock::default();
        clock.pause();
        clock.tick(Duration::from_millis(16));

        assert!(clock.is_paused());
        assert_eq!(clock.last_scaled_delta(), Duration::ZERO);
        assert_eq!(clock.last_real_delta(), Duration::from_millis(16));
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.resume();
        clock.tick(Duration::from_millis(16));
        assert_eq!(clock.elapsed(), Duration::from_millis(16));
    }
}
