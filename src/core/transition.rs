//! Timed value transitions shared by screen fades, panel fades, and page flips.
//!
//! A [`Transition`] is a plain step function: the owner calls [`Transition::tick`]
//! with the frame delta and a sink that receives the interpolated value. Nothing in
//! here knows about rendering.
use bevy::color::Srgba;
use bevy::math::{Vec2, Vec3};

/// Values that can be linearly interpolated by a transition.
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

impl Interpolate for Srgba {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        Srgba::new(
            f32::interpolate(from.red, to.red, t),
            f32::interpolate(from.green, to.green, t),
            f32::interpolate(from.blue, to.blue, t),
            f32::interpolate(from.alpha, to.alpha, t),
        )
    }
}

/// Lifecycle of a single transition handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Running,
    Complete,
    Cancelled,
}

/// Result of advancing a transition by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStatus<T> {
    Running(T),
    Complete(T),
    Cancelled,
}

impl<T> TransitionStatus<T> {
    #[allow(dead_code)]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Linear interpolation from `from` to `to` over a wall-clock duration.
#[derive(Debug, Clone)]
pub struct Transition<T> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    state: TransitionState,
    current: T,
}

impl<T: Interpolate> Transition<T> {
    /// Starts a transition. Zero or negative durations resolve on the first tick.
    pub fn start(from: T, to: T, duration_seconds: f32) -> Self {
        Self {
            from,
            to,
            duration: duration_seconds,
            elapsed: 0.0,
            state: TransitionState::Running,
            current: from,
        }
    }

    /// Advances the transition and writes the new value into `sink`.
    ///
    /// Once `elapsed >= duration` the value is exactly `to` and the handle is
    /// complete. Finished or cancelled handles never touch the sink again.
    pub fn tick(&mut self, delta_seconds: f32, mut sink: impl FnMut(T)) -> TransitionStatus<T> {
        match self.state {
            TransitionState::Cancelled => return TransitionStatus::Cancelled,
            TransitionState::Complete => return TransitionStatus::Complete(self.to),
            TransitionState::Running => {}
        }

        self.elapsed += delta_seconds.max(0.0);
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.elapsed = self.duration.max(0.0);
            self.current = self.to;
            self.state = TransitionState::Complete;
            sink(self.current);
            return TransitionStatus::Complete(self.current);
        }

        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.current = T::interpolate(self.from, self.to, t);
        sink(self.current);
        TransitionStatus::Running(self.current)
    }

    /// Stops the transition, leaving the value where the last tick put it.
    pub fn cancel(&mut self) {
        if self.state == TransitionState::Running {
            self.state = TransitionState::Cancelled;
        }
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.to
    }

    #[allow(dead_code)]
    pub fn state(&self) -> TransitionState {
        self.state
    }
}

/// A single animated value. Starting a new transition cancels the running one,
/// so two transitions never drive the same value.
#[derive(Debug, Clone)]
pub struct TransitionSlot<T> {
    value: T,
    active: Option<Transition<T>>,
}

impl<T: Interpolate> TransitionSlot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            active: None,
        }
    }

    /// Transitions from the current value to `to`.
    pub fn start(&mut self, to: T, duration_seconds: f32) {
        if let Some(mut previous) = self.active.take() {
            previous.cancel();
        }
        self.active = Some(Transition::start(self.value, to, duration_seconds));
    }

    /// Snaps to `value`, cancelling any running transition.
    pub fn set(&mut self, value: T) {
        self.cancel();
        self.value = value;
    }

    pub fn cancel(&mut self) {
        if let Some(mut running) = self.active.take() {
            running.cancel();
        }
    }

    /// Advances the running transition, if any. Returns `None` when idle.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<TransitionStatus<T>> {
        let transition = self.active.as_mut()?;
        let value = &mut self.value;
        let status = transition.tick(delta_seconds, |next| *value = next);
        if !matches!(status, TransitionStatus::Running(_)) {
            self.active = None;
        }
        Some(status)
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Destination of the running transition.
    #[allow(dead_code)]
    pub fn target(&self) -> Option<T> {
        self.active.as_ref().map(Transition::target)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }
}

impl<T: Interpolate + Default> Default for TransitionSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
