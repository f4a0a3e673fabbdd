//! Components for the controllable actor.
use bevy::prelude::*;

use crate::interaction::teleport::ActorTransformControl;

/// Marker component identifying the player actor.
#[derive(Component, Debug)]
pub struct Player;

/// Ground locomotion tuning for the actor.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerMotor {
    pub move_speed: f32,
    /// Distance in front of the actor where dropped items land.
    pub drop_distance: f32,
}

impl Default for PlayerMotor {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            drop_distance: 1.2,
        }
    }
}

/// Whether the actor currently collides with the world.
#[derive(Component, Debug, Clone, Copy)]
pub struct CollisionResponse {
    pub enabled: bool,
}

impl Default for CollisionResponse {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Camera that trails the actor at a fixed offset.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    pub offset: Vec3,
}

/// Borrowed view of the actor handed to the teleport sequence.
pub struct PlayerTransformControl<'w> {
    transform: Mut<'w, Transform>,
    collision: Mut<'w, CollisionResponse>,
}

impl<'w> PlayerTransformControl<'w> {
    pub fn new(transform: Mut<'w, Transform>, collision: Mut<'w, CollisionResponse>) -> Self {
        Self {
            transform,
            collision,
        }
    }
}

impl ActorTransformControl for PlayerTransformControl<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision.enabled = enabled;
    }
}
