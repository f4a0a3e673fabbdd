//! Player plugin wiring locomotion and the follow camera.
use bevy::prelude::*;

use crate::{
    core::InteractionSet,
    player::systems::{follow_player_camera, move_player},
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                move_player
                    .after(InteractionSet::Input)
                    .before(InteractionSet::Overlap),
                follow_player_camera.in_set(InteractionSet::Presentation),
            ),
        );
    }
}
