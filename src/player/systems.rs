//! Systems for actor locomotion and the trailing camera.
use bevy::prelude::*;

use crate::{
    core::{
        input::{ActionInput, InteractionAction},
        modal::{ModalCoordinator, ModalKind},
        plugin::SimulationClock,
    },
    player::components::{FollowCamera, Player, PlayerMotor},
};

/// Moves the actor on the ground plane with the movement actions.
///
/// Nothing moves while a modal holds the movement lock, a teleport is in
/// flight, or the clock is paused.
pub fn move_player(
    input: Res<ActionInput>,
    clock: Res<SimulationClock>,
    modal: Res<ModalCoordinator>,
    mut query: Query<(&PlayerMotor, &mut Transform), With<Player>>,
) {
    if modal.movement_locked() || modal.holder() == Some(ModalKind::Teleport) {
        return;
    }

    let delta = clock.scaled_secs();
    if delta <= 0.0 {
        return;
    }

    let Ok((motor, mut transform)) = query.single_mut() else {
        return;
    };

    let direction = movement_direction(&input);
    if direction.length_squared() > 0.0 {
        transform.translation += direction.normalize() * motor.move_speed * delta;
        let facing = transform.translation + direction;
        transform.look_at(facing, Vec3::Y);
    }
}

/// Keeps the camera trailing the actor.
pub fn follow_player_camera(
    players: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<(&FollowCamera, &mut Transform), Without<Player>>,
) {
    let Ok(player) = players.single() else {
        return;
    };

    for (follow, mut transform) in &mut cameras {
        transform.translation = player.translation + follow.offset;
        transform.look_at(player.translation, Vec3::Y);
    }
}

fn movement_direction(input: &ActionInput) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if input.held(InteractionAction::MoveForward) {
        direction += Vec3::NEG_Z;
    }
    if input.held(InteractionAction::MoveBack) {
        direction += Vec3::Z;
    }
    if input.held(InteractionAction::MoveLeft) {
        direction += Vec3::NEG_X;
    }
    if input.held(InteractionAction::MoveRight) {
        direction += Vec3::X;
    }
    direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::ActionState;

    #[test]
    fn opposite_actions_cancel_out() {
        let mut input = ActionInput::default();
        input.set(InteractionAction::MoveForward, ActionState::HELD);
        input.set(InteractionAction::MoveBack, ActionState::HELD);
        input.set(InteractionAction::MoveRight, ActionState::PRESSED);

        assert_eq!(movement_direction(&input), Vec3::X);
    }
}
