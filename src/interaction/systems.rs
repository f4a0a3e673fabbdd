//! Systems feeding the registry, dispatching activations, and driving teleports.
use std::collections::HashMap;

use bevy::prelude::*;

use crate::{
    core::{
        config::InteractionSettings,
        errors::InteractionFault,
        input::{ActionInput, InteractionAction},
        modal::{ModalCoordinator, ModalKind},
        plugin::SimulationClock,
    },
    interaction::{
        carry::CarryState,
        components::{
            ActivationOutcome, Interactable, InteractableArena, InteractableId, InteractableRef,
            ItemRef, TriggerVolume,
        },
        events::{
            BookRequested, DialogueRequested, InteractableActivated, InteractionFaulted,
            ModalTransitioned, OverlapBegan, OverlapEnded,
        },
        registry::{ProximityPrompt, ProximityRegistry},
        teleport::{ActorTransformControl, ScreenFader, TeleportController, TeleportProgress},
    },
    player::components::{CollisionResponse, Player, PlayerMotor, PlayerTransformControl},
};

type PickupBodies<'w, 's> = Query<
    'w,
    's,
    (
        &'static InteractableRef,
        &'static mut Transform,
        &'static mut Visibility,
        &'static mut TriggerVolume,
    ),
    Without<Player>,
>;

/// Emits overlap messages when the actor crosses a trigger volume's boundary.
///
/// Hidden interactables never overlap.
#[allow(clippy::type_complexity)]
pub fn detect_trigger_overlaps(
    actors: Query<(Entity, &Transform), With<Player>>,
    mut volumes: Query<
        (&InteractableRef, &Transform, &Visibility, &mut TriggerVolume),
        Without<Player>,
    >,
    mut began: MessageWriter<OverlapBegan>,
    mut ended: MessageWriter<OverlapEnded>,
) {
    let Ok((actor, actor_transform)) = actors.single() else {
        return;
    };

    for (reference, transform, visibility, mut volume) in &mut volumes {
        let overlapping = *visibility != Visibility::Hidden
            && actor_transform.translation.distance(transform.translation) <= volume.radius;
        if overlapping == volume.inside {
            continue;
        }

        volume.inside = overlapping;
        if overlapping {
            began.write(OverlapBegan {
                actor,
                interactable: reference.0,
            });
        } else {
            ended.write(OverlapEnded {
                actor,
                interactable: reference.0,
            });
        }
    }
}

/// Applies overlap messages to the registry, door prompts, and carry state.
pub fn apply_overlap_messages(
    mut began: MessageReader<OverlapBegan>,
    mut ended: MessageReader<OverlapEnded>,
    mut registry: ResMut<ProximityRegistry>,
    mut arena: ResMut<InteractableArena>,
    mut carry: ResMut<CarryState>,
) {
    for event in began.read() {
        let Some(interactable) = arena.get(event.interactable) else {
            warn!(
                target: "interaction",
                "Overlap began with {} but it has no record", event.interactable
            );
            continue;
        };

        if matches!(interactable, Interactable::Pickup(_)) {
            carry.set_nearby_pickup(event.interactable);
        }
        if registry.register(event.interactable) {
            debug!(target: "interaction", "{} entered range", event.interactable);
        }
    }

    for event in ended.read() {
        registry.unregister(event.interactable);
        carry.leave_pickup(event.interactable);
        if let Some(interactable) = arena.get_mut(event.interactable) {
            interactable.on_proximity_exit();
        }
        debug!(target: "interaction", "{} left range", event.interactable);
    }
}

/// Resolves the active interactable and the prompt for this tick.
#[allow(clippy::too_many_arguments)]
pub fn resolve_active_interactable(
    actors: Query<&Transform, With<Player>>,
    interactables: Query<(&InteractableRef, &Transform, &Visibility), Without<Player>>,
    arena: Res<InteractableArena>,
    modal: Res<ModalCoordinator>,
    carry: Res<CarryState>,
    settings: Res<InteractionSettings>,
    mut registry: ResMut<ProximityRegistry>,
    mut prompt: ResMut<ProximityPrompt>,
) {
    let Ok(actor) = actors.single() else {
        return;
    };

    let positions: HashMap<InteractableId, Vec3> = interactables
        .iter()
        .filter(|(reference, _, visibility)| {
            **visibility != Visibility::Hidden && arena.contains(reference.0)
        })
        .map(|(reference, transform, _)| (reference.0, transform.translation))
        .collect();

    registry.resolve(actor.translation, modal.book_open(), |id| {
        positions.get(&id).copied()
    });

    let next = registry.prompt(&arena, carry.is_carrying(), &settings.prompts.drop);
    if prompt.current != next {
        prompt.current = next;
    }
}

/// Runs the active interactable's activation when the interact action fires.
#[allow(clippy::too_many_arguments)]
pub fn handle_activation_input(
    input: Res<ActionInput>,
    settings: Res<InteractionSettings>,
    mut registry: ResMut<ProximityRegistry>,
    mut arena: ResMut<InteractableArena>,
    mut modal: ResMut<ModalCoordinator>,
    mut fader: ResMut<ScreenFader>,
    mut teleport: ResMut<TeleportController>,
    mut carry: ResMut<CarryState>,
    mut bodies: PickupBodies,
    mut dialogue_requests: MessageWriter<DialogueRequested>,
    mut book_requests: MessageWriter<BookRequested>,
    mut activated: MessageWriter<InteractableActivated>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
    mut faults: MessageWriter<InteractionFaulted>,
) {
    if !input.pressed(InteractionAction::Interact) {
        return;
    }

    let Some(id) = registry.activation_target(modal.flags()) else {
        debug!(
            target: "interaction",
            "Interact pressed with nothing to activate (flags: {:?})", modal.flags()
        );
        return;
    };

    let Some(interactable) = arena.get_mut(id) else {
        faults.write(InteractionFaulted {
            source: "activation",
            fault: InteractionFault::missing("interactable record"),
        });
        return;
    };
    let kind = interactable.kind_label();

    let outcome = match interactable.activate(carry.carried()) {
        Ok(outcome) => outcome,
        Err(fault) => {
            warn!(target: "interaction", "Activation of {} {} failed: {}", kind, id, fault);
            faults.write(InteractionFaulted {
                source: "activation",
                fault,
            });
            return;
        }
    };

    info!(target: "interaction", "Activated {} {}: {}", kind, id, outcome.label());
    activated.write(InteractableActivated {
        interactable: id,
        outcome: outcome.label(),
    });

    let result = match outcome {
        ActivationOutcome::DoorUnlocked | ActivationOutcome::DoorStillLocked => Ok(()),
        ActivationOutcome::Teleport { target } => teleport
            .begin(id, target, &settings.teleport, &mut modal, &mut fader)
            .map(|()| {
                modal_changes.write(ModalTransitioned {
                    kind: ModalKind::Teleport,
                    opened: true,
                });
            }),
        ActivationOutcome::OpenDialogue { speaker, lines } => {
            dialogue_requests.write(DialogueRequested {
                npc: id,
                speaker,
                lines,
            });
            Ok(())
        }
        ActivationOutcome::OpenBook(book) => {
            book_requests.write(BookRequested { source: id, book });
            Ok(())
        }
        ActivationOutcome::PickUp(item) => {
            take_item(id, item, &mut carry, &mut registry, &mut bodies)
        }
    };

    if let Err(fault) = result {
        warn!(target: "interaction", "Follow-up for {} refused: {}", id, fault);
        faults.write(InteractionFaulted {
            source: "activation",
            fault,
        });
    }
}

/// Handles the dedicated pickup and drop actions.
///
/// Both are ignored while any modal is open.
#[allow(clippy::too_many_arguments)]
pub fn handle_carry_input(
    input: Res<ActionInput>,
    modal: Res<ModalCoordinator>,
    arena: Res<InteractableArena>,
    mut registry: ResMut<ProximityRegistry>,
    mut carry: ResMut<CarryState>,
    actors: Query<(&Transform, &PlayerMotor), With<Player>>,
    mut bodies: PickupBodies,
    mut faults: MessageWriter<InteractionFaulted>,
) {
    if modal.holder().is_some() {
        return;
    }

    if input.pressed(InteractionAction::Pickup) {
        if let Some(id) = carry.nearby_pickup() {
            let result = match arena.get(id) {
                Some(Interactable::Pickup(pickup)) => take_item(
                    id,
                    pickup.item.clone(),
                    &mut carry,
                    &mut registry,
                    &mut bodies,
                ),
                _ => Err(InteractionFault::missing("pickup record")),
            };

            if let Err(fault) = result {
                debug!(target: "interaction", "Pickup of {} refused: {}", id, fault);
                faults.write(InteractionFaulted {
                    source: "carry",
                    fault,
                });
            }
        }
    }

    if input.pressed(InteractionAction::Drop) && carry.is_carrying() {
        let Ok((actor, motor)) = actors.single() else {
            return;
        };
        let Some((source, item)) = carry.drop_item() else {
            return;
        };

        let forward = actor.forward().as_vec3();
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let landing = actor.translation + flat_forward * motor.drop_distance;

        match bodies.iter_mut().find(|(reference, ..)| reference.0 == source) {
            Some((_, mut transform, mut visibility, mut volume)) => {
                transform.translation.x = landing.x;
                transform.translation.z = landing.z;
                *visibility = Visibility::Inherited;
                volume.inside = false;
                info!(target: "interaction", "Dropped {} at {:?}", item.display_name, landing);
            }
            None => {
                warn!(
                    target: "interaction",
                    "Dropped {} but its world body is gone", item.display_name
                );
                faults.write(InteractionFaulted {
                    source: "carry",
                    fault: InteractionFault::missing("pickup body"),
                });
            }
        }
    }
}

/// Moves an item into the carry slot and hides its world body.
fn take_item(
    source: InteractableId,
    item: ItemRef,
    carry: &mut CarryState,
    registry: &mut ProximityRegistry,
    bodies: &mut PickupBodies,
) -> Result<(), InteractionFault> {
    let name = item.display_name.clone();
    carry.pick_up(source, item)?;
    registry.unregister(source);

    if let Some((_, _, mut visibility, mut volume)) =
        bodies.iter_mut().find(|(reference, ..)| reference.0 == source)
    {
        *visibility = Visibility::Hidden;
        volume.inside = false;
    }

    info!(target: "interaction", "Picked up {}", name);
    Ok(())
}

/// Advances the full-screen fade on real time.
pub fn tick_screen_fader(clock: Res<SimulationClock>, mut fader: ResMut<ScreenFader>) {
    fader.tick(clock.real_secs());
}

/// Drives the teleport in flight, if any.
#[allow(clippy::too_many_arguments)]
pub fn drive_teleport(
    clock: Res<SimulationClock>,
    settings: Res<InteractionSettings>,
    mut teleport: ResMut<TeleportController>,
    mut modal: ResMut<ModalCoordinator>,
    mut fader: ResMut<ScreenFader>,
    mut registry: ResMut<ProximityRegistry>,
    mut carry: ResMut<CarryState>,
    mut arena: ResMut<InteractableArena>,
    mut actors: Query<(&mut Transform, &mut CollisionResponse), With<Player>>,
    mut volumes: Query<&mut TriggerVolume>,
    mut modal_changes: MessageWriter<ModalTransitioned>,
    mut faults: MessageWriter<InteractionFaulted>,
) {
    if !teleport.is_in_flight() {
        return;
    }

    let Ok((transform, collision)) = actors.single_mut() else {
        warn!(target: "teleport", "Teleport in flight without an actor to move");
        return;
    };
    let mut actor = PlayerTransformControl::new(transform, collision);
    let before = actor.position();
    let candidates = registry.candidates().to_vec();

    let progress = teleport.step(
        clock.scaled_secs(),
        &mut modal,
        &mut fader,
        &mut actor,
        &mut registry,
        &mut carry,
    );

    // Relocation cleared the registry without exit events. Reset what those
    // events would have and let every volume report afresh.
    if actor.position() != before {
        for mut volume in &mut volumes {
            volume.inside = false;
        }
        for id in candidates {
            if let Some(interactable) = arena.get_mut(id) {
                interactable.on_proximity_exit();
            }
        }
    }

    let Some(TeleportProgress::Finished { arrived }) = progress else {
        return;
    };

    if !arrived {
        faults.write(InteractionFaulted {
            source: "teleport",
            fault: InteractionFault::timeout(settings.teleport.confirm_timeout_seconds),
        });
    }
    modal_changes.write(ModalTransitioned {
        kind: ModalKind::Teleport,
        opened: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::{
        core::{input::ActionState, modal::ModalFlag},
        interaction::{
            components::{BookContent, BookInteractable, DialogueNpc, ItemPickup},
            door::DoorLock,
            registry::PromptText,
        },
    };

    #[derive(Resource, Debug, Default)]
    struct Observed {
        began: usize,
        ended: usize,
        dialogues: usize,
        books: usize,
        outcomes: Vec<&'static str>,
    }

    fn observe(
        mut began: MessageReader<OverlapBegan>,
        mut ended: MessageReader<OverlapEnded>,
        mut dialogues: MessageReader<DialogueRequested>,
        mut books: MessageReader<BookRequested>,
        mut activated: MessageReader<InteractableActivated>,
        mut observed: ResMut<Observed>,
    ) {
        observed.began += began.read().count();
        observed.ended += ended.read().count();
        observed.dialogues += dialogues.read().count();
        observed.books += books.read().count();
        for event in activated.read() {
            observed.outcomes.push(event.outcome);
        }
    }

    fn interaction_app() -> App {
        let mut app = App::new();
        app.add_message::<OverlapBegan>()
            .add_message::<OverlapEnded>()
            .add_message::<DialogueRequested>()
            .add_message::<BookRequested>()
            .add_message::<InteractableActivated>()
            .add_message::<InteractionFaulted>()
            .add_message::<ModalTransitioned>()
            .insert_resource(InteractionSettings::default())
            .insert_resource(ScreenFader::default())
            .insert_resource(ProximityRegistry::default())
            .init_resource::<InteractableArena>()
            .init_resource::<CarryState>()
            .init_resource::<ProximityPrompt>()
            .init_resource::<TeleportController>()
            .init_resource::<ModalCoordinator>()
            .init_resource::<ActionInput>()
            .init_resource::<SimulationClock>()
            .init_resource::<Observed>()
            .add_systems(
                Update,
                (
                    detect_trigger_overlaps,
                    apply_overlap_messages,
                    resolve_active_interactable,
                    handle_activation_input,
                    handle_carry_input,
                    tick_screen_fader,
                    drive_teleport,
                    observe,
                )
                    .chain(),
            );
        app
    }

    fn spawn_actor(app: &mut App, at: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::from_translation(at),
                PlayerMotor::default(),
                CollisionResponse::default(),
            ))
            .id()
    }

    fn spawn_body(
        app: &mut App,
        interactable: Interactable,
        at: Vec3,
        radius: f32,
    ) -> (InteractableId, Entity) {
        let id = app
            .world_mut()
            .resource_mut::<InteractableArena>()
            .insert(interactable);
        let entity = app
            .world_mut()
            .spawn((
                InteractableRef(id),
                Transform::from_translation(at),
                Visibility::Inherited,
                TriggerVolume::new(radius),
            ))
            .id();
        (id, entity)
    }

    fn move_actor(app: &mut App, actor: Entity, to: Vec3) {
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(actor) {
            transform.translation = to;
        }
    }

    /// Runs one tick with `action` pressed, then clears the input.
    fn update_pressing(app: &mut App, action: InteractionAction) {
        app.world_mut()
            .resource_mut::<ActionInput>()
            .set(action, ActionState::PRESSED);
        app.update();
        app.world_mut().resource_mut::<ActionInput>().clear();
    }

    fn warden() -> Interactable {
        Interactable::Npc(DialogueNpc {
            name: "Warden".to_string(),
            lines: vec!["Halt.".to_string()],
            prompt: "Press [E] to talk".to_string(),
        })
    }

    fn lantern() -> Interactable {
        Interactable::Pickup(ItemPickup {
            item: ItemRef::new("lantern", "Lantern"),
            prompt: "Press [F] to pick up".to_string(),
        })
    }

    fn inside(app: &App, entity: Entity) -> bool {
        app.world()
            .get::<TriggerVolume>(entity)
            .map(|volume| volume.inside)
            .unwrap_or(false)
    }

    #[test]
    fn overlap_messages_fire_only_on_crossing() {
        let mut app = interaction_app();
        let actor = spawn_actor(&mut app, Vec3::new(5.0, 0.0, 0.0));
        let (npc, body) = spawn_body(&mut app, warden(), Vec3::ZERO, 2.0);

        app.update();
        assert_eq!(app.world().resource::<Observed>().began, 0);

        move_actor(&mut app, actor, Vec3::new(1.0, 0.0, 0.0));
        app.update();
        app.update();

        let observed = app.world().resource::<Observed>();
        assert_eq!(observed.began, 1);
        assert!(inside(&app, body));
        let registry = app.world().resource::<ProximityRegistry>();
        assert_eq!(registry.candidates(), &[npc]);
        assert_eq!(registry.active(), Some(npc));

        move_actor(&mut app, actor, Vec3::new(5.0, 0.0, 0.0));
        app.update();
        app.update();

        let observed = app.world().resource::<Observed>();
        assert_eq!(observed.began, 1);
        assert_eq!(observed.ended, 1);
        assert!(app
            .world()
            .resource::<ProximityRegistry>()
            .candidates()
            .is_empty());
        assert_eq!(
            app.world().resource::<ProximityPrompt>().current,
            PromptText::Hidden
        );
    }

    #[test]
    fn hidden_item_never_overlaps() {
        let mut app = interaction_app();
        spawn_actor(&mut app, Vec3::ZERO);
        let (_, body) = spawn_body(&mut app, lantern(), Vec3::ZERO, 1.2);
        if let Some(mut visibility) = app.world_mut().get_mut::<Visibility>(body) {
            *visibility = Visibility::Hidden;
        }

        app.update();

        assert_eq!(app.world().resource::<Observed>().began, 0);
        assert!(!inside(&app, body));
        assert_eq!(app.world().resource::<CarryState>().nearby_pickup(), None);
    }

    #[test]
    fn picked_up_item_registers_again_after_drop() {
        let mut app = interaction_app();
        spawn_actor(&mut app, Vec3::new(0.0, 0.0, 0.5));
        let (item, body) = spawn_body(&mut app, lantern(), Vec3::ZERO, 2.0);

        app.update();
        assert_eq!(
            app.world().resource::<CarryState>().nearby_pickup(),
            Some(item)
        );

        update_pressing(&mut app, InteractionAction::Pickup);
        assert!(app.world().resource::<CarryState>().is_carrying());
        assert_eq!(app.world().get::<Visibility>(body), Some(&Visibility::Hidden));
        assert!(!inside(&app, body));
        assert!(app
            .world()
            .resource::<ProximityRegistry>()
            .candidates()
            .is_empty());

        // While carried the body stays out of overlap tracking.
        app.update();
        assert_eq!(app.world().resource::<Observed>().began, 1);
        assert!(matches!(
            app.world().resource::<ProximityPrompt>().current,
            PromptText::Drop(_)
        ));

        update_pressing(&mut app, InteractionAction::Drop);
        assert!(!app.world().resource::<CarryState>().is_carrying());
        assert_eq!(
            app.world().get::<Visibility>(body),
            Some(&Visibility::Inherited)
        );

        app.update();
        assert_eq!(app.world().resource::<Observed>().began, 2);
        assert!(inside(&app, body));
        assert_eq!(
            app.world().resource::<ProximityRegistry>().candidates(),
            &[item]
        );
        assert_eq!(
            app.world().resource::<CarryState>().nearby_pickup(),
            Some(item)
        );
    }

    #[test]
    fn interact_is_swallowed_while_a_modal_blocks_it() {
        let mut app = interaction_app();
        spawn_actor(&mut app, Vec3::new(0.5, 0.0, 0.0));
        spawn_body(&mut app, warden(), Vec3::ZERO, 2.0);
        app.update();

        let ticket = {
            let mut modal = app.world_mut().resource_mut::<ModalCoordinator>();
            let ticket = modal.acquire(ModalKind::Dialogue).expect("slot is free");
            modal
                .set_flag(&ticket, ModalFlag::NpcBlockingInteract, true)
                .expect("dialogue owns the flag");
            ticket
        };

        update_pressing(&mut app, InteractionAction::Interact);
        let observed = app.world().resource::<Observed>();
        assert_eq!(observed.dialogues, 0);
        assert!(observed.outcomes.is_empty());

        {
            let mut modal = app.world_mut().resource_mut::<ModalCoordinator>();
            modal
                .set_flag(&ticket, ModalFlag::NpcBlockingInteract, false)
                .expect("dialogue owns the flag");
            modal.release(ticket);
        }

        update_pressing(&mut app, InteractionAction::Interact);
        let observed = app.world().resource::<Observed>();
        assert_eq!(observed.dialogues, 1);
        assert_eq!(observed.outcomes, vec!["open_dialogue"]);
    }

    #[test]
    fn open_book_suppresses_activation() {
        let mut app = interaction_app();
        spawn_actor(&mut app, Vec3::ZERO);
        spawn_body(
            &mut app,
            Interactable::Book(BookInteractable {
                book: BookContent::new("Atlas", vec!["pages/atlas_0.png".to_string()]),
                prompt: "Press [E] to read".to_string(),
            }),
            Vec3::new(0.5, 0.0, 0.0),
            1.5,
        );
        app.update();

        update_pressing(&mut app, InteractionAction::Interact);
        assert_eq!(app.world().resource::<Observed>().books, 1);

        {
            let mut modal = app.world_mut().resource_mut::<ModalCoordinator>();
            let ticket = modal.acquire(ModalKind::BookReader).expect("slot is free");
            modal
                .set_flag(&ticket, ModalFlag::BookOpen, true)
                .expect("reader owns the flag");
        }

        update_pressing(&mut app, InteractionAction::Interact);
        assert_eq!(app.world().resource::<Observed>().books, 1);
        assert_eq!(
            app.world().resource::<ProximityPrompt>().current,
            PromptText::Hidden
        );
    }

    #[test]
    fn teleport_resets_volumes_and_door_prompts() {
        let mut app = interaction_app();
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(Duration::from_secs(1));

        let prompts = InteractionSettings::default().prompts;
        let target = Vec3::new(0.0, 0.0, -30.0);
        let actor = spawn_actor(&mut app, Vec3::new(-0.5, 0.0, 0.0));
        let (cellar, cellar_body) = spawn_body(
            &mut app,
            Interactable::Door(
                DoorLock::new(&prompts.interact, &prompts.locked, Some(target))
                    .locked_with("brass-key"),
            ),
            Vec3::ZERO,
            1.8,
        );
        let (_, gate_body) = spawn_body(
            &mut app,
            Interactable::Door(DoorLock::new(
                &prompts.interact,
                &prompts.locked,
                Some(target),
            )),
            Vec3::new(1.5, 0.0, 0.0),
            1.8,
        );
        app.update();

        update_pressing(&mut app, InteractionAction::Interact);
        let arena = app.world().resource::<InteractableArena>();
        assert_eq!(arena.get(cellar).map(Interactable::prompt), Some(prompts.locked.as_str()));

        // Step next to the unlocked gate while still inside the cellar door's volume.
        move_actor(&mut app, actor, Vec3::new(1.4, 0.0, 0.0));
        app.update();
        assert!(inside(&app, cellar_body));
        assert!(inside(&app, gate_body));

        update_pressing(&mut app, InteractionAction::Interact);

        assert_eq!(
            app.world().get::<Transform>(actor).map(|t| t.translation),
            Some(target)
        );
        assert!(!inside(&app, cellar_body));
        assert!(!inside(&app, gate_body));
        assert!(app
            .world()
            .resource::<ProximityRegistry>()
            .candidates()
            .is_empty());
        let arena = app.world().resource::<InteractableArena>();
        assert_eq!(
            arena.get(cellar).map(Interactable::prompt),
            Some(prompts.interact.as_str())
        );
        assert_eq!(
            app.world().resource::<ModalCoordinator>().holder(),
            Some(ModalKind::Teleport)
        );
    }
}
