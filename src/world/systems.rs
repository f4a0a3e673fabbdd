//! Systems for the world module.
use bevy::{math::primitives::Plane3d, prelude::*};

use crate::{
    core::config::{InteractionSettings, PromptTexts},
    interaction::{
        components::{
            BookContent, BookInteractable, DialogueNpc, InteractableArena, InteractableRef,
            Interactable, ItemPickup, ItemRef, TriggerVolume,
        },
        door::DoorLock,
    },
    player::components::{CollisionResponse, FollowCamera, Player, PlayerMotor},
    world::{
        components::{ContentBody, PrimarySun},
        content::{BookEntry, DoorEntry, ItemEntry, NpcEntry, SceneContent},
    },
};

const GROUND_SCALE: f32 = 100.0;
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 9.0, 12.0);
const ACTOR_START: Vec3 = Vec3::new(0.0, 0.9, 4.0);

const DOOR_RADIUS: f32 = 1.8;
const NPC_RADIUS: f32 = 2.2;
const BOOK_RADIUS: f32 = 1.5;
const ITEM_RADIUS: f32 = 1.2;

/// Spawns the ground plane, light, actor, and the camera trailing it.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(90, 140, 90),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(16.0, 32.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Capsule3d::new(0.35, 1.1))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(70, 110, 200),
            ..default()
        })),
        Transform::from_translation(ACTOR_START),
        Player,
        PlayerMotor::default(),
        CollisionResponse::default(),
        Name::new("Player"),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(ACTOR_START + CAMERA_OFFSET)
            .looking_at(ACTOR_START, Vec3::Y),
        FollowCamera {
            offset: CAMERA_OFFSET,
        },
    ));
}

/// Registers every content entry in the arena and spawns its body.
pub fn spawn_scene_content(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    content: Res<SceneContent>,
    settings: Res<InteractionSettings>,
    mut arena: ResMut<InteractableArena>,
) {
    let prompts = &settings.prompts;
    let mut spawn_body = |interactable: Interactable,
                          position: Vec3,
                          size: Vec3,
                          color: Color,
                          radius: f32,
                          name: String| {
        let id = arena.insert(interactable);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                ..default()
            })),
            Transform::from_translation(position),
            Visibility::Inherited,
            InteractableRef(id),
            TriggerVolume::new(radius),
            ContentBody,
            Name::new(name),
        ));
    };

    for door in &content.doors {
        spawn_body(
            door_interactable(door, prompts),
            door.position,
            Vec3::new(1.2, 2.0, 0.2),
            Color::srgb_u8(120, 80, 40),
            DOOR_RADIUS,
            "Door".to_string(),
        );
    }

    for npc in &content.npcs {
        spawn_body(
            npc_interactable(npc, prompts),
            npc.position,
            Vec3::new(0.7, 1.8, 0.7),
            Color::srgb_u8(200, 160, 90),
            NPC_RADIUS,
            format!("NPC {}", npc.name),
        );
    }

    for book in &content.books {
        spawn_body(
            book_interactable(book, prompts),
            book.position,
            Vec3::new(0.5, 0.15, 0.4),
            Color::srgb_u8(150, 40, 40),
            BOOK_RADIUS,
            format!("Book {}", book.title),
        );
    }

    for item in &content.items {
        spawn_body(
            item_interactable(item, prompts),
            item.position,
            Vec3::splat(0.3),
            Color::srgb_u8(220, 190, 60),
            ITEM_RADIUS,
            format!("Item {}", item.id),
        );
    }

    info!(
        "Scene content spawned: {} interactables ({} doors, {} npcs, {} books, {} items)",
        arena.len(),
        content.doors.len(),
        content.npcs.len(),
        content.books.len(),
        content.items.len()
    );
}

fn door_interactable(door: &DoorEntry, prompts: &PromptTexts) -> Interactable {
    let lock = DoorLock::new(&prompts.interact, &prompts.locked, door.target);
    match &door.key {
        Some(key) => Interactable::Door(lock.locked_with(key)),
        None => Interactable::Door(lock),
    }
}

fn npc_interactable(npc: &NpcEntry, prompts: &PromptTexts) -> Interactable {
    Interactable::Npc(DialogueNpc {
        name: npc.name.clone(),
        lines: npc.lines.clone(),
        prompt: prompts.talk.clone(),
    })
}

fn book_interactable(book: &BookEntry, prompts: &PromptTexts) -> Interactable {
    Interactable::Book(BookInteractable {
        book: BookContent::new(&book.title, book.pages.clone()),
        prompt: prompts.interact.clone(),
    })
}

fn item_interactable(item: &ItemEntry, prompts: &PromptTexts) -> Interactable {
    Interactable::Pickup(ItemPickup {
        item: ItemRef::new(&item.id, &item.name),
        prompt: prompts.pickup.clone(),
    })
}
