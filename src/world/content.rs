//! Static scene content: doors, NPCs, books, and pickups read from `config/content.toml`.
use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/content.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawContentConfig {
    #[serde(default)]
    doors: Vec<RawDoor>,
    #[serde(default)]
    npcs: Vec<RawNpc>,
    #[serde(default)]
    books: Vec<RawBook>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDoor {
    position: [f32; 3],
    target: Option<[f32; 3]>,
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawNpc {
    name: String,
    position: [f32; 3],
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawBook {
    title: String,
    position: [f32; 3],
    #[serde(default)]
    pages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    id: String,
    #[serde(default)]
    name: Option<String>,
    position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorEntry {
    pub position: Vec3,
    pub target: Option<Vec3>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NpcEntry {
    pub name: String,
    pub position: Vec3,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookEntry {
    pub title: String,
    pub position: Vec3,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    pub position: Vec3,
}

/// Everything the demo scene spawns as interactables.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneContent {
    pub doors: Vec<DoorEntry>,
    pub npcs: Vec<NpcEntry>,
    pub books: Vec<BookEntry>,
    pub items: Vec<ItemEntry>,
}

impl SceneContent {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_or_default(&raw),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to the built-in scene.",
                    CONFIG_PATH, err
                );
                Self::fallback()
            }
        }
    }

    fn from_toml_or_default(raw: &str) -> Self {
        match toml::from_str::<RawContentConfig>(raw) {
            Ok(parsed) => parsed.into(),
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Falling back to the built-in scene.",
                    CONFIG_PATH, err
                );
                Self::fallback()
            }
        }
    }

    /// Small scene used when no content file is available.
    fn fallback() -> Self {
        Self {
            doors: vec![DoorEntry {
                position: Vec3::new(0.0, 1.0, -6.0),
                target: Some(Vec3::new(0.0, 0.0, -12.0)),
                key: Some("brass-key".to_string()),
            }],
            npcs: vec![NpcEntry {
                name: "Warden".to_string(),
                position: Vec3::new(-4.0, 1.0, 0.0),
                lines: vec![
                    "The cellar door is locked.".to_string(),
                    "Someone dropped the key near the well.".to_string(),
                ],
            }],
            books: Vec::new(),
            items: vec![ItemEntry {
                id: "brass-key".to_string(),
                name: "Brass Key".to_string(),
                position: Vec3::new(5.0, 0.3, 3.0),
            }],
        }
    }
}

impl From<RawContentConfig> for SceneContent {
    fn from(value: RawContentConfig) -> Self {
        let doors = value
            .doors
            .into_iter()
            .map(|door| DoorEntry {
                position: Vec3::from_array(door.position),
                target: door.target.map(Vec3::from_array),
                key: door
                    .key
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty()),
            })
            .collect();

        let npcs = value
            .npcs
            .into_iter()
            .map(|npc| NpcEntry {
                name: npc.name,
                position: Vec3::from_array(npc.position),
                lines: npc.lines,
            })
            .collect();

        let books = value
            .books
            .into_iter()
            .map(|book| BookEntry {
                title: book.title,
                position: Vec3::from_array(book.position),
                pages: book.pages,
            })
            .collect();

        let items = value
            .items
            .into_iter()
            .map(|item| ItemEntry {
                name: item
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| item.id.clone()),
                id: item.id,
                position: Vec3::from_array(item.position),
            })
            .collect();

        Self {
            doors,
            npcs,
            books,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_content_kind() {
        let raw = r#"
            [[doors]]
            position = [0.0, 1.0, -6.0]
            target = [0.0, 0.0, -12.0]
            key = " cellar-key "

            [[npcs]]
            name = "Librarian"
            position = [2.0, 1.0, 0.0]
            lines = ["Hush.", "Books are upstairs."]

            [[books]]
            title = "Vale Atlas"
            position = [3.0, 0.5, 1.0]
            pages = ["pages/vale_0.png", "pages/vale_1.png"]

            [[items]]
            id = "cellar-key"
            position = [1.0, 0.3, 1.0]
        "#;

        let content = SceneContent::from_toml_or_default(raw);

        assert_eq!(content.doors.len(), 1);
        assert_eq!(content.doors[0].key.as_deref(), Some("cellar-key"));
        assert_eq!(content.doors[0].target, Some(Vec3::new(0.0, 0.0, -12.0)));
        assert_eq!(content.npcs[0].lines.len(), 2);
        assert_eq!(content.books[0].pages.len(), 2);
        // Missing display names fall back to the id.
        assert_eq!(content.items[0].name, "cellar-key");
    }

    #[test]
    fn malformed_file_uses_builtin_scene() {
        let content = SceneContent::from_toml_or_default("doors = 3");
        assert_eq!(content.doors.len(), 1);
        assert_eq!(content.items[0].id, "brass-key");
    }

    #[test]
    fn blank_key_means_unlocked_door() {
        let raw = r#"
            [[doors]]
            position = [0.0, 0.0, 0.0]
            key = "  "
        "#;
        let content = SceneContent::from_toml_or_default(raw);
        assert_eq!(content.doors[0].key, None);
        assert_eq!(content.doors[0].target, None);
    }
}
