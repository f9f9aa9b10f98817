//! In-memory story outline: chapters, scenes, characters, locations and items.
//!
//! Entities are keyed by string identifiers. When an outline is imported from
//! a diagram the keys are the note uids, so a scene's id matches the note it
//! came from. Ordering lives in the `*_order` lists, not in the maps.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NotegraphError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Scene ids in narrative order.
    #[serde(default)]
    pub scenes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    /// Outline-only scene that is not part of the narrative.
    #[serde(default)]
    pub is_notes_scene: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_major: bool,
}

/// Location or item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldElement {
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Mutable tag/notes view shared by every outline entity.
pub trait Annotated {
    fn tags_mut(&mut self) -> &mut Vec<String>;
    fn notes_mut(&mut self) -> &mut String;
}

macro_rules! impl_annotated {
    ($($ty:ty),*) => {
        $(impl Annotated for $ty {
            fn tags_mut(&mut self) -> &mut Vec<String> {
                &mut self.tags
            }
            fn notes_mut(&mut self) -> &mut String {
                &mut self.notes
            }
        })*
    };
}

impl_annotated!(Scene, Character, WorldElement);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub chapters: BTreeMap<String, Chapter>,
    #[serde(default)]
    pub chapter_order: Vec<String>,
    #[serde(default)]
    pub scenes: BTreeMap<String, Scene>,
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    #[serde(default)]
    pub character_order: Vec<String>,
    #[serde(default)]
    pub locations: BTreeMap<String, WorldElement>,
    #[serde(default)]
    pub location_order: Vec<String>,
    #[serde(default)]
    pub items: BTreeMap<String, WorldElement>,
    #[serde(default)]
    pub item_order: Vec<String>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chapter(&mut self, id: impl Into<String>, chapter: Chapter) {
        let id = id.into();
        if self.chapters.insert(id.clone(), chapter).is_none() {
            self.chapter_order.push(id);
        }
    }

    /// Insert a scene and append it to `chapter_id`. Returns false if the chapter is unknown.
    pub fn add_scene(&mut self, chapter_id: &str, id: impl Into<String>, scene: Scene) -> bool {
        let id = id.into();
        match self.chapters.get_mut(chapter_id) {
            Some(chapter) => {
                chapter.scenes.push(id.clone());
                self.scenes.insert(id, scene);
                true
            }
            None => false,
        }
    }

    pub fn add_character(&mut self, id: impl Into<String>, character: Character) {
        let id = id.into();
        if self.characters.insert(id.clone(), character).is_none() {
            self.character_order.push(id);
        }
    }

    pub fn add_location(&mut self, id: impl Into<String>, location: WorldElement) {
        let id = id.into();
        if self.locations.insert(id.clone(), location).is_none() {
            self.location_order.push(id);
        }
    }

    pub fn add_item(&mut self, id: impl Into<String>, item: WorldElement) {
        let id = id.into();
        if self.items.insert(id.clone(), item).is_none() {
            self.item_order.push(id);
        }
    }

    /// Scenes in chapter order, then scene order. Dangling ids are skipped.
    pub fn scenes_in_order(&self) -> impl Iterator<Item = (&str, &Scene)> + '_ {
        self.chapter_order
            .iter()
            .filter_map(move |ch_id| self.chapters.get(ch_id))
            .flat_map(|chapter| chapter.scenes.iter())
            .filter_map(move |sc_id| self.scenes.get(sc_id).map(|scene| (sc_id.as_str(), scene)))
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
            && self.characters.is_empty()
            && self.locations.is_empty()
            && self.items.is_empty()
    }

    /// Load an outline saved with [`Outline::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NotegraphError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the outline as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
