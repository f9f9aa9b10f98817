//! Note graph → outline.

use std::collections::HashMap;

use serde::Deserialize;

use crate::diagram::{NoteRecord, Role, Uid};
use crate::outline::{Annotated, Chapter, Character, Outline, Scene, WorldElement};

pub const DEFAULT_CHAPTER_ID: &str = "1";
pub const DEFAULT_CHAPTER_TITLE: &str = "Chapter 1";

/// Which note roles become outline entities. Read directly from the `[export]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExportToggles {
    pub scenes: bool,
    pub characters: bool,
    pub locations: bool,
    pub items: bool,
}

impl ExportToggles {
    pub fn all() -> Self {
        Self {
            scenes: true,
            characters: true,
            locations: true,
            items: true,
        }
    }
}

/// Assembles an [`Outline`] from the classified notes of one diagram.
#[derive(Debug, Clone, Copy)]
pub struct GraphResolver {
    toggles: ExportToggles,
}

impl GraphResolver {
    pub fn new(toggles: ExportToggles) -> Self {
        Self { toggles }
    }

    /// Build the outline. All scenes land in one chapter, ordered by diagram position.
    pub fn resolve(&self, notes: &[NoteRecord]) -> Outline {
        let by_uid: HashMap<Uid, &NoteRecord> = notes.iter().map(|n| (n.uid, n)).collect();

        let mut outline = Outline::new();
        outline.add_chapter(
            DEFAULT_CHAPTER_ID,
            Chapter {
                title: DEFAULT_CHAPTER_TITLE.to_string(),
                scenes: Vec::new(),
            },
        );

        for note in notes {
            let id = note.uid.to_string();
            match note.role {
                Role::MajorCharacter | Role::MinorCharacter if self.toggles.characters => {
                    let mut character = Character {
                        title: note.text.clone(),
                        is_major: note.role == Role::MajorCharacter,
                        ..Default::default()
                    };
                    annotate_from_connections(&mut character, note, &by_uid);
                    outline.add_character(id, character);
                }
                Role::Location if self.toggles.locations => {
                    outline.add_location(id, world_element(note, &by_uid));
                }
                Role::Item if self.toggles.items => {
                    outline.add_item(id, world_element(note, &by_uid));
                }
                _ => {}
            }
        }

        if self.toggles.scenes {
            let mut scene_notes: Vec<&NoteRecord> = notes.iter().filter(|n| n.role.is_scene()).collect();
            // sort_by is stable: equal positions keep diagram order.
            scene_notes.sort_by(|a, b| a.position.key().total_cmp(&b.position.key()));

            for note in scene_notes {
                let scene = build_scene(note, &by_uid, &outline);
                outline.add_scene(DEFAULT_CHAPTER_ID, note.uid.to_string(), scene);
            }
        }

        log::info!(
            "Resolved {} notes into {} scenes, {} characters, {} locations, {} items",
            notes.len(),
            outline.scenes.len(),
            outline.characters.len(),
            outline.locations.len(),
            outline.items.len()
        );
        outline
    }
}

fn world_element(note: &NoteRecord, by_uid: &HashMap<Uid, &NoteRecord>) -> WorldElement {
    let mut element = WorldElement {
        title: note.text.clone(),
        ..Default::default()
    };
    annotate_from_connections(&mut element, note, by_uid);
    element
}

fn build_scene(note: &NoteRecord, by_uid: &HashMap<Uid, &NoteRecord>, outline: &Outline) -> Scene {
    let mut scene = Scene {
        title: note.text.clone(),
        is_notes_scene: note.role == Role::NotesScene,
        ..Default::default()
    };

    for uid in &note.connections {
        let Some(target) = by_uid.get(uid) else {
            log::debug!("Scene {}: connection to unknown note {} skipped", note.uid, uid);
            continue;
        };
        let id = target.uid.to_string();
        match target.role {
            Role::MajorCharacter | Role::MinorCharacter if outline.characters.contains_key(&id) => {
                // An arrow from the character to this scene marks it as the lead.
                if target.points_to(note.uid) {
                    scene.characters.insert(0, id);
                } else {
                    scene.characters.push(id);
                }
            }
            Role::Location if outline.locations.contains_key(&id) => scene.locations.push(id),
            Role::Item if outline.items.contains_key(&id) => scene.items.push(id),
            _ => {
                if !annotate(&mut scene, target) {
                    log::debug!("Scene {}: connection to {} note {} skipped", note.uid, target.role, uid);
                }
            }
        }
    }

    scene
}

/// Attach tags and free-text notes reachable from `note` to `entity`.
fn annotate_from_connections<A: Annotated>(entity: &mut A, note: &NoteRecord, by_uid: &HashMap<Uid, &NoteRecord>) {
    for target in note.connections.iter().filter_map(|uid| by_uid.get(uid)) {
        annotate(entity, target);
    }
}

/// Returns false when `target` carries nothing to attach.
fn annotate<A: Annotated + ?Sized>(entity: &mut A, target: &NoteRecord) -> bool {
    match target.role {
        Role::Tag => {
            entity.tags_mut().push(target.text.clone());
            true
        }
        Role::FreeNote => {
            entity.notes_mut().push_str(&target.text);
            true
        }
        _ => false,
    }
}
