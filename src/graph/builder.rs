//! Outline → note graph.
//!
//! Scenes get fresh uids first, in chapter/scene order. Tags, characters,
//! locations and items are deduplicated by display title, so two outline
//! entities sharing a title collapse into one note. Scene and entity notes
//! become free-note nodes, one per owner.
//!
//! Point-to arrows are not produced. They only mark lead characters inside a
//! diagram and the outline has nothing to rebuild them from, so a diagram
//! exported from an outline and read back loses that emphasis.

use std::collections::HashMap;

use crate::diagram::{NoteRecord, Role, Uid};
use crate::outline::Outline;

/// Which title table an entity is deduplicated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Tag,
    Character,
    Location,
    Item,
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    notes: Vec<NoteRecord>,
    by_title: HashMap<(Kind, String), usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the complete note graph for `outline`.
    pub fn build(mut self, outline: &Outline) -> Vec<NoteRecord> {
        let scenes: Vec<_> = outline.scenes_in_order().collect();

        let scene_indices: Vec<usize> = scenes
            .iter()
            .map(|(_, scene)| {
                let role = if scene.is_notes_scene { Role::NotesScene } else { Role::Scene };
                self.push(&scene.title, role)
            })
            .collect();

        for ((scene_id, scene), &index) in scenes.iter().zip(&scene_indices) {
            self.attach_notes(index, &scene.notes);
            self.attach_tags(index, &scene.tags);

            for id in &scene.characters {
                match outline.characters.get(id) {
                    Some(_) => {
                        let character = self.character(outline, id);
                        self.connect(index, character);
                    }
                    None => log::warn!("Scene {} references unknown character {}", scene_id, id),
                }
            }
            for id in &scene.locations {
                match self.world_element(outline, Kind::Location, id) {
                    Some(location) => self.connect(index, location),
                    None => log::warn!("Scene {} references unknown location {}", scene_id, id),
                }
            }
            for id in &scene.items {
                match self.world_element(outline, Kind::Item, id) {
                    Some(item) => self.connect(index, item),
                    None => log::warn!("Scene {} references unknown item {}", scene_id, id),
                }
            }
        }

        // Entities no scene references still belong to the story.
        for id in &outline.character_order {
            if outline.characters.contains_key(id) {
                self.character(outline, id);
            }
        }
        for id in &outline.location_order {
            self.world_element(outline, Kind::Location, id);
        }
        for id in &outline.item_order {
            self.world_element(outline, Kind::Item, id);
        }

        log::info!(
            "Built {} notes from {} scenes",
            self.notes.len(),
            scene_indices.len()
        );
        self.notes
    }

    fn push(&mut self, text: &str, role: Role) -> usize {
        let index = self.notes.len();
        self.notes.push(NoteRecord::new(Uid::nth(index), text, role));
        index
    }

    /// Look up or create the deduplicated note for `title`. The flag is true when it was created.
    fn shared(&mut self, kind: Kind, title: &str, role: Role) -> (usize, bool) {
        let key = (kind, title.to_string());
        if let Some(&index) = self.by_title.get(&key) {
            return (index, false);
        }
        let index = self.push(title, role);
        self.by_title.insert(key, index);
        (index, true)
    }

    fn character(&mut self, outline: &Outline, id: &str) -> usize {
        let character = &outline.characters[id];
        let role = if character.is_major {
            Role::MajorCharacter
        } else {
            Role::MinorCharacter
        };
        let (index, created) = self.shared(Kind::Character, &character.title, role);
        if created {
            self.attach_notes(index, &character.notes);
            self.attach_tags(index, &character.tags);
        }
        index
    }

    fn world_element(&mut self, outline: &Outline, kind: Kind, id: &str) -> Option<usize> {
        let (table, role) = match kind {
            Kind::Location => (&outline.locations, Role::Location),
            Kind::Item => (&outline.items, Role::Item),
            Kind::Tag | Kind::Character => return None,
        };
        let element = table.get(id)?;
        let (index, created) = self.shared(kind, &element.title, role);
        if created {
            self.attach_notes(index, &element.notes);
            self.attach_tags(index, &element.tags);
        }
        Some(index)
    }

    fn attach_notes(&mut self, owner: usize, notes: &str) {
        if notes.is_empty() {
            return;
        }
        let note = self.push(notes, Role::FreeNote);
        self.connect(owner, note);
    }

    fn attach_tags(&mut self, owner: usize, tags: &[String]) {
        for tag in tags {
            let (index, _) = self.shared(Kind::Tag, tag, Role::Tag);
            self.connect(owner, index);
        }
    }

    /// Link two notes in both directions.
    fn connect(&mut self, a: usize, b: usize) {
        let (uid_a, uid_b) = (self.notes[a].uid, self.notes[b].uid);
        if !self.notes[a].connections.contains(&uid_b) {
            self.notes[a].connections.push(uid_b);
        }
        if !self.notes[b].connections.contains(&uid_a) {
            self.notes[b].connections.push(uid_a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Chapter, Character, Scene, WorldElement};

    fn find<'a>(notes: &'a [NoteRecord], text: &str) -> &'a NoteRecord {
        notes.iter().find(|n| n.text == text).unwrap()
    }

    fn sample_outline() -> Outline {
        let mut outline = Outline::new();
        outline.add_chapter("1", Chapter { title: "One".into(), scenes: vec![] });
        outline.add_chapter("2", Chapter { title: "Two".into(), scenes: vec![] });
        outline.add_character("c1", Character { title: "Al".into(), is_major: true, ..Default::default() });
        outline.add_character("c2", Character { title: "Bea".into(), tags: vec!["villain".into()], ..Default::default() });
        outline.add_location("l1", WorldElement { title: "Inn".into(), notes: "Smoky.".into(), ..Default::default() });
        outline.add_item("i1", WorldElement { title: "Map".into(), ..Default::default() });
        outline.add_scene(
            "1",
            "s1",
            Scene {
                title: "Arrival".into(),
                notes: "It rains.".into(),
                tags: vec!["act1".into()],
                characters: vec!["c1".into(), "c2".into()],
                locations: vec!["l1".into()],
                ..Default::default()
            },
        );
        outline.add_scene(
            "2",
            "s2",
            Scene {
                title: "Escape".into(),
                tags: vec!["act1".into(), "chase".into()],
                characters: vec!["c1".into()],
                items: vec!["i1".into()],
                is_notes_scene: true,
                ..Default::default()
            },
        );
        outline
    }

    #[test]
    fn test_scenes_get_first_uids_in_order() {
        let notes = GraphBuilder::new().build(&sample_outline());
        assert_eq!(notes[0].text, "Arrival");
        assert_eq!(notes[0].uid.get(), 1);
        assert_eq!(notes[0].role, Role::Scene);
        assert_eq!(notes[1].text, "Escape");
        assert_eq!(notes[1].role, Role::NotesScene);
    }

    #[test]
    fn test_shared_tags_and_characters_are_deduplicated() {
        let notes = GraphBuilder::new().build(&sample_outline());
        assert_eq!(notes.iter().filter(|n| n.text == "act1").count(), 1);
        assert_eq!(notes.iter().filter(|n| n.text == "Al").count(), 1);

        let act1 = find(&notes, "act1");
        assert_eq!(act1.role, Role::Tag);
        assert_eq!(act1.connections.len(), 2);

        let al = find(&notes, "Al");
        assert_eq!(al.role, Role::MajorCharacter);
        assert_eq!(find(&notes, "Bea").role, Role::MinorCharacter);
    }

    #[test]
    fn test_connections_are_symmetric() {
        let notes = GraphBuilder::new().build(&sample_outline());
        let by_uid: HashMap<Uid, &NoteRecord> = notes.iter().map(|n| (n.uid, n)).collect();
        for note in &notes {
            for other in &note.connections {
                assert!(by_uid[other].connections.contains(&note.uid));
            }
        }
    }

    #[test]
    fn test_free_notes_only_when_text_present() {
        let notes = GraphBuilder::new().build(&sample_outline());
        let rain = find(&notes, "It rains.");
        assert_eq!(rain.role, Role::FreeNote);
        assert_eq!(rain.connections, vec![notes[0].uid]);
        assert_eq!(notes.iter().filter(|n| n.role == Role::FreeNote).count(), 2);
        let smoky = find(&notes, "Smoky.");
        assert_eq!(smoky.connections, vec![find(&notes, "Inn").uid]);
    }

    #[test]
    fn test_entity_tags_are_exported() {
        let notes = GraphBuilder::new().build(&sample_outline());
        let villain = find(&notes, "villain");
        assert_eq!(villain.connections, vec![find(&notes, "Bea").uid]);
    }

    #[test]
    fn test_same_title_entities_merge() {
        let mut outline = Outline::new();
        outline.add_chapter("1", Chapter::default());
        outline.add_character("a", Character { title: "Sam".into(), ..Default::default() });
        outline.add_character("b", Character { title: "Sam".into(), ..Default::default() });
        outline.add_scene("1", "s1", Scene { title: "x".into(), characters: vec!["a".into()], ..Default::default() });
        outline.add_scene("1", "s2", Scene { title: "y".into(), characters: vec!["b".into()], ..Default::default() });

        let notes = GraphBuilder::new().build(&outline);
        let sams: Vec<_> = notes.iter().filter(|n| n.text == "Sam").collect();
        assert_eq!(sams.len(), 1);
        assert_eq!(sams[0].connections.len(), 2);
    }

    #[test]
    fn test_tag_and_character_with_same_title_stay_apart() {
        let mut outline = Outline::new();
        outline.add_chapter("1", Chapter::default());
        outline.add_character("a", Character { title: "Sam".into(), ..Default::default() });
        outline.add_scene(
            "1",
            "s1",
            Scene { title: "x".into(), tags: vec!["Sam".into()], characters: vec!["a".into()], ..Default::default() },
        );
        let notes = GraphBuilder::new().build(&outline);
        assert_eq!(notes.iter().filter(|n| n.text == "Sam").count(), 2);
    }

    #[test]
    fn test_no_point_to_is_produced() {
        let notes = GraphBuilder::new().build(&sample_outline());
        assert!(notes.iter().all(|n| n.point_to.is_empty()));
    }

    #[test]
    fn test_unreferenced_entities_and_unknown_refs() {
        let mut outline = Outline::new();
        outline.add_chapter("1", Chapter::default());
        outline.add_location("l9", WorldElement { title: "Nowhere".into(), ..Default::default() });
        outline.add_scene("1", "s1", Scene { title: "x".into(), characters: vec!["ghost".into()], ..Default::default() });

        let notes = GraphBuilder::new().build(&outline);
        assert_eq!(notes.len(), 2);
        assert!(notes[0].connections.is_empty());
        assert_eq!(find(&notes, "Nowhere").role, Role::Location);
    }

    #[test]
    fn test_uids_are_unique_and_dense() {
        let notes = GraphBuilder::new().build(&sample_outline());
        for (i, note) in notes.iter().enumerate() {
            assert_eq!(note.uid.get() as usize, i + 1);
        }
    }
}
