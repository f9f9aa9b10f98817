//! Scapple diagrams: reading notes out of a `.scap` file and writing a note graph back.
//!
//! Reading is all-or-nothing. A single broken note fails the whole diagram,
//! since ordering and connection resolution assume every uid resolves.

pub mod color;
pub mod ids;
pub mod layout;
pub mod note;
pub mod xml;

pub use color::{ColorMatcher, Rgb};
pub use ids::{compress_id_list, expand_id_list, Uid};
pub use note::{BorderStyle, ColorConfig, NoteParser, NoteRecord, Position, Role};

use std::collections::HashSet;
use std::path::Path;

use crate::error::{NotegraphError, Result};
use xml::{Appearance, Border, NoteList, NoteText, RawNote, ScappleDocument};

/// File extension of Scapple diagrams, without the dot.
pub const EXTENSION: &str = "scap";

/// Parse every note of a diagram held in memory.
pub fn parse_notes(content: &str, origin: &Path, parser: &NoteParser) -> Result<Vec<NoteRecord>> {
    let document = xml::parse_document(content, origin)?;

    let note_count = document.notes.items.len();
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(note_count);
    for raw in &document.notes.items {
        let note = parser.parse(raw, note_count)?;
        if !seen.insert(note.uid) {
            return Err(NotegraphError::malformed_note(
                format!("ID {}", note.uid.raw()),
                "ID used by more than one note",
            ));
        }
        notes.push(note);
    }

    log::debug!("Parsed {} notes from {}", notes.len(), origin.display());
    Ok(notes)
}

/// Read and parse a diagram file.
pub fn read_notes(path: &Path, parser: &NoteParser) -> Result<Vec<NoteRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| NotegraphError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_notes(&content, path, parser)
}

/// Build the XML document for a note graph. Appearance is derived from each
/// note's role so that reading the result back classifies it the same way.
pub fn to_document(notes: &[NoteRecord], colors: &ColorConfig) -> ScappleDocument {
    ScappleDocument {
        version: Some("1.0".to_string()),
        notes: NoteList {
            items: notes.iter().map(|note| to_raw(note, colors)).collect(),
        },
    }
}

fn to_raw(note: &NoteRecord, colors: &ColorConfig) -> RawNote {
    let (shadow, border, text_color) = match note.role {
        Role::Scene => (true, None, None),
        Role::NotesScene => (true, Some("Cloud"), None),
        Role::Tag => (false, Some("Square"), None),
        Role::FreeNote => (false, Some("Cloud"), None),
        Role::MajorCharacter => (false, None, Some(colors.major_character)),
        Role::MinorCharacter => (false, None, Some(colors.minor_character)),
        Role::Location => (false, None, Some(colors.location)),
        Role::Item => (false, None, Some(colors.item)),
        Role::Plain => (false, None, None),
    };

    let point_to: Vec<Uid> = note.point_to.iter().copied().collect();
    RawNote {
        id: Some(note.uid.raw().to_string()),
        font_size: Some("12.0".to_string()),
        position: Some(note.position.to_scapple()),
        width: Some("120.0".to_string()),
        shadow: shadow.then(|| "Yes".to_string()),
        appearance: Some(Appearance {
            alignment: Some("Left".to_string()),
            border: border.map(|style| Border {
                weight: Some("1".to_string()),
                style: Some(style.to_string()),
            }),
            text_color: text_color
                .map(|c| c.to_scapple())
                .or_else(|| (!note.text_color.is_empty()).then(|| note.text_color.clone())),
        }),
        text: Some(NoteText {
            value: note.text.clone(),
        }),
        connected_ids: (!note.connections.is_empty()).then(|| compress_id_list(&note.connections)),
        points_to_ids: (!point_to.is_empty()).then(|| compress_id_list(&point_to)),
    }
}

/// Serialize a note graph and write it to `path`.
pub fn write_notes(path: &Path, notes: &[NoteRecord], colors: &ColorConfig) -> Result<()> {
    let content = xml::write_document(&to_document(notes, colors))?;
    std::fs::write(path, content)?;
    log::debug!("Wrote {} notes to {}", notes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::note::tests::test_colors;
    use tempfile::TempDir;

    const DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ScappleDocument Version="1.1">
  <Notes>
    <Note ID="0" Position="0.0,0.0" Shadow="Yes">
      <Appearance><Alignment>Left</Alignment></Appearance>
      <String>Intro</String>
      <ConnectedNoteIDs>1</ConnectedNoteIDs>
    </Note>
    <Note ID="1" Position="10.0,0.0">
      <Appearance><Alignment>Left</Alignment><Border Weight="1" Style="Square"/></Appearance>
      <String>Act1</String>
      <ConnectedNoteIDs>0</ConnectedNoteIDs>
    </Note>
  </Notes>
</ScappleDocument>
"#;

    #[test]
    fn test_parse_notes() {
        let parser = NoteParser::new(test_colors());
        let notes = parse_notes(DIAGRAM, Path::new("d.scap"), &parser).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].role, Role::Scene);
        assert_eq!(notes[1].role, Role::Tag);
        assert_eq!(notes[0].connections, vec![notes[1].uid]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let parser = NoteParser::new(test_colors());
        let content = DIAGRAM.replace("<Note ID=\"1\"", "<Note ID=\"0\"");
        let err = parse_notes(&content, Path::new("d.scap"), &parser).unwrap_err();
        assert!(matches!(err, NotegraphError::MalformedNote { .. }));
    }

    #[test]
    fn test_one_bad_note_fails_the_diagram() {
        let parser = NoteParser::new(test_colors());
        let content = DIAGRAM.replace("Position=\"10.0,0.0\"", "");
        assert!(parse_notes(&content, Path::new("d.scap"), &parser).is_err());
    }

    #[test]
    fn test_oversized_range_fails_the_diagram() {
        let parser = NoteParser::new(test_colors());
        let content = DIAGRAM.replace(
            "<ConnectedNoteIDs>0</ConnectedNoteIDs>",
            "<ConnectedNoteIDs>0-4294967294</ConnectedNoteIDs>",
        );
        let err = parse_notes(&content, Path::new("d.scap"), &parser).unwrap_err();
        assert!(matches!(err, NotegraphError::MalformedNote { .. }));
    }

    #[test]
    fn test_read_missing_file_is_unreadable() {
        let parser = NoteParser::new(test_colors());
        let err = read_notes(Path::new("/nonexistent/diagram.scap"), &parser).unwrap_err();
        assert!(matches!(err, NotegraphError::FileUnreadable { .. }));
    }

    #[test]
    fn test_written_notes_classify_the_same() {
        let colors = test_colors();
        let parser = NoteParser::new(colors.clone());
        let roles = [
            Role::Scene,
            Role::NotesScene,
            Role::MajorCharacter,
            Role::MinorCharacter,
            Role::Location,
            Role::Item,
            Role::Tag,
            Role::FreeNote,
        ];
        let notes: Vec<NoteRecord> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let mut note = NoteRecord::new(Uid::new(i as u32 + 1).unwrap(), format!("n{}", i), *role);
                note.position = Position { x: 0.0, y: i as f64 * 40.0 };
                note
            })
            .collect();

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.scap");
        write_notes(&path, &notes, &colors).unwrap();
        let read_back = read_notes(&path, &parser).unwrap();

        let read_roles: Vec<Role> = read_back.iter().map(|n| n.role).collect();
        assert_eq!(read_roles, roles.to_vec());
        assert_eq!(read_back[3].position, notes[3].position);
    }

    #[test]
    fn test_written_ids_are_zero_based() {
        let colors = test_colors();
        let mut note = NoteRecord::new(Uid::new(1).unwrap(), "a", Role::Scene);
        note.connections = vec![Uid::new(2).unwrap(), Uid::new(3).unwrap(), Uid::new(4).unwrap()];
        let raw = to_raw(&note, &colors);
        assert_eq!(raw.id.as_deref(), Some("0"));
        assert_eq!(raw.connected_ids.as_deref(), Some("1-3"));
        assert!(raw.points_to_ids.is_none());
    }
}
