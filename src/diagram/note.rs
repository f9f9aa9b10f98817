//! Classified note records and the parser that builds them from raw `<Note>` elements.

use std::collections::BTreeSet;
use std::fmt;

use super::color::{ColorMatcher, Rgb};
use super::ids::{expand_id_list, parse_raw_id, Uid};
use super::xml::RawNote;
use crate::error::{NotegraphError, Result};

/// Multiplier folding y and x into one sortable scalar.
/// Keeps y dominant as long as |x| stays below 10000.
pub const Y_FACTOR: f64 = 100_000.0;

/// Semantic role of a note, decided by shadow, border and text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Scene,
    /// Scene flagged as outline-only (shadow plus cloud border).
    NotesScene,
    MajorCharacter,
    MinorCharacter,
    Location,
    Item,
    Tag,
    FreeNote,
    Plain,
}

impl Role {
    pub fn is_scene(self) -> bool {
        matches!(self, Role::Scene | Role::NotesScene)
    }

    pub fn is_character(self) -> bool {
        matches!(self, Role::MajorCharacter | Role::MinorCharacter)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Scene => "scene",
            Role::NotesScene => "notes-scene",
            Role::MajorCharacter => "major-character",
            Role::MinorCharacter => "minor-character",
            Role::Location => "location",
            Role::Item => "item",
            Role::Tag => "tag",
            Role::FreeNote => "note",
            Role::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Border styles the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Square,
    Cloud,
    Other,
}

impl BorderStyle {
    pub fn from_attr(style: Option<&str>) -> Self {
        match style {
            Some("Square") => BorderStyle::Square,
            Some("Cloud") => BorderStyle::Cloud,
            _ => BorderStyle::Other,
        }
    }
}

/// Diagram coordinates of a note.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Parse a Scapple `"x,y"` attribute.
    pub fn parse(text: &str) -> Option<Self> {
        let (x, y) = text.split_once(',')?;
        Some(Self {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }

    /// Reading-order key: rows first, then columns.
    pub fn key(&self) -> f64 {
        self.y * Y_FACTOR + self.x
    }

    pub fn to_scapple(&self) -> String {
        format!("{:.1},{:.1}", self.x, self.y)
    }
}

/// Parsed, classified form of one diagram note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    pub uid: Uid,
    pub text: String,
    pub position: Position,
    pub role: Role,
    pub text_color: String,
    /// Linked notes in the order the diagram lists them.
    pub connections: Vec<Uid>,
    /// Connections this note also points an arrow at.
    pub point_to: BTreeSet<Uid>,
}

impl NoteRecord {
    pub fn new(uid: Uid, text: impl Into<String>, role: Role) -> Self {
        Self {
            uid,
            text: text.into(),
            position: Position::default(),
            role,
            text_color: String::new(),
            connections: Vec::new(),
            point_to: BTreeSet::new(),
        }
    }

    pub fn points_to(&self, uid: Uid) -> bool {
        self.point_to.contains(&uid)
    }
}

/// Reference text colors and the tolerance used to compare against them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    pub major_character: Rgb,
    pub minor_character: Rgb,
    pub location: Rgb,
    pub item: Rgb,
    pub tolerance: f64,
}

/// Turns raw `<Note>` elements into [`NoteRecord`]s.
#[derive(Debug, Clone)]
pub struct NoteParser {
    colors: ColorConfig,
    matcher: ColorMatcher,
}

impl NoteParser {
    pub fn new(colors: ColorConfig) -> Self {
        let matcher = ColorMatcher::new(colors.tolerance);
        Self { colors, matcher }
    }

    /// Parse one note of a document holding `note_count` notes.
    pub fn parse(&self, raw: &RawNote, note_count: usize) -> Result<NoteRecord> {
        let id_attr = raw
            .id
            .as_deref()
            .ok_or_else(|| NotegraphError::malformed_note("without ID", "missing ID attribute"))?;
        let uid = parse_raw_id(id_attr)?;
        let label = format!("ID {}", id_attr);

        let text = raw
            .text
            .as_ref()
            .map(|t| t.value.clone())
            .ok_or_else(|| NotegraphError::malformed_note(&label, "missing <String> element"))?;

        let position_attr = raw
            .position
            .as_deref()
            .ok_or_else(|| NotegraphError::malformed_note(&label, "missing Position attribute"))?;
        let position = Position::parse(position_attr).ok_or_else(|| {
            NotegraphError::malformed_note(&label, format!("unreadable Position {:?}", position_attr))
        })?;

        let appearance = raw.appearance.as_ref();
        let text_color = appearance
            .and_then(|a| a.text_color.clone())
            .unwrap_or_default();
        let border = BorderStyle::from_attr(
            appearance
                .and_then(|a| a.border.as_ref())
                .and_then(|b| b.style.as_deref()),
        );

        let role = self.classify(raw.shadow.is_some(), border, &text_color);
        log::debug!("Note {} ({:?}) classified as {}", uid, text, role);

        Ok(NoteRecord {
            uid,
            text,
            position,
            role,
            text_color,
            connections: expand_id_list(raw.connected_ids.as_deref(), note_count)?,
            point_to: expand_id_list(raw.points_to_ids.as_deref(), note_count)?
                .into_iter()
                .collect(),
        })
    }

    /// First match wins: shadow, then border, then text color.
    pub fn classify(&self, shadow: bool, border: BorderStyle, text_color: &str) -> Role {
        if shadow {
            return match border {
                BorderStyle::Cloud => Role::NotesScene,
                _ => Role::Scene,
            };
        }
        match border {
            BorderStyle::Square => return Role::Tag,
            BorderStyle::Cloud => return Role::FreeNote,
            BorderStyle::Other => {}
        }

        let color = Rgb::parse(text_color);
        let by_color = [
            (&self.colors.major_character, Role::MajorCharacter),
            (&self.colors.minor_character, Role::MinorCharacter),
            (&self.colors.location, Role::Location),
            (&self.colors.item, Role::Item),
        ];
        by_color
            .iter()
            .find(|(reference, _)| self.matcher.matches(&color, reference))
            .map(|(_, role)| *role)
            .unwrap_or(Role::Plain)
    }
}
