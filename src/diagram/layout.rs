//! Placement for synthesized notes.
//!
//! One column per role, top to bottom in graph order. Scenes go in the first
//! column so that reading the diagram back yields the same scene order.

use super::note::{NoteRecord, Position, Role};

const COLUMN_WIDTH: f64 = 200.0;
const ROW_HEIGHT: f64 = 60.0;

fn column(role: Role) -> usize {
    match role {
        Role::Scene | Role::NotesScene => 0,
        Role::FreeNote => 1,
        Role::Tag => 2,
        Role::MajorCharacter | Role::MinorCharacter => 3,
        Role::Location => 4,
        Role::Item => 5,
        Role::Plain => 6,
    }
}

/// Assign grid positions to every note, in place.
pub fn arrange(notes: &mut [NoteRecord]) {
    let mut rows = [0usize; 7];
    for note in notes.iter_mut() {
        let col = column(note.role);
        note.position = Position {
            x: col as f64 * COLUMN_WIDTH,
            y: rows[col] as f64 * ROW_HEIGHT,
        };
        rows[col] += 1;
    }
}
