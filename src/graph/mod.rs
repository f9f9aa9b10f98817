//! Story graph module: diagram notes ⇄ outline.
//!
//! [`GraphResolver`] walks each note's connections to assemble scenes,
//! characters, locations and items. [`GraphBuilder`] goes the other way and
//! synthesizes a connected note graph from an outline.

mod builder;
mod resolver;

pub use builder::GraphBuilder;
pub use resolver::{ExportToggles, GraphResolver, DEFAULT_CHAPTER_ID, DEFAULT_CHAPTER_TITLE};

use std::path::Path;

use crate::diagram::{self, NoteParser, NoteRecord};
use crate::error::Result;
use crate::outline::Outline;

/// Read a diagram file and resolve it into an outline.
pub fn import_diagram(path: &Path, parser: &NoteParser, resolver: &GraphResolver) -> Result<Outline> {
    let notes = diagram::read_notes(path, parser)?;
    Ok(resolver.resolve(&notes))
}

/// Build the note graph for an outline, placed on a grid ready for writing.
pub fn export_outline(outline: &Outline) -> Vec<NoteRecord> {
    let mut notes = GraphBuilder::new().build(outline);
    diagram::layout::arrange(&mut notes);
    notes
}
