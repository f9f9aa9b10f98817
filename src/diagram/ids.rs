//! Note identifiers and the compact ID-list notation used by Scapple.
//!
//! Scapple numbers its notes from zero and writes connection lists like
//! `0, 3-5, 9`. Outline identifiers start at one, so every raw ID read from a
//! diagram is shifted by +1 and every uid written back is shifted by -1.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NotegraphError, Result};

/// One-based note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Uid(u32);

impl Uid {
    /// Shift a zero-based diagram ID into the one-based uid space.
    /// Returns `None` on overflow.
    pub fn from_raw(raw: u32) -> Option<Self> {
        raw.checked_add(1).map(Uid)
    }

    /// Build a uid from an already one-based number. Zero is not a valid uid.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Uid(value))
    }

    /// The zero-based ID this uid is written as in a diagram.
    pub fn raw(self) -> u32 {
        self.0.saturating_sub(1)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Uid of the note at position `index` in a freshly numbered graph.
    pub(crate) fn nth(index: usize) -> Self {
        let value = u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1));
        Uid(value)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a single raw note ID attribute.
pub fn parse_raw_id(text: &str) -> Result<Uid> {
    let raw: u32 = text
        .trim()
        .parse()
        .map_err(|_| NotegraphError::malformed_note(format!("ID {:?}", text), "ID is not a non-negative integer"))?;
    Uid::from_raw(raw)
        .ok_or_else(|| NotegraphError::malformed_note(format!("ID {}", raw), "ID out of range"))
}

/// Expand a Scapple ID list (`"0, 3-5"`) into one-based uids.
///
/// Tokens are separated by `", "`. A token is either a single ID or an
/// inclusive `start-end` range; both ends are shifted by +1 and every integer
/// between them is emitted. Order and duplicates are kept as written. A
/// descending range yields nothing. `None` yields an empty list.
///
/// A range may not cover more than `max_span` IDs. Callers pass the number of
/// notes in the document, since a longer range cannot name existing notes only.
pub fn expand_id_list(list: Option<&str>, max_span: usize) -> Result<Vec<Uid>> {
    let mut uids = Vec::new();
    let list = match list {
        Some(text) if !text.trim().is_empty() => text.trim(),
        _ => return Ok(uids),
    };

    for token in list.split(", ") {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_raw_id(start)?;
                let end = parse_raw_id(end)?;
                let span = end.get().saturating_sub(start.get()) as usize + 1;
                if end >= start && span > max_span {
                    return Err(NotegraphError::malformed_note(
                        format!("range {:?}", token),
                        format!("range covers {} IDs but the diagram has {} notes", span, max_span),
                    ));
                }
                uids.extend((start.get()..=end.get()).map(Uid));
            }
            None => uids.push(parse_raw_id(token)?),
        }
    }

    Ok(uids)
}

/// Write uids back as a compact zero-based ID list.
///
/// The uids are sorted and deduplicated; consecutive runs of three or more
/// collapse into `start-end`, shorter runs stay as single tokens.
pub fn compress_id_list(uids: &[Uid]) -> String {
    let mut raw: Vec<u32> = uids.iter().map(|uid| uid.raw()).collect();
    raw.sort_unstable();
    raw.dedup();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        let mut j = i;
        while j + 1 < raw.len() && raw[j + 1] == raw[j] + 1 {
            j += 1;
        }
        if j - i >= 2 {
            tokens.push(format!("{}-{}", raw[i], raw[j]));
        } else {
            tokens.extend(raw[i..=j].iter().map(|id| id.to_string()));
        }
        i = j + 1;
    }

    tokens.join(", ")
}
