//! Scapple document shape, read and written through quick-xml's serde support.
//!
//! Only the elements the converter looks at are modelled. Everything else in
//! a real `.scap` file (background shapes, UI settings, print settings) is
//! ignored on read and omitted on write.

use serde::{Deserialize, Serialize};

use crate::error::{NotegraphError, Result};

/// Root `<ScappleDocument>` element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "ScappleDocument")]
pub struct ScappleDocument {
    #[serde(rename = "@Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Notes", default)]
    pub notes: NoteList,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteList {
    #[serde(rename = "Note", default)]
    pub items: Vec<RawNote>,
}

/// One `<Note>` element, before classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNote {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@FontSize", default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(rename = "@Position", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "@Width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(rename = "@Shadow", default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
    #[serde(rename = "Appearance", default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
    #[serde(rename = "String", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<NoteText>,
    #[serde(rename = "ConnectedNoteIDs", default, skip_serializing_if = "Option::is_none")]
    pub connected_ids: Option<String>,
    #[serde(rename = "PointsToNoteIDs", default, skip_serializing_if = "Option::is_none")]
    pub points_to_ids: Option<String>,
}

/// `<String>` child. Wrapped so an empty element still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteText {
    #[serde(rename = "$text", default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(rename = "Alignment", default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(rename = "Border", default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(rename = "TextColor", default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Border {
    #[serde(rename = "@Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(rename = "@Style", default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Parse diagram XML text. `origin` names the source in error messages.
pub fn parse_document(content: &str, origin: &std::path::Path) -> Result<ScappleDocument> {
    quick_xml::de::from_str(content).map_err(|e| NotegraphError::MalformedDocument {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize a document, including the XML declaration.
pub fn write_document(document: &ScappleDocument) -> Result<String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| NotegraphError::DiagramWrite(e.to_string()))?;

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", body))
}
