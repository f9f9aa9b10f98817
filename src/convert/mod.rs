//! Conversion runs: one diagram or outline file in, one file out.
//!
//! Each run is pass/fail as a unit. Paths are checked before anything is
//! parsed, and nothing is written unless the whole conversion succeeded.

pub mod walker;

pub use walker::{discover_diagrams, has_diagram_extension};

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagram;
use crate::error::{NotegraphError, Result};
use crate::graph;
use crate::outline::Outline;

/// Suffix of outline files written next to an imported diagram.
pub const OUTLINE_SUFFIX: &str = ".outline.json";

/// Outcome of one file in a batch run.
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub result: Result<PathBuf>,
}

/// `story.scap` → `story.outline.json`
pub fn outline_path_for(diagram: &Path) -> PathBuf {
    let stem = diagram.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    diagram.with_file_name(format!("{}{}", stem, OUTLINE_SUFFIX))
}

/// `story.outline.json` → `story.scap`, `story.json` → `story.scap`
pub fn diagram_path_for(outline: &Path) -> PathBuf {
    let name = outline.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = name
        .strip_suffix(OUTLINE_SUFFIX)
        .or_else(|| name.strip_suffix(".json"))
        .unwrap_or(name.as_str());
    outline.with_file_name(format!("{}.{}", stem, diagram::EXTENSION))
}

fn check_source(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(NotegraphError::FileUnreadable {
            path: path.to_path_buf(),
            reason: "no such file".to_string(),
        });
    }
    Ok(())
}

fn check_target(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(NotegraphError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Convert one diagram into an outline file. Returns the path written.
pub fn import_file(source: &Path, config: &Config, force: bool) -> Result<PathBuf> {
    check_source(source)?;
    if !has_diagram_extension(source) {
        return Err(NotegraphError::UnsupportedFileType {
            path: source.to_path_buf(),
        });
    }
    let target = outline_path_for(source);
    check_target(&target, force)?;

    log::info!("Importing {}", source.display());
    let outline = graph::import_diagram(source, &config.note_parser(), &config.resolver())?;
    if outline.is_empty() {
        log::warn!("No outline entities found in {}", source.display());
    }

    outline.save(&target)?;
    log::info!("Outline written to {}", target.display());
    Ok(target)
}

/// Convert one outline file back into a diagram. Returns the path written.
pub fn export_file(source: &Path, config: &Config, force: bool) -> Result<PathBuf> {
    check_source(source)?;
    let is_json = source
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(NotegraphError::UnsupportedFileType {
            path: source.to_path_buf(),
        });
    }
    let target = diagram_path_for(source);
    check_target(&target, force)?;

    log::info!("Exporting {}", source.display());
    let outline = Outline::load(source)?;
    let notes = graph::export_outline(&outline);
    diagram::write_notes(&target, &notes, &config.color_config())?;
    log::info!("Diagram written to {}", target.display());
    Ok(target)
}

/// Import every diagram below `root`. Files succeed or fail independently.
pub fn import_dir(root: &Path, config: &Config, force: bool) -> Result<Vec<FileReport>> {
    let reports: Vec<FileReport> = discover_diagrams(root)?
        .into_iter()
        .map(|source| {
            let result = import_file(&source, config, force);
            if let Err(e) = &result {
                log::error!("✗ {}: {}", source.display(), e);
            }
            FileReport { source, result }
        })
        .collect();

    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    log::info!(
        "Imported {} diagrams ({} failed)",
        reports.len() - failed,
        failed
    );
    Ok(reports)
}

/// One human-readable status line for a finished run.
pub fn status_message(result: &Result<PathBuf>) -> String {
    match result {
        Ok(target) => format!("SUCCESS: \"{}\" written.", target.display()),
        Err(e) => format!("ERROR: {}.", e),
    }
}
