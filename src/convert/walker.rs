use walkdir::WalkDir;
use std::path::{Path, PathBuf};

use crate::diagram::EXTENSION;
use crate::error::{NotegraphError, Result};

/// Find every Scapple diagram below `root`, sorted by path.
///
/// Unreadable directory entries are skipped; a missing root is an error.
pub fn discover_diagrams(root: &Path) -> Result<Vec<PathBuf>> {
    std::fs::metadata(root).map_err(|e| NotegraphError::FileUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut diagrams: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_diagram_extension(path))
        .collect();
    diagrams.sort();

    log::info!("Discovered {} diagrams in {}", diagrams.len(), root.display());
    Ok(diagrams)
}

/// Case-insensitive check for the `.scap` extension.
pub fn has_diagram_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_discover_diagrams() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("book/part2")).unwrap();
        fs::write(root.join("plot.scap"), "<ScappleDocument/>").unwrap();
        fs::write(root.join("book/part2/ending.SCAP"), "<ScappleDocument/>").unwrap();
        fs::write(root.join("book/notes.txt"), "not a diagram").unwrap();
        fs::write(root.join("plot.outline.json"), "{}").unwrap();

        let found = discover_diagrams(root).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|p| p.ends_with("plot.scap")));
        assert!(found.iter().any(|p| p.ends_with("ending.SCAP")));
    }

    #[test]
    fn test_discover_diagrams_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover_diagrams(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        assert!(discover_diagrams(Path::new("/nonexistent/diagrams")).is_err());
    }
}
