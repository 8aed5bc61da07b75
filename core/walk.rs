use crate::error::Result;
use crate::rules::RuleSet;
use log;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively enumerates every included file under `project_root`.
///
/// Rules are tested against the path relative to the project root.
/// Output order is directory-listing order, not sorted; downstream
/// consumers must not assume lexical order. Any walk error is fatal,
/// since a partial file list would silently under-report the project.
pub fn enumerate_files(project_root: &Path, rules: &RuleSet) -> Result<Vec<PathBuf>> {
    log::info!("Walking project directory: {}", project_root.display());
    let mut included = Vec::new();

    // Symlinks are not followed, which is what keeps a cyclic
    // filesystem from hanging the walk.
    for entry_result in WalkDir::new(project_root).follow_links(false) {
        let entry = entry_result?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(project_root).unwrap_or(path);
        if rules.is_included(relative) {
            log::trace!("Including file: {}", relative.display());
            included.push(path.to_path_buf());
        } else {
            log::trace!("Excluding file: {}", relative.display());
        }
    }

    log::info!("Walk complete. {} files included.", included.len());
    Ok(included)
}
