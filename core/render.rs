use crate::error::{AppError, Result};
use log;
use std::fs;
use std::path::Path;

/// Marks the end of each rendered file block so that concatenated blocks
/// can be split unambiguously by downstream text consumers.
pub const BLOCK_SENTINEL: &str = "...";

/// Renders one file into a report-ready text block.
///
/// The block is a bracketed header with the path relative to the project
/// root, the trimmed file content, and the sentinel line. Returns `None`
/// for files whose trimmed content is empty, and for the report's own
/// output destination, so a prior run's report never renders into the
/// next one. A read failure is fatal.
pub fn render_file(
    path: &Path,
    project_root: &Path,
    report_path: &Path,
) -> Result<Option<String>> {
    if path == report_path {
        log::debug!("Skipping report output file: {}", path.display());
        return Ok(None);
    }

    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let trimmed = content.trim();
    if trimmed.is_empty() {
        log::trace!("Skipping empty file: {}", path.display());
        return Ok(None);
    }

    let relative = pathdiff::diff_paths(path, project_root)
        .unwrap_or_else(|| path.to_path_buf());
    Ok(Some(format!(
        "[{}]\n{}\n{}",
        relative.display(),
        trimmed,
        BLOCK_SENTINEL
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn renders_header_content_and_sentinel() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "const x=1;").unwrap();
        let report = dir.path().join("project-report.md");

        let block = render_file(&file, dir.path(), &report).unwrap().unwrap();
        assert_eq!(block, "[a.js]\nconst x=1;\n...");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("b.js");
        fs::write(&file, "\n\n  let y = 2;  \n\n").unwrap();
        let report = dir.path().join("project-report.md");

        let block = render_file(&file, dir.path(), &report).unwrap().unwrap();
        assert_eq!(block, "[b.js]\nlet y = 2;\n...");
    }

    #[test]
    fn whitespace_only_file_renders_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("blank.js");
        fs::write(&file, "   \n\t\n").unwrap();
        let report = dir.path().join("project-report.md");

        assert!(render_file(&file, dir.path(), &report).unwrap().is_none());
    }

    #[test]
    fn report_output_file_is_always_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("project-report.md");
        fs::write(&report, "previous run content").unwrap();

        assert!(render_file(&report, dir.path(), &report).unwrap().is_none());
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.js");
        let report = dir.path().join("project-report.md");
        let err = render_file(&missing, dir.path(), &report).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }
}
