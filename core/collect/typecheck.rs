use crate::collect::{Category, DiagnosticEntry, run_tool};
use crate::config::Config;
use crate::error::Result;
use log;
use std::path::Path;
use std::time::Duration;

/// TypeScript diagnostics carry this error-code marker, e.g.
/// `src/app.ts(3,5): error TS2322: ...`.
const TYPE_ERROR_MARKER: &str = "error TS";

/// Runs the configured type checker and keeps only its error lines.
///
/// Fails in isolation like the other collectors: any subprocess failure
/// yields an empty list and a logged warning.
pub fn collect_type_errors(config: &Config, project_root: &Path) -> Vec<DiagnosticEntry> {
    match try_collect(config, project_root) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Type-check collection failed: {}", e);
            Vec::new()
        }
    }
}

fn try_collect(config: &Config, project_root: &Path) -> Result<Vec<DiagnosticEntry>> {
    let output = run_tool(
        &config.tools.typecheck,
        project_root,
        Duration::from_millis(config.tools.timeout_ms),
    )?;
    Ok(filter_type_errors(&output.stdout))
}

/// Retains the compiler output lines containing the error marker,
/// verbatim. This category is exempt from the report's 5-entry cap.
pub fn filter_type_errors(raw: &str) -> Vec<DiagnosticEntry> {
    raw.lines()
        .filter(|line| line.contains(TYPE_ERROR_MARKER))
        .map(|line| DiagnosticEntry::new(Category::TypeCheck, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_marked_lines_verbatim() {
        let raw = "\
Version 5.4.2
src/app.ts(3,5): error TS2322: Type 'string' is not assignable to type 'number'.
src/app.ts(9,1): error TS2304: Cannot find name 'foo'.
Found 2 errors in 1 file.
";
        let entries = filter_type_errors(raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].text,
            "src/app.ts(3,5): error TS2322: Type 'string' is not assignable to type 'number'."
        );
        assert_eq!(entries[1].category, Category::TypeCheck);
    }

    #[test]
    fn clean_output_yields_nothing() {
        let raw = "Version 5.4.2\nFound 0 errors.\n";
        assert!(filter_type_errors(raw).is_empty());
    }

    #[test]
    fn emission_order_is_preserved() {
        let raw = "b.ts(1,1): error TS1005: ';' expected.\na.ts(1,1): error TS1005: ';' expected.\n";
        let entries = filter_type_errors(raw);
        assert!(entries[0].text.starts_with("b.ts"));
        assert!(entries[1].text.starts_with("a.ts"));
    }
}
