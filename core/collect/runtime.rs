use crate::collect::{Category, DiagnosticEntry};
use log;

/// Stack-frame lines carry this call-site marker in V8-style traces.
const CALL_SITE_MARKER: &str = "at ";

/// Turns raw error-stack strings captured from the application session
/// into diagnostic entries.
///
/// Each stack contributes one entry: its first line as the headline plus
/// the first frame line (if any) as location context. Blank captures are
/// skipped, not fatal.
pub fn collect_runtime_errors(raw_stacks: &[String]) -> Vec<DiagnosticEntry> {
    raw_stacks
        .iter()
        .filter_map(|stack| {
            let mut lines = stack.lines().map(str::trim);
            let headline = lines.find(|line| !line.is_empty())?;
            let location = lines.find(|line| line.contains(CALL_SITE_MARKER));
            let text = match location {
                Some(location) => format!("- {}\n  {}", headline, location),
                None => format!("- {}", headline),
            };
            Some(DiagnosticEntry::new(Category::Runtime, text))
        })
        .collect()
}

/// Turns the build-error overlay's text, when the overlay was present,
/// into build diagnostic entries.
pub fn collect_build_errors(overlay_text: Option<&str>) -> Vec<DiagnosticEntry> {
    let Some(text) = overlay_text else {
        return Vec::new();
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    log::debug!("Build overlay present ({} bytes)", trimmed.len());
    vec![DiagnosticEntry::new(
        Category::Build,
        format!("- {}", trimmed),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_captured_stack() {
        let stacks = vec![
            "TypeError: x is undefined\n    at render (app.js:10:5)\n    at main (app.js:2:1)"
                .to_string(),
            "ReferenceError: y is not defined\n    at init (util.js:3:9)".to_string(),
        ];
        let entries = collect_runtime_errors(&stacks);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].text,
            "- TypeError: x is undefined\n  at render (app.js:10:5)"
        );
        assert_eq!(entries[0].category, Category::Runtime);
    }

    #[test]
    fn stack_without_frames_keeps_only_the_headline() {
        let stacks = vec!["Error: plain message".to_string()];
        let entries = collect_runtime_errors(&stacks);
        assert_eq!(entries[0].text, "- Error: plain message");
    }

    #[test]
    fn blank_captures_are_skipped() {
        let stacks = vec!["".to_string(), "  \n ".to_string()];
        assert!(collect_runtime_errors(&stacks).is_empty());
    }

    #[test]
    fn overlay_text_becomes_a_build_entry() {
        let entries = collect_build_errors(Some("Module not found: './missing'\n"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, Category::Build);
        assert_eq!(entries[0].text, "- Module not found: './missing'");
    }

    #[test]
    fn absent_or_empty_overlay_yields_nothing() {
        assert!(collect_build_errors(None).is_empty());
        assert!(collect_build_errors(Some("   ")).is_empty());
    }
}
