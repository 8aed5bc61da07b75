use crate::collect::DiagnosticEntry;
use std::collections::HashSet;

/// Runtime, build and lint sections show at most this many entries, to
/// keep the consuming prompt concise. Type-check entries are exempt.
pub const DIAGNOSTIC_SECTION_CAP: usize = 5;

const NO_RUNTIME_ERRORS: &str = "No runtime errors found.";
const NO_BUILD_ERRORS: &str = "No build errors found.";
const NO_LINT_ERRORS: &str = "No ESLint errors found.";
const NO_TYPE_ERRORS: &str = "No TypeScript errors found.";

const PREAMBLE: &str = "\
This document aggregates the project's source files and its current \
diagnostics into a single context for review. Each code file appears as \
a bracketed `[path]` header followed by its content and a `...` \
terminator line. Diagnostic sections list one problem per entry, in the \
order the originating tool reported them.";

/// Aggregate counts over the assembled report's inputs. Derived fresh
/// each run, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_files: usize,
    pub total_lines: usize,
    pub runtime_errors: usize,
    pub build_errors: usize,
    pub lint_errors: usize,
    pub type_errors: usize,
}

impl ReportSummary {
    pub fn compute(
        file_blocks: &[String],
        runtime_errors: &[DiagnosticEntry],
        build_errors: &[DiagnosticEntry],
        lint_errors: &[DiagnosticEntry],
        type_errors: &[DiagnosticEntry],
    ) -> ReportSummary {
        // A block is header + content + sentinel; the content line count
        // is everything between the two.
        let total_lines = file_blocks
            .iter()
            .map(|block| block.lines().count().saturating_sub(2))
            .sum();
        ReportSummary {
            total_files: file_blocks.len(),
            total_lines,
            runtime_errors: runtime_errors.len(),
            build_errors: build_errors.len(),
            lint_errors: lint_errors.len(),
            type_errors: type_errors.len(),
        }
    }
}

/// Assembles the final report document.
///
/// Pure function: identical inputs produce byte-identical output (no
/// timestamps, no randomness). File blocks are de-duplicated by exact
/// text equality before joining; diagnostic sections are capped at
/// [`DIAGNOSTIC_SECTION_CAP`] entries except type-check, which renders
/// its full list.
pub fn assemble_report(
    file_blocks: &[String],
    runtime_errors: &[DiagnosticEntry],
    build_errors: &[DiagnosticEntry],
    lint_errors: &[DiagnosticEntry],
    type_errors: &[DiagnosticEntry],
    summary: &ReportSummary,
    project_name: &str,
) -> String {
    let mut seen = HashSet::new();
    let unique_blocks: Vec<&str> = file_blocks
        .iter()
        .map(String::as_str)
        .filter(|block| seen.insert(*block))
        .collect();

    let mut doc = String::new();
    doc.push_str("# Project Report\n\n");
    doc.push_str(PREAMBLE);
    doc.push_str("\n\n");

    doc.push_str("## Summary\n\n");
    doc.push_str(&format!("- Files: {}\n", summary.total_files));
    doc.push_str(&format!("- Content lines: {}\n", summary.total_lines));
    doc.push_str(&format!("- Runtime errors: {}\n", summary.runtime_errors));
    doc.push_str(&format!("- Build errors: {}\n", summary.build_errors));
    doc.push_str(&format!("- ESLint errors: {}\n", summary.lint_errors));
    doc.push_str(&format!("- TypeScript errors: {}\n", summary.type_errors));
    doc.push('\n');

    doc.push_str("## Project\n\n");
    doc.push_str(project_name);
    doc.push_str("\n\n");

    doc.push_str("## Code Files\n\n");
    if unique_blocks.is_empty() {
        doc.push_str("No code files included.\n");
    } else {
        doc.push_str(&unique_blocks.join("\n\n"));
        doc.push('\n');
    }
    doc.push('\n');

    push_section(
        &mut doc,
        "## Runtime Errors",
        runtime_errors,
        Some(DIAGNOSTIC_SECTION_CAP),
        NO_RUNTIME_ERRORS,
    );
    push_section(
        &mut doc,
        "## Build Errors",
        build_errors,
        Some(DIAGNOSTIC_SECTION_CAP),
        NO_BUILD_ERRORS,
    );
    push_section(
        &mut doc,
        "## ESLint Errors",
        lint_errors,
        Some(DIAGNOSTIC_SECTION_CAP),
        NO_LINT_ERRORS,
    );
    push_section(
        &mut doc,
        "## TypeScript Errors",
        type_errors,
        None,
        NO_TYPE_ERRORS,
    );

    doc
}

fn push_section(
    doc: &mut String,
    heading: &str,
    entries: &[DiagnosticEntry],
    cap: Option<usize>,
    empty_sentinel: &str,
) {
    doc.push_str(heading);
    doc.push_str("\n\n");
    if entries.is_empty() {
        doc.push_str(empty_sentinel);
        doc.push('\n');
    } else {
        let shown = match cap {
            Some(cap) => &entries[..entries.len().min(cap)],
            None => entries,
        };
        for entry in shown {
            doc.push_str(&entry.text);
            doc.push('\n');
        }
    }
    doc.push('\n');
}

/// Whitespace/punctuation-delimited token approximation for the final
/// console metric. Each maximal alphanumeric run counts as one token and
/// each punctuation character counts as its own; this is an
/// approximation, not a real tokenizer.
pub fn estimate_tokens(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_word = false;
        } else if ch.is_alphanumeric() || ch == '_' {
            if !in_word {
                count += 1;
                in_word = true;
            }
        } else {
            count += 1;
            in_word = false;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::Category;

    fn entries(category: Category, n: usize) -> Vec<DiagnosticEntry> {
        (0..n)
            .map(|i| DiagnosticEntry::new(category, format!("entry {}", i)))
            .collect()
    }

    fn assemble_simple(
        runtime: &[DiagnosticEntry],
        lint: &[DiagnosticEntry],
        ty: &[DiagnosticEntry],
    ) -> String {
        let blocks = vec!["[a.js]\nconst x=1;\n...".to_string()];
        let build = Vec::new();
        let summary = ReportSummary::compute(&blocks, runtime, &build, lint, ty);
        assemble_report(&blocks, runtime, &build, lint, ty, &summary, "demo")
    }

    #[test]
    fn output_is_deterministic() {
        let runtime = entries(Category::Runtime, 2);
        let lint = entries(Category::Lint, 3);
        let ty = entries(Category::TypeCheck, 1);
        assert_eq!(
            assemble_simple(&runtime, &lint, &ty),
            assemble_simple(&runtime, &lint, &ty)
        );
    }

    #[test]
    fn capped_sections_show_only_the_first_five() {
        let lint = entries(Category::Lint, 8);
        let report = assemble_simple(&[], &lint, &[]);
        for i in 0..5 {
            assert!(report.contains(&format!("entry {}", i)));
        }
        for i in 5..8 {
            assert!(!report.contains(&format!("entry {}", i)));
        }
    }

    #[test]
    fn type_check_section_is_uncapped() {
        let ty = entries(Category::TypeCheck, 8);
        let report = assemble_simple(&[], &[], &ty);
        for i in 0..8 {
            assert!(report.contains(&format!("entry {}", i)));
        }
    }

    #[test]
    fn empty_categories_render_their_sentinels() {
        let report = assemble_simple(&[], &[], &[]);
        assert!(report.contains("No runtime errors found."));
        assert!(report.contains("No build errors found."));
        assert!(report.contains("No ESLint errors found."));
        assert!(report.contains("No TypeScript errors found."));
    }

    #[test]
    fn section_order_is_fixed() {
        let report = assemble_simple(&[], &[], &[]);
        let positions: Vec<usize> = [
            "# Project Report",
            "## Summary",
            "## Project",
            "## Code Files",
            "## Runtime Errors",
            "## Build Errors",
            "## ESLint Errors",
            "## TypeScript Errors",
        ]
        .iter()
        .map(|heading| report.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn duplicate_blocks_are_joined_once() {
        let blocks = vec![
            "[a.js]\nconst x=1;\n...".to_string(),
            "[a.js]\nconst x=1;\n...".to_string(),
        ];
        let summary = ReportSummary::compute(&blocks, &[], &[], &[], &[]);
        let report = assemble_report(&blocks, &[], &[], &[], &[], &summary, "demo");
        assert_eq!(report.matches("[a.js]").count(), 1);
    }

    #[test]
    fn summary_counts_files_and_content_lines() {
        let blocks = vec![
            "[a.js]\nline one\nline two\n...".to_string(),
            "[b.js]\nonly line\n...".to_string(),
        ];
        let summary = ReportSummary::compute(&blocks, &[], &[], &[], &[]);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_lines, 3);
    }

    #[test]
    fn token_estimate_splits_on_whitespace_and_punctuation() {
        // "const" "x" "=" "1" ";"
        assert_eq!(estimate_tokens("const x = 1;"), 5);
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("   \n\t"), 0);
        // "foo" "." "bar" "(" ")"
        assert_eq!(estimate_tokens("foo.bar()"), 5);
    }
}
