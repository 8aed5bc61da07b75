use crate::error::{AppError, Result};
use log;
use once_cell::sync::Lazy;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const IGNORE_FILENAME: &str = ".gitignore";

/// Built-in exclusions applied before anything read from the ignore-file:
/// framework directories, binary/media/archive/document extensions, logs,
/// generated type declarations and markdown.
static BUILTIN_EXCLUDE_PATTERNS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Framework and tooling directories
        "/node_modules",
        "/.next",
        "/.git",
        "/dist",
        "/build",
        "/coverage",
        "/out",
        // Binary and media extensions
        "*.png",
        "*.jpg",
        "*.jpeg",
        "*.gif",
        "*.svg",
        "*.ico",
        "*.webp",
        "*.mp3",
        "*.mp4",
        "*.woff",
        "*.woff2",
        "*.ttf",
        "*.eot",
        // Archives and documents
        "*.zip",
        "*.tar",
        "*.gz",
        "*.pdf",
        "*.doc",
        "*.docx",
        // Logs, locks, generated declarations, markdown
        "*.log",
        "*.lock",
        "*.d.ts",
        "*.md",
        ".DS_Store",
    ]
});

/// One exclusion pattern, classified once at load time by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// `*.<ext>` — matches any file whose name ends with the suffix.
    Extension(String),
    /// `/<fragment>` — matches any path containing the fragment as a
    /// plain substring. Deliberately not segment-boundary aware: `/build`
    /// also matches `rebuild/x.js`, mirroring the established behavior
    /// consumers of the ignore-file rely on.
    PathFragment(String),
    /// Anything else — matches a file whose base name equals the pattern.
    ExactName(String),
}

impl ExclusionRule {
    /// Classifies a raw pattern. Blank patterns yield `None`; malformed
    /// ones degenerate to exact-name rules that simply never match.
    pub fn parse(pattern: &str) -> Option<ExclusionRule> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return None;
        }
        if let Some(suffix) = pattern.strip_prefix("*.") {
            return Some(ExclusionRule::Extension(format!(".{}", suffix)));
        }
        if let Some(fragment) = pattern.strip_prefix('/') {
            return Some(ExclusionRule::PathFragment(fragment.to_string()));
        }
        Some(ExclusionRule::ExactName(pattern.to_string()))
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            ExclusionRule::Extension(suffix) => path
                .file_name()
                .map(|n| n.to_string_lossy().ends_with(suffix.as_str()))
                .unwrap_or(false),
            ExclusionRule::PathFragment(fragment) => {
                !fragment.is_empty() && path.to_string_lossy().contains(fragment.as_str())
            }
            ExclusionRule::ExactName(name) => path
                .file_name()
                .map(|n| n.to_string_lossy() == name.as_str())
                .unwrap_or(false),
        }
    }
}

/// Unordered set of exclusion rules; a path is excluded if any rule
/// matches (logical OR, no precedence).
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ExclusionRule>,
}

impl RuleSet {
    pub fn built_in() -> RuleSet {
        RuleSet::from_patterns(BUILTIN_EXCLUDE_PATTERNS.iter().copied())
    }

    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> RuleSet {
        let rules = patterns
            .into_iter()
            .filter_map(ExclusionRule::parse)
            .collect();
        RuleSet { rules }
    }

    /// Built-in rules plus whatever the project's ignore-file adds.
    /// A missing ignore-file is fine; an unreadable one is fatal.
    pub fn for_project(project_root: &Path) -> Result<RuleSet> {
        let mut set = RuleSet::built_in();
        let ignore_path = project_root.join(IGNORE_FILENAME);
        match fs::read_to_string(&ignore_path) {
            Ok(content) => {
                let before = set.rules.len();
                for line in content.lines() {
                    if let Some(rule) = ExclusionRule::parse(line) {
                        set.rules.push(rule);
                    }
                }
                log::debug!(
                    "Loaded {} exclusion rules from {}",
                    set.rules.len() - before,
                    ignore_path.display()
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No ignore-file at {}", ignore_path.display());
            }
            Err(e) => {
                return Err(AppError::FileRead {
                    path: ignore_path,
                    source: e,
                });
            }
        }
        Ok(set)
    }

    pub fn push_pattern(&mut self, pattern: &str) {
        if let Some(rule) = ExclusionRule::parse(pattern) {
            self.rules.push(rule);
        }
    }

    pub fn is_included(&self, path: &Path) -> bool {
        !self.rules.iter().any(|rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
