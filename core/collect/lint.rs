use crate::collect::{Category, DiagnosticEntry, run_tool};
use crate::config::Config;
use crate::error::Result;
use log;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Runs the configured linter and adapts its JSON report into
/// diagnostic entries.
///
/// Fails in isolation: a subprocess failure or malformed JSON yields an
/// empty list and a logged warning, never aborting the pipeline.
pub fn collect_lint_errors(config: &Config, project_root: &Path) -> Vec<DiagnosticEntry> {
    match try_collect(config, project_root) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Lint collection failed: {}", e);
            Vec::new()
        }
    }
}

fn try_collect(config: &Config, project_root: &Path) -> Result<Vec<DiagnosticEntry>> {
    let output = run_tool(
        &config.tools.lint,
        project_root,
        Duration::from_millis(config.tools.timeout_ms),
    )?;
    Ok(parse_lint_json(&output.stdout, project_root))
}

/// Parses the linter's JSON output: an array of
/// `{filePath, messages: [{line, ruleId, message}]}` objects.
///
/// A document that is not valid JSON (or not an array) yields an empty
/// list. A single malformed message is skipped and the rest of the
/// category continues.
pub fn parse_lint_json(raw: &str, project_root: &Path) -> Vec<DiagnosticEntry> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Linter output was not valid JSON: {}", e);
            return Vec::new();
        }
    };
    let Some(file_reports) = value.as_array() else {
        log::warn!("Linter output was not a JSON array.");
        return Vec::new();
    };

    let mut entries = Vec::new();
    for report in file_reports {
        let file_path = report.get("filePath").and_then(Value::as_str).unwrap_or("");
        let relative = pathdiff::diff_paths(Path::new(file_path), project_root)
            .filter(|p| !p.starts_with(".."))
            .unwrap_or_else(|| file_path.into());

        let Some(messages) = report.get("messages").and_then(Value::as_array) else {
            continue;
        };
        for message in messages {
            // Skip a malformed message, keep the rest of the category.
            let Some(text) = message.get("message").and_then(Value::as_str) else {
                log::debug!("Skipping lint message without text in {}", file_path);
                continue;
            };
            let line = message.get("line").and_then(Value::as_u64).unwrap_or(0);
            let rule_id = message
                .get("ruleId")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            entries.push(DiagnosticEntry::new(
                Category::Lint,
                format!("[{}] Line {}: {} ({})", relative.display(), line, text, rule_id),
            ));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/project")
    }

    #[test]
    fn formats_one_entry_per_message() {
        let raw = r#"[
            {
                "filePath": "/project/src/app.js",
                "messages": [
                    {"line": 3, "ruleId": "no-unused-vars", "message": "'x' is defined but never used."},
                    {"line": 9, "ruleId": "eqeqeq", "message": "Expected '===' and instead saw '=='."}
                ]
            }
        ]"#;
        let entries = parse_lint_json(raw, &root());
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].text,
            "[src/app.js] Line 3: 'x' is defined but never used. (no-unused-vars)"
        );
        assert_eq!(entries[1].category, Category::Lint);
    }

    #[test]
    fn malformed_document_yields_empty_list() {
        assert!(parse_lint_json("not json at all", &root()).is_empty());
        assert!(parse_lint_json("{\"filePath\": \"x\"}", &root()).is_empty());
    }

    #[test]
    fn malformed_message_is_skipped_not_fatal() {
        let raw = r#"[
            {
                "filePath": "/project/src/app.js",
                "messages": [
                    {"line": 1},
                    {"line": 2, "ruleId": "semi", "message": "Missing semicolon."}
                ]
            }
        ]"#;
        let entries = parse_lint_json(raw, &root());
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "[src/app.js] Line 2: Missing semicolon. (semi)"
        );
    }

    #[test]
    fn missing_rule_id_and_line_get_placeholders() {
        let raw = r#"[
            {"filePath": "/project/a.js", "messages": [{"message": "Parsing error."}]}
        ]"#;
        let entries = parse_lint_json(raw, &root());
        assert_eq!(entries[0].text, "[a.js] Line 0: Parsing error. (unknown)");
    }

    #[test]
    fn ordering_follows_tool_emission_order() {
        let raw = r#"[
            {"filePath": "/project/b.js", "messages": [{"line": 1, "ruleId": "b", "message": "B"}]},
            {"filePath": "/project/a.js", "messages": [{"line": 1, "ruleId": "a", "message": "A"}]}
        ]"#;
        let entries = parse_lint_json(raw, &root());
        assert!(entries[0].text.starts_with("[b.js]"));
        assert!(entries[1].text.starts_with("[a.js]"));
    }
}
