use colored::*;
use std::fs;
use std::path::Path;
use webctx_core::{AppError, ReportSummary, Result};

/// Persists the assembled report, truncating any previous run's file.
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    fs::write(path, report).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Report written to {}", path.display());
    Ok(())
}

/// Places the report on the system clipboard.
///
/// Clipboard access is best-effort: headless environments routinely
/// have no clipboard at all, so callers should downgrade this error to
/// a warning rather than fail the run.
pub fn copy_to_clipboard(report: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(report.to_string())
        .map_err(|e| AppError::Clipboard(e.to_string()))?;
    log::info!("Report copied to clipboard.");
    Ok(())
}

/// Prints the end-of-run console summary.
pub fn print_run_summary(summary: &ReportSummary, report_path: &Path, approx_tokens: usize) {
    println!("\n{}", "--- Report Summary ---".cyan().bold());
    println!(
        "  {:<18} {}",
        "Files included:".blue(),
        summary.total_files
    );
    println!("  {:<18} {}", "Code lines:".blue(), summary.total_lines);
    println!(
        "  {:<18} {}",
        "Approx. tokens:".blue(),
        format_count(approx_tokens)
    );
    println!(
        "  {:<18} {}",
        "Runtime errors:".blue(),
        colorize_count(summary.runtime_errors)
    );
    println!(
        "  {:<18} {}",
        "Build errors:".blue(),
        colorize_count(summary.build_errors)
    );
    println!(
        "  {:<18} {}",
        "Lint errors:".blue(),
        colorize_count(summary.lint_errors)
    );
    println!(
        "  {:<18} {}",
        "Type errors:".blue(),
        colorize_count(summary.type_errors)
    );
    println!(
        "\n{} {}",
        "Report written to:".green(),
        report_path.display()
    );
}

fn colorize_count(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().red().bold()
    }
}

fn format_count(n: usize) -> String {
    if n >= 1000 {
        format!("~{:.1}k", n as f64 / 1000.0)
    } else {
        format!("~{}", n)
    }
}
