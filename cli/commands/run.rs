use crate::cli_args::RunArgs;
use crate::output;
use anyhow::{Context, Result};
use log;
use webctx_core::{
    self as core, AppSession, Config, ReportSummary, SessionCapture,
};

/// Runs the whole pipeline: session capture, lint and type-check
/// subprocesses, tree enumeration and rendering, report assembly, then
/// delivery (file, clipboard, console summary).
///
/// Diagnostics collection degrades gracefully: each source fails in
/// isolation with a logged warning and an empty section. Filesystem
/// failures during enumeration, rendering or persistence are fatal.
pub fn handle_run_command(args: RunArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config =
        Config::load_or_default(&project_root).context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &args);

    // Session capture first, so the tool subprocesses run against
    // whatever state the application was actually serving.
    let capture = if args.capture.skip_session {
        log::info!("Session capture skipped by flag.");
        SessionCapture::default()
    } else {
        let mut session = core::BrowserSession::new(&config);
        match session.capture() {
            Ok(capture) => capture,
            Err(e) => {
                log::warn!("Session capture failed: {}", e);
                SessionCapture::default()
            }
        }
    };
    let runtime_errors = core::collect::runtime::collect_runtime_errors(&capture.runtime_errors);
    let build_errors =
        core::collect::runtime::collect_build_errors(capture.build_overlay.as_deref());

    let lint_errors = if args.capture.skip_lint {
        log::info!("Lint collection skipped by flag.");
        Vec::new()
    } else {
        core::collect::lint::collect_lint_errors(&config, &project_root)
    };

    let type_errors = if args.capture.skip_typecheck {
        log::info!("Type-check collection skipped by flag.");
        Vec::new()
    } else {
        core::collect::typecheck::collect_type_errors(&config, &project_root)
    };

    log::debug!("Enumerating project files...");
    let rules = core::RuleSet::for_project(&project_root)
        .context("Failed to load exclusion rules")?;
    let files = core::enumerate_files(&project_root, &rules)
        .context("Failed to enumerate project files")?;

    let report_path = config.report_path(&project_root);
    let mut file_blocks = Vec::new();
    for path in &files {
        if let Some(block) = core::render_file(path, &project_root, &report_path)
            .with_context(|| format!("Failed to render {}", path.display()))?
        {
            file_blocks.push(block);
        }
    }
    log::debug!(
        "Rendered {} non-empty blocks from {} files.",
        file_blocks.len(),
        files.len()
    );

    let summary = ReportSummary::compute(
        &file_blocks,
        &runtime_errors,
        &build_errors,
        &lint_errors,
        &type_errors,
    );
    let project_name = config.get_effective_project_name(&project_root);
    let report = core::assemble_report(
        &file_blocks,
        &runtime_errors,
        &build_errors,
        &lint_errors,
        &type_errors,
        &summary,
        &project_name,
    );

    output::write_report(&report_path, &report)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    if args.delivery.no_clipboard {
        log::debug!("Clipboard delivery disabled by flag.");
    } else if let Err(e) = output::copy_to_clipboard(&report) {
        log::warn!("Clipboard copy failed: {}", e);
    }

    if !quiet {
        output::print_run_summary(&summary, &report_path, core::estimate_tokens(&report));
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(name) = &args.project.project_name {
        config.general.project_name = Some(name.clone());
    }
    if let Some(url) = &args.capture.url {
        config.app.url = url.clone();
    }
    if let Some(output) = &args.delivery.output {
        config.output.file = output.clone();
    }
}
