use crate::error::{AppError, Result};
use log;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

pub mod lint;
pub mod runtime;
pub mod typecheck;

/// Source category of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Runtime,
    Build,
    Lint,
    TypeCheck,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Runtime => "runtime",
            Category::Build => "build",
            Category::Lint => "lint",
            Category::TypeCheck => "type-check",
        }
    }
}

/// One human-readable line describing a single reported problem.
///
/// Ordering within a category reflects the originating tool's emission
/// order, not severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub category: Category,
    pub text: String,
}

impl DiagnosticEntry {
    pub fn new(category: Category, text: impl Into<String>) -> DiagnosticEntry {
        DiagnosticEntry {
            category,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ToolOutput {
    pub stdout: String,
    #[allow(dead_code)]
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Runs one external tool to completion and returns its drained output.
///
/// A non-zero exit status is not an error here: linters and type
/// checkers exit non-zero exactly when they have findings to report.
/// Spawn failure and the watchdog timeout are errors; on timeout the
/// child is killed and reaped before returning.
pub(crate) fn run_tool(argv: &[String], cwd: &Path, timeout: Duration) -> Result<ToolOutput> {
    let (program, args) = argv.split_first().ok_or_else(|| AppError::Tool {
        name: "<empty>".to_string(),
        message: "empty command line".to_string(),
    })?;

    log::debug!("Running tool: {:?} (cwd {})", argv, cwd.display());
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::Tool {
            name: program.clone(),
            message: format!("spawn failed: {}", e),
        })?;

    // Drain both pipes on background threads so the child cannot block
    // on a full pipe buffer before it exits.
    let stdout_thread = child.stdout.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_thread = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let status = match wait_for_child_with_timeout(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::Tool {
                name: program.clone(),
                message: format!("timed out after {:?}", timeout),
            });
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::Tool {
                name: program.clone(),
                message: format!("wait failed: {}", e),
            });
        }
    };

    let stdout_buf = stdout_thread
        .and_then(|t| t.join().ok())
        .unwrap_or_default();
    let stderr_buf = stderr_thread
        .and_then(|t| t.join().ok())
        .unwrap_or_default();

    log::debug!(
        "Tool '{}' exited with {:?} ({} bytes stdout)",
        program,
        status.code(),
        stdout_buf.len()
    );
    Ok(ToolOutput {
        stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
        exit_code: status.code(),
    })
}

fn wait_for_child_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
