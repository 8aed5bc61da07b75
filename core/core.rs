pub mod collect;
pub mod config;
pub mod error;
pub mod render;
pub mod report;
pub mod rules;
pub mod session;
pub mod walk;

pub use collect::{Category, DiagnosticEntry};
pub use config::Config;
pub use error::{AppError, Result};
pub use render::{BLOCK_SENTINEL, render_file};
pub use report::{
    DIAGNOSTIC_SECTION_CAP, ReportSummary, assemble_report, estimate_tokens,
};
pub use rules::{ExclusionRule, RuleSet};
pub use session::{AppSession, BrowserSession, SessionCapture};
pub use walk::enumerate_files;
