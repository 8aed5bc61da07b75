use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectOpts {
    #[arg(
        long,
        help = "Specify the target project directory (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify the project name (overrides config/dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CaptureOpts {
    #[arg(
        long,
        help = "URL of the running application session (overrides config).",
        value_name = "URL",
        help_heading = "Diagnostics Capture"
    )]
    pub url: Option<String>,

    #[arg(
        long,
        help = "Skip browser session capture (runtime/build sections stay empty).",
        help_heading = "Diagnostics Capture"
    )]
    pub skip_session: bool,

    #[arg(
        long,
        help = "Skip the linter subprocess.",
        help_heading = "Diagnostics Capture"
    )]
    pub skip_lint: bool,

    #[arg(
        long,
        help = "Skip the type-checker subprocess.",
        help_heading = "Diagnostics Capture"
    )]
    pub skip_typecheck: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeliveryOpts {
    #[arg(
        short = 'o',
        long,
        help = "Report output file (overrides config; relative to project root).",
        value_name = "FILE",
        help_heading = "Delivery"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not copy the report to the system clipboard.",
        help_heading = "Delivery"
    )]
    pub no_clipboard: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Aggregate project source and live diagnostics into one report.",
    long_about = "webctx scans a project tree, captures runtime errors from the running \napplication, runs the linter and type checker, and merges everything into \na single report for review or LLM consumption.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  webctx run\n  webctx run --skip-session --no-clipboard\n  webctx run --url http://localhost:5173 -o report.md\n  webctx config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "r",
        about = "Collect diagnostics, render the project and assemble the report."
    )]
    Run(RunArgs),

    #[command(about = "Print the default configuration file structure.")]
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[clap(flatten)]
    pub project: ProjectOpts,
    #[clap(flatten)]
    pub capture: CaptureOpts,
    #[clap(flatten)]
    pub delivery: DeliveryOpts,
}
