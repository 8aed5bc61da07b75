use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "webctx.toml";
pub const DEFAULT_REPORT_FILENAME: &str = "project-report.md";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_OVERLAY_SELECTOR: &str = "nextjs-portal";

fn default_app_url() -> String {
    DEFAULT_APP_URL.to_string()
}
fn default_overlay_selector() -> String {
    DEFAULT_OVERLAY_SELECTOR.to_string()
}
fn default_ready_timeout_ms() -> u64 {
    10_000
}
fn default_quiet_period_ms() -> u64 {
    800
}
fn default_capture_timeout_ms() -> u64 {
    5_000
}
fn default_tool_timeout_ms() -> u64 {
    120_000
}
fn default_lint_argv() -> Vec<String> {
    [
        "npx", "eslint", "src", "--ext", ".js,.jsx,.ts,.tsx", "--format", "json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_typecheck_argv() -> Vec<String> {
    ["npx", "tsc", "--noEmit", "--listEmittedFiles", "--diagnostics"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_report_file() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_FILENAME)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub general: GeneralConfig,
    pub app: AppConfig,
    pub tools: ToolsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// URL of the running application session to attach to.
    pub url: String,
    /// CSS selector of the optional build-error overlay element.
    pub overlay_selector: String,
    /// Bound on the initial page-readiness wait.
    pub ready_timeout_ms: u64,
    /// Quiet period with no new captured errors before capture stops.
    pub quiet_period_ms: u64,
    /// Hard cap on the whole error-capture phase.
    pub capture_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            url: default_app_url(),
            overlay_selector: default_overlay_selector(),
            ready_timeout_ms: default_ready_timeout_ms(),
            quiet_period_ms: default_quiet_period_ms(),
            capture_timeout_ms: default_capture_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Linter invocation; stdout must be the linter's JSON report format.
    pub lint: Vec<String>,
    /// Type-checker invocation; stdout is consumed as free text.
    pub typecheck: Vec<String>,
    /// Watchdog timeout applied to each tool subprocess.
    pub timeout_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            lint: default_lint_argv(),
            typecheck: default_typecheck_argv(),
            timeout_ms: default_tool_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Report destination, relative to the project root unless absolute.
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            file: default_report_file(),
        }
    }
}

impl Config {
    /// Loads `webctx.toml` from the project root if present, otherwise
    /// returns the defaults. A present-but-invalid file is fatal.
    pub fn load_or_default(project_root: &Path) -> Result<Config> {
        let config_path = project_root.join(DEFAULT_CONFIG_FILENAME);
        if !config_path.is_file() {
            log::debug!(
                "No config file at {}, using defaults.",
                config_path.display()
            );
            return Ok(Config::default());
        }
        log::debug!("Loading config from {}", config_path.display());
        let toml_content = fs::read_to_string(&config_path).map_err(|e| AppError::FileRead {
            path: config_path.clone(),
            source: e,
        })?;
        toml::from_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!("{}: {}", config_path.display(), e))
        })
    }

    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_to_resolve = match cli_project_root {
            Some(p) => p.clone(),
            None => match env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()) {
                Some(p) => PathBuf::from(p),
                None => env::current_dir().map_err(AppError::Io)?,
            },
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn get_effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }

    /// Absolute path of the report output file for this run.
    pub fn report_path(&self, project_root: &Path) -> PathBuf {
        if self.output.file.is_absolute() {
            self.output.file.clone()
        } else {
            project_root.join(&self.output.file)
        }
    }

    /// Default configuration rendered as TOML, for `webctx config`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default())
            .map_err(|e| AppError::Config(format!("Failed to serialize default config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.app.url, DEFAULT_APP_URL);
        assert_eq!(config.output.file, PathBuf::from(DEFAULT_REPORT_FILENAME));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILENAME),
            "[app]\nurl = \"http://localhost:5173\"\n\n[general]\nproject_name = \"demo\"\n",
        )
        .unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.app.url, "http://localhost:5173");
        assert_eq!(config.get_effective_project_name(dir.path()), "demo");
        // Untouched sections keep their defaults.
        assert_eq!(config.tools.timeout_ms, 120_000);
    }

    #[test]
    fn invalid_config_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILENAME), "[app\nurl = 3").unwrap();
        let err = Config::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn project_name_falls_back_to_directory_name() {
        let config = Config::default();
        let name = config.get_effective_project_name(Path::new("/tmp/my-app"));
        assert_eq!(name, "my-app");
    }

    #[test]
    fn default_toml_round_trips() {
        let rendered = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.app.url, DEFAULT_APP_URL);
    }
}
