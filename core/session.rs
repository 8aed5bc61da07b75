use crate::config::Config;
use crate::error::{AppError, Result};
use headless_chrome::{Browser, LaunchOptions};
use log;
use std::time::{Duration, Instant};

/// Everything captured from one application session, returned as an
/// explicit value rather than accumulated in ambient state.
#[derive(Debug, Clone, Default)]
pub struct SessionCapture {
    /// Raw error-stack strings reported by the page's global handlers.
    pub runtime_errors: Vec<String>,
    /// Text of the build-error overlay element, when present.
    pub build_overlay: Option<String>,
}

/// Seam between the orchestrator and the browser automation
/// environment; tests substitute a canned implementation.
pub trait AppSession {
    fn capture(&mut self) -> Result<SessionCapture>;
}

/// Global handlers registered from document start so that both
/// synchronous exceptions and unhandled rejections land in one array.
const ERROR_HOOK_JS: &str = r#"
window.__webctx_errors = window.__webctx_errors || [];
window.addEventListener('error', function (event) {
    var detail = event.error && event.error.stack
        ? event.error.stack
        : String(event.message);
    window.__webctx_errors.push(detail);
});
window.addEventListener('unhandledrejection', function (event) {
    var reason = event.reason && event.reason.stack
        ? event.reason.stack
        : String(event.reason);
    window.__webctx_errors.push(reason);
});
"#;

const ERROR_COUNT_JS: &str =
    "window.__webctx_errors ? window.__webctx_errors.length : -1";

const ERROR_DRAIN_JS: &str = "JSON.stringify(window.__webctx_errors || [])";

const QUIESCENCE_POLL: Duration = Duration::from_millis(200);

/// Headless-browser implementation of [`AppSession`].
///
/// The browser process is owned by the capture call and dropped on
/// every exit path, so the session is always released even when an
/// intermediate step fails.
pub struct BrowserSession {
    url: String,
    overlay_selector: String,
    ready_timeout: Duration,
    quiet_period: Duration,
    capture_timeout: Duration,
}

impl BrowserSession {
    pub fn new(config: &Config) -> BrowserSession {
        BrowserSession {
            url: config.app.url.clone(),
            overlay_selector: config.app.overlay_selector.clone(),
            ready_timeout: Duration::from_millis(config.app.ready_timeout_ms),
            quiet_period: Duration::from_millis(config.app.quiet_period_ms),
            capture_timeout: Duration::from_millis(config.app.capture_timeout_ms),
        }
    }

    fn session_err(e: impl std::fmt::Display) -> AppError {
        AppError::Session(e.to_string())
    }
}

impl AppSession for BrowserSession {
    fn capture(&mut self) -> Result<SessionCapture> {
        log::info!("Attaching to application session at {}", self.url);
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(Self::session_err)?;
        let browser = Browser::new(options).map_err(Self::session_err)?;
        let tab = browser.new_tab().map_err(Self::session_err)?;
        tab.set_default_timeout(self.ready_timeout);

        tab.navigate_to(&self.url).map_err(Self::session_err)?;
        tab.wait_until_navigated().map_err(Self::session_err)?;
        // Reload with the hook injected at document start, so errors
        // thrown during page initialization are captured too.
        tab.reload(false, Some(ERROR_HOOK_JS))
            .map_err(Self::session_err)?;
        tab.wait_until_navigated().map_err(Self::session_err)?;

        // Wait for quiescence: a quiet period with no newly captured
        // errors, capped by the overall capture timeout.
        let started = Instant::now();
        let mut last_count: i64 = 0;
        let mut last_change = Instant::now();
        while started.elapsed() < self.capture_timeout {
            let count = tab
                .evaluate(ERROR_COUNT_JS, false)
                .ok()
                .and_then(|obj| obj.value)
                .and_then(|value| value.as_i64())
                .unwrap_or(-1);
            if count != last_count {
                last_count = count;
                last_change = Instant::now();
            } else if last_change.elapsed() >= self.quiet_period {
                break;
            }
            std::thread::sleep(QUIESCENCE_POLL);
        }

        let raw = tab
            .evaluate(ERROR_DRAIN_JS, false)
            .map_err(Self::session_err)?
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| "[]".to_string());
        let runtime_errors: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
        log::info!("Captured {} runtime error(s).", runtime_errors.len());

        let overlay_js = format!(
            r#"(function () {{
    var el = document.querySelector({});
    if (!el) {{ return ""; }}
    return el.innerText || el.textContent || "";
}})()"#,
            serde_json::to_string(&self.overlay_selector)?
        );
        let build_overlay = tab
            .evaluate(&overlay_js, false)
            .ok()
            .and_then(|obj| obj.value)
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|text| !text.trim().is_empty());
        if build_overlay.is_some() {
            log::info!("Build-error overlay detected.");
        }

        Ok(SessionCapture {
            runtime_errors,
            build_overlay,
        })
        // `browser` drops here (and on every `?` above), releasing the
        // session on all exit paths.
    }
}
