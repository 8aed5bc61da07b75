use anyhow::{Context, Result};
use webctx_core::Config;

/// Prints the default `webctx.toml` structure to stdout, for users to
/// copy into their project root and edit.
pub fn handle_config_command() -> Result<()> {
    let rendered = Config::default_toml().context("Failed to render default configuration")?;
    println!("{}", rendered);
    Ok(())
}
