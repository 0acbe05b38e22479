//! `mfetch config` – print the effective configuration.

use anyhow::Result;
use mfetch_core::PlayerConfig;

pub fn run_config(cfg: &PlayerConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
