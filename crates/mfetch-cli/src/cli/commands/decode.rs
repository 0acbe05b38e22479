//! `mfetch decode <path>` – print a text file of unknown encoding.

use anyhow::{Context, Result};
use mfetch_core::text;
use std::path::Path;

pub fn run_decode(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let decoded =
        text::from_bytes_auto_detect(&bytes).with_context(|| format!("decode {}", path.display()))?;
    print!("{}", decoded);
    Ok(())
}
