//! `mfetch errors` – list the error code table.

use anyhow::Result;
use mfetch_core::{Category, Code};

pub fn run_errors(category: Option<&str>) -> Result<()> {
    let filter = match category {
        Some(name) => Some(
            Category::from_name(name).ok_or_else(|| anyhow::anyhow!("unknown category: {}", name))?,
        ),
        None => None,
    };
    println!("{:<6} {:<10} {}", "CODE", "CATEGORY", "NAME");
    for code in Code::ALL {
        if filter.is_some_and(|c| c != code.category()) {
            continue;
        }
        println!("{:<6} {:<10} {}", code.value(), code.category().name(), code.name());
    }
    Ok(())
}
