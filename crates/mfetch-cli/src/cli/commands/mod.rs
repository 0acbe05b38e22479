//! CLI command handlers, one file per command.

mod config;
mod decode;
mod errors;
mod fetch;

pub use config::run_config;
pub use decode::run_decode;
pub use errors::run_errors;
pub use fetch::run_fetch;
