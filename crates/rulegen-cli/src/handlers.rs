//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module; this module re-exports the entry
//! points used by `main`.

mod completions;
mod config;
mod convert;
mod inspect;

pub use completions::handle_completions;
pub use config::handle_config;
pub use convert::handle_convert;
pub use inspect::handle_inspect;
