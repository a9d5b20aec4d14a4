//! Settings file plus command line. See `settings/dev.toml` for the layout.

mod cli;
pub use clap::{Parser, Subcommand};
pub use cli::*;

mod settings;
pub use settings::*;
