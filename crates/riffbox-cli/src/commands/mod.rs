//! CLI subcommand implementations.

pub mod info;
pub mod modes;
pub mod process;
