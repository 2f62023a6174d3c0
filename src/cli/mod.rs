//! Command-line host for the store

pub mod commands;
pub mod demo;
pub mod script;

pub use commands::{Cli, Commands};
pub use demo::run_demo;
pub use script::{Command, RunSummary, ScriptRunner};
