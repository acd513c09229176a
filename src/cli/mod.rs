//! CLI module for the auto-deploy resolver.
//!
//! This module provides the command-line interface for resolving and
//! validating `auto-deploy-app` releases.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, ValuesArgs};
pub use output::OutputFormatter;
