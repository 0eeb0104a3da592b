//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the cinereel binary.

mod commands;
mod credentials;
mod export;
mod projects;
mod storyboard;

pub use commands::{Cli, Commands, HeroCommands};
pub use export::handle_export_command;
pub use projects::handle_project_command;
pub use storyboard::{add_hero, direct, extend, new_project, remove_hero, render, styles};
