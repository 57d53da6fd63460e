//! CLI module for orrery.
//!
//! All CLI logic lives here so it can be tested; `main.rs` only installs
//! logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RenderOptions, RenderTask};
pub use commands::{execute_render, load_config, run_cli, Artifact};
pub use output::{format_bodies, print_bodies, print_help, print_version, version_string};
