// Public API
pub mod cli;
pub mod commands;
pub mod ui;

// Core domain types
mod download;
mod exec;
mod installer;
mod manager;
mod manifest;
mod options;
mod package;
mod prompt;
mod vars;

// Re-export main types
pub use installer::Installer;
pub use manager::Manager;
pub use options::Options;
pub use package::{ConfigFile, InstallOutcome, Package, Platform};
pub use prompt::{Choice, Prompt, TerminalPrompt};
pub use vars::Variables;
