use clap::{Parser, Subcommand};

/// dotup - Declarative dotfile and package installer
///
/// dotup reads a JSON manifest (`packages_list.json` in the current
/// directory) describing packages, their per-manager names, configuration
/// file mappings, and URL/git fallbacks. It installs packages through the
/// host's package manager and copies configuration files into place.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print commands without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip packages that are already installed but still install their configs
    #[arg(long, global = true)]
    pub skip_all: bool,

    /// Install all enabled packages with a single package manager command (reserved)
    #[arg(short = 'b', long, global = true)]
    pub batch: bool,

    /// Enable every package regardless of manifest defaults
    #[arg(long, global = true)]
    pub enable_all: bool,

    /// Enable a package by name (repeatable)
    #[arg(long = "enable", value_name = "PACKAGE", global = true)]
    pub enable: Vec<String>,

    /// Disable a package by name (repeatable; overrides --enable)
    #[arg(long = "disable", value_name = "PACKAGE", global = true)]
    pub disable: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install all packages and their configs
    Install,

    /// Install configuration files only
    #[command(name = "install_configs")]
    InstallConfigs,

    /// Install packages only
    #[command(name = "install_packages")]
    InstallPackages,
}
