use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::{Cli, Commands};
use crate::installer::Installer;
use crate::manager;
use crate::manifest;
use crate::options::Options;
use crate::prompt::TerminalPrompt;
use crate::ui;
use crate::vars::Variables;

mod configs;
mod install;
mod packages;

pub fn execute(cli: Cli) -> Result<()> {
    if cfg!(windows) {
        bail!("Windows is not supported.");
    }

    let options = Options::from_cli(&cli);

    let manager = manager::detect(&TerminalPrompt)?;
    if manager.is_none() {
        bail!("No package manager was found and most packages require a package manager.");
    }

    let vars = Variables::from_env()?;
    if options.verbose {
        for (name, value) in vars.iter() {
            ui::info(format!("Initializing variable {name} to {value}"));
        }
    }

    let packages = manifest::load(Path::new(manifest::MANIFEST_FILE), &vars)?;
    let packages = options.enabled_packages(packages);

    let installer = Installer::new(options, manager, Box::new(TerminalPrompt));

    match cli.command {
        Commands::Install => install::execute(&installer, &packages),
        Commands::InstallPackages => packages::execute(&installer, &packages),
        Commands::InstallConfigs => configs::execute(&installer, &packages),
    }
}
