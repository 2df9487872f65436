use anyhow::Result;

use crate::manager::Manager;
use crate::options::Options;
use crate::package::{InstallOutcome, Package};
use crate::prompt::Prompt;
use crate::ui;

/// Drives one run over the enabled package list. Packages are processed to
/// completion sequentially; there is no rollback.
pub struct Installer {
    options: Options,
    manager: Option<Manager>,
    prompt: Box<dyn Prompt>,
}

impl Installer {
    pub fn new(options: Options, manager: Option<Manager>, prompt: Box<dyn Prompt>) -> Self {
        Self {
            options,
            manager,
            prompt,
        }
    }

    /// Install every package, printing a success line per installed one.
    /// Skips and soft manager failures continue with the next package.
    pub fn install_packages(&self, packages: &[Package]) -> Result<()> {
        for package in packages {
            match package.install(&self.options, self.manager, self.prompt.as_ref())? {
                InstallOutcome::Installed => {
                    ui::success("Installed", package.package_name(self.manager));
                }
                InstallOutcome::Skipped | InstallOutcome::Failed => {}
            }
        }

        Ok(())
    }

    /// Copy the config mappings of every package into place.
    pub fn install_configs(&self, packages: &[Package]) -> Result<()> {
        for package in packages {
            ui::status("Configs", format!("Installing configs for {}", package.name));
            package.install_configs(&self.options)?;
        }

        Ok(())
    }
}
