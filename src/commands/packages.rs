use crate::installer::Installer;
use crate::package::Package;
use anyhow::Result;

pub fn execute(installer: &Installer, packages: &[Package]) -> Result<()> {
    installer.install_packages(packages)
}
