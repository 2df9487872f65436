use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manager::Manager;
use crate::package::{Package, Platform};
use crate::vars::Variables;

/// Manifest file name, resolved relative to the current directory.
pub const MANIFEST_FILE: &str = "packages_list.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    packages: Vec<RawPackage>,
}

/// Package entry exactly as it appears in the manifest. `name` and
/// `supported-package-managers` are required keys; the latter may be null.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPackage {
    pub name: String,
    #[serde(
        rename = "supported-package-managers",
        deserialize_with = "nullable_managers"
    )]
    pub supported_package_managers: Option<Vec<Manager>>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    name_apt: Option<String>,
    #[serde(default)]
    name_pacman: Option<String>,
    #[serde(default)]
    name_yay: Option<String>,
    #[serde(default)]
    name_brew: Option<String>,
    #[serde(default)]
    pub configs: Vec<RawConfig>,
    #[serde(default, rename = "install-cmds")]
    pub install_cmds: Vec<String>,
    #[serde(default, rename = "post-install-cmds")]
    pub post_install_cmds: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

impl RawPackage {
    /// Manager-specific package name override (`name_<manager>` key).
    pub fn manager_name(&self, manager: Manager) -> Option<&String> {
        match manager {
            Manager::Apt => self.name_apt.as_ref(),
            Manager::Pacman => self.name_pacman.as_ref(),
            Manager::Yay => self.name_yay.as_ref(),
            Manager::Brew => self.name_brew.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawConfig {
    pub source: String,
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(default)]
    pub platform: Platform,
}

/// Require the key to be present while still accepting an explicit null.
fn nullable_managers<'de, D>(deserializer: D) -> Result<Option<Vec<Manager>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Manager>>::deserialize(deserializer)
}

/// Load and validate the package manifest. Any schema violation fails the
/// whole load; there is no partial result.
pub fn load(path: &Path, vars: &Variables) -> Result<Vec<Package>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read package manifest {:?}", path))?;

    let raw: RawManifest = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid package manifest {:?}", path))?;

    let root = fs::canonicalize(path)
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let packages: Vec<Package> = raw
        .packages
        .into_iter()
        .map(|package| Package::from_raw(package, vars, &root))
        .collect();

    tracing::debug!(count = packages.len(), "loaded package manifest");
    Ok(packages)
}
