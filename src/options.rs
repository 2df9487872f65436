use std::collections::BTreeSet;

use crate::cli::Cli;
use crate::package::Package;
use crate::ui;

/// Run options resolved from CLI flags. Built once at startup and immutable
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub enabled_packages: BTreeSet<String>,
    pub all_enabled: bool,
    pub disabled_packages: BTreeSet<String>,
    pub verbose: bool,
    /// Parsed but reserved: single-command batch installs are not wired up.
    pub batch_mode: bool,
    pub dry_run: bool,
    pub skip_all: bool,
}

impl Options {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            enabled_packages: cli.enable.iter().cloned().collect(),
            all_enabled: cli.enable_all,
            disabled_packages: cli.disable.iter().cloned().collect(),
            verbose: cli.verbose,
            batch_mode: cli.batch,
            dry_run: cli.dry_run,
            skip_all: cli.skip_all,
        }
    }

    /// A package participates when it is explicitly enabled, enabled in the
    /// manifest, or `--enable-all` is set; an explicit `--disable` always
    /// wins.
    pub fn is_package_enabled(&self, package: &Package) -> bool {
        if self.disabled_packages.contains(&package.name) {
            return false;
        }

        self.enabled_packages.contains(&package.name) || package.is_enabled() || self.all_enabled
    }

    /// Filter a package list down to the enabled ones, preserving manifest
    /// order.
    pub fn enabled_packages(&self, packages: Vec<Package>) -> Vec<Package> {
        let mut enabled = Vec::with_capacity(packages.len());

        for package in packages {
            if self.is_package_enabled(&package) {
                ui::success("Enabling", &package.name);
                enabled.push(package);
            } else if self.verbose {
                ui::warn(format!("Disabling {}", package.name));
            }
        }

        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn package(name: &str, disabled: bool) -> Package {
        Package {
            name: name.to_string(),
            managers: BTreeMap::new(),
            disabled,
            configs: Vec::new(),
            install_cmds: Vec::new(),
            post_install_cmds: Vec::new(),
            url: None,
            repo: None,
        }
    }

    #[test]
    fn manifest_default_is_enabled() {
        let options = Options::default();
        assert!(options.is_package_enabled(&package("fd", false)));
        assert!(!options.is_package_enabled(&package("fd", true)));
    }

    #[test]
    fn enable_flag_overrides_manifest_disabled() {
        let options = Options {
            enabled_packages: ["fd".to_string()].into(),
            ..Options::default()
        };
        assert!(options.is_package_enabled(&package("fd", true)));
    }

    #[test]
    fn enable_all_overrides_manifest_disabled() {
        let options = Options {
            all_enabled: true,
            ..Options::default()
        };
        assert!(options.is_package_enabled(&package("fd", true)));
    }

    #[test]
    fn disable_always_wins() {
        let options = Options {
            enabled_packages: ["fd".to_string()].into(),
            all_enabled: true,
            disabled_packages: ["fd".to_string()].into(),
            ..Options::default()
        };
        assert!(!options.is_package_enabled(&package("fd", false)));
    }

    #[test]
    fn filtering_preserves_order() {
        let options = Options {
            disabled_packages: ["b".to_string()].into(),
            ..Options::default()
        };

        let packages = vec![package("a", false), package("b", false), package("c", false)];
        let names: Vec<_> = options
            .enabled_packages(packages)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
