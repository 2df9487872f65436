use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::download;
use crate::exec;
use crate::manager::Manager;
use crate::manifest::{RawConfig, RawPackage};
use crate::options::Options;
use crate::prompt::Prompt;
use crate::ui;
use crate::vars::Variables;

/// Platform gate for a config mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    All,
    Macos,
    Linux,
}

impl Platform {
    pub fn matches_host(self) -> bool {
        match self {
            Platform::All => true,
            Platform::Macos => cfg!(target_os = "macos"),
            Platform::Linux => cfg!(target_os = "linux"),
        }
    }
}

/// A single source-to-destination file copy rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub platform: Platform,
}

impl ConfigFile {
    /// Resolve a raw manifest entry: expand variables and default a missing
    /// destination by rewriting the manifest directory prefix to home.
    pub(crate) fn resolve(raw: RawConfig, vars: &Variables, manifest_root: &Path) -> Self {
        let source = PathBuf::from(vars.expand(&raw.source));

        let dest = match raw.dest {
            Some(dest) => PathBuf::from(vars.expand(&dest)),
            None => match source.strip_prefix(manifest_root) {
                Ok(rest) => vars.home().join(rest),
                Err(_) => source.clone(),
            },
        };

        Self {
            source,
            dest,
            platform: raw.platform,
        }
    }

    /// Copy the source file into place, creating parent directories as
    /// needed. Dry-run prints intended actions without touching the
    /// filesystem.
    pub fn install(&self, options: &Options) -> Result<()> {
        self.ensure_dest_dir(options)?;

        if options.verbose {
            ui::info(format!(
                "Copying {} to {}",
                self.source.display(),
                self.dest.display()
            ));
        }

        if !options.dry_run {
            fs::copy(&self.source, &self.dest).with_context(|| {
                format!("Failed to copy {:?} to {:?}", self.source, self.dest)
            })?;
        }

        Ok(())
    }

    fn ensure_dest_dir(&self, options: &Options) -> Result<()> {
        let Some(parent) = self.dest.parent() else {
            return Ok(());
        };

        if parent.exists() {
            if options.verbose {
                ui::info(format!("Path already exists: {}", parent.display()));
            }
            return Ok(());
        }

        if options.verbose {
            ui::info(format!("Making path {}", parent.display()));
        }

        if !options.dry_run {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        Ok(())
    }
}

/// Result of attempting to install a single package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package was provisioned (or would have been, under dry-run).
    Installed,
    /// The user chose to skip the package.
    Skipped,
    /// The package manager command failed; reported but not fatal.
    Failed,
}

/// How a package will be provisioned once the pre-checks have passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallStrategy {
    Manager(Manager),
    /// Git clone or URL download followed by the package's install commands.
    Remote,
}

/// One installable unit from the manifest. Command strings and config paths
/// have variables expanded at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Manager-specific package names; absence means the manager cannot
    /// install this package.
    pub managers: BTreeMap<Manager, String>,
    pub disabled: bool,
    pub configs: Vec<ConfigFile>,
    pub install_cmds: Vec<String>,
    pub post_install_cmds: Vec<String>,
    pub url: Option<String>,
    pub repo: Option<String>,
}

impl Package {
    pub(crate) fn from_raw(raw: RawPackage, vars: &Variables, manifest_root: &Path) -> Self {
        let mut managers = BTreeMap::new();
        for manager in raw.supported_package_managers.iter().flatten() {
            let name = raw
                .manager_name(*manager)
                .cloned()
                .unwrap_or_else(|| raw.name.clone());
            managers.insert(*manager, name);
        }

        let configs = raw
            .configs
            .into_iter()
            .map(|config| ConfigFile::resolve(config, vars, manifest_root))
            .filter(|config| config.platform.matches_host())
            .collect();

        Self {
            name: raw.name,
            managers,
            disabled: raw.disabled,
            configs,
            install_cmds: raw.install_cmds.iter().map(|cmd| vars.expand(cmd)).collect(),
            post_install_cmds: raw
                .post_install_cmds
                .iter()
                .map(|cmd| vars.expand(cmd))
                .collect(),
            url: raw.url,
            repo: raw.repo,
        }
    }

    /// The name to hand to a manager, falling back to the package name.
    pub fn package_name(&self, manager: Option<Manager>) -> &str {
        manager
            .and_then(|manager| self.managers.get(&manager))
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn supports(&self, manager: Manager) -> bool {
        self.managers.contains_key(&manager)
    }

    /// Drive the package through the install state machine: already-present
    /// pre-check, strategy selection, install, post-install commands.
    pub fn install(
        &self,
        options: &Options,
        manager: Option<Manager>,
        prompt: &dyn Prompt,
    ) -> Result<InstallOutcome> {
        if which::which(&self.name).is_ok() {
            let skip = options.skip_all
                || prompt.confirm(&format!(
                    "The binary {} has been detected on this system. Do you wish to skip this package?",
                    self.name
                ))?;

            if skip {
                ui::warn(format!("Skipping {}", self.name));
                return Ok(InstallOutcome::Skipped);
            }
        }

        let strategy = match self.select_strategy(manager, prompt)? {
            Some(strategy) => strategy,
            None => {
                ui::warn(format!("Skipping {}", self.name));
                return Ok(InstallOutcome::Skipped);
            }
        };

        let outcome = match strategy {
            InstallStrategy::Manager(manager) => self.install_with_manager(options, manager)?,
            InstallStrategy::Remote => self.install_from_remote(options)?,
        };

        if !self.post_install_cmds.is_empty() {
            ui::status(
                "Configuring",
                format!("Running post-install commands for {}", self.name),
            );
            for cmd in &self.post_install_cmds {
                if !exec::run_shell(cmd, options.dry_run)? {
                    bail!("Post-install command failed for {}", self.name);
                }
            }
        }

        Ok(outcome)
    }

    /// Decide how to provision the package. `Ok(None)` means a confirmed
    /// skip; declining a mandatory skip is an error.
    fn select_strategy(
        &self,
        manager: Option<Manager>,
        prompt: &dyn Prompt,
    ) -> Result<Option<InstallStrategy>> {
        let manager = match manager {
            None => return Ok(Some(InstallStrategy::Remote)),
            Some(manager) => manager,
        };

        if self.supports(manager) {
            return Ok(Some(InstallStrategy::Manager(manager)));
        }

        if self.url.is_some() || self.repo.is_some() {
            if prompt.confirm(&format!(
                "The package {} cannot be installed by {}. Do you wish to install it using the provided URL/repo?",
                self.name, manager
            ))? {
                Ok(Some(InstallStrategy::Remote))
            } else {
                Ok(None)
            }
        } else if prompt.confirm(&format!(
            "The package {} cannot be installed by {}. Do you wish to skip this package?",
            self.name, manager
        ))? {
            Ok(None)
        } else {
            bail!("Failed to install {}", self.name);
        }
    }

    fn install_with_manager(&self, options: &Options, manager: Manager) -> Result<InstallOutcome> {
        let cmd = format!(
            "{} {}",
            manager.install_command(),
            self.package_name(Some(manager))
        );

        if exec::run_shell(&cmd, options.dry_run)? {
            Ok(InstallOutcome::Installed)
        } else {
            Ok(InstallOutcome::Failed)
        }
    }

    fn install_from_remote(&self, options: &Options) -> Result<InstallOutcome> {
        if let Some(repo) = &self.repo {
            self.clone_repo(repo, options.dry_run)?;
        } else if let Some(url) = &self.url {
            self.fetch_url(url, options.dry_run)?;
        } else {
            bail!("No URL or git repository provided for package {}", self.name);
        }

        ui::status(
            "Installing",
            format!("Running install commands for {}", self.name),
        );
        for cmd in &self.install_cmds {
            if !exec::run_shell(cmd, options.dry_run)? {
                bail!("Install command failed for {}", self.name);
            }
        }

        Ok(InstallOutcome::Installed)
    }

    fn clone_repo(&self, repo: &str, dry_run: bool) -> Result<()> {
        if dry_run {
            ui::status("Cloning", format!("git clone {repo}"));
            return Ok(());
        }

        let dest = clone_destination(repo)?;
        let progress = ui::Progress::new("Cloning", repo.to_string());
        match git2::Repository::clone(repo, &dest) {
            Ok(_) => {
                progress.success("Cloned");
                Ok(())
            }
            Err(err) => {
                progress.fail(&err);
                Err(anyhow!("Git clone failed for package {}", self.name))
            }
        }
    }

    fn fetch_url(&self, url: &str, dry_run: bool) -> Result<()> {
        if dry_run {
            // The real download asks the server for a filename; dry-run must
            // stay offline, so derive it from the URL alone.
            let name = download::file_name_from_url(url)?;
            ui::status("Downloading", format!("{name} from {url}"));
            return Ok(());
        }

        let progress = ui::Progress::new("Downloading", url.to_string());
        match download::download(url) {
            Ok(name) => {
                progress.success("Downloaded");
                tracing::debug!(file = %name, "download complete");
                Ok(())
            }
            Err(err) => {
                progress.fail(&err);
                Err(err.context(format!("Download failed for package {}", self.name)))
            }
        }
    }

    /// Install every platform-valid config mapping of this package.
    pub fn install_configs(&self, options: &Options) -> Result<()> {
        for config in &self.configs {
            config.install(options)?;
        }
        Ok(())
    }
}

/// Directory a `git clone` of `repo` would create in the CWD.
fn clone_destination(repo: &str) -> Result<PathBuf> {
    let name = repo
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches(".git"))
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| anyhow!("Cannot derive a clone directory from '{repo}'"))?;

    Ok(PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use tempfile::TempDir;

    fn package(name: &str, managers: &[(Manager, &str)]) -> Package {
        Package {
            name: name.to_string(),
            managers: managers
                .iter()
                .map(|(manager, pkg)| (*manager, pkg.to_string()))
                .collect(),
            disabled: false,
            configs: Vec::new(),
            install_cmds: Vec::new(),
            post_install_cmds: Vec::new(),
            url: None,
            repo: None,
        }
    }

    #[test]
    fn package_name_prefers_manager_override() {
        let pkg = package("fd", &[(Manager::Apt, "fd-find"), (Manager::Brew, "fd")]);
        assert_eq!(pkg.package_name(Some(Manager::Apt)), "fd-find");
        assert_eq!(pkg.package_name(Some(Manager::Brew)), "fd");
        assert_eq!(pkg.package_name(Some(Manager::Pacman)), "fd");
        assert_eq!(pkg.package_name(None), "fd");
    }

    #[test]
    fn strategy_uses_manager_when_supported() {
        let pkg = package("rg", &[(Manager::Apt, "ripgrep")]);
        let prompt = ScriptedPrompt::confirming(&[]);
        let strategy = pkg.select_strategy(Some(Manager::Apt), &prompt).unwrap();
        assert_eq!(strategy, Some(InstallStrategy::Manager(Manager::Apt)));
    }

    #[test]
    fn strategy_is_remote_without_any_manager() {
        let pkg = package("rg", &[]);
        let prompt = ScriptedPrompt::confirming(&[]);
        let strategy = pkg.select_strategy(None, &prompt).unwrap();
        assert_eq!(strategy, Some(InstallStrategy::Remote));
    }

    #[test]
    fn unsupported_manager_offers_url_fallback() {
        let mut pkg = package("tool", &[(Manager::Pacman, "tool")]);
        pkg.url = Some("https://example.com/tool.tar.gz".to_string());

        let accept = ScriptedPrompt::confirming(&[true]);
        assert_eq!(
            pkg.select_strategy(Some(Manager::Apt), &accept).unwrap(),
            Some(InstallStrategy::Remote)
        );

        let decline = ScriptedPrompt::confirming(&[false]);
        assert_eq!(pkg.select_strategy(Some(Manager::Apt), &decline).unwrap(), None);
    }

    #[test]
    fn unsupported_manager_without_fallback_requires_skip() {
        let pkg = package("tool", &[(Manager::Pacman, "tool")]);

        let skip = ScriptedPrompt::confirming(&[true]);
        assert_eq!(pkg.select_strategy(Some(Manager::Apt), &skip).unwrap(), None);

        let refuse = ScriptedPrompt::confirming(&[false]);
        let err = pkg.select_strategy(Some(Manager::Apt), &refuse).unwrap_err();
        assert!(err.to_string().contains("Failed to install tool"));
    }

    #[test]
    fn remote_install_without_url_or_repo_errors() {
        let pkg = package("no-binary-by-this-name-q7", &[]);
        let options = Options::default();
        let prompt = ScriptedPrompt::confirming(&[]);
        let err = pkg.install(&options, None, &prompt).unwrap_err();
        assert!(err.to_string().contains("No URL or git repository"));
    }

    #[test]
    fn clone_destination_strips_git_suffix() {
        assert_eq!(
            clone_destination("https://github.com/user/tool.git").unwrap(),
            PathBuf::from("tool")
        );
        assert_eq!(
            clone_destination("git@github.com:user/tool").unwrap(),
            PathBuf::from("tool")
        );
        assert!(clone_destination("").is_err());
    }

    #[test]
    fn config_install_copies_and_creates_parents() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("bashrc");
        fs::write(&source, "export A=1\n").unwrap();

        let config = ConfigFile {
            source: source.clone(),
            dest: temp.path().join("nested/dir/.bashrc"),
            platform: Platform::All,
        };

        config.install(&Options::default()).unwrap();
        assert_eq!(fs::read_to_string(&config.dest).unwrap(), "export A=1\n");
    }

    #[test]
    fn config_install_dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("bashrc");
        fs::write(&source, "x").unwrap();

        let config = ConfigFile {
            source,
            dest: temp.path().join("nested/.bashrc"),
            platform: Platform::All,
        };

        let options = Options {
            dry_run: true,
            ..Options::default()
        };
        config.install(&options).unwrap();

        assert!(!config.dest.exists());
        assert!(!temp.path().join("nested").exists());
    }

    #[test]
    fn platform_all_always_matches() {
        assert!(Platform::All.matches_host());
        assert_eq!(Platform::Macos.matches_host(), cfg!(target_os = "macos"));
        assert_eq!(Platform::Linux.matches_host(), cfg!(target_os = "linux"));
    }
}
