use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved values for the `%(NAME)` placeholders recognized in manifest
/// strings: HOME, FONT_DIR, and LOCAL_BIN_DIR.
#[derive(Debug, Clone)]
pub struct Variables {
    home: PathBuf,
    values: BTreeMap<&'static str, String>,
}

impl Variables {
    /// Build the variable table for a given home directory.
    pub fn new(home: PathBuf) -> Self {
        let font_dir = if cfg!(target_os = "macos") {
            home.join("Library/Fonts")
        } else {
            home.join(".local/share/fonts")
        };

        let mut values = BTreeMap::new();
        values.insert("HOME", home.display().to_string());
        values.insert("FONT_DIR", font_dir.display().to_string());
        values.insert("LOCAL_BIN_DIR", home.join(".local/bin").display().to_string());

        Self { home, values }
    }

    /// Build the variable table from the current user's home directory.
    pub fn from_env() -> Result<Self> {
        let base = directories::BaseDirs::new().context("Could not determine home directory")?;
        Ok(Self::new(base.home_dir().to_path_buf()))
    }

    /// Replace every `%(NAME)` occurrence of a recognized variable with its
    /// resolved value. Names are matched on exact word boundaries, so
    /// placeholders like `%(HOMEX)` stay untouched. Resolved values never
    /// contain placeholders, which keeps expansion idempotent.
    pub fn expand(&self, input: &str) -> String {
        let mut expanded = input.to_string();

        for (name, value) in &self.values {
            let pattern = Regex::new(&format!(r"%\(\b{name}\b\)"))
                .expect("placeholder names are valid regex fragments");
            expanded = pattern
                .replace_all(&expanded, NoExpand(value.as_str()))
                .into_owned();
        }

        expanded
    }

    /// The home directory the table was built from.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Iterate over variable names and their resolved values.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }
}
