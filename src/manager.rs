use anyhow::Result;
use serde::Deserialize;
use std::fmt;

use crate::prompt::{Choice, Prompt};
use crate::ui;

/// Host package managers the installer knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    Apt,
    Pacman,
    Yay,
    Brew,
}

impl Manager {
    /// Probe order for detection.
    pub const ALL: [Manager; 4] = [Manager::Apt, Manager::Pacman, Manager::Yay, Manager::Brew];

    /// Manifest identifier, doubling as the binary probed on the host.
    pub fn id(self) -> &'static str {
        match self {
            Manager::Apt => "apt",
            Manager::Pacman => "pacman",
            Manager::Yay => "yay",
            Manager::Brew => "brew",
        }
    }

    /// Shell command prefix a package name is appended to.
    pub fn install_command(self) -> &'static str {
        match self {
            Manager::Apt => "sudo apt install",
            Manager::Pacman => "sudo pacman -Sy",
            Manager::Yay => "yay -Sy",
            Manager::Brew => "brew install",
        }
    }

    /// System update/upgrade command sequence. Not part of the install flow.
    pub fn update_commands(self) -> &'static [&'static str] {
        match self {
            Manager::Apt => &["sudo apt update", "sudo apt upgrade"],
            Manager::Pacman => &["sudo pacman -Syu"],
            Manager::Yay => &["yay -Syu"],
            Manager::Brew => &["brew update", "brew upgrade"],
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Probe the host for a supported package manager.
///
/// When several are present the user picks between the two most recently
/// found candidates; with three or more, earlier winners are reduced
/// pairwise and only the final comparison survives.
pub fn detect(prompt: &dyn Prompt) -> Result<Option<Manager>> {
    detect_with(prompt, |name| which::which(name).is_ok())
}

fn detect_with<F>(prompt: &dyn Prompt, installed: F) -> Result<Option<Manager>>
where
    F: Fn(&str) -> bool,
{
    let mut found: Option<Manager> = None;

    for candidate in Manager::ALL {
        if !installed(candidate.id()) {
            continue;
        }

        found = Some(match found {
            None => candidate,
            Some(current) => {
                let choice = prompt.choose(
                    "Two package managers have been found.",
                    current.id(),
                    candidate.id(),
                )?;
                let winner = match choice {
                    Choice::First => current,
                    Choice::Second => candidate,
                };
                ui::warn(format!("Using {winner}"));
                winner
            }
        });
    }

    Ok(found)
}
