use anyhow::{Context, Result};
use std::process::Command;

use crate::ui;

/// Run a shell command line, honoring dry-run by only printing it.
///
/// Returns whether the command exited successfully; spawn failures are
/// errors, non-zero exits are reported and left to the caller to judge.
pub fn run_shell(cmd: &str, dry_run: bool) -> Result<bool> {
    ui::status("Running", cmd);

    if dry_run {
        return Ok(true);
    }

    let status = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .status()
        .with_context(|| format!("Failed to launch '{cmd}'"))?;

    if !status.success() {
        ui::error(format!("Command '{cmd}' exited with {status}"));
        return Ok(false);
    }

    Ok(true)
}
