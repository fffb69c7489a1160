use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `~/.followup`, overridable with `FOLLOWUP_HOME`.
pub fn followup_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FOLLOWUP_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".followup"))
}

pub fn ensure_followup_home() -> Result<PathBuf> {
    let dir = followup_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
