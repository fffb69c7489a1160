//! JSON snapshot files standing in for the hosted store.

use anyhow::{Context, Result};
use followup_core::Suggestion;
use followup_engine::StoreSnapshot;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub fn load_snapshot(path: &Path) -> Result<StoreSnapshot> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse snapshot {}", path.display()))
}

/// Write via a sibling temp file so a crash never leaves half a snapshot.
pub fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

pub fn load_suggestions(path: &Path) -> Result<Vec<Suggestion>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse suggestions {}", path.display()))
}

/// Every user owning at least one client or invoice, sorted.
pub fn user_ids(snapshot: &StoreSnapshot) -> Vec<String> {
    let ids: BTreeSet<&str> = snapshot
        .clients
        .iter()
        .map(|c| c.user_id.as_str())
        .chain(snapshot.invoices.iter().map(|i| i.user_id.as_str()))
        .collect();
    ids.into_iter().map(str::to_string).collect()
}
