//! Per-user advisory lock for materializing runs within one process.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::EngineError;

#[derive(Debug, Default)]
pub(crate) struct RunGuards {
    active: Mutex<HashSet<String>>,
}

impl RunGuards {
    /// Claim the user's slot, failing fast if another run holds it.
    pub(crate) fn acquire(&self, user_id: &str) -> Result<RunGuard<'_>, EngineError> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(user_id.to_string()) {
            return Err(EngineError::RunInProgress {
                user_id: user_id.to_string(),
            });
        }
        Ok(RunGuard {
            guards: self,
            user_id: user_id.to_string(),
        })
    }
}

/// Releases the slot on drop.
#[derive(Debug)]
pub(crate) struct RunGuard<'a> {
    guards: &'a RunGuards,
    user_id: String,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.guards.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.user_id);
    }
}
