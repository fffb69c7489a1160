//! Tunable thresholds for the suggestion engine.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Upper bound for any day-valued threshold (about a century).
pub const MAX_POLICY_DAYS: i64 = 36_500;

/// Windows, thresholds and caps used by every rule. Days throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    /// Trailing window in which a prior payment reminder suppresses an overdue candidate.
    pub overdue_dedup_days: i64,
    /// Overdue by more than this escalates to urgent.
    pub urgent_overdue_after_days: i64,
    /// How far back a due date may lie and still count as "due soon".
    pub due_soon_window_days: i64,
    pub due_soon_dedup_days: i64,
    /// Silence longer than this makes an active client stale.
    pub stale_after_days: i64,
    /// Silence longer than this escalates a stale client to high.
    pub stale_high_after_days: i64,
    pub follow_up_dedup_days: i64,
    /// Offset from `now` at which new overdue and follow-up reminders fire.
    pub follow_up_lead_days: i64,
    /// Upper bound on suggestions returned by one run.
    pub max_suggestions: usize,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            overdue_dedup_days: 7,
            urgent_overdue_after_days: 7,
            due_soon_window_days: 3,
            due_soon_dedup_days: 3,
            stale_after_days: 14,
            stale_high_after_days: 30,
            follow_up_dedup_days: 7,
            follow_up_lead_days: 1,
            max_suggestions: 5,
        }
    }
}

impl EnginePolicy {
    /// Reject thresholds outside `0..=MAX_POLICY_DAYS`.
    pub fn validate(&self) -> Result<()> {
        let days = [
            ("overdue_dedup_days", self.overdue_dedup_days),
            ("urgent_overdue_after_days", self.urgent_overdue_after_days),
            ("due_soon_window_days", self.due_soon_window_days),
            ("due_soon_dedup_days", self.due_soon_dedup_days),
            ("stale_after_days", self.stale_after_days),
            ("stale_high_after_days", self.stale_high_after_days),
            ("follow_up_dedup_days", self.follow_up_dedup_days),
            ("follow_up_lead_days", self.follow_up_lead_days),
        ];
        for (name, value) in days {
            if !(0..=MAX_POLICY_DAYS).contains(&value) {
                bail!("{name} = {value} is outside 0..={MAX_POLICY_DAYS}");
            }
        }
        Ok(())
    }
}
