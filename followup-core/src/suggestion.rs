//! Suggestions: ephemeral, not-yet-persisted reminder proposals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::EnginePolicy;
use crate::reminders::{NewReminder, Priority, ReminderStatus, ReminderType};

/// Which rule produced a suggestion. Drives the dedup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionRule {
    OverduePayment,
    DueSoonPayment,
    StaleContact,
    /// Supplied by a caller rather than an extractor.
    Manual,
}

impl SuggestionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionRule::OverduePayment => "overdue_payment",
            SuggestionRule::DueSoonPayment => "due_soon_payment",
            SuggestionRule::StaleContact => "stale_contact",
            SuggestionRule::Manual => "manual",
        }
    }

    /// Trailing dedup window for candidates of this rule.
    pub fn dedup_window_days(&self, policy: &EnginePolicy) -> i64 {
        match self {
            SuggestionRule::OverduePayment | SuggestionRule::Manual => policy.overdue_dedup_days,
            SuggestionRule::DueSoonPayment => policy.due_soon_dedup_days,
            SuggestionRule::StaleContact => policy.follow_up_dedup_days,
        }
    }
}

fn manual_rule() -> SuggestionRule {
    SuggestionRule::Manual
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default = "manual_rule")]
    pub rule: SuggestionRule,
    pub title: String,
    pub message: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub reminder_type: ReminderType,
    /// Client the originating extractor was looking at
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
}

impl Suggestion {
    /// Minimal invariants before a suggestion may be ranked or persisted.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must be non-empty".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("message must be non-empty".to_string());
        }
        if self.client_id.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err("client_id must be non-empty when set".to_string());
        }
        Ok(())
    }

    /// Insert payload for this suggestion, attributed to `client_id`.
    pub fn to_new_reminder(&self, user_id: &str, client_id: Option<String>) -> NewReminder {
        NewReminder {
            user_id: user_id.to_string(),
            client_id,
            invoice_id: self.invoice_id.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            due_date: self.due_date,
            status: ReminderStatus::Pending,
            priority: self.priority,
            reminder_type: self.reminder_type,
            ai_suggested: true,
        }
    }
}
