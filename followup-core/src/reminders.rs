//! Reminder records: what the engine reads for dedup and writes on materialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// Sort rank; lower sorts first.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    FollowUp,
    Payment,
    ProjectDeadline,
    Custom,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::FollowUp => "follow_up",
            ReminderType::Payment => "payment",
            ReminderType::ProjectDeadline => "project_deadline",
            ReminderType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[serde(alias = "active")]
    Pending,
    Completed,
    Cancelled,
}

/// A persisted reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Invoice the reminder chases, when the store tracks it
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub title: String,
    pub message: String,
    /// When the reminder should fire
    pub due_date: DateTime<Utc>,
    pub status: ReminderStatus,
    pub priority: Priority,
    pub reminder_type: ReminderType,
    #[serde(default)]
    pub ai_suggested: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Build a stored reminder from an insert payload; used by store implementations.
    pub fn from_new(id: impl Into<String>, new: NewReminder, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: new.user_id,
            client_id: new.client_id,
            invoice_id: new.invoice_id,
            title: new.title,
            message: new.message,
            due_date: new.due_date,
            status: new.status,
            priority: new.priority,
            reminder_type: new.reminder_type,
            ai_suggested: new.ai_suggested,
            created_at,
        }
    }
}

/// Insert payload handed to the reminder store. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReminder {
    pub user_id: String,
    pub client_id: Option<String>,
    pub invoice_id: Option<String>,
    pub title: String,
    pub message: String,
    pub due_date: DateTime<Utc>,
    pub status: ReminderStatus,
    pub priority: Priority,
    pub reminder_type: ReminderType,
    pub ai_suggested: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_urgent_first() {
        let mut ps = vec![Priority::Low, Priority::Urgent, Priority::Medium, Priority::High];
        ps.sort();
        assert_eq!(ps, vec![Priority::Urgent, Priority::High, Priority::Medium, Priority::Low]);
        assert_eq!(Priority::Urgent.rank(), 0);
        assert_eq!(Priority::Low.rank(), 3);
    }

    #[test]
    fn status_accepts_active_alias() {
        let s: ReminderStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(s, ReminderStatus::Pending);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"pending\"");
    }

    #[test]
    fn reminder_type_wire_names() {
        let json = serde_json::to_string(&ReminderType::FollowUp).unwrap();
        assert_eq!(json, "\"follow_up\"");
        let back: ReminderType = serde_json::from_str("\"project_deadline\"").unwrap();
        assert_eq!(back, ReminderType::ProjectDeadline);
        assert_eq!(ReminderType::Payment.as_str(), "payment");
    }
}
