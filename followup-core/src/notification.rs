//! User-facing notifications emitted as a side effect of materialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReminderCreated,
    SuggestionsReady,
}

/// Pointer to the entity a notification is about (e.g. "reminder:<id>").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub entity: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub link: Option<EntityLink>,
}

/// Insert payload for the notification store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<EntityLink>,
}

impl NewNotification {
    pub fn reminder_created(user_id: &str, reminder_id: &str, reminder_title: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            title: "Reminder created".to_string(),
            message: format!("Suggested reminder added: {reminder_title}"),
            kind: NotificationKind::ReminderCreated,
            link: Some(EntityLink {
                entity: "reminder".to_string(),
                id: reminder_id.to_string(),
            }),
        }
    }

    pub fn suggestions_ready(user_id: &str, count: usize) -> Self {
        let noun = if count == 1 { "suggestion" } else { "suggestions" };
        Self {
            user_id: user_id.to_string(),
            title: "Follow-up suggestions".to_string(),
            message: format!("{count} {noun} ready"),
            kind: NotificationKind::SuggestionsReady,
            link: None,
        }
    }
}

impl Notification {
    pub fn from_new(id: impl Into<String>, new: NewNotification) -> Self {
        Self {
            id: id.into(),
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            link: new.link,
        }
    }
}
