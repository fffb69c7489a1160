//! In-memory store backing the CLI snapshot files and the test suite.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use followup_core::{Client, Invoice, NewNotification, NewReminder, Notification, Reminder};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::store::{
    ClientStore, Clock, InvoiceStore, NotificationStore, ReminderStore, SystemClock,
};

/// Serializable contents of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
    pub reminders: Vec<Reminder>,
    pub notifications: Vec<Notification>,
}

pub struct MemoryStore {
    state: Mutex<StoreSnapshot>,
    /// Stamps `created_at` on inserted reminders.
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreSnapshot::default())
    }
}

impl MemoryStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }
}

/// One past the highest numeric suffix among `ids` carrying `prefix`.
/// Ids in any other shape are ignored, so loaded snapshots with gaps or foreign ids never collide.
fn next_id<'a>(prefix: &str, ids: impl Iterator<Item = &'a str>) -> String {
    let last = ids
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:04}", last + 1)
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn list_clients(&self, user_id: &str) -> Result<Vec<Client>> {
        let state = self.state.lock().await;
        Ok(state
            .clients
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>> {
        let state = self.state.lock().await;
        Ok(state
            .invoices
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let state = self.state.lock().await;
        Ok(state
            .reminders
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_reminder(&self, reminder: NewReminder) -> Result<Reminder> {
        if reminder.user_id.trim().is_empty() {
            anyhow::bail!("reminder user_id must be non-empty");
        }
        let mut state = self.state.lock().await;
        let id = next_id("rem-", state.reminders.iter().map(|r| r.id.as_str()));
        let stored = Reminder::from_new(id, reminder, self.clock.now());
        state.reminders.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        let mut state = self.state.lock().await;
        let id = next_id("ntf-", state.notifications.iter().map(|n| n.id.as_str()));
        let stored = Notification::from_new(id, notification);
        state.notifications.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FixedClock;
    use chrono::{TimeZone, Utc};
    use followup_core::{Priority, ReminderStatus, ReminderType};

    fn new_reminder(user: &str) -> NewReminder {
        NewReminder {
            user_id: user.to_string(),
            client_id: None,
            invoice_id: None,
            title: "Check in".to_string(),
            message: "Check in".to_string(),
            due_date: Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap(),
            status: ReminderStatus::Pending,
            priority: Priority::Medium,
            reminder_type: ReminderType::FollowUp,
            ai_suggested: true,
        }
    }

    #[tokio::test]
    async fn created_reminders_are_stamped_and_scoped() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let store = MemoryStore::default().with_clock(Arc::new(FixedClock(at)));

        let r = store.create_reminder(new_reminder("u1")).await.unwrap();
        assert_eq!(r.id, "rem-0001");
        assert_eq!(r.created_at, at);

        store.create_reminder(new_reminder("u2")).await.unwrap();
        assert_eq!(store.list_reminders("u1").await.unwrap().len(), 1);
        assert_eq!(store.snapshot().await.reminders.len(), 2);
    }

    #[tokio::test]
    async fn ids_continue_past_loaded_gaps() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let loaded = Reminder::from_new("rem-0002".to_string(), new_reminder("u1"), at);
        let store = MemoryStore::new(StoreSnapshot {
            reminders: vec![loaded],
            notifications: vec![Notification::from_new(
                "ntf-0007".to_string(),
                NewNotification::suggestions_ready("u1", 1),
            )],
            ..StoreSnapshot::default()
        })
        .with_clock(Arc::new(FixedClock(at)));

        let r = store.create_reminder(new_reminder("u1")).await.unwrap();
        assert_eq!(r.id, "rem-0003");
        let n = store
            .create_notification(NewNotification::reminder_created("u1", &r.id, &r.title))
            .await
            .unwrap();
        assert_eq!(n.id, "ntf-0008");

        let ids: Vec<String> = store.snapshot().await.reminders.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["rem-0002", "rem-0003"]);
    }

    #[test]
    fn next_id_skips_foreign_ids() {
        let ids = ["rem-0004", "imported-17", "rem-x", "ntf-0009"];
        assert_eq!(next_id("rem-", ids.into_iter()), "rem-0005");
        assert_eq!(next_id("rem-", std::iter::empty()), "rem-0001");
    }

    #[tokio::test]
    async fn rejects_blank_owner() {
        let store = MemoryStore::default();
        assert!(store.create_reminder(new_reminder(" ")).await.is_err());
    }

    #[test]
    fn snapshot_json_tolerates_missing_collections() {
        let snap: StoreSnapshot = serde_json::from_str(r#"{"clients": []}"#).unwrap();
        assert!(snap.invoices.is_empty());
        assert!(snap.notifications.is_empty());
    }
}
