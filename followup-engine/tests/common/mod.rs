#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use followup_core::{
    Client, Invoice, InvoiceStatus, NewNotification, NewReminder, Notification, Priority,
    Reminder, ReminderStatus, ReminderType,
};
use followup_engine::{
    ClientStore, FixedClock, InvoiceStore, MemoryStore, NotificationStore, ReminderStore,
    StoreSnapshot,
};

pub const USER: &str = "u1";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn client(id: &str, name: &str, silent_days: i64) -> Client {
    Client::new(id, USER, name, days_ago(365)).with_last_contact(days_ago(silent_days))
}

pub fn unpaid_invoice(id: &str, client_id: Option<&str>, overdue_days: i64) -> Invoice {
    let inv = Invoice::new(id, USER, 1500.0, "USD", days_ago(overdue_days), InvoiceStatus::Unpaid);
    match client_id {
        Some(c) => inv.for_client(c),
        None => inv,
    }
}

pub fn reminder(id: &str, ty: ReminderType, client_id: Option<&str>, age_days: i64) -> Reminder {
    Reminder {
        id: id.to_string(),
        user_id: USER.to_string(),
        client_id: client_id.map(str::to_string),
        invoice_id: None,
        title: format!("prior {id}"),
        message: "prior".to_string(),
        due_date: days_ago(age_days - 1),
        status: ReminderStatus::Pending,
        priority: Priority::High,
        reminder_type: ty,
        ai_suggested: false,
        created_at: days_ago(age_days),
    }
}

/// Memory store whose clock is pinned to `now()`.
pub fn memory(snapshot: StoreSnapshot) -> MemoryStore {
    MemoryStore::new(snapshot).with_clock(Arc::new(FixedClock(now())))
}

/// Acme: 20 days silent, one invoice 10 days overdue.
pub fn acme_snapshot() -> StoreSnapshot {
    StoreSnapshot {
        clients: vec![client("acme", "Acme", 20)],
        invoices: vec![unpaid_invoice("inv-1", Some("acme"), 10)],
        ..StoreSnapshot::default()
    }
}

/// Wraps a [`MemoryStore`] and fails selected calls.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_clients: bool,
    pub fail_invoices: bool,
    pub fail_reminder_reads: bool,
    /// Reminder writes whose title contains any of these fail.
    pub fail_reminder_titles: Vec<String>,
    pub fail_notifications: bool,
    /// Yield once inside reminder reads so concurrent runs interleave.
    pub yield_on_reminder_reads: bool,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ClientStore for FlakyStore {
    async fn list_clients(&self, user_id: &str) -> Result<Vec<Client>> {
        if self.fail_clients {
            bail!("clients table unavailable");
        }
        self.inner.list_clients(user_id).await
    }
}

#[async_trait]
impl InvoiceStore for FlakyStore {
    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>> {
        if self.fail_invoices {
            bail!("invoices table unavailable");
        }
        self.inner.list_invoices(user_id).await
    }
}

#[async_trait]
impl ReminderStore for FlakyStore {
    async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        if self.fail_reminder_reads {
            bail!("reminders table unavailable");
        }
        if self.yield_on_reminder_reads {
            tokio::task::yield_now().await;
        }
        self.inner.list_reminders(user_id).await
    }

    async fn create_reminder(&self, reminder: NewReminder) -> Result<Reminder> {
        if self
            .fail_reminder_titles
            .iter()
            .any(|t| reminder.title.contains(t.as_str()))
        {
            bail!("insert rejected");
        }
        self.inner.create_reminder(reminder).await
    }
}

#[async_trait]
impl NotificationStore for FlakyStore {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        if self.fail_notifications {
            bail!("notifications table unavailable");
        }
        self.inner.create_notification(notification).await
    }
}
