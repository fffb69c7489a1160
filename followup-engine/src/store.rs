//! Collaborator seams: data access and the time source.
//!
//! Implementations own retries and timeouts; the engine calls each method once.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use followup_core::{Client, Invoice, NewNotification, NewReminder, Notification, Reminder};

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Every client the user owns, in any status and any order.
    async fn list_clients(&self, user_id: &str) -> Result<Vec<Client>>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>>;
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>>;
    async fn create_reminder(&self, reminder: NewReminder) -> Result<Reminder>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
}

/// A store handle that serves all four collections, e.g. one database pool.
pub trait FollowUpStore: ClientStore + InvoiceStore + ReminderStore + NotificationStore {}

impl<T> FollowUpStore for T where T: ClientStore + InvoiceStore + ReminderStore + NotificationStore {}

/// Injectable time source. Read once per run.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
