//! Client and invoice records as read from the surrounding application's store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a client. Only `Active` clients are chased for contact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Archived,
}

/// A client owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: String,
    pub user_id: String,
    /// Display name
    pub name: String,
    pub status: ClientStatus,
    /// Last time the user was in touch; falls back to `created_at` when unset
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            status: ClientStatus::Active,
            last_contact: None,
            created_at,
        }
    }

    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_last_contact(mut self, last_contact: DateTime<Utc>) -> Self {
        self.last_contact = Some(last_contact);
        self
    }

    /// The instant contact staleness is measured from.
    pub fn contact_anchor(&self) -> DateTime<Utc> {
        self.last_contact.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Pending,
    Unpaid,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// Money is still owed on the invoice.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InvoiceStatus::Unpaid | InvoiceStatus::Pending)
    }
}

/// An invoice, optionally attributed to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Human-facing number such as "INV-0042"
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub due_date: DateTime<Utc>,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        due_date: DateTime<Utc>,
        status: InvoiceStatus,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            client_id: None,
            invoice_number: None,
            amount,
            currency: currency.into(),
            due_date,
            status,
        }
    }

    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    /// Label used in suggestion text: the invoice number, else the id.
    pub fn label(&self) -> &str {
        self.invoice_number.as_deref().unwrap_or(&self.id)
    }
}
