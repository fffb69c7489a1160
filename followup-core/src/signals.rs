//! Signal extractors: scan invoices and clients for follow-up worthy observations.
//!
//! Each rule is a pure function from one record to at most one candidate; the
//! `extract_*` drivers apply the dedup guard against existing reminders.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::dedup::should_suppress;
use crate::model::{Client, ClientStatus, Invoice};
use crate::policy::EnginePolicy;
use crate::priority::arbitrate;
use crate::reminders::{Reminder, ReminderType};
use crate::suggestion::{Suggestion, SuggestionRule};
use crate::time::days_between;

/// Output of one extractor pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub candidates: Vec<Suggestion>,
    /// Candidates dropped by the dedup guard.
    pub suppressed: Vec<Suggestion>,
}

impl Extraction {
    /// Record a candidate, or file it as suppressed when dedup says so.
    fn push(
        &mut self,
        candidate: Suggestion,
        reminders: &[Reminder],
        now: DateTime<Utc>,
        policy: &EnginePolicy,
    ) {
        if should_suppress(&candidate, reminders, now, policy) {
            self.suppressed.push(candidate);
        } else {
            self.candidates.push(candidate);
        }
    }

    pub fn merge(&mut self, other: Extraction) {
        self.candidates.extend(other.candidates);
        self.suppressed.extend(other.suppressed);
    }
}

/// Overdue-payment rule: outstanding invoice whose due date is strictly before `now`.
pub fn overdue_payment_candidate(
    invoice: &Invoice,
    client_name: Option<&str>,
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> Option<Suggestion> {
    if !invoice.status.is_outstanding() || invoice.due_date >= now {
        return None;
    }

    let days_overdue = days_between(invoice.due_date, now);
    let rule = SuggestionRule::OverduePayment;
    let who = client_name.unwrap_or("the client");

    Some(Suggestion {
        rule,
        title: match client_name {
            Some(name) => format!("Payment overdue: {} ({})", invoice.label(), name),
            None => format!("Payment overdue: {}", invoice.label()),
        },
        message: format!(
            "Invoice {} for {:.2} {} is {} days overdue. Follow up with {} about payment.",
            invoice.label(),
            invoice.amount,
            invoice.currency,
            days_overdue,
            who
        ),
        due_date: now + Duration::days(policy.follow_up_lead_days),
        priority: arbitrate(rule, days_overdue, policy),
        reminder_type: ReminderType::Payment,
        client_id: invoice.client_id.clone(),
        invoice_id: Some(invoice.id.clone()),
    })
}

/// Due-soon-payment rule: outstanding invoice due within the trailing window up to `now` inclusive.
pub fn due_soon_payment_candidate(
    invoice: &Invoice,
    client_name: Option<&str>,
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> Option<Suggestion> {
    if !invoice.status.is_outstanding() {
        return None;
    }
    let window_start = now - Duration::days(policy.due_soon_window_days);
    if invoice.due_date < window_start || invoice.due_date > now {
        return None;
    }

    let rule = SuggestionRule::DueSoonPayment;
    let who = client_name.unwrap_or("the client");

    Some(Suggestion {
        rule,
        title: format!("Payment due: {}", invoice.label()),
        message: format!(
            "Invoice {} for {:.2} {} came due on {}. Confirm payment with {}.",
            invoice.label(),
            invoice.amount,
            invoice.currency,
            invoice.due_date.format("%Y-%m-%d"),
            who
        ),
        due_date: invoice.due_date,
        priority: arbitrate(rule, days_between(invoice.due_date, now), policy),
        reminder_type: ReminderType::Payment,
        client_id: invoice.client_id.clone(),
        invoice_id: Some(invoice.id.clone()),
    })
}

/// Stale-contact rule: active client silent for longer than the stale threshold.
pub fn stale_contact_candidate(
    client: &Client,
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> Option<Suggestion> {
    if client.status != ClientStatus::Active {
        return None;
    }

    let days_silent = days_between(client.contact_anchor(), now);
    if days_silent <= policy.stale_after_days {
        return None;
    }

    let rule = SuggestionRule::StaleContact;
    Some(Suggestion {
        rule,
        title: format!("Check in with {}", client.name),
        message: format!(
            "No contact with {} in {} days. Send a quick follow-up.",
            client.name, days_silent
        ),
        due_date: now + Duration::days(policy.follow_up_lead_days),
        priority: arbitrate(rule, days_silent, policy),
        reminder_type: ReminderType::FollowUp,
        client_id: Some(client.id.clone()),
        invoice_id: None,
    })
}

/// Run both payment rules over every invoice.
///
/// An invoice the overdue rule fires for is overdue-handled and skips the
/// due-soon rule, whether or not dedup then suppressed the overdue candidate.
pub fn extract_payment_signals(
    invoices: &[Invoice],
    clients: &[Client],
    reminders: &[Reminder],
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> Extraction {
    let names: HashMap<&str, &str> = clients
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut out = Extraction::default();
    for invoice in invoices {
        let client_name = invoice
            .client_id
            .as_deref()
            .and_then(|id| names.get(id).copied());

        if let Some(c) = overdue_payment_candidate(invoice, client_name, now, policy) {
            out.push(c, reminders, now, policy);
            continue;
        }

        if let Some(c) = due_soon_payment_candidate(invoice, client_name, now, policy) {
            out.push(c, reminders, now, policy);
        }
    }
    out
}

/// Run the stale-contact rule over every client, in input order.
pub fn extract_stale_contacts(
    clients: &[Client],
    reminders: &[Reminder],
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> Extraction {
    let mut out = Extraction::default();
    for client in clients {
        if let Some(c) = stale_contact_candidate(client, now, policy) {
            out.push(c, reminders, now, policy);
        }
    }
    out
}
