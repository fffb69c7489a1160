//! Deduplicator: suppress candidates already covered by a recent reminder.

use chrono::{DateTime, Utc};

use crate::policy::EnginePolicy;
use crate::reminders::Reminder;
use crate::suggestion::Suggestion;
use crate::time::is_within_trailing_window;

/// True iff an existing reminder of the same type and scope was created inside
/// the candidate rule's trailing window.
///
/// Scope: same `client_id` when the candidate has one. A candidate without a
/// client is matched on `invoice_id` instead; with neither it is never suppressed.
/// Reminder status is ignored.
pub fn should_suppress(
    candidate: &Suggestion,
    existing: &[Reminder],
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> bool {
    let window = candidate.rule.dedup_window_days(policy);
    existing.iter().any(|r| {
        r.reminder_type == candidate.reminder_type
            && same_scope(candidate, r)
            && is_within_trailing_window(r.created_at, now, window)
    })
}

fn same_scope(candidate: &Suggestion, r: &Reminder) -> bool {
    match (&candidate.client_id, &candidate.invoice_id) {
        (Some(client), _) => r.client_id.as_deref() == Some(client.as_str()),
        (None, Some(invoice)) => r.invoice_id.as_deref() == Some(invoice.as_str()),
        (None, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::{Priority, ReminderStatus, ReminderType};
    use crate::suggestion::SuggestionRule;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn candidate(rule: SuggestionRule, ty: ReminderType, client: Option<&str>) -> Suggestion {
        Suggestion {
            rule,
            title: "t".to_string(),
            message: "m".to_string(),
            due_date: now() + Duration::days(1),
            priority: Priority::High,
            reminder_type: ty,
            client_id: client.map(str::to_string),
            invoice_id: None,
        }
    }

    fn reminder(ty: ReminderType, client: Option<&str>, age_days: i64) -> Reminder {
        Reminder {
            id: format!("r-{age_days}"),
            user_id: "u1".to_string(),
            client_id: client.map(str::to_string),
            invoice_id: None,
            title: "prior".to_string(),
            message: "prior".to_string(),
            due_date: now(),
            status: ReminderStatus::Completed,
            priority: Priority::High,
            reminder_type: ty,
            ai_suggested: true,
            created_at: now() - Duration::days(age_days),
        }
    }

    #[test]
    fn recent_same_type_same_client_suppresses() {
        let p = EnginePolicy::default();
        let c = candidate(SuggestionRule::OverduePayment, ReminderType::Payment, Some("acme"));
        let existing = vec![reminder(ReminderType::Payment, Some("acme"), 2)];
        assert!(should_suppress(&c, &existing, now(), &p));
    }

    #[test]
    fn other_client_or_type_does_not_suppress() {
        let p = EnginePolicy::default();
        let c = candidate(SuggestionRule::OverduePayment, ReminderType::Payment, Some("acme"));
        let existing = vec![
            reminder(ReminderType::Payment, Some("globex"), 1),
            reminder(ReminderType::FollowUp, Some("acme"), 1),
            reminder(ReminderType::Payment, None, 1),
        ];
        assert!(!should_suppress(&c, &existing, now(), &p));
    }

    #[test]
    fn window_depends_on_rule() {
        let p = EnginePolicy::default();
        let existing = vec![reminder(ReminderType::Payment, Some("acme"), 5)];

        let overdue = candidate(SuggestionRule::OverduePayment, ReminderType::Payment, Some("acme"));
        assert!(should_suppress(&overdue, &existing, now(), &p));

        let due_soon = candidate(SuggestionRule::DueSoonPayment, ReminderType::Payment, Some("acme"));
        assert!(!should_suppress(&due_soon, &existing, now(), &p));
    }

    #[test]
    fn old_reminders_expire() {
        let p = EnginePolicy::default();
        let c = candidate(SuggestionRule::StaleContact, ReminderType::FollowUp, Some("acme"));
        let existing = vec![reminder(ReminderType::FollowUp, Some("acme"), 8)];
        assert!(!should_suppress(&c, &existing, now(), &p));
    }

    #[test]
    fn unattributed_candidates_match_on_invoice() {
        let p = EnginePolicy::default();
        let mut c = candidate(SuggestionRule::OverduePayment, ReminderType::Payment, None);
        let mut prior = reminder(ReminderType::Payment, None, 1);
        assert!(!should_suppress(&c, std::slice::from_ref(&prior), now(), &p));

        c.invoice_id = Some("inv-7".to_string());
        prior.invoice_id = Some("inv-7".to_string());
        assert!(should_suppress(&c, &[prior], now(), &p));
    }

    #[test]
    fn predicate_is_pure() {
        let p = EnginePolicy::default();
        let c = candidate(SuggestionRule::OverduePayment, ReminderType::Payment, Some("acme"));
        let existing = vec![reminder(ReminderType::Payment, Some("acme"), 2)];
        let first = should_suppress(&c, &existing, now(), &p);
        let second = should_suppress(&c, &existing, now(), &p);
        assert_eq!(first, second);
    }
}
