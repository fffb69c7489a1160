//! followup-core: pure decision logic for the follow-up suggestion engine.
//!
//! Everything here takes an explicit `now`; no function reads the clock.

pub mod dedup;
pub mod model;
pub mod notification;
pub mod planner;
pub mod policy;
pub mod priority;
pub mod ranker;
pub mod reminders;
pub mod signals;
pub mod suggestion;
pub mod time;

pub use dedup::should_suppress;
pub use model::{Client, ClientStatus, Invoice, InvoiceStatus};
pub use notification::{EntityLink, NewNotification, Notification, NotificationKind};
pub use planner::{PlanInputs, SuggestionPlan, plan_suggestions};
pub use policy::EnginePolicy;
pub use priority::arbitrate;
pub use ranker::{Ranked, rank_and_limit};
pub use reminders::{NewReminder, Priority, Reminder, ReminderStatus, ReminderType};
pub use signals::{
    Extraction, due_soon_payment_candidate, extract_payment_signals, extract_stale_contacts,
    overdue_payment_candidate, stale_contact_candidate,
};
pub use suggestion::{Suggestion, SuggestionRule};
pub use time::{days_between, is_within_trailing_window, parse_local_to_utc};

/// Client attribution for suggestions that arrive without a `client_id`.
pub mod attribution {
    use super::{Client, Suggestion};
    use regex::RegexBuilder;

    /// Id of the client a suggestion refers to.
    ///
    /// An explicit `client_id` is taken as given, whether or not it appears in
    /// `clients`. Otherwise the first client whose display name appears as a whole
    /// word (case-insensitive) in the title or message is used. Best effort:
    /// overlapping names resolve to the earliest match in `clients` order.
    pub fn resolve_client<'a>(suggestion: &'a Suggestion, clients: &'a [Client]) -> Option<&'a str> {
        if let Some(id) = suggestion.client_id.as_deref() {
            return Some(id);
        }

        clients
            .iter()
            .find(|c| {
                let name = c.name.trim();
                if name.is_empty() {
                    return false;
                }
                let pattern = format!(r"\b{}\b", regex::escape(name));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => re.is_match(&suggestion.title) || re.is_match(&suggestion.message),
                    Err(_) => false,
                }
            })
            .map(|c| c.id.as_str())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::reminders::{Priority, ReminderType};
        use crate::suggestion::SuggestionRule;
        use chrono::{TimeZone, Utc};

        fn clients() -> Vec<Client> {
            let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            vec![
                Client::new("c1", "u1", "Acme", t),
                Client::new("c2", "u1", "Acme Labs", t),
                Client::new("c3", "u1", "Globex", t),
            ]
        }

        fn suggestion(title: &str, client_id: Option<&str>) -> Suggestion {
            Suggestion {
                rule: SuggestionRule::Manual,
                title: title.to_string(),
                message: "Follow up soon.".to_string(),
                due_date: Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap(),
                priority: Priority::Medium,
                reminder_type: ReminderType::FollowUp,
                client_id: client_id.map(str::to_string),
                invoice_id: None,
            }
        }

        #[test]
        fn explicit_client_id_wins_over_text() {
            let cs = clients();
            let s = suggestion("Check in with Globex", Some("c2"));
            assert_eq!(resolve_client(&s, &cs), Some("c2"));
        }

        #[test]
        fn explicit_client_id_is_kept_even_when_unlisted() {
            let s = suggestion("Check in with Globex", Some("archived-client"));
            assert_eq!(resolve_client(&s, &[]), Some("archived-client"));
            assert_eq!(resolve_client(&s, &clients()), Some("archived-client"));
        }

        #[test]
        fn name_match_is_whole_word_and_case_insensitive() {
            let cs = clients();
            let s = suggestion("check in with GLOBEX", None);
            assert_eq!(resolve_client(&s, &cs), Some("c3"));
            assert!(resolve_client(&suggestion("Globexcorp renewal", None), &cs).is_none());
        }

        #[test]
        fn overlapping_names_take_first_listed() {
            let cs = clients();
            let s = suggestion("Invoice for Acme Labs", None);
            assert_eq!(resolve_client(&s, &cs), Some("c1"));
        }
    }
}

pub use attribution::resolve_client;
