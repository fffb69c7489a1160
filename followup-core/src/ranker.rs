//! Ranker/limiter: order pooled candidates and cap the output.

use crate::suggestion::Suggestion;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranked {
    pub suggestions: Vec<Suggestion>,
    /// Candidates dropped for failing validation, with the reason.
    pub invalid: Vec<(Suggestion, String)>,
    /// Valid candidates cut by the cap.
    pub truncated: usize,
}

/// Drop invalid candidates, sort by priority rank then soonest due date, keep `cap`.
///
/// The sort is stable: equal (priority, due_date) keeps discovery order.
pub fn rank_and_limit(candidates: Vec<Suggestion>, cap: usize) -> Ranked {
    let mut valid = Vec::with_capacity(candidates.len());
    let mut invalid = Vec::new();
    for c in candidates {
        match c.validate() {
            Ok(()) => valid.push(c),
            Err(reason) => invalid.push((c, reason)),
        }
    }

    valid.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.due_date.cmp(&b.due_date))
    });

    let truncated = valid.len().saturating_sub(cap);
    valid.truncate(cap);

    Ranked {
        suggestions: valid,
        invalid,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::{Priority, ReminderType};
    use crate::suggestion::SuggestionRule;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn s(title: &str, priority: Priority, due_in_days: i64) -> Suggestion {
        Suggestion {
            rule: SuggestionRule::StaleContact,
            title: title.to_string(),
            message: "m".to_string(),
            due_date: now() + Duration::days(due_in_days),
            priority,
            reminder_type: ReminderType::FollowUp,
            client_id: None,
            invoice_id: None,
        }
    }

    fn titles(r: &Ranked) -> Vec<&str> {
        r.suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn sorts_by_priority_then_due_date() {
        let out = rank_and_limit(
            vec![
                s("med-late", Priority::Medium, 3),
                s("urgent", Priority::Urgent, 5),
                s("med-early", Priority::Medium, 1),
                s("low", Priority::Low, 0),
                s("high", Priority::High, 2),
            ],
            5,
        );
        assert_eq!(titles(&out), vec!["urgent", "high", "med-early", "med-late", "low"]);
        assert_eq!(out.truncated, 0);
    }

    #[test]
    fn caps_and_keeps_discovery_order_on_ties() {
        let candidates: Vec<Suggestion> = (0..10).map(|i| s(&format!("c{i}"), Priority::High, 1)).collect();
        let out = rank_and_limit(candidates, 5);
        assert_eq!(titles(&out), vec!["c0", "c1", "c2", "c3", "c4"]);
        assert_eq!(out.truncated, 5);
    }

    #[test]
    fn drops_invalid_before_ranking() {
        let out = rank_and_limit(vec![s("", Priority::Urgent, 0), s("ok", Priority::Low, 0)], 5);
        assert_eq!(titles(&out), vec!["ok"]);
        assert_eq!(out.invalid.len(), 1);
        assert_eq!(out.invalid[0].1, "title must be non-empty");
    }
}
