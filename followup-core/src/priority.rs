//! Priority arbiter: severity in days -> priority level.
//!
//! | Rule             | Condition             | Priority |
//! |------------------|-----------------------|----------|
//! | overdue-payment  | overdue > 7 days      | urgent   |
//! | overdue-payment  | overdue <= 7 days     | high     |
//! | due-soon-payment | due within 3 days     | medium   |
//! | stale-contact    | silent > 30 days      | high     |
//! | stale-contact    | silent 15-30 days     | medium   |
//!
//! Day thresholds come from [`EnginePolicy`]; the table shows the defaults.

use crate::policy::EnginePolicy;
use crate::reminders::Priority;
use crate::suggestion::SuggestionRule;

/// Map a rule and its severity (days overdue, or days silent) to a priority.
pub fn arbitrate(rule: SuggestionRule, severity_days: i64, policy: &EnginePolicy) -> Priority {
    match rule {
        SuggestionRule::OverduePayment => {
            if severity_days > policy.urgent_overdue_after_days {
                Priority::Urgent
            } else {
                Priority::High
            }
        }
        SuggestionRule::DueSoonPayment => Priority::Medium,
        SuggestionRule::StaleContact => {
            if severity_days > policy.stale_high_after_days {
                Priority::High
            } else {
                Priority::Medium
            }
        }
        SuggestionRule::Manual => Priority::Low,
    }
}
