//! Suggestion planner: extractors -> dedup -> arbiter -> ranker in one pure pass.

use chrono::{DateTime, Utc};

use crate::model::{Client, Invoice};
use crate::policy::EnginePolicy;
use crate::ranker::rank_and_limit;
use crate::reminders::Reminder;
use crate::signals::{Extraction, extract_payment_signals, extract_stale_contacts};
use crate::suggestion::Suggestion;

/// One snapshot of a user's data. `None` marks a source that could not be read;
/// the rules depending on it contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanInputs<'a> {
    pub clients: Option<&'a [Client]>,
    pub invoices: Option<&'a [Invoice]>,
    pub reminders: &'a [Reminder],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionPlan {
    /// Ranked and capped.
    pub suggestions: Vec<Suggestion>,
    pub suppressed: Vec<Suggestion>,
    pub invalid: Vec<(Suggestion, String)>,
    pub truncated: usize,
}

/// Produce the ranked suggestion list for one user at `now`.
///
/// Deterministic for a fixed `now` and input snapshot.
pub fn plan_suggestions(
    inputs: PlanInputs<'_>,
    now: DateTime<Utc>,
    policy: &EnginePolicy,
) -> SuggestionPlan {
    let clients = inputs.clients.unwrap_or(&[]);
    let mut pooled = Extraction::default();

    if let Some(invoices) = inputs.invoices {
        pooled.merge(extract_payment_signals(
            invoices,
            clients,
            inputs.reminders,
            now,
            policy,
        ));
    }
    if inputs.clients.is_some() {
        pooled.merge(extract_stale_contacts(clients, inputs.reminders, now, policy));
    }

    let ranked = rank_and_limit(pooled.candidates, policy.max_suggestions);

    SuggestionPlan {
        suggestions: ranked.suggestions,
        suppressed: pooled.suppressed,
        invalid: ranked.invalid,
        truncated: ranked.truncated,
    }
}
