//! Materializer: reads a user's data, plans suggestions, and persists accepted ones.
//!
//! Three entry points:
//! - [`FollowUpEngine::suggest`]: plan only, no writes
//! - [`FollowUpEngine::create_from_suggestions`]: persist a batch, item by item
//! - [`FollowUpEngine::run_daily`]: plan, announce, auto-create the urgent tier

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use followup_core::{
    Client, EnginePolicy, Invoice, NewNotification, PlanInputs, Priority, Reminder, Suggestion,
    plan_suggestions, resolve_client, should_suppress,
};

use crate::error::{DataSource, EngineError, Entity};
use crate::run_guard::RunGuards;
use crate::store::{Clock, FollowUpStore, SystemClock};

/// Knobs for the scheduled daily run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyOptions {
    /// Persist urgent suggestions without waiting for the user.
    pub auto_create_urgent: bool,
    /// Users processed concurrently by `run_daily_for_users`.
    pub max_parallel_users: usize,
}

impl Default for DailyOptions {
    fn default() -> Self {
        Self {
            auto_create_urgent: true,
            max_parallel_users: 4,
        }
    }
}

/// One user's collections as read for a run. `None` marks a failed read.
#[derive(Debug, Clone, Default)]
pub struct UserSnapshot {
    pub clients: Option<Vec<Client>>,
    pub invoices: Option<Vec<Invoice>>,
    pub reminders: Option<Vec<Reminder>>,
    pub errors: Vec<EngineError>,
}

impl UserSnapshot {
    /// Whether dedup ran against the full reminder history.
    pub fn history_complete(&self) -> bool {
        self.reminders.is_some()
    }
}

/// Result of a plan-only run.
#[derive(Debug, Clone)]
pub struct SuggestRun {
    pub user_id: String,
    pub now: DateTime<Utc>,
    pub suggestions: Vec<Suggestion>,
    pub suppressed: usize,
    pub invalid: usize,
    pub truncated: usize,
    /// Source reads that failed; their rules contributed nothing.
    pub errors: Vec<EngineError>,
    pub history_complete: bool,
}

/// Per-item outcome of a materialization batch.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    pub attempted: usize,
    pub created: Vec<Reminder>,
    pub notified: usize,
    /// Skipped because a matching reminder already exists inside the dedup window.
    pub suppressed: Vec<Suggestion>,
    pub failures: Vec<EngineError>,
}

impl MaterializeReport {
    /// e.g. "3 of 5 reminders created"
    pub fn summary(&self) -> String {
        format!("{} of {} reminders created", self.created.len(), self.attempted)
    }
}

#[derive(Debug, Clone)]
pub struct DailyReport {
    pub run: SuggestRun,
    pub summary_notified: bool,
    /// `None` when auto-creation was disabled, skipped, or had nothing urgent.
    pub materialized: Option<MaterializeReport>,
    pub errors: Vec<EngineError>,
}

pub struct FollowUpEngine<S, K = SystemClock> {
    store: S,
    clock: K,
    policy: EnginePolicy,
    daily: DailyOptions,
    runs: RunGuards,
}

impl<S: FollowUpStore> FollowUpEngine<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: FollowUpStore, K: Clock> FollowUpEngine<S, K> {
    pub fn with_clock(store: S, clock: K) -> Self {
        Self {
            store,
            clock,
            policy: EnginePolicy::default(),
            daily: DailyOptions::default(),
            runs: RunGuards::default(),
        }
    }

    pub fn with_policy(mut self, policy: EnginePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_daily_options(mut self, daily: DailyOptions) -> Self {
        self.daily = daily;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Fan out the three reads and join them. Failures are logged and recorded.
    pub async fn load(&self, user_id: &str) -> UserSnapshot {
        let (clients, invoices, reminders) = tokio::join!(
            self.store.list_clients(user_id),
            self.store.list_invoices(user_id),
            self.store.list_reminders(user_id),
        );

        let mut errors = Vec::new();
        let clients = keep_or_record(clients, DataSource::Clients, user_id, &mut errors);
        let invoices = keep_or_record(invoices, DataSource::Invoices, user_id, &mut errors);
        let reminders = keep_or_record(reminders, DataSource::Reminders, user_id, &mut errors);

        UserSnapshot {
            clients,
            invoices,
            reminders,
            errors,
        }
    }

    /// Plan suggestions for `user_id` without writing anything.
    pub async fn suggest(&self, user_id: &str) -> SuggestRun {
        let now = self.clock.now();
        self.plan(user_id, now).await.0
    }

    async fn plan(&self, user_id: &str, now: DateTime<Utc>) -> (SuggestRun, UserSnapshot) {
        let snapshot = self.load(user_id).await;

        let plan = plan_suggestions(
            PlanInputs {
                clients: snapshot.clients.as_deref(),
                invoices: snapshot.invoices.as_deref(),
                reminders: snapshot.reminders.as_deref().unwrap_or(&[]),
            },
            now,
            &self.policy,
        );

        for s in &plan.suppressed {
            debug!(
                user_id = %user_id,
                rule = s.rule.as_str(),
                client_id = ?s.client_id,
                invoice_id = ?s.invoice_id,
                "Suppressed duplicate candidate"
            );
        }
        for (s, reason) in &plan.invalid {
            warn!(user_id = %user_id, title = %s.title, reason = %reason, "Dropped invalid candidate");
        }

        info!(
            user_id = %user_id,
            count = plan.suggestions.len(),
            suppressed = plan.suppressed.len(),
            truncated = plan.truncated,
            "Planned follow-up suggestions"
        );

        let run = SuggestRun {
            user_id: user_id.to_string(),
            now,
            suggestions: plan.suggestions,
            suppressed: plan.suppressed.len(),
            invalid: plan.invalid.len(),
            truncated: plan.truncated,
            errors: snapshot.errors.clone(),
            history_complete: snapshot.history_complete(),
        };
        (run, snapshot)
    }

    /// Persist each suggestion as a reminder plus a notification.
    ///
    /// Items fail independently; the report lists what was created, what dedup
    /// skipped, and what failed. Errors when another materializing run for the
    /// user is in progress, or when the reminder history needed for dedup cannot
    /// be read.
    pub async fn create_from_suggestions(
        &self,
        user_id: &str,
        suggestions: &[Suggestion],
    ) -> Result<MaterializeReport, EngineError> {
        let _guard = self.runs.acquire(user_id)?;
        let now = self.clock.now();

        // Client list is only needed for suggestions lacking an explicit client_id.
        let needs_clients = suggestions.iter().any(|s| s.client_id.is_none());
        let (clients, reminders) = tokio::join!(
            async {
                if needs_clients {
                    self.store.list_clients(user_id).await
                } else {
                    Ok(Vec::new())
                }
            },
            self.store.list_reminders(user_id),
        );

        let existing = reminders.map_err(|e| {
            let err = EngineError::source_read(DataSource::Reminders, &e);
            warn!(user_id = %user_id, error = %err, "Reminder history unavailable; refusing to materialize");
            err
        })?;
        let clients = clients.unwrap_or_else(|e| {
            let err = EngineError::source_read(DataSource::Clients, &e);
            warn!(user_id = %user_id, error = %err, "Client attribution unavailable");
            Vec::new()
        });

        Ok(self.materialize(user_id, suggestions, &clients, existing, now).await)
    }

    async fn materialize(
        &self,
        user_id: &str,
        suggestions: &[Suggestion],
        clients: &[Client],
        mut existing: Vec<Reminder>,
        now: DateTime<Utc>,
    ) -> MaterializeReport {
        let mut report = MaterializeReport {
            attempted: suggestions.len(),
            ..MaterializeReport::default()
        };

        for s in suggestions {
            if let Err(reason) = s.validate() {
                warn!(user_id = %user_id, title = %s.title, reason = %reason, "Skipping invalid suggestion");
                report.failures.push(EngineError::InvalidSuggestion {
                    title: s.title.clone(),
                    reason,
                });
                continue;
            }

            let attributed = Suggestion {
                client_id: resolve_client(s, clients).map(str::to_string),
                ..s.clone()
            };

            if should_suppress(&attributed, &existing, now, &self.policy) {
                debug!(
                    user_id = %user_id,
                    title = %attributed.title,
                    client_id = ?attributed.client_id,
                    "Skipping suggestion already covered by a recent reminder"
                );
                report.suppressed.push(attributed);
                continue;
            }

            let new = attributed.to_new_reminder(user_id, attributed.client_id.clone());
            let reminder = match self.store.create_reminder(new).await {
                Ok(r) => r,
                Err(e) => {
                    let err = EngineError::persistence(Entity::Reminder, &s.title, &e);
                    warn!(user_id = %user_id, error = %err, "Reminder write failed");
                    report.failures.push(err);
                    continue;
                }
            };

            let notice = NewNotification::reminder_created(user_id, &reminder.id, &reminder.title);
            match self.store.create_notification(notice).await {
                Ok(_) => report.notified += 1,
                Err(e) => {
                    let err = EngineError::persistence(Entity::Notification, &reminder.title, &e);
                    warn!(user_id = %user_id, error = %err, "Notification write failed");
                    report.failures.push(err);
                }
            }
            existing.push(reminder.clone());
            report.created.push(reminder);
        }

        info!(
            user_id = %user_id,
            created = report.created.len(),
            attempted = report.attempted,
            suppressed = report.suppressed.len(),
            failed = report.failures.len(),
            "Materialized suggestions"
        );
        report
    }

    /// Scheduled run: plan, post one summary notification, auto-create urgent items.
    pub async fn run_daily(&self, user_id: &str) -> Result<DailyReport, EngineError> {
        let _guard = self.runs.acquire(user_id)?;
        let now = self.clock.now();

        let (run, snapshot) = self.plan(user_id, now).await;
        let mut errors = Vec::new();

        let mut summary_notified = false;
        if !run.suggestions.is_empty() {
            let summary = NewNotification::suggestions_ready(user_id, run.suggestions.len());
            match self.store.create_notification(summary).await {
                Ok(_) => summary_notified = true,
                Err(e) => {
                    let err = EngineError::persistence(Entity::Notification, "suggestions ready", &e);
                    warn!(user_id = %user_id, error = %err, "Summary notification failed");
                    errors.push(err);
                }
            }
        }

        let urgent: Vec<Suggestion> = run
            .suggestions
            .iter()
            .filter(|s| s.priority == Priority::Urgent)
            .cloned()
            .collect();

        let materialized = if !self.daily.auto_create_urgent || urgent.is_empty() {
            None
        } else if !run.history_complete {
            warn!(
                user_id = %user_id,
                urgent = urgent.len(),
                "Reminder history unavailable; leaving urgent suggestions for manual review"
            );
            None
        } else {
            let clients = snapshot.clients.as_deref().unwrap_or(&[]);
            let existing = snapshot.reminders.clone().unwrap_or_default();
            Some(self.materialize(user_id, &urgent, clients, existing, now).await)
        };

        Ok(DailyReport {
            run,
            summary_notified,
            materialized,
            errors,
        })
    }

    /// Daily runs for many users with bounded parallelism. Output follows completion order.
    pub async fn run_daily_for_users(
        &self,
        user_ids: &[String],
    ) -> Vec<(String, Result<DailyReport, EngineError>)> {
        let limit = self.daily.max_parallel_users.max(1);
        stream::iter(user_ids.iter().cloned())
            .map(|user_id| async move {
                let result = self.run_daily(&user_id).await;
                (user_id, result)
            })
            .buffer_unordered(limit)
            .collect()
            .await
    }
}

fn keep_or_record<T>(
    result: anyhow::Result<Vec<T>>,
    source: DataSource,
    user_id: &str,
    errors: &mut Vec<EngineError>,
) -> Option<Vec<T>> {
    match result {
        Ok(items) => Some(items),
        Err(e) => {
            let err = EngineError::source_read(source, &e);
            warn!(user_id = %user_id, source = %source, error = %err, "Source read failed");
            errors.push(err);
            None
        }
    }
}
