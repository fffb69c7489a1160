use std::fmt;

/// Upstream collection a read was issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Clients,
    Invoices,
    Reminders,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataSource::Clients => "clients",
            DataSource::Invoices => "invoices",
            DataSource::Reminders => "reminders",
        })
    }
}

/// Entity a write was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Reminder,
    Notification,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Reminder => "reminder",
            Entity::Notification => "notification",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Failed to read {data_source}: {message}")]
    SourceRead {
        data_source: DataSource,
        message: String,
    },

    #[error("Failed to persist {entity} '{title}': {message}")]
    Persistence {
        entity: Entity,
        title: String,
        message: String,
    },

    #[error("Invalid suggestion '{title}': {reason}")]
    InvalidSuggestion { title: String, reason: String },

    #[error("A materialization run is already in progress for user '{user_id}'")]
    RunInProgress { user_id: String },
}

impl EngineError {
    pub(crate) fn source_read(data_source: DataSource, err: &anyhow::Error) -> Self {
        EngineError::SourceRead {
            data_source,
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn persistence(entity: Entity, title: &str, err: &anyhow::Error) -> Self {
        EngineError::Persistence {
            entity,
            title: title.to_string(),
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_source_read() {
        let err = EngineError::source_read(DataSource::Invoices, &anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "Failed to read invoices: connection reset");
    }

    #[test]
    fn test_display_persistence() {
        let err = EngineError::Persistence {
            entity: Entity::Reminder,
            title: "Check in with Acme".into(),
            message: "unique violation".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to persist reminder 'Check in with Acme': unique violation"
        );
    }

    #[test]
    fn test_display_run_in_progress() {
        let err = EngineError::RunInProgress { user_id: "u1".into() };
        assert_eq!(
            err.to_string(),
            "A materialization run is already in progress for user 'u1'"
        );
    }
}
