use thiserror::Error;

/// Crate-wide result alias.
pub type PortalResult<T> = std::result::Result<T, PortalError>;

/// Errors surfaced by the record layer.
///
/// Validation and conflict errors are raised before anything is written;
/// the record in question is never persisted. `Database` wraps whatever the
/// storage engine reports, including unique-index violations that slip past
/// the pre-checks under concurrent writers.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{entity} not found ({lookup})")]
    NotFound {
        entity: &'static str,
        lookup: String,
    },

    #[error("{entity} already exists ({constraint})")]
    Conflict {
        entity: &'static str,
        constraint: String,
    },

    #[error("invalid {entity}: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },

    #[error("exam mark scheme misconfigured: {message}")]
    MarkScheme { message: String },

    #[error("missing configuration: {component} requires {required}")]
    MissingConfiguration {
        component: &'static str,
        required: &'static str,
    },

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl PortalError {
    pub fn not_found(entity: &'static str, lookup: impl Into<String>) -> Self {
        PortalError::NotFound {
            entity,
            lookup: lookup.into(),
        }
    }

    pub fn conflict(entity: &'static str, constraint: impl Into<String>) -> Self {
        PortalError::Conflict {
            entity,
            constraint: constraint.into(),
        }
    }

    pub fn validation(entity: &'static str, message: impl Into<String>) -> Self {
        PortalError::Validation {
            entity,
            message: message.into(),
        }
    }
}
