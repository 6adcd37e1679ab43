use std::sync::Arc;

use thiserror::Error;

use crate::gateway::GatewayError;

/// Error kinds surfaced by domain operations.
///
/// Transport adapters translate these into status codes; the domain never does.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("field {field} is invalid: {details}")]
    BadRequest { field: String, details: String },

    /// Storage failure. The source is kept for logs only.
    #[error("{context}")]
    Internal {
        context: String,
        #[source]
        source: Arc<GatewayError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    BadRequest,
    Internal,
}

impl DomainError {
    pub fn not_found(details: impl Into<String>) -> Self {
        Self::NotFound(details.into())
    }

    pub fn already_exists(details: impl Into<String>) -> Self {
        Self::AlreadyExists(details.into())
    }

    pub fn bad_request(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            field: field.into(),
            details: details.into(),
        }
    }

    pub fn internal(context: impl Into<String>, source: GatewayError) -> Self {
        Self::Internal {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

impl PartialEq for DomainError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (
                Self::BadRequest { field, details },
                Self::BadRequest {
                    field: other_field,
                    details: other_details,
                },
            ) => field == other_field && details == other_details,
            // Causes are not comparable; the same recorded failure is.
            (
                Self::Internal { context, source },
                Self::Internal {
                    context: other_context,
                    source: other_source,
                },
            ) => context == other_context && Arc::ptr_eq(source, other_source),
            _ => false,
        }
    }
}

impl Eq for DomainError {}
