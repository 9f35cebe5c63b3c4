use crate::types::DbId;

/// Local rejections raised by the workflow before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Stale response for prospect fetch {ticket}")]
    StaleResponse { ticket: u64 },
}

/// Outcome of a failed call to the owner API, as seen by the workflow.
///
/// The HTTP layer converts its own error type into this so that `core`
/// stays free of transport dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The API answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The call never produced a usable response (network, timeout, decode).
    Transport(String),
}
