//! Operator-facing banner text.

use crate::error::RemoteFailure;
use crate::types::DbId;

pub fn pending_failed(failure: &RemoteFailure) -> String {
    match failure {
        RemoteFailure::Status { status, .. } => {
            format!("HTTP error fetching pending requests: {status}")
        }
        RemoteFailure::Transport(detail) => format!("Error fetching pending requests: {detail}"),
    }
}

pub fn approve_failed(request_id: DbId, failure: &RemoteFailure) -> String {
    with_failure(&format!("Approval of request {request_id} failed"), failure)
}

pub fn prospects_failed(request_id: DbId, failure: &RemoteFailure) -> String {
    match failure {
        RemoteFailure::Status { .. } => with_failure(
            &format!("HTTP error fetching assignment prospects for request {request_id}"),
            failure,
        ),
        RemoteFailure::Transport(_) => with_failure(
            &format!("Error fetching assignment prospects for request {request_id}"),
            failure,
        ),
    }
}

pub fn assign_failed(request_id: DbId, artist_id: DbId, failure: &RemoteFailure) -> String {
    with_failure(
        &format!("Assignment of artist {artist_id} to request {request_id} failed"),
        failure,
    )
}

pub fn approved(request_id: DbId) -> String {
    format!("Request {request_id} approved. Showing assignment prospects.")
}

pub fn assigned(request_id: DbId, artist_id: DbId) -> String {
    format!("Artist {artist_id} assigned to request {request_id}.")
}

fn with_failure(prefix: &str, failure: &RemoteFailure) -> String {
    match failure {
        RemoteFailure::Status { status, body } => format!("{prefix}: {status} - {body}"),
        RemoteFailure::Transport(detail) => format!("{prefix}: {detail}"),
    }
}
