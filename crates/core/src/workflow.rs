//! Operator workflow state machine.
//!
//! The workflow is a single [`Phase`] plus the local pending list and the
//! last success message. Operator actions and API responses are the only
//! inputs; every network call a transition wants is returned as an
//! [`Effect`] for the caller to execute. Nothing here performs I/O.
//!
//! ```text
//! LoadingPending -> PendingList -> Approving -> FetchingProspects
//!                                                 |-> ProspectList -> Assigning -> ApprovedDetail
//!                                                 '-> ApprovedDetail (no prospects)
//! any failure -> Error;  view_other_requests() -> LoadingPending
//! ```

use crate::error::{CoreError, RemoteFailure};
use crate::messages;
use crate::models::{AssignmentProspect, ServiceRequest};
use crate::types::{DbId, Ticket};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// An approved request together with the prospects fetched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Approved {
    pub request: ServiceRequest,
    pub prospects: Vec<AssignmentProspect>,
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Pending-list fetch in flight.
    LoadingPending,
    /// Pending requests are shown and can be approved.
    PendingList,
    /// Approve call in flight.
    Approving { request: ServiceRequest },
    /// Request approved; prospect fetch `ticket` in flight.
    FetchingProspects { request: ServiceRequest, ticket: Ticket },
    /// Request approved with at least one prospect.
    ProspectList(Approved),
    /// Request approved with no prospects to show, either because the API
    /// returned none or because an assignment just completed.
    ApprovedDetail { request: ServiceRequest },
    /// Assign call in flight.
    Assigning { approved: Approved, artist_id: DbId },
    /// The last call failed. Any approved context survives so that an
    /// assignment can be retried with a different artist.
    Error {
        message: String,
        approved: Option<Approved>,
    },
}

/// A network call requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPending,
    Approve { request_id: DbId },
    FetchProspects { request_id: DbId, ticket: Ticket },
    Assign { request_id: DbId, artist_id: DbId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    phase: Phase,
    pending: Vec<ServiceRequest>,
    success: Option<String>,
    last_ticket: u64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Workflow {
    /// Create a workflow in [`Phase::LoadingPending`] together with the
    /// initial pending-list fetch.
    pub fn start() -> (Self, Effect) {
        let workflow = Self {
            phase: Phase::LoadingPending,
            pending: Vec::new(),
            success: None,
            last_ticket: 0,
        };
        (workflow, Effect::FetchPending)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Local pending list. Approved requests are removed from it without a
    /// re-fetch.
    pub fn pending(&self) -> &[ServiceRequest] {
        &self.pending
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The currently approved request, if any.
    pub fn approved_request(&self) -> Option<&ServiceRequest> {
        match &self.phase {
            Phase::FetchingProspects { request, .. } | Phase::ApprovedDetail { request } => {
                Some(request)
            }
            Phase::ProspectList(approved)
            | Phase::Assigning { approved, .. }
            | Phase::Error {
                approved: Some(approved),
                ..
            } => Some(&approved.request),
            _ => None,
        }
    }

    /// Prospects held for the approved request. Empty whenever no request
    /// is approved.
    pub fn prospects(&self) -> &[AssignmentProspect] {
        match &self.phase {
            Phase::ProspectList(approved)
            | Phase::Assigning { approved, .. }
            | Phase::Error {
                approved: Some(approved),
                ..
            } => &approved.prospects,
            _ => &[],
        }
    }

    pub fn is_approving(&self) -> bool {
        matches!(self.phase, Phase::Approving { .. })
    }

    pub fn is_assigning(&self) -> bool {
        matches!(self.phase, Phase::Assigning { .. })
    }

    /// A pending-list or prospect fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            Phase::LoadingPending | Phase::FetchingProspects { .. }
        )
    }

    /// Ticket of the prospect fetch the workflow is waiting on.
    pub fn awaited_ticket(&self) -> Option<Ticket> {
        match self.phase {
            Phase::FetchingProspects { ticket, .. } => Some(ticket),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

impl Workflow {
    /// Reset to the pending list and re-fetch it.
    ///
    /// Clears the approved request, its prospects, and both messages. Any
    /// prospect fetch still in flight becomes stale.
    pub fn view_other_requests(&mut self) -> Result<Effect, CoreError> {
        match &self.phase {
            Phase::Approving { .. } => Err(conflict("an approval is in flight")),
            Phase::Assigning { .. } => Err(conflict("an assignment is in flight")),
            Phase::LoadingPending => Err(conflict("pending requests are already loading")),
            _ => {
                self.phase = Phase::LoadingPending;
                self.success = None;
                Ok(Effect::FetchPending)
            }
        }
    }

    /// Apply the result of [`Effect::FetchPending`].
    pub fn pending_loaded(
        &mut self,
        result: Result<Vec<ServiceRequest>, RemoteFailure>,
    ) -> Result<(), CoreError> {
        if !matches!(self.phase, Phase::LoadingPending) {
            return Err(CoreError::InvalidTransition(
                "pending requests arrived while not loading them".into(),
            ));
        }

        match result {
            Ok(requests) => {
                self.pending = requests;
                self.phase = Phase::PendingList;
            }
            Err(failure) => {
                self.pending.clear();
                self.phase = Phase::Error {
                    message: messages::pending_failed(&failure),
                    approved: None,
                };
            }
        }
        Ok(())
    }

    /// Start approving pending request `request_id`.
    pub fn approve(&mut self, request_id: DbId) -> Result<Effect, CoreError> {
        match &self.phase {
            Phase::PendingList | Phase::Error { approved: None, .. } => {}
            Phase::Approving { .. } => return Err(conflict("an approval is already in flight")),
            Phase::Assigning { .. } => return Err(conflict("an assignment is in flight")),
            Phase::LoadingPending => return Err(conflict("pending requests are still loading")),
            _ => {
                return Err(CoreError::InvalidTransition(
                    "a request is already approved; view other requests first".into(),
                ))
            }
        }

        let request = self
            .pending
            .iter()
            .find(|r| r.id == request_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "service request",
                id: request_id,
            })?;

        self.success = None;
        self.phase = Phase::Approving { request };
        Ok(Effect::Approve { request_id })
    }

    /// Apply the result of [`Effect::Approve`].
    ///
    /// On success the request leaves the pending list and the prospect
    /// fetch for it is returned.
    pub fn approve_finished(
        &mut self,
        result: Result<(), RemoteFailure>,
    ) -> Result<Option<Effect>, CoreError> {
        let Phase::Approving { request } = &self.phase else {
            return Err(CoreError::InvalidTransition(
                "approval result arrived while not approving".into(),
            ));
        };
        let request = request.clone();

        match result {
            Ok(()) => {
                let request_id = request.id;
                self.pending.retain(|r| r.id != request_id);
                self.success = Some(messages::approved(request_id));

                let ticket = self.next_ticket();
                self.phase = Phase::FetchingProspects { request, ticket };
                Ok(Some(Effect::FetchProspects { request_id, ticket }))
            }
            Err(failure) => {
                self.phase = Phase::Error {
                    message: messages::approve_failed(request.id, &failure),
                    approved: None,
                };
                Ok(None)
            }
        }
    }

    /// Apply the result of [`Effect::FetchProspects`].
    ///
    /// Responses for any ticket other than the awaited one are rejected
    /// with [`CoreError::StaleResponse`] and leave the state untouched.
    pub fn prospects_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<AssignmentProspect>, RemoteFailure>,
    ) -> Result<(), CoreError> {
        let request = match &self.phase {
            Phase::FetchingProspects {
                request,
                ticket: awaited,
            } if *awaited == ticket => request.clone(),
            _ => {
                return Err(CoreError::StaleResponse {
                    ticket: ticket.value(),
                })
            }
        };

        self.phase = match result {
            Ok(prospects) if prospects.is_empty() => Phase::ApprovedDetail { request },
            Ok(prospects) => Phase::ProspectList(Approved { request, prospects }),
            Err(failure) => Phase::Error {
                message: messages::prospects_failed(request.id, &failure),
                approved: Some(Approved {
                    request,
                    prospects: Vec::new(),
                }),
            },
        };
        Ok(())
    }

    /// Start assigning `artist_id` to the approved request.
    pub fn assign(&mut self, artist_id: DbId) -> Result<Effect, CoreError> {
        let approved = match &self.phase {
            Phase::ProspectList(approved)
            | Phase::Error {
                approved: Some(approved),
                ..
            } if !approved.prospects.is_empty() => approved.clone(),
            Phase::Assigning { .. } => return Err(conflict("an assignment is already in flight")),
            Phase::Approving { .. } => return Err(conflict("an approval is in flight")),
            Phase::FetchingProspects { .. } => {
                return Err(conflict("assignment prospects are still loading"))
            }
            _ => {
                return Err(CoreError::InvalidTransition(
                    "there are no assignment prospects to choose from".into(),
                ))
            }
        };

        if !approved.prospects.iter().any(|p| p.artist_id() == artist_id) {
            return Err(CoreError::NotFound {
                entity: "artist",
                id: artist_id,
            });
        }

        let request_id = approved.request.id;
        self.success = None;
        self.phase = Phase::Assigning {
            approved,
            artist_id,
        };
        Ok(Effect::Assign {
            request_id,
            artist_id,
        })
    }

    /// Apply the result of [`Effect::Assign`].
    ///
    /// Success clears the prospects but keeps the approved request on
    /// screen until the operator asks to view other requests.
    pub fn assign_finished(&mut self, result: Result<(), RemoteFailure>) -> Result<(), CoreError> {
        let Phase::Assigning {
            approved,
            artist_id,
        } = &self.phase
        else {
            return Err(CoreError::InvalidTransition(
                "assignment result arrived while not assigning".into(),
            ));
        };
        let (approved, artist_id) = (approved.clone(), *artist_id);
        let request_id = approved.request.id;

        match result {
            Ok(()) => {
                self.success = Some(messages::assigned(request_id, artist_id));
                self.phase = Phase::ApprovedDetail {
                    request: approved.request,
                };
            }
            Err(failure) => {
                self.phase = Phase::Error {
                    message: messages::assign_failed(request_id, artist_id, &failure),
                    approved: Some(approved),
                };
            }
        }
        Ok(())
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket::new(self.last_ticket)
    }
}

fn conflict(reason: &str) -> CoreError {
    CoreError::Conflict(reason.to_string())
}
