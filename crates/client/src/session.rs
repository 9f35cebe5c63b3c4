//! Operator session: executes workflow effects against the owner API.
//!
//! [`Session`] owns the [`Workflow`] behind a mutex that is never held
//! across a network call. Operator actions run their API call on the
//! caller's task; a front end that keeps drawing while a call is in flight
//! runs them on a clone. The prospect fetch that follows an approval runs
//! as a background task so that it can be cancelled when the operator
//! moves on.
//!
//! Every state change is announced on a [`broadcast`] channel. Call
//! [`Session::subscribe`] to receive them.

use std::sync::Arc;

use staffdesk_core::types::{DbId, Ticket};
use staffdesk_core::{CoreError, Effect, RemoteFailure, Workflow};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ServiceRequestApi;

/// Broadcast channel capacity for session events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Announced after every workflow change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The workflow state changed; re-derive the view.
    Updated,
}

/// Shared handle to one operator session. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn ServiceRequestApi>,
    workflow: Mutex<Workflow>,
    prospects: Mutex<Option<ProspectTask>>,
    event_tx: broadcast::Sender<SessionEvent>,
    /// Master cancellation token -- cancelled on shutdown.
    cancel: CancellationToken,
}

/// Bookkeeping for the in-flight prospect fetch.
struct ProspectTask {
    ticket: Ticket,
    /// Child of the master token.
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Session {
    /// Create a session in its loading phase. Nothing is fetched until
    /// [`load_pending`](Self::load_pending) runs.
    pub fn new(api: Arc<dyn ServiceRequestApi>) -> Self {
        // Always `Effect::FetchPending`; `load_pending` runs it.
        let (workflow, _fetch) = Workflow::start();
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                api,
                workflow: Mutex::new(workflow),
                prospects: Mutex::new(None),
                event_tx,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Create a session and wait for the pending list to load.
    pub async fn start(api: Arc<dyn ServiceRequestApi>) -> Self {
        let session = Self::new(api);
        session.load_pending().await;
        session
    }

    /// Run the initial pending-list fetch.
    pub async fn load_pending(&self) {
        tracing::info!("Loading pending requests");
        self.execute(Effect::FetchPending).await;
    }

    /// Subscribe to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Copy of the current workflow, for rendering.
    pub async fn snapshot(&self) -> Workflow {
        self.inner.workflow.lock().await.clone()
    }

    /// Approve pending request `request_id`. On success the prospect fetch
    /// for it starts in the background.
    pub async fn approve(&self, request_id: DbId) -> Result<(), CoreError> {
        let effect = self.transition(|wf| wf.approve(request_id)).await?;
        tracing::info!(request_id, "Approving service request");
        self.execute(effect).await;
        Ok(())
    }

    /// Assign `artist_id` to the approved request.
    pub async fn assign(&self, artist_id: DbId) -> Result<(), CoreError> {
        let effect = self.transition(|wf| wf.assign(artist_id)).await?;
        tracing::info!(artist_id, "Assigning artist");
        self.execute(effect).await;
        Ok(())
    }

    /// Drop the approved request and its prospects, then re-fetch the
    /// pending list.
    pub async fn view_other_requests(&self) -> Result<(), CoreError> {
        let effect = self.transition(|wf| wf.view_other_requests()).await?;
        self.cancel_prospect_fetch().await;
        tracing::info!("Returning to pending requests");
        self.execute(effect).await;
        Ok(())
    }

    /// Wait for the in-flight prospect fetch, if any, to finish.
    pub async fn prospects_settled(&self) {
        let task = self.inner.prospects.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.handle.await {
                tracing::error!(ticket = %task.ticket, error = %e, "Prospect fetch task failed");
            }
        }
    }

    /// Cancel all background work.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ---- private helpers ----

    /// Apply an operator action to the workflow and announce the change.
    async fn transition<T>(
        &self,
        action: impl FnOnce(&mut Workflow) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let outcome = {
            let mut workflow = self.inner.workflow.lock().await;
            action(&mut workflow)
        };
        match &outcome {
            Ok(_) => self.notify(),
            Err(e) => tracing::debug!(error = %e, "Operator action refused"),
        }
        outcome
    }

    /// Apply an API result to the workflow. Results the workflow rejects
    /// (stale or out of phase) are logged and dropped.
    async fn apply<T>(
        &self,
        update: impl FnOnce(&mut Workflow) -> Result<T, CoreError>,
    ) -> Option<T> {
        let outcome = {
            let mut workflow = self.inner.workflow.lock().await;
            update(&mut workflow)
        };
        match outcome {
            Ok(value) => {
                self.notify();
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarded API result");
                None
            }
        }
    }

    /// Run one effect. Follow-up prospect fetches are spawned, not awaited.
    async fn execute(&self, effect: Effect) {
        let api = &self.inner.api;
        match effect {
            Effect::FetchPending => {
                let result = api.list_pending().await.map_err(failure);
                if let Err(f) = &result {
                    tracing::error!(failure = ?f, "Failed to fetch pending requests");
                }
                self.apply(|wf| wf.pending_loaded(result)).await;
            }
            Effect::Approve { request_id } => {
                let result = api.approve(request_id).await.map_err(failure);
                if let Err(f) = &result {
                    tracing::error!(request_id, failure = ?f, "Approval failed");
                }
                if let Some(Some(next)) = self.apply(|wf| wf.approve_finished(result)).await {
                    self.dispatch_background(next).await;
                }
            }
            Effect::FetchProspects { .. } => self.dispatch_background(effect).await,
            Effect::Assign {
                request_id,
                artist_id,
            } => {
                let result = api.assign(request_id, artist_id).await.map_err(failure);
                match &result {
                    Ok(()) => tracing::info!(request_id, artist_id, "Artist assigned"),
                    Err(f) => tracing::error!(request_id, artist_id, failure = ?f, "Assignment failed"),
                }
                self.apply(|wf| wf.assign_finished(result)).await;
            }
        }
    }

    async fn dispatch_background(&self, effect: Effect) {
        match effect {
            Effect::FetchProspects { request_id, ticket } => {
                self.spawn_prospect_fetch(request_id, ticket).await;
            }
            other => {
                tracing::error!(effect = ?other, "Effect cannot run in the background");
            }
        }
    }

    /// Start the prospect fetch for `ticket`, cancelling any earlier one.
    async fn spawn_prospect_fetch(&self, request_id: DbId, ticket: Ticket) {
        let cancel = self.inner.cancel.child_token();
        let task_cancel = cancel.clone();
        let session = self.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {
                    tracing::debug!(request_id, %ticket, "Prospect fetch cancelled");
                }
                result = session.inner.api.list_prospects(request_id) => {
                    let result = result.map_err(failure);
                    match &result {
                        Ok(prospects) => tracing::info!(
                            request_id,
                            %ticket,
                            count = prospects.len(),
                            "Assignment prospects loaded"
                        ),
                        Err(f) => tracing::error!(
                            request_id,
                            %ticket,
                            failure = ?f,
                            "Failed to fetch assignment prospects"
                        ),
                    }
                    session.apply(|wf| wf.prospects_loaded(ticket, result)).await;
                }
            }
        });

        let previous = self.inner.prospects.lock().await.replace(ProspectTask {
            ticket,
            cancel,
            handle,
        });
        if let Some(previous) = previous {
            tracing::debug!(ticket = %previous.ticket, "Superseding prospect fetch");
            previous.cancel.cancel();
        }
    }

    async fn cancel_prospect_fetch(&self) {
        if let Some(task) = self.inner.prospects.lock().await.take() {
            tracing::debug!(ticket = %task.ticket, "Cancelling prospect fetch");
            task.cancel.cancel();
        }
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.inner.event_tx.send(SessionEvent::Updated);
    }
}

fn failure(err: crate::api::ApiError) -> RemoteFailure {
    RemoteFailure::from(err)
}
