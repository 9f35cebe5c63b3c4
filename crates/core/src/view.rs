//! What the operator sees, derived purely from a [`Workflow`].
//!
//! Front ends render a [`View`]; they never inspect the workflow phase
//! directly.

use crate::models::{AssignmentProspect, ServiceRequest};
use crate::types::DbId;
use crate::workflow::Workflow;

/// Busy notice. Only one is shown, with priority approving > assigning > loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyMessage {
    Approving,
    Assigning,
    Loading,
}

impl BusyMessage {
    pub fn text(self) -> &'static str {
        match self {
            Self::Approving => "Approving request...",
            Self::Assigning => "Assigning artist...",
            Self::Loading => "Loading data...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSection<'a> {
    pub requests: &'a [ServiceRequest],
    /// A pending-list fetch is in flight; approve actions are disabled.
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProspectSection<'a> {
    pub request_id: DbId,
    pub prospects: &'a [AssignmentProspect],
}

#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub error: Option<&'a str>,
    pub success: Option<&'a str>,
    pub busy: Option<BusyMessage>,
    pub pending: Option<PendingSection<'a>>,
    pub approved: Option<&'a ServiceRequest>,
    pub prospects: Option<ProspectSection<'a>>,
    /// "No prospects found" notice for an approved request.
    pub empty_prospects_notice: bool,
    /// The "view other requests" control is offered.
    pub view_other_requests: bool,
}

impl<'a> View<'a> {
    pub fn derive(workflow: &'a Workflow) -> Self {
        let error = workflow.error();
        let success = workflow.success();
        let approving = workflow.is_approving();
        let assigning = workflow.is_assigning();
        let loading = workflow.is_loading();
        let approved = workflow.approved_request();
        let prospects = workflow.prospects();

        let busy = if error.is_none() && success.is_none() {
            if approving {
                Some(BusyMessage::Approving)
            } else if assigning {
                Some(BusyMessage::Assigning)
            } else if loading {
                Some(BusyMessage::Loading)
            } else {
                None
            }
        } else {
            None
        };

        let pending = (approved.is_none() && !approving && !assigning && error.is_none()).then(
            || PendingSection {
                requests: workflow.pending(),
                loading,
            },
        );

        let prospect_section = match approved {
            Some(request) if !prospects.is_empty() && error.is_none() && !assigning => {
                Some(ProspectSection {
                    request_id: request.id,
                    prospects,
                })
            }
            _ => None,
        };

        let empty_prospects_notice = approved.is_some()
            && !loading
            && prospects.is_empty()
            && error.is_none()
            && !assigning;

        Self {
            error,
            success,
            busy,
            pending,
            approved: approved.filter(|_| error.is_none()),
            prospects: prospect_section,
            empty_prospects_notice,
            view_other_requests: approved.is_some() && !approving && !assigning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteFailure;
    use crate::models::ArtistInfo;
    use crate::workflow::Effect;

    fn request(id: DbId) -> ServiceRequest {
        ServiceRequest {
            id,
            description: None,
        }
    }

    fn prospect(artist_id: DbId) -> AssignmentProspect {
        AssignmentProspect {
            artist_info: ArtistInfo {
                id: artist_id,
                username: None,
                email: Some("a@example.com".into()),
                role: None,
                enabled: true,
                date_created: None,
            },
            skill_matches: Vec::new(),
            missing_essential_skills: Vec::new(),
            missing_desirable_skills: Vec::new(),
            current_active_projects: 1,
            overall_match_score: None,
        }
    }

    fn pending_list() -> Workflow {
        let (mut wf, _) = Workflow::start();
        wf.pending_loaded(Ok(vec![request(1), request(2)])).unwrap();
        wf
    }

    fn approved_with(prospects: Vec<AssignmentProspect>) -> Workflow {
        let mut wf = pending_list();
        wf.approve(1).unwrap();
        let Some(Effect::FetchProspects { ticket, .. }) = wf.approve_finished(Ok(())).unwrap()
        else {
            panic!("expected a prospect fetch");
        };
        wf.prospects_loaded(ticket, Ok(prospects)).unwrap();
        wf
    }

    #[test]
    fn initial_load_shows_busy_and_loading_pending_section() {
        let (wf, _) = Workflow::start();
        let view = View::derive(&wf);
        assert_eq!(view.busy, Some(BusyMessage::Loading));
        let pending = view.pending.unwrap();
        assert!(pending.loading);
        assert!(pending.requests.is_empty());
        assert!(!view.view_other_requests);
    }

    #[test]
    fn pending_list_is_actionable() {
        let wf = pending_list();
        let view = View::derive(&wf);
        assert_eq!(view.busy, None);
        assert_eq!(view.pending.unwrap().requests.len(), 2);
        assert!(!view.pending.unwrap().loading);
        assert!(view.approved.is_none());
        assert!(!view.empty_prospects_notice);
    }

    #[test]
    fn approving_hides_pending_and_shows_busy() {
        let mut wf = pending_list();
        wf.approve(2).unwrap();
        let view = View::derive(&wf);
        assert_eq!(view.busy, Some(BusyMessage::Approving));
        assert!(view.pending.is_none());
        assert!(!view.view_other_requests);
    }

    #[test]
    fn success_message_suppresses_busy_while_prospects_load() {
        let mut wf = pending_list();
        wf.approve(1).unwrap();
        wf.approve_finished(Ok(())).unwrap();
        let view = View::derive(&wf);
        assert!(view.success.is_some());
        assert_eq!(view.busy, None);
        assert_eq!(view.approved.map(|r| r.id), Some(1));
        assert!(!view.empty_prospects_notice);
        assert!(view.view_other_requests);
    }

    #[test]
    fn prospects_are_listed_for_approved_request() {
        let wf = approved_with(vec![prospect(10)]);
        let view = View::derive(&wf);
        let section = view.prospects.unwrap();
        assert_eq!(section.request_id, 1);
        assert_eq!(section.prospects.len(), 1);
        assert!(!view.empty_prospects_notice);
    }

    #[test]
    fn empty_prospects_show_notice() {
        let wf = approved_with(Vec::new());
        let view = View::derive(&wf);
        assert!(view.prospects.is_none());
        assert!(view.empty_prospects_notice);
    }

    #[test]
    fn assigning_hides_prospects() {
        let mut wf = approved_with(vec![prospect(10)]);
        wf.assign(10).unwrap();
        let view = View::derive(&wf);
        assert_eq!(view.busy, Some(BusyMessage::Assigning));
        assert!(view.prospects.is_none());
        assert!(!view.empty_prospects_notice);
        assert!(!view.view_other_requests);
    }

    #[test]
    fn error_hides_lists_and_approved_detail_but_keeps_back_control() {
        let mut wf = approved_with(vec![prospect(10)]);
        wf.assign(10).unwrap();
        wf.assign_finished(Err(RemoteFailure::Status {
            status: 500,
            body: "down".into(),
        }))
        .unwrap();

        let view = View::derive(&wf);
        assert!(view.error.unwrap().contains("500"));
        assert!(view.pending.is_none());
        assert!(view.prospects.is_none());
        assert!(!view.empty_prospects_notice);
        assert!(view.approved.is_none());
        assert!(view.view_other_requests);
    }

    #[test]
    fn pending_error_hides_pending_section() {
        let (mut wf, _) = Workflow::start();
        wf.pending_loaded(Err(RemoteFailure::Transport("dns".into())))
            .unwrap();
        let view = View::derive(&wf);
        assert!(view.pending.is_none());
        assert_eq!(view.busy, None);
        assert!(!view.view_other_requests);
    }

    #[test]
    fn busy_priority_text() {
        assert_eq!(BusyMessage::Approving.text(), "Approving request...");
        assert_eq!(BusyMessage::Assigning.text(), "Assigning artist...");
        assert_eq!(BusyMessage::Loading.text(), "Loading data...");
    }
}
