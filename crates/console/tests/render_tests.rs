//! Rendering tests: drive a workflow through the core API and check the
//! text the operator would see.

use staffdesk_console::render::render;
use staffdesk_core::models::{
    ArtistInfo, AssignmentProspect, MissingSkill, ServiceRequest, SkillMatch, UNSCORED_SENTINEL,
};
use staffdesk_core::{Effect, RemoteFailure, View, Workflow};

fn request(id: i64, description: Option<&str>) -> ServiceRequest {
    ServiceRequest {
        id,
        description: description.map(str::to_string),
    }
}

fn skill(name: &str, perfect: bool, partial: bool, artist_level: Option<&str>) -> SkillMatch {
    SkillMatch {
        skill_id: 1,
        skill_name: name.to_string(),
        required_level: "ADVANCED".to_string(),
        priority: "ESSENTIAL".to_string(),
        artist_level: artist_level.map(str::to_string),
        partial_match: partial,
        perfect_match: perfect,
    }
}

fn missing(name: &str) -> MissingSkill {
    MissingSkill {
        id: None,
        skill_id: 2,
        skill_name: name.to_string(),
        required_level: "BASIC".to_string(),
        priority: "DESIRABLE".to_string(),
    }
}

fn prospect(artist_id: i64, score: f64) -> AssignmentProspect {
    AssignmentProspect {
        artist_info: ArtistInfo {
            id: artist_id,
            username: Some("noa".to_string()),
            email: Some("noa@example.com".to_string()),
            role: Some("ARTIST".to_string()),
            enabled: true,
            date_created: None,
        },
        skill_matches: vec![
            skill("Lettering", true, true, Some("ADVANCED")),
            skill("Inking", false, true, Some("BASIC")),
            skill("Color", false, false, None),
        ],
        missing_essential_skills: vec![missing("Perspective")],
        missing_desirable_skills: vec![missing("Animation")],
        current_active_projects: 3,
        overall_match_score: Some(score),
    }
}

fn pending(ids: &[(i64, Option<&str>)]) -> Workflow {
    let (mut wf, _) = Workflow::start();
    wf.pending_loaded(Ok(ids.iter().map(|(id, d)| request(*id, *d)).collect()))
        .unwrap();
    wf
}

fn approved_with(prospects: Vec<AssignmentProspect>) -> Workflow {
    let mut wf = pending(&[(1, Some("Festival poster")), (2, None)]);
    wf.approve(1).unwrap();
    let Some(Effect::FetchProspects { ticket, .. }) = wf.approve_finished(Ok(())).unwrap() else {
        panic!("expected a prospect fetch");
    };
    wf.prospects_loaded(ticket, Ok(prospects)).unwrap();
    wf
}

#[test]
fn pending_list_shows_approve_hints_and_fallback_description() {
    let wf = pending(&[(1, Some("Festival poster")), (2, Some(""))]);
    let text = render(&View::derive(&wf));

    assert!(text.contains("Requests pending approval"));
    assert!(text.contains("[1] Festival poster   -> approve 1"));
    assert!(text.contains("[2] No description   -> approve 2"));
    assert!(!text.contains("back"));
}

#[test]
fn empty_pending_list_says_so() {
    let wf = pending(&[]);
    let text = render(&View::derive(&wf));
    assert!(text.contains("No requests pending approval."));
}

#[test]
fn initial_load_shows_loading() {
    let (wf, _) = Workflow::start();
    let text = render(&View::derive(&wf));
    assert!(text.contains("Loading data..."));
    assert!(text.contains("Loading pending requests..."));
}

#[test]
fn prospect_card_shows_badges_and_missing_skills() {
    let wf = approved_with(vec![prospect(10, 87.0)]);
    let text = render(&View::derive(&wf));

    assert!(text.contains("Request 1 approved."));
    assert!(text.contains("Description: Festival poster"));
    assert!(text.contains("Assignment prospects for request 1"));
    assert!(text.contains("Artist: noa (ID: 10)"));
    assert!(text.contains("Overall match score: 87"));
    assert!(text.contains("Active projects: 3"));
    assert!(text.contains("- Lettering (required: ADVANCED, artist: ADVANCED) [perfect match]"));
    assert!(text.contains("- Inking (required: ADVANCED, artist: BASIC) [partial match]"));
    assert!(text.contains("- Color (required: ADVANCED, artist: N/A)\n"));
    assert!(text.contains("Missing essential skills:\n      - Perspective (required: BASIC)"));
    assert!(text.contains("Missing desirable skills:\n      - Animation (required: BASIC)"));
    assert!(text.contains("-> assign 10"));
    assert!(text.contains("-> back"));
}

#[test]
fn perfect_match_never_also_shows_partial_badge() {
    let wf = approved_with(vec![prospect(10, 87.0)]);
    let text = render(&View::derive(&wf));
    let lettering = text
        .lines()
        .find(|l| l.contains("Lettering"))
        .expect("lettering line");
    assert!(lettering.contains("[perfect match]"));
    assert!(!lettering.contains("[partial match]"));
}

#[test]
fn sentinel_score_is_not_rendered() {
    let wf = approved_with(vec![prospect(10, UNSCORED_SENTINEL)]);
    let text = render(&View::derive(&wf));
    assert!(!text.contains("Overall match score"));
}

#[test]
fn completed_assignment_shows_notice_and_keeps_detail() {
    let mut wf = approved_with(vec![prospect(10, 50.0)]);
    wf.assign(10).unwrap();
    wf.assign_finished(Ok(())).unwrap();
    let text = render(&View::derive(&wf));

    assert!(text.contains("Artist 10 assigned to request 1."));
    assert!(text.contains("ID: 1"));
    assert!(text.contains("No assignment prospects found"));
    assert!(!text.contains("-> assign"));
    assert!(text.contains("-> back"));
}

#[test]
fn error_banner_hides_prospects_and_approved_detail() {
    let mut wf = approved_with(vec![prospect(10, 50.0)]);
    wf.assign(10).unwrap();
    wf.assign_finished(Err(RemoteFailure::Status {
        status: 409,
        body: "artist unavailable".to_string(),
    }))
    .unwrap();
    let text = render(&View::derive(&wf));

    assert!(text.contains("Error: Assignment of artist 10 to request 1 failed: 409 - artist unavailable"));
    assert!(!text.contains("Assignment prospects for request"));
    assert!(!text.contains("Approved request"));
    assert!(!text.contains("Description: Festival poster"));
    assert!(text.contains("-> back"));
}
