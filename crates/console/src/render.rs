//! Plain-text rendering of a [`View`].

use staffdesk_core::models::{AssignmentProspect, MatchBadge, MissingSkill};
use staffdesk_core::view::{PendingSection, ProspectSection};
use staffdesk_core::View;

const TITLE: &str = "== Service request management ==";

/// Render the whole view as newline-separated text.
pub fn render(view: &View<'_>) -> String {
    let mut out = vec![TITLE.to_string()];

    if let Some(error) = view.error {
        out.push(format!("Error: {error}"));
    }
    if let Some(success) = view.success {
        out.push(success.to_string());
    }
    if let Some(busy) = view.busy {
        out.push(busy.text().to_string());
    }

    if let Some(pending) = &view.pending {
        render_pending(&mut out, pending);
    }

    if let Some(request) = view.approved {
        out.push(String::new());
        out.push("Approved request".to_string());
        out.push(format!("  ID: {}", request.id));
        out.push(format!(
            "  Description: {}",
            request.description_text().unwrap_or("N/A")
        ));
    }

    if let Some(section) = &view.prospects {
        render_prospects(&mut out, section);
    }

    if view.empty_prospects_notice {
        out.push(String::new());
        out.push(
            "No assignment prospects found for this request, or they were cleared after assignment."
                .to_string(),
        );
    }

    if view.view_other_requests {
        out.push(String::new());
        out.push("-> back   view other pending requests".to_string());
    }

    out.join("\n")
}

fn render_pending(out: &mut Vec<String>, pending: &PendingSection<'_>) {
    out.push(String::new());
    out.push("Requests pending approval".to_string());

    if pending.requests.is_empty() {
        out.push(if pending.loading {
            "  Loading pending requests...".to_string()
        } else {
            "  No requests pending approval.".to_string()
        });
        return;
    }

    for request in pending.requests {
        let description = request.description_text().unwrap_or("No description");
        if pending.loading {
            out.push(format!("  [{}] {description}", request.id));
        } else {
            out.push(format!("  [{}] {description}   -> approve {}", request.id, request.id));
        }
    }
}

fn render_prospects(out: &mut Vec<String>, section: &ProspectSection<'_>) {
    out.push(String::new());
    out.push(format!(
        "Assignment prospects for request {}",
        section.request_id
    ));
    for prospect in section.prospects {
        render_prospect(out, prospect);
    }
}

fn render_prospect(out: &mut Vec<String>, prospect: &AssignmentProspect) {
    let artist = &prospect.artist_info;
    out.push(format!("  Artist: {} (ID: {})", artist.display_name(), artist.id));

    if let Some(score) = prospect.visible_score() {
        out.push(format!("    Overall match score: {score}"));
    }
    out.push(format!(
        "    Active projects: {}",
        prospect.current_active_projects
    ));

    if !prospect.skill_matches.is_empty() {
        out.push("    Skill matches:".to_string());
        for skill in &prospect.skill_matches {
            let badge = match skill.badge() {
                MatchBadge::Perfect => " [perfect match]",
                MatchBadge::Partial => " [partial match]",
                MatchBadge::None => "",
            };
            out.push(format!(
                "      - {} (required: {}, artist: {}){badge}",
                skill.skill_name,
                skill.required_level,
                skill.artist_level_text()
            ));
        }
    }

    render_missing(out, "Missing essential skills:", &prospect.missing_essential_skills);
    render_missing(out, "Missing desirable skills:", &prospect.missing_desirable_skills);

    out.push(format!("    -> assign {}", artist.id));
}

fn render_missing(out: &mut Vec<String>, heading: &str, skills: &[MissingSkill]) {
    if skills.is_empty() {
        return;
    }
    out.push(format!("    {heading}"));
    for skill in skills {
        out.push(format!(
            "      - {} (required: {})",
            skill.skill_name, skill.required_level
        ));
    }
}
