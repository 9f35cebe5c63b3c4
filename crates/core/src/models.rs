//! Records returned by the owner API.
//!
//! All of these are read-mostly projections held in memory for the life of
//! a workflow. Decoding is lenient in the same places the API is known to be
//! loose: optional text fields, `null` scalars, missing or `null`
//! collections, and `null` entries inside collections.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::DbId;

/// `overallMatchScore` value the API uses for "not scored".
pub const UNSCORED_SENTINEL: f64 = -1000.0;

/// Fallback shown when no artist name or email is available.
const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Service requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: DbId,
    pub description: Option<String>,
}

impl ServiceRequest {
    /// Description text, or `None` when missing or blank.
    pub fn description_text(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Artists and skills
// ---------------------------------------------------------------------------

/// Read-only projection of a candidate artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistInfo {
    pub id: DbId,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub enabled: bool,
    pub date_created: Option<String>,
}

impl ArtistInfo {
    /// Username, else email, else `N/A`.
    pub fn display_name(&self) -> &str {
        non_empty(self.username.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// Per-skill comparison between an artist and a request requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    #[serde(default, deserialize_with = "null_default")]
    pub skill_id: DbId,
    #[serde(default, deserialize_with = "null_default")]
    pub skill_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub required_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: String,
    pub artist_level: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub partial_match: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub perfect_match: bool,
}

/// Badge shown next to a skill match. Perfect always wins over partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBadge {
    Perfect,
    Partial,
    None,
}

impl SkillMatch {
    pub fn badge(&self) -> MatchBadge {
        if self.perfect_match {
            MatchBadge::Perfect
        } else if self.partial_match {
            MatchBadge::Partial
        } else {
            MatchBadge::None
        }
    }

    /// Artist level, or `N/A` when the artist does not have the skill.
    pub fn artist_level_text(&self) -> &str {
        non_empty(self.artist_level.as_deref()).unwrap_or(NOT_AVAILABLE)
    }
}

/// A required skill the artist lacks. Whether it is essential or desirable
/// is decided by which collection of [`AssignmentProspect`] holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub id: Option<DbId>,
    #[serde(default, deserialize_with = "null_default")]
    pub skill_id: DbId,
    #[serde(default, deserialize_with = "null_default")]
    pub skill_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub required_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: String,
}

// ---------------------------------------------------------------------------
// Prospects
// ---------------------------------------------------------------------------

/// One candidate artist scored against the approved request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentProspect {
    pub artist_info: ArtistInfo,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub skill_matches: Vec<SkillMatch>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub missing_essential_skills: Vec<MissingSkill>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub missing_desirable_skills: Vec<MissingSkill>,
    #[serde(default, deserialize_with = "null_default")]
    pub current_active_projects: i64,
    pub overall_match_score: Option<f64>,
}

impl AssignmentProspect {
    pub fn artist_id(&self) -> DbId {
        self.artist_info.id
    }

    /// Overall score, hidden when absent or equal to [`UNSCORED_SENTINEL`].
    pub fn visible_score(&self) -> Option<f64> {
        self.overall_match_score
            .filter(|score| *score != UNSCORED_SENTINEL)
    }
}

// ---------------------------------------------------------------------------
// Body decoding
// ---------------------------------------------------------------------------

/// Decode the pending-requests body. `null` is an empty list.
pub fn decode_pending(value: serde_json::Value) -> Result<Vec<ServiceRequest>, serde_json::Error> {
    let requests: Option<Vec<ServiceRequest>> = serde_json::from_value(value)?;
    Ok(requests.unwrap_or_default())
}

/// Decode the assignment-prospects body.
///
/// Anything other than a JSON array yields no prospects. `null` entries are
/// dropped silently; entries that do not decode (for example, missing
/// `artistInfo`) are skipped and their errors returned alongside.
pub fn decode_prospects(
    value: serde_json::Value,
) -> (Vec<AssignmentProspect>, Vec<serde_json::Error>) {
    let serde_json::Value::Array(items) = value else {
        return (Vec::new(), Vec::new());
    };

    let mut prospects = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();
    for item in items.into_iter().filter(|item| !item.is_null()) {
        match serde_json::from_value(item) {
            Ok(prospect) => prospects.push(prospect),
            Err(e) => skipped.push(e),
        }
    }
    (prospects, skipped)
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// `null` or missing becomes `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
