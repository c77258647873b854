//! Wire types returned by the CodeScent backend
//!
//! Everything here is a plain DTO: the client never mutates these beyond
//! holding them for a screen.

use serde::{Deserialize, Deserializer, Serialize};

/// A user who can be added to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl TeamMember {
    /// `@handle` shown next to the name; derived from the name when the
    /// backend has no username for this member.
    pub fn handle(&self) -> String {
        match &self.username {
            Some(u) if !u.is_empty() => format!("@{}", u),
            _ => {
                let derived: Vec<&str> = self.name.split_whitespace().collect();
                format!("@{}", derived.join("_").to_lowercase())
            }
        }
    }

    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub total_smells: u64,
    #[serde(default)]
    pub last_updated: String,
}

/// One smell detected by the backend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Smell {
    pub smell_type: String,
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    /// Signed so a malformed range still deserializes; the viewer ignores
    /// lines outside the file.
    pub start_line: i64,
    pub end_line: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub category: String,
    pub value: u64,
    #[serde(default = "default_slice_color")]
    pub color: String,
}

fn default_slice_color() -> String {
    "#d1d5db".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_smells: u64,
    pub total_projects: u64,
    /// Percentage in 0..=100. The backend sends it as a string ("33.16").
    #[serde(default, deserialize_with = "number_or_string")]
    pub code_quality: f64,
    #[serde(default)]
    pub chart_data: Vec<ChartSlice>,
}

/// Accept `33.16`, `"33.16"` and `null` (as 0).
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Missing(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => Ok(s.trim().parse().unwrap_or(0.0)),
        Raw::Missing(()) => Ok(0.0),
    }
}

/// Sidebar entry from `/project/recent-projects`
#[derive(Debug, Clone, PartialEq)]
pub struct RecentProject {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub total_smells: u64,
}

impl<'de> Deserialize<'de> for RecentProject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Report {
            #[serde(rename = "totalSmells", default)]
            total_smells: u64,
        }
        #[derive(Deserialize)]
        struct Version {
            #[serde(default)]
            report: Option<Report>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            #[serde(rename = "_id", alias = "id")]
            id: String,
            title: String,
            #[serde(default)]
            created_at: String,
            #[serde(default)]
            latest_version: Option<Version>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let total_smells = raw
            .latest_version
            .and_then(|v| v.report)
            .map(|r| r.total_smells)
            .unwrap_or(0);
        Ok(RecentProject {
            id: raw.id,
            title: raw.title,
            created_at: raw.created_at,
            total_smells,
        })
    }
}

/// The signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Header of a project as embedded in a report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportHeader {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Everything the code viewer needs for one project
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project: ReportHeader,
    #[serde(default)]
    pub file_data: Vec<FileData>,
    #[serde(default)]
    pub smells: Vec<Smell>,
}

// ─────────────────────────────────────────────────────────────────────────
// Response envelopes
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsPayload {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentPayload {
    #[serde(default)]
    pub projects: Vec<RecentProject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLookup {
    #[serde(default)]
    pub user: Option<TeamMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsernameAvailability {
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedProject {
    pub project: CreatedProjectId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedProjectId {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MeResponse {
    pub user: User,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `{ "message": "..." }` body the backend attaches to failures
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
