use crate::api::{AuthResponse, DashboardData, Project, ProjectReport, RecentProject, TeamMember};

/// Messages from background tasks to the main UI thread
#[derive(Debug)]
pub enum BackgroundMessage {
    LoggedIn(AuthResponse),
    LoginFailed(String),
    SignedUp(AuthResponse),
    SignupFailed(String),
    /// Availability answer for `username`; `None` when the lookup failed
    UsernameChecked {
        username: String,
        available: Option<bool>,
    },
    /// Member lookup answer for `query`
    MemberFound {
        query: String,
        member: Option<TeamMember>,
    },
    DashboardLoaded(DashboardData),
    DashboardFailed(String),
    ProjectsLoaded(Vec<Project>),
    ProjectsFailed(String),
    RecentLoaded(Vec<RecentProject>),
    RecentFailed(String),
    ProjectCreated(String),
    UploadFailed(String),
    ReportLoaded {
        project_id: String,
        report: ProjectReport,
    },
    ReportFailed {
        project_id: String,
        message: String,
    },
    /// The backend rejected our token mid-session
    SessionExpired,
    /// Generic error (panicked task and the like)
    Error(String),
}
