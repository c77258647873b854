//! HTTP client for the CodeScent backend
//!
//! Every screen talks to the service through [`ApiClient`]. The client is
//! cheap to clone (reqwest shares its connection pool) so background tasks
//! each take their own copy.

pub mod error;
pub mod models;

pub use error::{ApiError, Result};
pub use models::{
    AuthResponse, ChartSlice, DashboardData, FileData, Project, ProjectReport, RecentProject,
    ReportHeader, Smell, TeamMember, User,
};

use crate::build_info;
use models::{
    CreatedProject, DataEnvelope, ErrorBody, LoginRequest, MeResponse, ProjectsPayload,
    RecentPayload, UserLookup, UsernameAvailability,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Uploads can be large; everything else should answer quickly.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim())?;
        let http = reqwest::Client::builder()
            .user_agent(build_info::user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    /// Same client, different credentials
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so user input such as a search query can never escape its slot.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        log::debug!("{} {}", method, url.path());
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  Authentication
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let req = self
            .request(Method::POST, &["user", "login"])
            .json(&LoginRequest { email, password });
        send(req).await
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<AuthResponse> {
        let mut form = Form::new();
        for (name, value) in payload.text_fields() {
            form = form.text(name, value);
        }
        if let Some(photo) = &payload.photo {
            let bytes = tokio::fs::read(photo).await?;
            let part = Part::bytes(bytes).file_name(file_name_of(photo));
            form = form.part("photo", part);
        }
        let req = self
            .request(Method::POST, &["user", "signup"])
            .multipart(form);
        send(req).await
    }

    pub async fn logout(&self) -> Result<()> {
        let req = self.request(Method::GET, &["user", "logout"]);
        send_discarding(req).await
    }

    /// The account behind the current token
    pub async fn me(&self) -> Result<User> {
        if self.token.is_none() {
            return Err(ApiError::Unauthenticated);
        }
        let resp: MeResponse = send(self.request(Method::GET, &["user", "me"])).await?;
        Ok(resp.user)
    }

    pub async fn user_info(&self, query: &str) -> Result<Option<TeamMember>> {
        let resp: UserLookup =
            send(self.request(Method::GET, &["user", "userinfo", query])).await?;
        Ok(resp.user)
    }

    pub async fn check_username(&self, username: &str) -> Result<bool> {
        let resp: UsernameAvailability =
            send(self.request(Method::GET, &["user", "check-username", username])).await?;
        Ok(resp.available)
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  Projects
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn projects(&self) -> Result<Vec<Project>> {
        let resp: DataEnvelope<ProjectsPayload> =
            send(self.request(Method::GET, &["project", "get-all-projects"])).await?;
        Ok(resp.data.projects)
    }

    pub async fn recent_projects(&self) -> Result<Vec<RecentProject>> {
        let resp: RecentPayload =
            send(self.request(Method::GET, &["project", "recent-projects"])).await?;
        Ok(resp.projects)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardData> {
        let resp: DataEnvelope<DashboardData> =
            send(self.request(Method::GET, &["project", "dashboard-stats"])).await?;
        Ok(resp.data)
    }

    pub async fn project_report(&self, project_id: &str) -> Result<ProjectReport> {
        let resp: DataEnvelope<ProjectReport> =
            send(self.request(Method::GET, &["project", "get-project", project_id])).await?;
        Ok(resp.data)
    }

    /// Upload a zipped project; returns the id of the created project.
    pub async fn create_project(&self, project: &NewProject) -> Result<String> {
        let bytes = tokio::fs::read(&project.archive).await?;
        log::info!(
            "Uploading {} ({} bytes) as '{}'",
            project.archive.display(),
            bytes.len(),
            project.name
        );

        let mut form = Form::new();
        for (name, value) in project.text_fields() {
            form = form.text(name, value);
        }
        let archive = Part::bytes(bytes)
            .file_name(file_name_of(&project.archive))
            .mime_str("application/zip")?;
        form = form.part("project", archive);

        let req = self
            .request(Method::POST, &["project", "create-project"])
            .multipart(form);
        let created: CreatedProject = send(req).await?;
        Ok(created.project.id)
    }
}

/// Fields of the project-creation form, minus the archive itself
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub archive: PathBuf,
    pub member_ids: Vec<String>,
}

impl NewProject {
    /// Text parts in the order the backend documents them. `members` is a
    /// JSON array of user ids, `[]` when nobody was added.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let members =
            serde_json::to_string(&self.member_ids).unwrap_or_else(|_| "[]".to_string());
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("members", members),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupPayload {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub photo: Option<PathBuf>,
}

impl SignupPayload {
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("password", self.password.clone()),
            ("passwordConfirm", self.password_confirm.clone()),
        ]
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let response = req.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    decode(status, &body)
}

async fn send_discarding(req: RequestBuilder) -> Result<()> {
    let response = req.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    check_status(status, &body)
}

fn check_status(status: StatusCode, body: &[u8]) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message);
    log::warn!(
        "Request failed with {}: {}",
        status,
        message.as_deref().unwrap_or("<no message>")
    );
    Err(ApiError::Status { status, message })
}

/// Turn a finished response into either the payload or an [`ApiError`].
fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    check_status(status, body)?;
    serde_json::from_slice(body).map_err(|e| {
        log::warn!("Could not decode response body: {}", e);
        ApiError::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let api = client("https://codescent.example.com/api/v1");
        assert_eq!(
            api.endpoint(&["project", "get-all-projects"]).as_str(),
            "https://codescent.example.com/api/v1/project/get-all-projects"
        );

        let slashed = client("https://codescent.example.com/api/v1/");
        assert_eq!(
            slashed.endpoint(&["project", "dashboard-stats"]).as_str(),
            "https://codescent.example.com/api/v1/project/dashboard-stats"
        );
    }

    #[test]
    fn test_endpoint_encodes_user_input() {
        let api = client("http://localhost:8000");
        let url = api.endpoint(&["user", "userinfo", "ada/../admin"]);
        assert_eq!(url.path(), "/user/userinfo/ada%2F..%2Fadmin");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::Url(_))));
    }

    #[test]
    fn test_new_project_fields_for_demo_upload() {
        let project = NewProject {
            name: "Demo".into(),
            description: "Test project".into(),
            archive: PathBuf::from("/tmp/demo.zip"),
            member_ids: Vec::new(),
        };
        assert_eq!(
            project.text_fields(),
            vec![
                ("name", "Demo".to_string()),
                ("description", "Test project".to_string()),
                ("members", "[]".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_project_members_json() {
        let project = NewProject {
            name: "Demo".into(),
            description: "Test project".into(),
            archive: PathBuf::from("demo.zip"),
            member_ids: vec!["u1".into(), "u2".into()],
        };
        let (_, members) = &project.text_fields()[2];
        assert_eq!(members, r#"["u1","u2"]"#);
        assert_eq!(file_name_of(&project.archive), "demo.zip");
    }

    #[test]
    fn test_decode_success_and_failure() {
        let ok: UsernameAvailability =
            decode(StatusCode::OK, br#"{"available":true}"#).unwrap();
        assert!(ok.available);

        let err = decode::<UsernameAvailability>(
            StatusCode::CONFLICT,
            br#"{"status":"fail","message":"Username taken"}"#,
        )
        .unwrap_err();
        assert_eq!(err.user_message("fallback"), "Username taken");

        let garbage = decode::<UsernameAvailability>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(garbage, ApiError::Decode(_)));
    }

    #[test]
    fn test_non_json_error_body_has_no_message() {
        let err = check_status(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert_eq!(err.user_message("Failed to load projects"), "Failed to load projects");
    }

    #[test]
    fn test_signup_fields_use_backend_names() {
        let payload = SignupPayload {
            username: "ada".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "hunter22!".into(),
            password_confirm: "hunter22!".into(),
            photo: None,
        };
        let names: Vec<&str> = payload.text_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["username", "name", "email", "password", "passwordConfirm"]);
    }

    #[tokio::test]
    async fn test_me_without_token_is_unauthenticated() {
        let api = client("http://localhost:1");
        assert!(matches!(api.me().await, Err(ApiError::Unauthenticated)));
    }
}
