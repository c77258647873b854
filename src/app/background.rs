//! Background requests
//!
//! Each request runs on its own tokio task and reports exactly one
//! `BackgroundMessage` back to the UI thread.

use crate::api::{ApiClient, ApiError, NewProject, SignupPayload};
use crate::app::messages::BackgroundMessage;
use crate::forms::{LOGIN_FAILED, SIGNUP_FAILED, UPLOAD_FAILED};
use std::future::Future;
use std::sync::mpsc;

pub const PROJECTS_FAILED: &str = "Failed to fetch projects";
pub const RECENT_FAILED: &str = "Failed to load projects";
pub const REPORT_FAILED: &str = "Failed to load report";

/// Spawn a task; a panic inside it is reported as an error message
/// instead of silently vanishing.
pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    log::debug!("spawning {}", task_name);
    let inner = tokio::spawn(fut);
    tokio::spawn(async move {
        if let Err(e) = inner.await {
            if e.is_panic() {
                log::error!("background task {} panicked", task_name);
                let _ = tx.send(BackgroundMessage::Error(format!(
                    "{} failed unexpectedly",
                    task_name
                )));
            }
        }
    });
}

/// Expired tokens get their own message so the app can sign out.
fn failure(err: &ApiError, fallback: &str, otherwise: BackgroundMessage) -> BackgroundMessage {
    if err.is_unauthorized() {
        BackgroundMessage::SessionExpired
    } else {
        log::warn!("{}: {}", fallback, err);
        otherwise
    }
}

pub fn login(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, email: String, password: String) {
    let tx_login = tx.clone();
    spawn_background(tx, "login", async move {
        let msg = match client.login(&email, &password).await {
            Ok(auth) => BackgroundMessage::LoggedIn(auth),
            Err(e) => {
                log::warn!("login failed: {}", e);
                BackgroundMessage::LoginFailed(e.user_message(LOGIN_FAILED))
            }
        };
        let _ = tx_login.send(msg);
    });
}

pub fn signup(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, payload: SignupPayload) {
    let tx_signup = tx.clone();
    spawn_background(tx, "signup", async move {
        let msg = match client.signup(&payload).await {
            Ok(auth) => BackgroundMessage::SignedUp(auth),
            Err(e) => {
                log::warn!("signup failed: {}", e);
                BackgroundMessage::SignupFailed(e.user_message(SIGNUP_FAILED))
            }
        };
        let _ = tx_signup.send(msg);
    });
}

pub fn logout(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient) {
    spawn_background(tx, "logout", async move {
        crate::session::notify_logout(&client).await;
    });
}

pub fn check_username(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, username: String) {
    let tx_check = tx.clone();
    spawn_background(tx, "check_username", async move {
        let available = match client.check_username(&username).await {
            Ok(available) => Some(available),
            Err(e) => {
                log::warn!("username check failed: {}", e);
                None
            }
        };
        let _ = tx_check.send(BackgroundMessage::UsernameChecked {
            username,
            available,
        });
    });
}

pub fn search_member(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, query: String) {
    let tx_search = tx.clone();
    spawn_background(tx, "search_member", async move {
        let member = match client.user_info(&query).await {
            Ok(member) => member,
            Err(e) => {
                log::warn!("member lookup failed: {}", e);
                None
            }
        };
        let _ = tx_search.send(BackgroundMessage::MemberFound { query, member });
    });
}

pub fn load_dashboard(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient) {
    let tx_dash = tx.clone();
    spawn_background(tx, "dashboard_stats", async move {
        let msg = match client.dashboard_stats().await {
            Ok(data) => BackgroundMessage::DashboardLoaded(data),
            Err(e) => failure(
                &e,
                crate::dashboard::LOAD_FAILED,
                BackgroundMessage::DashboardFailed(crate::dashboard::LOAD_FAILED.to_string()),
            ),
        };
        let _ = tx_dash.send(msg);
    });
}

pub fn load_projects(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient) {
    let tx_projects = tx.clone();
    spawn_background(tx, "projects", async move {
        let msg = match client.projects().await {
            Ok(projects) => BackgroundMessage::ProjectsLoaded(projects),
            Err(e) => failure(
                &e,
                PROJECTS_FAILED,
                BackgroundMessage::ProjectsFailed(e.user_message(PROJECTS_FAILED)),
            ),
        };
        let _ = tx_projects.send(msg);
    });
}

pub fn load_recent(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient) {
    let tx_recent = tx.clone();
    spawn_background(tx, "recent_projects", async move {
        let msg = match client.recent_projects().await {
            Ok(projects) => BackgroundMessage::RecentLoaded(projects),
            Err(e) => failure(
                &e,
                RECENT_FAILED,
                BackgroundMessage::RecentFailed(RECENT_FAILED.to_string()),
            ),
        };
        let _ = tx_recent.send(msg);
    });
}

pub fn load_report(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, project_id: String) {
    let tx_report = tx.clone();
    spawn_background(tx, "project_report", async move {
        let msg = match client.project_report(&project_id).await {
            Ok(report) => BackgroundMessage::ReportLoaded { project_id, report },
            Err(e) => {
                let message = e.user_message(REPORT_FAILED);
                failure(
                    &e,
                    REPORT_FAILED,
                    BackgroundMessage::ReportFailed {
                        project_id,
                        message,
                    },
                )
            }
        };
        let _ = tx_report.send(msg);
    });
}

pub fn create_project(tx: mpsc::Sender<BackgroundMessage>, client: ApiClient, project: NewProject) {
    let tx_create = tx.clone();
    spawn_background(tx, "create_project", async move {
        let msg = match client.create_project(&project).await {
            Ok(id) => {
                log::info!("created project {} ({})", project.name, id);
                BackgroundMessage::ProjectCreated(id)
            }
            Err(e) => failure(
                &e,
                UPLOAD_FAILED,
                BackgroundMessage::UploadFailed(e.user_message(UPLOAD_FAILED)),
            ),
        };
        let _ = tx_create.send(msg);
    });
}
