//! Event-loop plumbing: what runs between a key press or a finished request
//! and the next frame.

pub mod background;
pub mod input;
pub mod messages;

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::ui::{App, Screen};
use messages::BackgroundMessage;
use std::sync::mpsc;

/// Things handlers need besides `App` itself
pub struct RuntimeContext {
    pub tx: mpsc::Sender<BackgroundMessage>,
    pub config: Config,
    pub username_check: Debouncer,
    pub member_search: Debouncer,
}

impl RuntimeContext {
    pub fn new(tx: mpsc::Sender<BackgroundMessage>, config: Config) -> Self {
        Self {
            username_check: Debouncer::from_millis(config.username_debounce_ms),
            member_search: Debouncer::from_millis(config.member_search_debounce_ms),
            tx,
            config,
        }
    }
}

/// Show `screen` and kick off whatever it needs to fetch
pub fn navigate(app: &mut App, ctx: &mut RuntimeContext, screen: Screen) {
    let shown = app.set_screen(screen);
    let client = app.session.client();
    match shown {
        Screen::Dashboard => {
            app.dashboard_loading = true;
            app.dashboard_error = None;
            background::load_dashboard(ctx.tx.clone(), client);
        }
        Screen::Projects => {
            app.projects_loading = true;
            app.projects_error = None;
            background::load_projects(ctx.tx.clone(), client);
        }
        Screen::Signup | Screen::Login | Screen::Upload | Screen::Report => {}
    }
}

/// Equivalent of visiting `/report/<id>`
pub fn open_report(app: &mut App, ctx: &mut RuntimeContext, project_id: String) {
    app.clear_report();
    if app.set_screen(Screen::Report) != Screen::Report {
        return;
    }
    app.report_id = Some(project_id.clone());
    app.report_loading = true;
    background::load_report(ctx.tx.clone(), app.session.client(), project_id);
}

pub fn load_recent(app: &mut App, ctx: &RuntimeContext) {
    app.recent_error = None;
    background::load_recent(ctx.tx.clone(), app.session.client());
}

/// Re-fetch whatever the current screen shows
pub fn refresh(app: &mut App, ctx: &mut RuntimeContext) {
    if !app.session.is_authenticated() {
        return;
    }
    load_recent(app, ctx);
    match app.screen {
        Screen::Report => {
            if let Some(id) = app.report_id.clone() {
                open_report(app, ctx, id);
            }
        }
        other => navigate(app, ctx, other),
    }
}

/// Clear local state now and tell the backend in the background
pub fn sign_out(app: &mut App, ctx: &mut RuntimeContext, notice: &str) {
    ctx.username_check.cancel();
    ctx.member_search.cancel();
    let previous = app.session.clear();
    background::logout(ctx.tx.clone(), previous);
    app.reset_user_state();
    app.set_screen(Screen::Login);
    app.show_toast(notice);
}

fn signed_in(app: &mut App, ctx: &mut RuntimeContext, auth: crate::api::AuthResponse) {
    if let Err(e) = app.session.establish(auth) {
        log::warn!("{:#}", e);
        app.show_toast("Signed in, but the session could not be saved");
    }
    app.reset_user_state();
    load_recent(app, ctx);
    navigate(app, ctx, Screen::Dashboard);
}

/// Fold a finished background request into the app state
pub fn apply_message(app: &mut App, ctx: &mut RuntimeContext, msg: BackgroundMessage) {
    match msg {
        BackgroundMessage::LoggedIn(auth) | BackgroundMessage::SignedUp(auth) => {
            signed_in(app, ctx, auth);
        }
        BackgroundMessage::LoginFailed(message) => {
            app.login.submitting = false;
            app.login.error = Some(message);
        }
        BackgroundMessage::SignupFailed(message) => {
            app.signup.submitting = false;
            app.signup.error = Some(message);
        }
        BackgroundMessage::UsernameChecked {
            username,
            available,
        } => app.signup.apply_username_check(&username, available),
        BackgroundMessage::MemberFound { query, member } => {
            app.upload.apply_member_search(&query, member);
        }
        BackgroundMessage::DashboardLoaded(data) => {
            app.dashboard_loading = false;
            app.dashboard_error = None;
            app.dashboard = Some(data);
        }
        BackgroundMessage::DashboardFailed(message) => {
            app.dashboard_loading = false;
            app.dashboard_error = Some(message);
            app.dashboard = Some(crate::dashboard::fallback_data());
        }
        BackgroundMessage::ProjectsLoaded(projects) => {
            app.projects_loading = false;
            app.projects_error = None;
            app.projects = projects;
            app.clamp_cursors();
        }
        BackgroundMessage::ProjectsFailed(message) => {
            app.projects_loading = false;
            app.projects_error = Some(message);
        }
        BackgroundMessage::RecentLoaded(recent) => {
            app.recent_error = None;
            app.recent = recent;
            app.clamp_cursors();
        }
        BackgroundMessage::RecentFailed(message) => {
            app.recent_error = Some(message);
        }
        BackgroundMessage::ProjectCreated(id) => {
            ctx.member_search.cancel();
            app.upload = Default::default();
            app.show_toast("Project created");
            load_recent(app, ctx);
            open_report(app, ctx, id);
        }
        BackgroundMessage::UploadFailed(message) => {
            app.upload.submitting = false;
            app.upload.error = Some(message);
        }
        BackgroundMessage::ReportLoaded { project_id, report } => {
            if app.report_id.as_deref() != Some(project_id.as_str()) {
                return;
            }
            app.report_loading = false;
            app.report_error = None;
            app.file_cursor = 0;
            app.code_scroll = 0;
            app.report = Some(report);
        }
        BackgroundMessage::ReportFailed {
            project_id,
            message,
        } => {
            if app.report_id.as_deref() != Some(project_id.as_str()) {
                return;
            }
            app.report_loading = false;
            app.report_error = Some(message);
        }
        BackgroundMessage::SessionExpired => {
            if app.session.is_authenticated() {
                sign_out(app, ctx, "Session expired. Please sign in again.");
            }
        }
        BackgroundMessage::Error(message) => app.show_toast(&message),
    }
}
