pub mod panels;
pub mod theme;

use crate::api::{DashboardData, FileData, Project, ProjectReport, RecentProject, Smell};
use crate::dashboard;
use crate::forms::{FieldErrors, LoginForm, SignupForm, UploadForm, UsernameStatus};
use crate::search;
use crate::session::Session;
use crate::viewer;
use panels::Panel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use theme::Theme;

/// Top-level screens. Everything but the auth forms needs a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Signup,
    Dashboard,
    Projects,
    Upload,
    Report,
}

impl Screen {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Screen::Login | Screen::Signup)
    }

    /// Index in the sidebar navigation, if listed there
    pub fn nav_index(&self) -> Option<usize> {
        match self {
            Screen::Dashboard => Some(0),
            Screen::Projects => Some(1),
            Screen::Upload => Some(2),
            _ => None,
        }
    }

    pub fn from_nav_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Screen::Dashboard),
            1 => Some(Screen::Projects),
            2 => Some(Screen::Upload),
            _ => None,
        }
    }
}

/// UI overlay state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    ConfirmLogout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the project search or the sidebar filter
    Search,
}

/// Which side of the layout receives list navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Main,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPane {
    #[default]
    Files,
    Code,
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// Main application state
pub struct App {
    pub screen: Screen,
    pub overlay: Overlay,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    /// Spinner frame counter, advanced once per loop tick
    pub tick: usize,

    pub session: Session,

    pub login: LoginForm,
    pub signup: SignupForm,
    pub upload: UploadForm,

    pub dashboard: Option<DashboardData>,
    pub dashboard_error: Option<String>,
    pub dashboard_loading: bool,

    pub projects: Vec<Project>,
    pub projects_error: Option<String>,
    pub projects_loading: bool,
    pub project_query: String,
    pub project_cursor: usize,

    pub recent: Vec<RecentProject>,
    pub recent_error: Option<String>,
    pub recent_query: String,
    pub recent_cursor: usize,

    pub report_id: Option<String>,
    pub report: Option<ProjectReport>,
    pub report_error: Option<String>,
    pub report_loading: bool,
    pub report_pane: ReportPane,
    pub file_cursor: usize,
    pub code_scroll: u16,
}

impl App {
    pub fn new(session: Session) -> Self {
        let screen = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        Self {
            screen,
            overlay: Overlay::None,
            input_mode: InputMode::Normal,
            focus: Focus::Main,
            toast: None,
            should_quit: false,
            tick: 0,
            session,
            login: LoginForm::default(),
            signup: SignupForm::default(),
            upload: UploadForm::default(),
            dashboard: None,
            dashboard_error: None,
            dashboard_loading: false,
            projects: Vec::new(),
            projects_error: None,
            projects_loading: false,
            project_query: String::new(),
            project_cursor: 0,
            recent: Vec::new(),
            recent_error: None,
            recent_query: String::new(),
            recent_cursor: 0,
            report_id: None,
            report: None,
            report_error: None,
            report_loading: false,
            report_pane: ReportPane::Files,
            file_cursor: 0,
            code_scroll: 0,
        }
    }

    /// Path-style location, as shown in the header
    pub fn route(&self) -> String {
        match self.screen {
            Screen::Login => "/login".to_string(),
            Screen::Signup => "/signup".to_string(),
            Screen::Dashboard => "/dashboard".to_string(),
            Screen::Projects => "/projects".to_string(),
            Screen::Upload => "/upload".to_string(),
            Screen::Report => match &self.report_id {
                Some(id) => format!("/report/{}", id),
                None => "/report".to_string(),
            },
        }
    }

    /// Switch screens, bouncing to the login form when signed out.
    /// Returns the screen actually shown.
    pub fn set_screen(&mut self, screen: Screen) -> Screen {
        self.screen = if screen.requires_auth() && !self.session.is_authenticated() {
            Screen::Login
        } else {
            screen
        };
        self.input_mode = InputMode::Normal;
        self.focus = Focus::Main;
        self.screen
    }

    /// Forget everything tied to the signed-in user
    pub fn reset_user_state(&mut self) {
        self.login = LoginForm::default();
        self.signup = SignupForm::default();
        self.upload = UploadForm::default();
        self.dashboard = None;
        self.dashboard_error = None;
        self.projects.clear();
        self.projects_error = None;
        self.project_query.clear();
        self.project_cursor = 0;
        self.recent.clear();
        self.recent_error = None;
        self.recent_query.clear();
        self.recent_cursor = 0;
        self.clear_report();
    }

    pub fn clear_report(&mut self) {
        self.report_id = None;
        self.report = None;
        self.report_error = None;
        self.report_loading = false;
        self.report_pane = ReportPane::Files;
        self.file_cursor = 0;
        self.code_scroll = 0;
    }

    pub fn show_toast(&mut self, message: &str) {
        self.toast = Some(Toast::new(message));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    pub fn toggle_help(&mut self) {
        self.overlay = if self.overlay == Overlay::Help {
            Overlay::None
        } else {
            Overlay::Help
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────────────────

    pub fn filtered_projects(&self) -> Vec<&Project> {
        search::filter_projects(&self.projects, &self.project_query)
    }

    pub fn filtered_recent(&self) -> Vec<&RecentProject> {
        search::filter_recent(&self.recent, &self.recent_query)
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.filtered_projects()
            .get(self.project_cursor)
            .map(|p| p.id.clone())
    }

    pub fn selected_recent_id(&self) -> Option<String> {
        self.filtered_recent()
            .get(self.recent_cursor)
            .map(|p| p.id.clone())
    }

    /// Move whichever list is focused on the current screen
    pub fn move_cursor(&mut self, delta: isize) {
        if self.focus == Focus::Sidebar {
            let len = self.filtered_recent().len();
            self.recent_cursor = step(self.recent_cursor, delta, len);
            return;
        }
        match self.screen {
            Screen::Projects => {
                let len = self.filtered_projects().len();
                self.project_cursor = step(self.project_cursor, delta, len);
            }
            Screen::Report => match self.report_pane {
                ReportPane::Files => {
                    let len = self.report.as_ref().map(|r| r.file_data.len()).unwrap_or(0);
                    let next = step(self.file_cursor, delta, len);
                    if next != self.file_cursor {
                        self.file_cursor = next;
                        self.code_scroll = 0;
                    }
                }
                ReportPane::Code => self.scroll_code(delta),
            },
            _ => {}
        }
    }

    /// Stops with the last rendered row at the top of the pane.
    pub fn scroll_code(&mut self, delta: isize) {
        let max = self.code_rows().saturating_sub(1).min(u16::MAX as usize) as isize;
        let next = self.code_scroll as isize + delta;
        self.code_scroll = next.clamp(0, max) as u16;
    }

    pub fn toggle_focus(&mut self) {
        if self.screen == Screen::Report && self.focus == Focus::Main {
            self.report_pane = match self.report_pane {
                ReportPane::Files => ReportPane::Code,
                ReportPane::Code => ReportPane::Files,
            };
            return;
        }
        self.focus = match self.focus {
            Focus::Main => Focus::Sidebar,
            Focus::Sidebar => Focus::Main,
        };
    }

    /// The search string the `/` key edits on this screen
    pub fn active_query_mut(&mut self) -> &mut String {
        if self.screen == Screen::Projects && self.focus == Focus::Main {
            &mut self.project_query
        } else {
            &mut self.recent_query
        }
    }

    /// Clamp cursors after a filter change
    pub fn clamp_cursors(&mut self) {
        let projects = self.filtered_projects().len();
        let recent = self.filtered_recent().len();
        self.project_cursor = self.project_cursor.min(projects.saturating_sub(1));
        self.recent_cursor = self.recent_cursor.min(recent.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Report
    // ─────────────────────────────────────────────────────────────────────

    pub fn selected_file(&self) -> Option<&FileData> {
        self.report.as_ref()?.file_data.get(self.file_cursor)
    }

    pub fn selected_file_smells(&self) -> Vec<&Smell> {
        match (&self.report, self.selected_file()) {
            (Some(report), Some(file)) => viewer::smells_for_file(&report.smells, &file.file_name),
            _ => Vec::new(),
        }
    }

    /// Rows the code view draws for the selected file: one per text line
    /// plus one per badge.
    pub fn code_rows(&self) -> usize {
        let Some(file) = self.selected_file() else {
            return 0;
        };
        let smells = self.selected_file_smells();
        viewer::render_lines(&file.content, &smells)
            .iter()
            .map(|line| if line.badge.is_some() { 2 } else { 1 })
            .sum()
    }
}

/// Cursor step clamped to `0..len`
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

// ═══════════════════════════════════════════════════════════════════════════
//  RENDERING
// ═══════════════════════════════════════════════════════════════════════════

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::bg()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    if app.screen.requires_auth() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(chunks[1]);
        render_sidebar(frame, body[0], app);
        render_main(frame, body[1], app);
    } else {
        render_main(frame, chunks[1], app);
    }

    render_status_bar(frame, chunks[2], app);

    match app.overlay {
        Overlay::Help => render_help_overlay(frame, app),
        Overlay::ConfirmLogout => render_confirm_logout(frame),
        Overlay::None => {}
    }

    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let who = match app.session.user() {
        Some(user) => user.name.clone(),
        None => "not signed in".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", Theme::HEADER), Theme::title()),
        Span::styled(format!(" {} ", app.route()), Theme::text_muted()),
        Span::styled(format!("{} {}", Theme::DOT_SEPARATOR, who), Theme::text_dim()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let recent = app.filtered_recent();
    let active = app.screen.nav_index().unwrap_or(usize::MAX);
    frame.render_widget(
        Panel::sidebar(
            active,
            &recent,
            Some(app.recent_cursor),
            &app.recent_query,
            app.recent_error.as_deref(),
            app.focus == Focus::Sidebar,
            chrono::Utc::now(),
            area.width,
        ),
        area,
    );
}

fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Login => render_login(frame, area, app),
        Screen::Signup => render_signup(frame, area, app),
        Screen::Dashboard => render_dashboard(frame, area, app),
        Screen::Projects => render_projects(frame, area, app),
        Screen::Upload => render_upload(frame, area, app),
        Screen::Report => render_report(frame, area, app),
    }
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {} {}", Theme::CROSS_MARK, message),
        Theme::error(),
    ))
}

fn render_login(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.login;
    let errors = form.validate();
    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", Theme::TAGLINE), Theme::text_dim())),
        Line::from(""),
    ];
    lines.extend(Panel::input_lines("Email", &form.email, form.focus == 0, false, None));
    lines.extend(Panel::input_lines(
        "Password",
        &form.password,
        form.focus == 1,
        true,
        None,
    ));
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!(" {} Signing in…", theme::spinner(app.tick)),
            Theme::text_muted(),
        )));
    } else if let Some(err) = &form.error {
        lines.push(error_line(err));
    } else if !errors.is_empty() && (!form.email.is_empty() || !form.password.is_empty()) {
        if let Some(first) = errors.first() {
            lines.push(Line::from(Span::styled(format!(" {}", first), Theme::text_dim())));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" enter ", Theme::key()),
        Span::styled("sign in  ", Theme::text_muted()),
        Span::styled("ctrl+n ", Theme::key()),
        Span::styled("create an account", Theme::text_muted()),
    ]));

    frame.render_widget(
        Panel::form(" sign in ".to_string(), lines),
        centered_rect(50, 60, area),
    );
}

fn username_hint(status: UsernameStatus) -> Option<(String, Style)> {
    match status {
        UsernameStatus::Idle => None,
        UsernameStatus::Checking => {
            Some(("checking availability…".to_string(), Theme::text_dim()))
        }
        UsernameStatus::Available => Some((
            format!("{} username is available", Theme::CHECK_MARK),
            Theme::success(),
        )),
        UsernameStatus::Unavailable => Some((
            format!("{} This username is already taken", Theme::CROSS_MARK),
            Theme::error(),
        )),
    }
}

fn render_signup(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.signup;
    let errors: &FieldErrors = &form.errors;
    let mut lines = Vec::new();

    lines.extend(Panel::input_lines(
        "Username",
        &form.username,
        form.focus == 0,
        false,
        errors.get("username"),
    ));
    if let Some((hint, style)) = username_hint(form.username_status) {
        lines.push(Line::from(Span::styled(format!("   {}", hint), style)));
    }
    let fields: [(&str, &String, bool, &str); 5] = [
        ("Name", &form.name, false, "name"),
        ("Email", &form.email, false, "email"),
        ("Password", &form.password, true, "password"),
        ("Confirm password", &form.password_confirm, true, "passwordConfirm"),
        ("Photo (optional, path to image)", &form.photo, false, "photo"),
    ];
    for (i, (label, value, masked, key)) in fields.iter().enumerate() {
        lines.extend(Panel::input_lines(
            label,
            value,
            form.focus == i + 1,
            *masked,
            errors.get(key),
        ));
    }
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!(" {} Creating account…", theme::spinner(app.tick)),
            Theme::text_muted(),
        )));
    } else if let Some(err) = &form.error {
        lines.push(error_line(err));
    }
    lines.push(Line::from(vec![
        Span::styled(" ctrl+s ", Theme::key()),
        Span::styled("sign up  ", Theme::text_muted()),
        Span::styled("ctrl+l ", Theme::key()),
        Span::styled("back to sign in", Theme::text_muted()),
    ]));

    frame.render_widget(
        Panel::form(" create account ".to_string(), lines),
        centered_rect(60, 90, area),
    );
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(area);

    let status = if let Some(err) = &app.dashboard_error {
        error_line(err)
    } else if app.dashboard_loading {
        Line::from(Span::styled(
            format!(" {} loading…", theme::spinner(app.tick)),
            Theme::text_dim(),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status), rows[0]);

    let Some(data) = &app.dashboard else {
        return;
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(rows[1]);

    let severity = dashboard::severity_label(data.total_smells);
    frame.render_widget(
        Panel::stat_card(
            "total smells",
            data.total_smells.to_string(),
            Line::from(Span::styled(format!(" severity: {}", severity), Theme::text_muted())),
        ),
        cards[0],
    );
    frame.render_widget(
        Panel::stat_card(
            "projects",
            data.total_projects.to_string(),
            Line::from(Span::styled(" analysed", Theme::text_muted())),
        ),
        cards[1],
    );
    frame.render_widget(Panel::quality_card(data, cards[2].width), cards[2]);
    frame.render_widget(Panel::smell_chart(&data.chart_data, rows[2].width), rows[2]);
}

fn render_projects(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let searching = app.input_mode == InputMode::Search && app.focus == Focus::Main;
    let search = Line::from(vec![
        Span::styled(" / ", Theme::key()),
        Span::styled(
            if app.project_query.is_empty() && !searching {
                "search projects".to_string()
            } else {
                format!("{}{}", app.project_query, if searching { "▏" } else { "" })
            },
            Theme::input(searching),
        ),
    ]);
    frame.render_widget(Paragraph::new(search), rows[0]);

    let projects = app.filtered_projects();
    frame.render_widget(
        Panel::projects(
            &projects,
            app.projects.len(),
            app.project_cursor,
            &app.project_query,
            app.projects_loading,
            app.projects_error.as_deref(),
        ),
        rows[1],
    );
}

fn render_upload(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.upload;
    let errors = &form.errors;
    let mut lines = Vec::new();

    lines.extend(Panel::input_lines(
        "Project name",
        &form.name,
        form.focus == 0,
        false,
        errors.get("name"),
    ));
    lines.extend(Panel::input_lines(
        "Description",
        &form.description,
        form.focus == 1,
        false,
        errors.get("description"),
    ));
    lines.extend(Panel::input_lines(
        "Project archive (.zip path)",
        &form.archive,
        form.focus == 2,
        false,
        errors.get("project"),
    ));
    lines.extend(Panel::input_lines(
        "Add team members (name or username)",
        &form.member_query,
        form.focus == 3,
        false,
        None,
    ));

    for (idx, member) in form.member_results.iter().enumerate() {
        let style = if form.focus == 3 && idx == form.result_cursor {
            Theme::selected()
        } else {
            Theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("   + [{}] ", member.initial()), Theme::text_dim()),
            Span::styled(member.name.clone(), style),
            Span::styled(format!(" {}", member.handle()), Theme::text_dim()),
        ]));
    }

    lines.push(Line::from(""));
    if form.members.is_empty() {
        lines.push(Line::from(Span::styled(" No members added", Theme::text_dim())));
    } else {
        lines.push(Line::from(Span::styled(
            format!(" Members ({})", form.members.len()),
            Theme::text_muted(),
        )));
        for member in &form.members {
            lines.push(Line::from(vec![
                Span::styled(format!("   {} ", Theme::BULLET_FILLED), Theme::text_dim()),
                Span::styled(member.name.clone(), Theme::text()),
                Span::styled(format!(" {}", member.handle()), Theme::text_dim()),
            ]));
        }
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!(" {} Uploading and analysing…", theme::spinner(app.tick)),
            Theme::text_muted(),
        )));
    } else if let Some(err) = &form.error {
        lines.push(error_line(err));
    }
    lines.push(Line::from(vec![
        Span::styled(" ctrl+s ", Theme::key()),
        Span::styled("create project  ", Theme::text_muted()),
        Span::styled("enter ", Theme::key()),
        Span::styled("add member  ", Theme::text_muted()),
        Span::styled("ctrl+d ", Theme::key()),
        Span::styled("remove last member", Theme::text_muted()),
    ]));

    frame.render_widget(Panel::form(" new project ".to_string(), lines), area);
}

fn render_report(frame: &mut Frame, area: Rect, app: &App) {
    let Some(report) = &app.report else {
        let line = if let Some(err) = &app.report_error {
            error_line(err)
        } else {
            Line::from(Span::styled(
                format!(" {} loading report…", theme::spinner(app.tick)),
                Theme::text_dim(),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let header = vec![
        Line::from(vec![
            Span::styled(format!(" {}", report.project.title), Theme::title()),
            Span::styled(
                format!("  {} smells", report.smells.len()),
                Theme::text_muted(),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", report.project.description),
            Theme::text_dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(rows[1]);

    let counts = viewer::file_smell_counts(&report.file_data, &report.smells);
    let main_focused = app.focus == Focus::Main;
    frame.render_widget(
        Panel::file_explorer(
            &counts,
            app.file_cursor,
            main_focused && app.report_pane == ReportPane::Files,
        ),
        cols[0],
    );

    let (title, lines) = match app.selected_file() {
        Some(file) => {
            let smells = app.selected_file_smells();
            (
                format!(" {} ({} smells) ", file.file_name, smells.len()),
                viewer::render_lines(&file.content, &smells),
            )
        }
        None => (" code ".to_string(), Vec::new()),
    };
    frame.render_widget(
        Panel::code_view(
            title,
            &lines,
            app.code_scroll,
            main_focused && app.report_pane == ReportPane::Code,
        ),
        cols[1],
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match (app.screen, app.input_mode) {
        (_, InputMode::Search) => &[("enter", "done"), ("esc", "clear")],
        (Screen::Login, _) | (Screen::Signup, _) => {
            &[("tab", "next field"), ("shift+tab", "prev"), ("esc", "quit")]
        }
        (Screen::Upload, _) => &[("tab", "next field"), ("esc", "back"), ("ctrl+s", "submit")],
        (Screen::Report, _) => &[
            ("tab", "files/code"),
            ("↑↓", "move"),
            ("pgup/pgdn", "scroll"),
            ("esc", "back"),
            ("?", "help"),
        ],
        _ => &[
            ("1-3", "navigate"),
            ("/", "search"),
            ("enter", "open"),
            ("r", "refresh"),
            ("?", "help"),
            ("q", "quit"),
        ],
    };
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(*key, Theme::key()));
        spans.push(Span::styled(format!(" {}  ", label), Theme::key_hint()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let rows: [(&str, &str); 12] = [
        ("1 / 2 / 3", "Dashboard / Projects / Upload"),
        ("/", "Search projects or filter recent"),
        ("↑ ↓  j k", "Move selection"),
        ("enter", "Open selected project"),
        ("tab", "Switch sidebar / files / code"),
        ("pgup pgdn", "Scroll source"),
        ("r", "Refresh current screen"),
        ("L", "Sign out"),
        ("ctrl+s", "Submit form"),
        ("esc", "Back / close"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];
    let mut lines = vec![Line::from("")];
    for (key, desc) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), Theme::key()),
            Span::styled(desc, Theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Highlight colors: red high · yellow medium · green low",
        Theme::text_dim(),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(" help ", Theme::title()))
                .borders(Borders::ALL)
                .border_style(Theme::border_active())
                .style(Theme::panel_bg()),
        ),
        area,
    );
}

fn render_confirm_logout(frame: &mut Frame) {
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Sign out of CodeScent?", Theme::bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", Theme::key()),
            Span::styled("sign out   ", Theme::text_muted()),
            Span::styled("n ", Theme::key()),
            Span::styled("cancel", Theme::text_muted()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_active())
                .style(Theme::panel_bg()),
        ),
        area,
    );
}

fn render_toast(frame: &mut Frame, toast: &Toast) {
    let area = frame.area();
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let toast_area = Rect {
        x: area.width.saturating_sub(width + 1),
        y: area.height.saturating_sub(3),
        width,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  {}  ", toast.message),
            Theme::selected(),
        ))),
        toast_area,
    );
}

/// Centered rect taking a percentage of `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, AuthResponse, ReportHeader, User};
    use crate::session::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn signed_in_app() -> App {
        let client = ApiClient::new("http://127.0.0.1:9/api/v1").unwrap();
        let mut session = Session::new(client, Box::new(MemoryStore::default()));
        session
            .establish(AuthResponse {
                token: Some("tok".into()),
                user: User {
                    id: "u1".into(),
                    name: "Ada Lovelace".into(),
                    username: Some("ada".into()),
                    email: None,
                    photo: None,
                },
            })
            .unwrap();
        App::new(session)
    }

    fn signed_out_app() -> App {
        let client = ApiClient::new("http://127.0.0.1:9/api/v1").unwrap();
        App::new(Session::new(client, Box::new(MemoryStore::default())))
    }

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            members: Vec::new(),
            total_smells: 0,
            last_updated: String::new(),
        }
    }

    #[test]
    fn test_guard_redirects_to_login() {
        let mut app = signed_out_app();
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.set_screen(Screen::Projects), Screen::Login);
        assert_eq!(app.set_screen(Screen::Signup), Screen::Signup);
    }

    #[test]
    fn test_signed_in_starts_on_dashboard() {
        let mut app = signed_in_app();
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.set_screen(Screen::Upload), Screen::Upload);
        assert_eq!(app.route(), "/upload");
    }

    #[test]
    fn test_report_route() {
        let mut app = signed_in_app();
        app.report_id = Some("abc123".into());
        app.set_screen(Screen::Report);
        assert_eq!(app.route(), "/report/abc123");
    }

    #[test]
    fn test_project_cursor_follows_filter() {
        let mut app = signed_in_app();
        app.set_screen(Screen::Projects);
        app.projects = vec![
            project("p1", "Authentication Service"),
            project("p2", "Billing"),
            project("p3", "Auth Proxy"),
        ];
        app.move_cursor(5);
        assert_eq!(app.project_cursor, 2);

        app.project_query = "billing".into();
        app.clamp_cursors();
        assert_eq!(app.project_cursor, 0);
        assert_eq!(app.selected_project_id().as_deref(), Some("p2"));
    }

    #[test]
    fn test_file_cursor_resets_scroll() {
        let mut app = signed_in_app();
        app.report = Some(ProjectReport {
            project: ReportHeader {
                id: "p1".into(),
                title: "Demo".into(),
                description: String::new(),
            },
            file_data: vec![
                FileData {
                    file_name: "A.java".into(),
                    content: "a\n".repeat(30),
                    id: "f1".into(),
                },
                FileData {
                    file_name: "B.java".into(),
                    content: "b".into(),
                    id: "f2".into(),
                },
            ],
            smells: Vec::new(),
        });
        app.set_screen(Screen::Report);
        app.report_pane = ReportPane::Code;
        app.move_cursor(10);
        assert_eq!(app.code_scroll, 10);

        app.toggle_focus();
        assert_eq!(app.report_pane, ReportPane::Files);
        app.move_cursor(1);
        assert_eq!(app.selected_file().unwrap().file_name, "B.java");
        assert_eq!(app.code_scroll, 0);
    }

    #[test]
    fn test_code_scroll_stops_at_last_row() {
        let mut app = signed_in_app();
        app.report = Some(ProjectReport {
            project: ReportHeader {
                id: "p1".into(),
                title: "Demo".into(),
                description: String::new(),
            },
            file_data: vec![FileData {
                file_name: "A.java".into(),
                content: "one\ntwo\nthree\nfour".into(),
                id: "f1".into(),
            }],
            smells: vec![Smell {
                smell_type: "Long Method".into(),
                file_name: "A.java".into(),
                file_path: String::new(),
                start_line: 2,
                end_line: 3,
                category: "design".into(),
                weight: 4.0,
                id: None,
            }],
        });
        app.set_screen(Screen::Report);
        assert_eq!(app.code_rows(), 5);

        app.scroll_code(100);
        assert_eq!(app.code_scroll, 4);
        app.scroll_code(-100);
        assert_eq!(app.code_scroll, 0);

        app.report = None;
        app.scroll_code(3);
        assert_eq!(app.code_scroll, 0);
    }

    #[test]
    fn test_renders_every_screen() {
        let mut app = signed_in_app();
        app.dashboard = Some(dashboard::fallback_data());
        app.projects = vec![project("p1", "Billing")];
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        for screen in [
            Screen::Dashboard,
            Screen::Projects,
            Screen::Upload,
            Screen::Report,
            Screen::Login,
            Screen::Signup,
        ] {
            app.screen = screen;
            terminal.draw(|f| render(f, &app)).unwrap();
        }
        app.overlay = Overlay::Help;
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
