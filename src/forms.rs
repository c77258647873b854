//! Form state and client-side validation
//!
//! Nothing here touches the network. Screens feed keystrokes in, ask the
//! form whether a lookup should be scheduled, and hand lookup results back;
//! results for input the user has since changed are dropped.

use crate::api::{NewProject, SignupPayload, TeamMember};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const LOGIN_FAILED: &str = "Invalid Username or Password. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const UPLOAD_FAILED: &str = "Project creation failed";

/// Profile photos above this size are rejected before upload
pub const MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

/// Member search only runs for queries at least this long
pub const MIN_MEMBER_QUERY: usize = 2;

/// Username availability is only checked above this length
const MIN_USERNAME_CHECK: usize = 2;

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").ok())
        .as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|re| re.is_match(email))
}

/// Per-field validation messages, in field order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: &str) {
        self.0.push((field, message.to_string()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, String)> {
        self.0.iter()
    }
}

/// Shared focus handling for forms made of text fields
fn cycle(focus: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (focus + 1) % len
    } else {
        (focus + len - 1) % len
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub const FIELDS: [&'static str; 2] = ["email", "password"];

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), true);
    }

    pub fn prev_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), false);
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.email.trim().is_empty() {
            errors.push("email", "Email is required");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Signup
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UsernameStatus {
    #[default]
    Idle,
    Checking,
    Available,
    Unavailable,
}

#[derive(Debug, Default, Clone)]
pub struct SignupForm {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    /// Path typed by the user; blank means no photo
    pub photo: String,
    pub focus: usize,
    pub username_status: UsernameStatus,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub submitting: bool,
}

impl SignupForm {
    pub const FIELDS: [&'static str; 6] = [
        "username",
        "name",
        "email",
        "password",
        "passwordConfirm",
        "photo",
    ];

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.username,
            1 => &mut self.name,
            2 => &mut self.email,
            3 => &mut self.password,
            4 => &mut self.password_confirm,
            _ => &mut self.photo,
        }
    }

    pub fn focused_field(&self) -> &'static str {
        Self::FIELDS[self.focus.min(Self::FIELDS.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), true);
    }

    pub fn prev_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), false);
    }

    /// Call after the username changes. Returns the username to look up
    /// when a debounced availability check should be (re)scheduled; `None`
    /// means any pending check should be cancelled.
    pub fn on_username_changed(&mut self) -> Option<String> {
        let trimmed = self.username.trim();
        if trimmed.chars().count() > MIN_USERNAME_CHECK {
            self.username_status = UsernameStatus::Checking;
            Some(trimmed.to_string())
        } else {
            self.username_status = UsernameStatus::Idle;
            None
        }
    }

    /// Apply an availability answer. `None` means the lookup failed.
    pub fn apply_username_check(&mut self, username: &str, available: Option<bool>) {
        if self.username.trim() != username {
            return;
        }
        self.username_status = match available {
            Some(true) => UsernameStatus::Available,
            Some(false) => UsernameStatus::Unavailable,
            None => UsernameStatus::Idle,
        };
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.username.trim().chars().count() < 3 {
            errors.push("username", "Username must be at least 3 characters");
        } else if self.username_status == UsernameStatus::Unavailable {
            errors.push("username", "This username is already taken");
        }
        if self.name.trim().chars().count() < 2 {
            errors.push("name", "Name is required");
        }
        if !is_valid_email(self.email.trim()) {
            errors.push("email", "Valid email is required");
        }
        if self.password.chars().count() < 8 {
            errors.push("password", "Password must be at least 8 characters");
        }
        if self.password != self.password_confirm {
            errors.push("passwordConfirm", "Passwords do not match");
        }
        if let Some(message) = self.photo_path().and_then(|p| check_photo(&p)) {
            errors.push("photo", &message);
        }
        errors
    }

    fn photo_path(&self) -> Option<PathBuf> {
        let raw = self.photo.trim();
        (!raw.is_empty()).then(|| PathBuf::from(raw))
    }

    /// Validate and build the request body
    pub fn to_payload(&self) -> Result<SignupPayload, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignupPayload {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
            photo: self.photo_path(),
        })
    }
}

fn check_photo(path: &Path) -> Option<String> {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_file() => Some("Photo must be a file".to_string()),
        Ok(meta) if meta.len() > MAX_PHOTO_BYTES => {
            Some("File size should be less than 2MB".to_string())
        }
        Ok(_) => None,
        Err(_) => Some("Photo not found".to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Upload
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct UploadForm {
    pub name: String,
    pub description: String,
    /// Path to the .zip archive
    pub archive: String,
    pub member_query: String,
    pub member_results: Vec<TeamMember>,
    pub members: Vec<TeamMember>,
    /// Highlighted entry in `member_results`
    pub result_cursor: usize,
    pub focus: usize,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub submitting: bool,
}

impl UploadForm {
    pub const FIELDS: [&'static str; 4] = ["name", "description", "project", "members"];

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.description,
            2 => &mut self.archive,
            _ => &mut self.member_query,
        }
    }

    pub fn focused_field(&self) -> &'static str {
        Self::FIELDS[self.focus.min(Self::FIELDS.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), true);
    }

    pub fn prev_field(&mut self) {
        self.focus = cycle(self.focus, Self::FIELDS.len(), false);
    }

    /// Call after the member query changes. Returns the query to search
    /// for, or `None` (results cleared, pending search to be cancelled).
    pub fn on_query_changed(&mut self) -> Option<String> {
        let q = self.member_query.trim();
        if q.chars().count() < MIN_MEMBER_QUERY {
            self.member_results.clear();
            self.result_cursor = 0;
            None
        } else {
            Some(q.to_string())
        }
    }

    /// Apply a lookup answer for `query`; stale answers are ignored.
    pub fn apply_member_search(&mut self, query: &str, found: Option<TeamMember>) {
        if self.member_query.trim() != query {
            return;
        }
        self.member_results = found
            .into_iter()
            .filter(|m| !self.members.iter().any(|sel| sel.id == m.id))
            .collect();
        self.result_cursor = 0;
    }

    pub fn add_member(&mut self, member: TeamMember) {
        self.member_results.retain(|m| m.id != member.id);
        if !self.members.iter().any(|m| m.id == member.id) {
            self.members.push(member);
        }
        self.member_query.clear();
        self.result_cursor = 0;
    }

    /// Add the highlighted search result, if any
    pub fn add_selected_result(&mut self) -> bool {
        match self.member_results.get(self.result_cursor).cloned() {
            Some(member) => {
                self.add_member(member);
                true
            }
            None => false,
        }
    }

    pub fn remove_member(&mut self, id: &str) {
        self.members.retain(|m| m.id != id);
    }

    pub fn remove_last_member(&mut self) {
        self.members.pop();
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "Project name is required");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "Description is required");
        }
        let archive = self.archive.trim();
        if archive.is_empty() {
            errors.push("project", "ZIP file required");
        } else if !archive.to_lowercase().ends_with(".zip") {
            errors.push("project", "Please upload a ZIP file");
        } else if !Path::new(archive).is_file() {
            errors.push("project", "ZIP file not found");
        }
        errors
    }

    /// Validate and build the request
    pub fn to_request(&self) -> Result<NewProject, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewProject {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            archive: PathBuf::from(self.archive.trim()),
            member_ids: self.members.iter().map(|m| m.id.clone()).collect(),
        })
    }
}
