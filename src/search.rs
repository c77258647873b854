//! Client-side list filtering

use crate::api::{Project, RecentProject};

/// Projects whose title or description contains `query`, ignoring case.
/// The query is matched as typed, surrounding spaces included; an empty
/// query keeps everything.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return projects.iter().collect();
    }
    projects
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&q) || p.description.to_lowercase().contains(&q))
        .collect()
}

/// Sidebar filter: title only
pub fn filter_recent<'a>(projects: &'a [RecentProject], query: &str) -> Vec<&'a RecentProject> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return projects.iter().collect();
    }
    projects
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&q))
        .collect()
}
