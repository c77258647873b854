use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}{}", message_suffix(.message))]
    Status {
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Not signed in")]
    Unauthenticated,
}

impl ApiError {
    /// The text shown to the user: the backend's own `message` when it sent
    /// one, otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. } if *status == reqwest::StatusCode::UNAUTHORIZED
        ) || matches!(self, ApiError::Unauthenticated)
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.trim().is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Project name already exists".into()),
        };
        assert_eq!(err.user_message("Project creation failed"), "Project name already exists");
    }

    #[test]
    fn test_user_message_falls_back() {
        let blank = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message("Project creation failed"), "Project creation failed");
        assert_eq!(
            ApiError::Unauthenticated.user_message("Failed to fetch projects"),
            "Failed to fetch projects"
        );
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert_eq!(err.to_string(), "Server returned 404 Not Found");
        assert!(!err.is_unauthorized());
        let unauthorized = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: Some("jwt expired".into()),
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.to_string(), "Server returned 401 Unauthorized: jwt expired");
    }
}
