use thiserror::Error;

use super::Surface;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error from {surface} API: {status} {status_text}")]
    Upstream {
        surface: Surface,
        status: u16,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(surface: Surface, status: reqwest::StatusCode) -> Self {
        ApiError::Upstream {
            surface,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    pub fn invalid_body(what: &str, err: &serde_json::Error, body: &str) -> Self {
        ApiError::InvalidResponse(format!(
            "{}: {} (body: {})",
            what,
            err,
            Self::truncate_body(body)
        ))
    }
}
