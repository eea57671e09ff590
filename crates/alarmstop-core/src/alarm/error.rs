use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upstream(#[from] ApiError),

    #[error("Failed to parse active alarm response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Login returned an unusable user id: {0}")]
    InvalidUser(#[from] ValidationError),
}

impl AlarmError {
    /// Short machine-readable category, for callers that report errors
    pub fn kind(&self) -> &'static str {
        match self {
            AlarmError::Auth(_) => "auth",
            AlarmError::Upstream(_) => "upstream",
            AlarmError::Parse(_) | AlarmError::InvalidUser(_) => "parse",
        }
    }
}
