use thiserror::Error;

use crate::api::ApiError;
use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login failed: {0}")]
    Login(#[source] ApiError),

    #[error("Token exchange failed: {0}")]
    Exchange(#[source] ApiError),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown bearer refresh policy '{0}' (expected 'every-call' or 'on-login')")]
pub struct UnknownBearerPolicy(pub String);
