use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{require, ValidationError};

/// Body for `POST login`
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: require("email", email.into())?,
            password: require("password", password.into())?,
        })
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body for `POST users/oauth-token`
#[derive(Clone, Serialize)]
pub struct OAuthTokenRequest {
    client_id: String,
    client_secret: String,
}

impl OAuthTokenRequest {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_id: require("client_id", client_id.into())?,
            client_secret: require("client_secret", client_secret.into())?,
        })
    }
}

impl fmt::Debug for OAuthTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokenRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub session: LoginSession,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSession {
    /// Like "2019-02-16T07:02:13.446Z"
    #[serde(rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub token: String,
}

/// Only the access token is used; the vendor sends more fields than this.
#[derive(Debug, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
}
