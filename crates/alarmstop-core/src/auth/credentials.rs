use std::fmt;

use crate::models::{LoginRequest, OAuthTokenRequest, ValidationError};

/// Account credentials and OAuth client registration.
///
/// Immutable once built. `Debug` never prints the password or client secret.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn login_request(&self) -> Result<LoginRequest, ValidationError> {
        LoginRequest::new(self.email.as_str(), self.password.as_str())
    }

    pub fn oauth_request(&self) -> Result<OAuthTokenRequest, ValidationError> {
        OAuthTokenRequest::new(self.client_id.as_str(), self.client_secret.as_str())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
