use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::LoginSession;

use super::{AuthError, Credentials, UnknownBearerPolicy};

/// When to trade the session token for a fresh bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BearerPolicy {
    /// Exchange on every `ensure_authenticated` call, even when the session
    /// was still valid.
    #[default]
    EveryCall,
    /// Exchange only after a login, reusing the bearer token otherwise.
    OnLogin,
}

impl FromStr for BearerPolicy {
    type Err = UnknownBearerPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every-call" => Ok(BearerPolicy::EveryCall),
            "on-login" => Ok(BearerPolicy::OnLogin),
            _ => Err(UnknownBearerPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// A session is unusable from its expiration instant onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        self.time_until_expiry().num_minutes().max(0)
    }
}

impl From<LoginSession> for SessionData {
    fn from(session: LoginSession) -> Self {
        Self {
            token: session.token,
            user_id: session.user_id,
            expires_at: session.expiration_date,
        }
    }
}

/// What a protected call needs: whose alarms, and the app API bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub bearer_token: String,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("user_id", &self.user_id)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Token-free snapshot of the session, for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub minutes_until_expiry: i64,
}

#[derive(Default)]
struct SessionState {
    session: Option<SessionData>,
    bearer_token: Option<String>,
}

/// Token-free copy of the last committed session, readable during a login.
#[derive(Debug, Clone)]
struct SessionSnapshot {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// Owns the one session this process uses.
///
/// `ensure_authenticated` holds the state lock for its whole run, so
/// concurrent callers queue up behind a login instead of racing it.
/// `status` never takes that lock; it reads the snapshot written on commit.
pub struct SessionManager {
    api: ApiClient,
    credentials: Credentials,
    policy: BearerPolicy,
    state: Mutex<SessionState>,
    snapshot: RwLock<Option<SessionSnapshot>>,
}

impl SessionManager {
    pub fn new(api: ApiClient, credentials: Credentials) -> Self {
        Self {
            api,
            credentials,
            policy: BearerPolicy::default(),
            state: Mutex::new(SessionState::default()),
            snapshot: RwLock::new(None),
        }
    }

    pub fn with_policy(mut self, policy: BearerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Return a usable user id and bearer token, logging in first if the
    /// stored session is missing or expired.
    ///
    /// State is only written after both login and exchange succeed, so a
    /// failure leaves the previous session and bearer token in place.
    pub async fn ensure_authenticated(&self) -> Result<AuthContext, AuthError> {
        let mut state = self.state.lock().await;

        let (session, logged_in) = match state.session.as_ref() {
            Some(session) if !session.is_expired_at(Utc::now()) => {
                debug!(
                    minutes_left = session.minutes_until_expiry(),
                    "Reusing existing session"
                );
                (session.clone(), false)
            }
            existing => {
                if existing.is_some() {
                    info!("Token expired. Logging in again.");
                } else {
                    info!("No session yet. Logging in.");
                }
                (self.login().await?, true)
            }
        };

        let bearer_token = match (self.policy, state.bearer_token.as_ref()) {
            (BearerPolicy::OnLogin, Some(cached)) if !logged_in => cached.clone(),
            _ => self.exchange(&session.token).await?,
        };

        *self.snapshot.write() = Some(SessionSnapshot {
            user_id: session.user_id.clone(),
            expires_at: session.expires_at,
        });
        state.session = Some(session.clone());
        state.bearer_token = Some(bearer_token.clone());

        Ok(AuthContext {
            user_id: session.user_id,
            bearer_token,
        })
    }

    /// Reflects the last successful authentication; a login in progress is
    /// not visible until it commits.
    pub fn status(&self) -> SessionStatus {
        match self.snapshot.read().clone() {
            Some(snapshot) => SessionStatus {
                authenticated: Utc::now() < snapshot.expires_at,
                user_id: Some(snapshot.user_id),
                expires_at: Some(snapshot.expires_at),
                minutes_until_expiry: (snapshot.expires_at - Utc::now()).num_minutes().max(0),
            },
            None => SessionStatus {
                authenticated: false,
                user_id: None,
                expires_at: None,
                minutes_until_expiry: 0,
            },
        }
    }

    async fn login(&self) -> Result<SessionData, AuthError> {
        let request = self.credentials.login_request()?;
        let response = self.api.login(&request).await.map_err(AuthError::Login)?;
        let session = SessionData::from(response.session);
        if session.is_expired() {
            warn!(
                expires_at = %session.expires_at,
                "Login returned a session that is already expired"
            );
        }
        info!(
            user_id = %session.user_id,
            expires_at = %session.expires_at,
            "Login successful"
        );
        Ok(session)
    }

    async fn exchange(&self, session_token: &str) -> Result<String, AuthError> {
        let request = self.credentials.oauth_request()?;
        let response = self
            .api
            .exchange_token(session_token, &request)
            .await
            .map_err(AuthError::Exchange)?;
        debug!("Bearer token refreshed");
        Ok(response.access_token)
    }
}
