//! API client for the vendor's two REST surfaces.
//!
//! Both surfaces share one connection pool. They differ in how a credential
//! is presented and in how the response body is handed back:
//!
//! | Surface       | Credential header           | Response       |
//! |---------------|-----------------------------|----------------|
//! | `PrimaryAuth` | `Session-Token: <token>`    | decoded JSON   |
//! | `AppControl`  | `Authorization: Bearer <t>` | raw text       |

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{AlarmPath, LoginRequest, LoginResponse, OAuthTokenRequest, OAuthTokenResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the client API (login and token exchange)
pub const DEFAULT_CLIENT_API_URL: &str = "https://client-api.8slp.net/v1/";

/// Base URL for the app API (alarm state)
pub const DEFAULT_APP_API_URL: &str = "https://app-api.8slp.net/v1/";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const SESSION_TOKEN_HEADER: &str = "Session-Token";

/// Placeholder for calls that send no body.
pub const NO_BODY: Option<&()> = None;

/// Which upstream API a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    PrimaryAuth,
    AppControl,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::PrimaryAuth => write!(f, "Eight Client"),
            Surface::AppControl => write!(f, "Eight App"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Post => Method::POST,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Method::from(*self))
    }
}

/// API client for the vendor cloud.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    client_api_url: String,
    app_api_url: String,
}

impl ApiClient {
    /// Create a new API client against the production endpoints
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            client_api_url: DEFAULT_CLIENT_API_URL.to_string(),
            app_api_url: DEFAULT_APP_API_URL.to_string(),
        })
    }

    /// Point the client at different base URLs, sharing the connection pool.
    pub fn with_base_urls(mut self, client_api_url: &str, app_api_url: &str) -> Self {
        self.client_api_url = normalize_base(client_api_url);
        self.app_api_url = normalize_base(app_api_url);
        self
    }

    pub fn base_url(&self, surface: Surface) -> &str {
        match surface {
            Surface::PrimaryAuth => &self.client_api_url,
            Surface::AppControl => &self.app_api_url,
        }
    }

    fn url(&self, surface: Surface, path: &str) -> String {
        format!("{}{}", self.base_url(surface), path.trim_start_matches('/'))
    }

    /// Check if response is successful. The body of a failed response is
    /// dropped so callers never see a partial payload.
    fn check_response(surface: Surface, response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(surface, response.status()))
        }
    }

    /// Send one request to `surface`, presenting `credential` with that
    /// surface's header convention.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        surface: Surface,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        credential: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.url(surface, path);

        let mut request = self
            .client
            .request(method.into(), &url)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        if let Some(token) = credential {
            request = match surface {
                Surface::PrimaryAuth => request.header(SESSION_TOKEN_HEADER, token),
                Surface::AppControl => request.bearer_auth(token),
            };
        }

        debug!(%surface, %method, path, "Sending vendor API request");
        let response = request.send().await?;
        Self::check_response(surface, response)
    }

    /// Call the client API and decode the JSON response
    pub async fn client_api<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        session_token: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = self
            .call(Surface::PrimaryAuth, method, path, body, session_token)
            .await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::invalid_body(&format!("Failed to parse JSON from {}", path), &e, &text)
        })
    }

    /// Call the app API and return the body as text, unparsed
    pub async fn app_api<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        bearer_token: Option<&str>,
    ) -> Result<String, ApiError> {
        let response = self
            .call(Surface::AppControl, method, path, body, bearer_token)
            .await?;
        Ok(response.text().await?)
    }

    // ===== Vendor Operations =====

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client_api(HttpMethod::Post, "login", Some(request), None)
            .await
    }

    /// Trade a session token for an app API bearer token
    pub async fn exchange_token(
        &self,
        session_token: &str,
        request: &OAuthTokenRequest,
    ) -> Result<OAuthTokenResponse, ApiError> {
        self.client_api(
            HttpMethod::Post,
            "users/oauth-token",
            Some(request),
            Some(session_token),
        )
        .await
    }

    pub async fn get_active_alarm(
        &self,
        alarm: &AlarmPath,
        bearer_token: &str,
    ) -> Result<String, ApiError> {
        self.app_api(HttpMethod::Get, &alarm.active(), NO_BODY, Some(bearer_token))
            .await
    }

    pub async fn stop_alarm(
        &self,
        alarm: &AlarmPath,
        bearer_token: &str,
    ) -> Result<String, ApiError> {
        self.app_api(HttpMethod::Put, &alarm.stop(), NO_BODY, Some(bearer_token))
            .await
    }
}

fn normalize_base(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
