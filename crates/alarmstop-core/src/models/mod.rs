//! Request and response payloads for the vendor API.
//!
//! - `LoginRequest`, `OAuthTokenRequest`: typed bodies for the client API
//! - `LoginResponse`, `OAuthTokenResponse`: what the client API hands back
//! - `AlarmPath`: resource paths for a user's active alarm
//! - `ActiveAlarm`: the parsed active-alarm query result

pub mod alarm;
pub mod auth;
pub mod validation;

pub use alarm::{ActiveAlarm, AlarmPath};
pub use auth::{LoginRequest, LoginResponse, LoginSession, OAuthTokenRequest, OAuthTokenResponse};
pub use validation::ValidationError;
