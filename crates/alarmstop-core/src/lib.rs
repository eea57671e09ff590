//! Core library for alarmstop.
//!
//! Talks to the smart-mattress vendor cloud on behalf of a single account:
//!
//! - [`api`]: typed client for the two vendor API surfaces
//! - [`auth`]: credentials and the session/bearer-token lifecycle
//! - [`alarm`]: the "stop the ringing alarm if there is one" workflow
//! - [`models`]: request and response payloads

pub mod alarm;
pub mod api;
pub mod auth;
pub mod models;

pub use alarm::{AlarmController, AlarmError, StopOutcome};
pub use api::{ApiClient, ApiError, HttpMethod, Surface};
pub use auth::{AuthContext, AuthError, BearerPolicy, Credentials, SessionManager, SessionStatus};
