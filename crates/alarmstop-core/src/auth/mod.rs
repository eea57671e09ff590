//! Authentication module for the vendor account.
//!
//! This module provides:
//! - `Credentials`: the account and OAuth client secrets, loaded once at startup
//! - `SessionManager`: owns the session token and derived bearer token, and
//!   logs in again only when the session has expired
//!
//! Nothing here is persisted; sessions live for the lifetime of the process.

pub mod credentials;
pub mod error;
pub mod session;

pub use credentials::Credentials;
pub use error::{AuthError, UnknownBearerPolicy};
pub use session::{AuthContext, BearerPolicy, SessionData, SessionManager, SessionStatus};
