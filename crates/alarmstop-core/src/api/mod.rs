//! REST API client module for the vendor cloud.
//!
//! The vendor exposes two API surfaces. The client API handles login and
//! exchanges a session token for an OAuth bearer token; the app API reads and
//! mutates alarm state and only accepts the bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, HttpMethod, Surface, NO_BODY};
pub use error::ApiError;
