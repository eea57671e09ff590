use std::fmt;

use serde_json::Value;

use super::validation::{require, ValidationError};

/// Resource paths for one user's active alarm on the app API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmPath {
    user_id: String,
}

impl AlarmPath {
    pub fn new(user_id: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: require("userId", user_id.into())?,
        })
    }

    /// `users/{userId}/alarms/active`
    pub fn active(&self) -> String {
        format!("users/{}/alarms/active", self.user_id)
    }

    /// `users/{userId}/alarms/active/stop`
    pub fn stop(&self) -> String {
        format!("{}/stop", self.active())
    }
}

/// Parsed body of the active-alarm query.
///
/// The payload is kept as raw JSON; only the `alarm` field matters here.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAlarm(Value);

impl ActiveAlarm {
    /// The app API returns text, so parsing is the caller's job.
    pub fn from_text(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body).map(Self)
    }

    /// An alarm is ringing when the `alarm` field is present and truthy.
    pub fn is_ringing(&self) -> bool {
        self.0.get("alarm").is_some_and(is_truthy)
    }
}

impl fmt::Display for ActiveAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JavaScript truthiness, since that is what the vendor's own apps use.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
