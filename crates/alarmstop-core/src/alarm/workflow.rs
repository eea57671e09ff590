use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::SessionManager;
use crate::models::{ActiveAlarm, AlarmPath};

use super::AlarmError;

const NO_ACTIVE_ALARM: &str = "no active alarm";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopOutcome {
    pub stopped: bool,
    pub detail: Value,
}

impl StopOutcome {
    fn nothing_to_stop() -> Self {
        Self {
            stopped: false,
            detail: Value::String(NO_ACTIVE_ALARM.to_string()),
        }
    }

    /// The stop response is opaque; keep it as JSON when it parses.
    fn stopped(response: String) -> Self {
        let detail = serde_json::from_str(&response).unwrap_or(Value::String(response));
        Self {
            stopped: true,
            detail,
        }
    }
}

/// Runs the query-then-stop sequence on top of a `SessionManager`.
pub struct AlarmController {
    sessions: SessionManager,
}

impl AlarmController {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Stop the ringing alarm, if there is one.
    ///
    /// Safe to repeat: with nothing ringing this only authenticates and
    /// queries. Any failure aborts the run; session state stays as the
    /// session manager left it.
    pub async fn stop_active_alarm_if_any(&self) -> Result<StopOutcome, AlarmError> {
        let auth = self.sessions.ensure_authenticated().await?;
        let alarm = AlarmPath::new(auth.user_id.as_str())?;
        let api = self.sessions.api();

        info!("Fetching alarms.");
        let body = api.get_active_alarm(&alarm, &auth.bearer_token).await?;
        let active = ActiveAlarm::from_text(&body)?;
        debug!(payload = %active, "Active alarm response");

        if !active.is_ringing() {
            info!("No alarms found.");
            return Ok(StopOutcome::nothing_to_stop());
        }

        info!("Alarms found.");
        let response = api.stop_alarm(&alarm, &auth.bearer_token).await?;
        debug!(response = %response, "Stop response");
        info!("Alarms stopped.");

        Ok(StopOutcome::stopped(response))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::{ApiClient, ApiError};
    use crate::auth::Credentials;

    fn controller(server: &MockServer) -> AlarmController {
        let api = ApiClient::new(Duration::from_secs(5))
            .expect("http client")
            .with_base_urls(
                &format!("{}/client/", server.uri()),
                &format!("{}/app/", server.uri()),
            );
        let sessions = SessionManager::new(api, Credentials::new("a@b.com", "x", "cid", "secret"));
        AlarmController::new(sessions)
    }

    /// Login and exchange mocks for user U1 with session T1 and bearer B1
    async fn mount_auth(server: &MockServer, exchanges: u64) {
        let expires = Utc::now() + chrono::Duration::seconds(300);
        Mock::given(method("POST"))
            .and(path("/client/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session": {"token": "T1", "userId": "U1", "expirationDate": expires.to_rfc3339()}
            })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/client/users/oauth-token"))
            .and(header("Session-Token", "T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "B1"})))
            .expect(exchanges)
            .mount(server)
            .await;
    }

    fn query() -> wiremock::MockBuilder {
        Mock::given(method("GET"))
            .and(path("/app/users/U1/alarms/active"))
            .and(header("Authorization", "Bearer B1"))
    }

    fn stop() -> wiremock::MockBuilder {
        Mock::given(method("PUT"))
            .and(path("/app/users/U1/alarms/active/stop"))
            .and(header("Authorization", "Bearer B1"))
    }

    #[tokio::test]
    async fn test_stops_ringing_alarm() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"alarm":{"id":1}}"#))
            .expect(1)
            .mount(&server)
            .await;
        stop()
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = controller(&server).stop_active_alarm_if_any().await.expect("workflow");
        assert_eq!(
            outcome,
            StopOutcome {
                stopped: true,
                detail: json!({"ok": true})
            }
        );
    }

    #[tokio::test]
    async fn test_no_alarm_never_calls_stop() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;
        stop()
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = controller(&server).stop_active_alarm_if_any().await.expect("workflow");
        assert!(!outcome.stopped);
        assert_eq!(outcome.detail, json!("no active alarm"));
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing_to_stop() {
        let server = MockServer::start().await;
        mount_auth(&server, 2).await;
        // Ringing until the first stop goes through
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"alarm":{"id":1}}"#))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;
        stop()
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let controller = controller(&server);
        assert!(controller.stop_active_alarm_if_any().await.expect("first run").stopped);
        assert!(!controller.stop_active_alarm_if_any().await.expect("second run").stopped);
    }

    #[tokio::test]
    async fn test_non_json_stop_response_kept_as_text() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"alarm":true}"#))
            .mount(&server)
            .await;
        stop()
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let outcome = controller(&server).stop_active_alarm_if_any().await.expect("workflow");
        assert!(outcome.stopped);
        assert_eq!(outcome.detail, json!("OK"));
    }

    #[tokio::test]
    async fn test_query_failure_keeps_session() {
        let server = MockServer::start().await;
        mount_auth(&server, 2).await;
        query()
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let controller = controller(&server);
        let err = controller.stop_active_alarm_if_any().await.unwrap_err();
        assert!(matches!(err, AlarmError::Upstream(ApiError::Upstream { status: 500, .. })));
        assert_eq!(err.kind(), "upstream");

        let status = controller.sessions().status();
        assert!(status.authenticated);
        assert_eq!(status.user_id.as_deref(), Some("U1"));

        // Login mock expects exactly one call, so this run must reuse the session
        let outcome = controller.stop_active_alarm_if_any().await.expect("second run");
        assert!(!outcome.stopped);
    }

    #[tokio::test]
    async fn test_invalid_query_body_is_parse_error() {
        let server = MockServer::start().await;
        mount_auth(&server, 1).await;
        query()
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;
        stop().respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let err = controller(&server).stop_active_alarm_if_any().await.unwrap_err();
        assert!(matches!(err, AlarmError::Parse(_)));
        assert_eq!(err.kind(), "parse");
    }

    #[tokio::test]
    async fn test_auth_failure_skips_alarm_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/login"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        query().respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let err = controller(&server).stop_active_alarm_if_any().await.unwrap_err();
        assert_eq!(err.kind(), "auth");
        assert!(err.to_string().contains("403"));
    }
}
