use reqwest::StatusCode;
use snafu::ResultExt;
use tracing::{info, warn};

use crate::{
    Error, Result,
    error::{GENERIC_FAILURE_MESSAGE, HttpResponseParseSnafu},
    models::{LoginFormPayload, SubmissionOutcome, redirect_target},
    run::AppState,
    services::parse_response_error,
};
use signin::dto::{AuthResponseDto, CredentialsDto};

/// Sends the credentials to the auth service.
///
/// A single attempt bounded by the client timeout, failures are never retried.
pub async fn authenticate(state: &AppState, data: CredentialsDto) -> Result<AuthResponseDto> {
    let url = state.config.auth_url();
    let response = state
        .client
        .post(url.as_str())
        .json(&data)
        .send()
        .await
        .map_err(|source| {
            if source.is_builder() {
                // Never left the process
                Error::HttpClient {
                    msg: "Unable to build login request".to_string(),
                    source,
                }
            } else {
                Error::Network { source }
            }
        })?;

    match response.status() {
        StatusCode::UNAUTHORIZED => Err(Error::LoginFailed),
        status if status.is_success() => {
            let dto = response
                .json::<AuthResponseDto>()
                .await
                .context(HttpResponseParseSnafu {
                    msg: "Unable to parse login response".to_string(),
                })?;

            if dto.is_success() {
                return Ok(dto);
            }

            if dto.status == StatusCode::UNAUTHORIZED.as_u16() {
                return Err(Error::LoginFailed);
            }

            Err(Error::LoginRejected {
                msg: non_empty(dto.message).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            })
        }
        _ => {
            let msg = parse_response_error(response)
                .await
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            Err(Error::LoginRejected { msg })
        }
    }
}

/// Maps any sign-in failure to the message shown above the form.
pub fn login_error_message(error: &Error) -> String {
    match error {
        Error::LoginFailed | Error::LoginRejected { .. } | Error::Network { .. } => {
            error.to_string()
        }
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}

/// Runs one submission: authenticate, then record the session on success.
pub async fn submit_login(
    state: &AppState,
    session_id: &str,
    payload: &LoginFormPayload,
) -> SubmissionOutcome {
    let result = match authenticate(state, payload.credentials()).await {
        Ok(_) => state.sessions.mark_authenticated(session_id, payload),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            info!("User {} signed in", payload.username);
            SubmissionOutcome::Success {
                redirect_url: redirect_target(
                    payload.next.as_deref(),
                    &state.config.default_redirect,
                ),
            }
        }
        Err(err) => {
            warn!("Sign-in failed for {}: {:?}", payload.username, err);
            SubmissionOutcome::Failure {
                message: login_error_message(&err),
            }
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|val| !val.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::NETWORK_FAILURE_MESSAGE;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(api_url: &str) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "PORT" => Some("8080".to_string()),
            "API_URL" => Some(api_url.to_string()),
            _ => None,
        })
        .unwrap();
        AppState::new(config).unwrap()
    }

    fn payload(next: Option<&str>) -> LoginFormPayload {
        LoginFormPayload {
            username: "alice".to_string(),
            password: "password1".to_string(),
            next: next.map(|val| val.to_string()),
            show_password: false,
        }
    }

    #[tokio::test]
    async fn test_authenticate_sends_json_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "username": "alice",
                "password": "password1"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 200})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let result = authenticate(&state, payload(None).credentials()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Bad credentials"})),
            )
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LoginFailed));
        assert_eq!(login_error_message(&err), "Invalid username or password");
    }

    #[tokio::test]
    async fn test_authenticate_server_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"message": "Account is locked"})),
            )
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert_eq!(login_error_message(&err), "Account is locked");
    }

    #[tokio::test]
    async fn test_authenticate_server_failure_without_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert_eq!(login_error_message(&err), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_authenticate_non_success_status_in_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"status": 423, "message": "Too many attempts"}),
            ))
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert_eq!(login_error_message(&err), "Too many attempts");
    }

    #[tokio::test]
    async fn test_authenticate_unparseable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpResponseParse { .. }));
        assert_eq!(login_error_message(&err), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_authenticate_network_failure() {
        // Nothing listens on port 1
        let state = test_state("http://127.0.0.1:1");
        let err = authenticate(&state, payload(None).credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
        assert_eq!(login_error_message(&err), NETWORK_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_submit_login_success_records_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 200})),
            )
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());

        let outcome = submit_login(&state, "sid", &payload(Some("/reports"))).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                redirect_url: "/reports".to_string()
            }
        );
        assert!(state.sessions.get("sid").is_authenticated());

        let outcome = submit_login(&state, "sid-2", &payload(None)).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                redirect_url: "/dashboard".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_submit_login_failure_leaves_session_alone() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let state = test_state(&mock_server.uri());

        let outcome = submit_login(&state, "sid", &payload(Some("/reports"))).await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Failure {
                message: "Invalid username or password".to_string()
            }
        );
        let data = state.sessions.get("sid");
        assert!(!data.is_authenticated());
        assert!(data.user_data().is_none());
    }
}
