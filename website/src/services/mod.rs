pub mod auth;
pub mod session;

use reqwest::header::CONTENT_TYPE;

use signin::dto::ErrorMessageDto;

/// Pulls a human readable message out of a failed auth service response.
///
/// Returns `None` when the body has nothing usable, callers fall back to a
/// generic message.
pub async fn parse_response_error(response: reqwest::Response) -> Option<String> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|val| val.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();

    let message = if content_type.starts_with("application/json") {
        // Expected response when properly handled by the backend service
        response.json::<ErrorMessageDto>().await.ok()?.message
    } else if content_type.starts_with("text/plain") {
        // Probably some default http error
        response.text().await.ok()?
    } else {
        return None;
    };

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
