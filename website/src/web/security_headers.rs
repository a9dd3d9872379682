use axum::{body::Body, extract::Request, http::header, middleware::Next, response::Response};

/// Adds security headers to all responses
pub async fn add_security_headers(req: Request, next: Next) -> Response<Body> {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();

    // Never render the login form inside a frame
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );

    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("same-origin"),
    );

    // Same origin only; htmx is served from /assets
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data:; \
             connect-src 'self'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
