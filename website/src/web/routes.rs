use axum::handler::HandlerWithoutStateExt;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, get_service, post};
use axum::{Router, extract::State, middleware};
use std::path::Path;
use tower_http::services::ServeDir;
use tracing::error;

use crate::error::ErrorInfo;
use crate::run::AppState;
use crate::web::middleware::{require_auth_middleware, session_middleware};
use crate::web::security_headers::add_security_headers;
use crate::web::{
    continue_handler, dashboard_handler, error_handler, handle_error, login_handler,
    logout_handler, post_login_handler, toggle_password_handler, validate_login_handler,
};

pub fn all_routes(state: AppState) -> Router {
    Router::new()
        .merge(public_routes(state.clone()))
        .merge(private_routes(state.clone()))
        .merge(assets_routes(&state.config.assets_dir))
        .fallback(error_handler)
        .layer(middleware::from_fn(add_security_headers))
}

pub fn assets_routes(dir: &Path) -> Router {
    Router::new().nest_service(
        "/assets",
        get_service(
            ServeDir::new(dir.join("assets"))
                .not_found_service(file_not_found.into_service()),
        ),
    )
}

async fn file_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "File not found")
}

pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/login", get(login_handler).post(post_login_handler))
        .route("/login/validate", post(validate_login_handler))
        .route("/login/toggle-password", post(toggle_password_handler))
        .route("/login/continue", get(continue_handler))
        .route("/logout", post(logout_handler))
        .layer(middleware::map_response(response_mapper))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

pub fn private_routes(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .layer(middleware::map_response(response_mapper))
        .route_layer(middleware::from_fn(require_auth_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config.default_redirect)
}

async fn response_mapper(headers: HeaderMap, res: Response) -> Response {
    let error = res.extensions().get::<ErrorInfo>();
    if let Some(e) = error {
        if e.status_code.is_server_error() {
            error!("{}", e.message);
        }

        let full_page = headers.get("HX-Request").is_none();
        return handle_error(e.clone(), full_page);
    }
    res
}
