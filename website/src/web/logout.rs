use axum::{
    Extension,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{Cookie, Cookies};
use tracing::info;

use crate::{ctx::Ctx, run::AppState};

use super::SESSION_COOKIE;

pub async fn logout_handler(
    cookies: Cookies,
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Some(username) = ctx.session.username() {
        info!("User {} signed out", username);
    }

    state.sessions.clear(&ctx.session_id);
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());

    if headers.get("HX-Request").is_some() {
        return ([("HX-Redirect", "/login")], "Log in").into_response();
    }

    Redirect::to("/login").into_response()
}
