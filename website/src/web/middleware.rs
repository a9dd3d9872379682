use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{ctx::Ctx, run::AppState};

use super::{SESSION_COOKIE, new_session_id, session_cookie};

/// Loads the session for the request, starting a new one when the browser has none
pub async fn session_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|val| !val.is_empty());

    let session_id = match existing {
        Some(id) => id,
        None => {
            let id = new_session_id();
            cookies.add(session_cookie(id.clone(), state.config.server.https));
            id
        }
    };

    let session = state.sessions.get(&session_id);
    req.extensions_mut().insert(Ctx::new(session_id, session));
    next.run(req).await
}

/// Sends visitors without the authenticated flag to the login page,
/// remembering where they were headed
pub async fn require_auth_middleware(ctx: Extension<Ctx>, req: Request, next: Next) -> Response {
    if ctx.is_authenticated() {
        return next.run(req).await;
    }

    let next_url = req
        .uri()
        .path_and_query()
        .map(|val| val.as_str())
        .unwrap_or("/");
    let login_url = format!("/login?next={}", urlencoding::encode(next_url));

    if req.headers().get("HX-Request").is_some() {
        return ([("HX-Redirect", login_url)], "Login to continue").into_response();
    }

    Redirect::to(&login_url).into_response()
}
