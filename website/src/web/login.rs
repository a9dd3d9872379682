use askama::Template;
use axum::{
    Extension,
    body::Body,
    extract::{Form, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use snafu::ResultExt;
use tower_cookies::Cookies;
use validator::Validate;

use crate::{
    Result,
    ctx::Ctx,
    error::{ResponseBuilderSnafu, TemplateSnafu},
    models::{
        LoginFormPayload, LoginFormView, LoginSuccessView, SubmissionOutcome, TemplateData,
        redirect_target,
    },
    run::AppState,
    services::auth::submit_login,
};
use signin::validators::flatten_errors;

use super::{new_session_id, session_cookie};

#[derive(Template)]
#[template(path = "pages/login.html")]
struct LoginPageTemplate {
    t: TemplateData,
    form: LoginFormView,
}

#[derive(Template)]
#[template(path = "widgets/login_form.html")]
struct LoginFormTemplate {
    form: LoginFormView,
}

#[derive(Template)]
#[template(path = "pages/login_success.html")]
struct LoginSuccessPageTemplate {
    t: TemplateData,
    success: LoginSuccessView,
}

#[derive(Template)]
#[template(path = "widgets/login_success.html")]
struct LoginSuccessTemplate {
    success: LoginSuccessView,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

pub async fn login_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Result<Response<Body>> {
    if ctx.is_authenticated() {
        let target = redirect_target(query.next.as_deref(), &state.config.default_redirect);
        return Ok(navigate(&headers, target));
    }

    render_form(&state, LoginFormView::new(query.next), true)
}

/// Re-renders the form as the user types so the submit control follows the rules
pub async fn validate_login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<LoginFormPayload>,
) -> Result<Response<Body>> {
    let full_page = headers.get("HX-Request").is_none();
    render_form(&state, LoginFormView::from_payload(&payload, false), full_page)
}

pub async fn toggle_password_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<LoginFormPayload>,
) -> Result<Response<Body>> {
    let full_page = headers.get("HX-Request").is_none();
    let mut form = LoginFormView::from_payload(&payload, false);
    form.toggle_password();
    render_form(&state, form, full_page)
}

pub async fn post_login_handler(
    cookies: Cookies,
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<LoginFormPayload>,
) -> Result<Response<Body>> {
    let full_page = headers.get("HX-Request").is_none();

    // Invalid forms never reach the auth service
    if let Err(err) = payload.validate() {
        let form = LoginFormView::from_payload(&payload, true).with_error(flatten_errors(&err));
        return render_form(&state, form, full_page);
    }

    // Fresh id on sign-in, the pre-login session is discarded
    let session_id = new_session_id();

    match submit_login(&state, &session_id, &payload).await {
        SubmissionOutcome::Success { redirect_url } => {
            // The new session only goes live once the response is ready
            let res = match render_success(&state, &redirect_url, full_page) {
                Ok(res) => res,
                Err(err) => {
                    state.sessions.clear(&session_id);
                    return Err(err);
                }
            };

            cookies.add(session_cookie(session_id, state.config.server.https));
            state.sessions.clear(&ctx.session_id);
            Ok(res)
        }
        SubmissionOutcome::Failure { message } => {
            let form = LoginFormView::from_payload(&payload, true).with_error(message);
            render_form(&state, form, full_page)
        }
    }
}

#[derive(Deserialize)]
pub struct ContinueQuery {
    pub next: Option<String>,
}

/// Navigation step triggered by the success view once the delay has passed
pub async fn continue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ContinueQuery>,
) -> Response<Body> {
    let target = redirect_target(query.next.as_deref(), &state.config.default_redirect);
    navigate(&headers, target)
}

/// htmx follows `HX-Redirect`, plain requests get a 303
fn navigate(headers: &HeaderMap, target: String) -> Response<Body> {
    if headers.get("HX-Request").is_some() {
        return ([("HX-Redirect", target)], "Redirecting").into_response();
    }

    Redirect::to(&target).into_response()
}

fn page_data(state: &AppState, authenticated: bool) -> TemplateData {
    let t = TemplateData::new("Login", authenticated);
    if state.htmx { t } else { t.without_scripts() }
}

fn render_form(state: &AppState, form: LoginFormView, full_page: bool) -> Result<Response<Body>> {
    let form = form.with_scripts(state.htmx);
    let body = if full_page {
        let t = page_data(state, false);
        LoginPageTemplate { t, form }.render()
    } else {
        LoginFormTemplate { form }.render()
    }
    .context(TemplateSnafu)?;

    no_store_response()
        .body(Body::from(body))
        .context(ResponseBuilderSnafu)
}

fn render_success(state: &AppState, redirect_url: &str, full_page: bool) -> Result<Response<Body>> {
    let success = LoginSuccessView::new(redirect_url);

    if full_page {
        let refresh = success.refresh_header();
        let t = page_data(state, true);
        let body = LoginSuccessPageTemplate { t, success }
            .render()
            .context(TemplateSnafu)?;

        return no_store_response()
            .header("Refresh", refresh)
            .body(Body::from(body))
            .context(ResponseBuilderSnafu);
    }

    let body = LoginSuccessTemplate { success }
        .render()
        .context(TemplateSnafu)?;

    no_store_response()
        .body(Body::from(body))
        .context(ResponseBuilderSnafu)
}

fn no_store_response() -> axum::http::response::Builder {
    Response::builder()
        .status(StatusCode::OK)
        .header("Surrogate-Control", "no-store")
        .header(
            "Cache-Control",
            "no-store, no-cache, must-revalidate, proxy-revalidate",
        )
        .header("Pragma", "no-cache")
        .header("Expires", 0)
}
