use askama::Template;
use axum::{Extension, body::Body, extract::State, http::Response};
use snafu::ResultExt;

use crate::{
    Result,
    ctx::Ctx,
    error::{ResponseBuilderSnafu, TemplateSnafu},
    models::TemplateData,
    run::AppState,
};

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardTemplate {
    t: TemplateData,
    username: String,
}

/// Default landing page after signing in.
pub async fn dashboard_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Response<Body>> {
    let mut t = TemplateData::new("Dashboard", ctx.is_authenticated());
    if !state.htmx {
        t = t.without_scripts();
    }
    let username = ctx.session.username().unwrap_or_default();

    let tpl = DashboardTemplate { t, username };

    Response::builder()
        .status(200)
        .body(Body::from(tpl.render().context(TemplateSnafu)?))
        .context(ResponseBuilderSnafu)
}
