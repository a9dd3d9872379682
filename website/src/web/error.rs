use askama::Template;
use axum::{body::Body, response::Response};

use crate::{
    Error,
    error::ErrorInfo,
    models::TemplateData,
};

#[derive(Clone, Template)]
#[template(path = "pages/error.html")]
struct ErrorPageData {
    t: TemplateData,
    error: ErrorInfo,
}

#[derive(Clone, Template)]
#[template(path = "widgets/error.html")]
struct ErrorWidgetData {
    error: ErrorInfo,
}

pub async fn error_handler() -> Response<Body> {
    let error = Error::NotFound {
        msg: "The page you are looking for cannot be found.".to_string(),
    };
    handle_error(ErrorInfo::from(&error), true)
}

/// Render an error page or an error widget
pub fn handle_error(error: ErrorInfo, full_page: bool) -> Response<Body> {
    let status_code = error.status_code;
    let fallback = error.message.clone();

    let rendered = if full_page {
        let t = TemplateData::new(&error.title, false);
        ErrorPageData { t, error }.render()
    } else {
        ErrorWidgetData { error }.render()
    };

    // Plain text is better than nothing when the template itself fails
    let body = rendered.unwrap_or(fallback);

    let mut res = Response::new(Body::from(body));
    *res.status_mut() = status_code;
    res
}
