use axum::http::{self, StatusCode};
use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// Shown when the auth service cannot be reached at all.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Shown for any failure that carries no better explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Login failed. Please try again later.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Config error: {}", msg))]
    Config { msg: String },

    #[snafu(display("Unable to bind to {}: {}", addr, source))]
    ServerBind {
        addr: String,
        source: std::io::Error,
    },

    #[snafu(display("Server error: {}", source))]
    Serve { source: std::io::Error },

    #[snafu(display("Failed to render template: {}", source))]
    Template { source: askama::Error },

    #[snafu(display("Response builder error: {}", source))]
    ResponseBuilder { source: http::Error },

    #[snafu(display("Failed to serialize session data: {}", source))]
    SessionData { source: serde_json::Error },

    #[snafu(display("{}", msg))]
    NotFound { msg: String },

    #[snafu(display("{}: {}", msg, source))]
    HttpClient { msg: String, source: reqwest::Error },

    #[snafu(display("{}: {}", msg, source))]
    HttpResponseParse { msg: String, source: reqwest::Error },

    /// The request went out but no response came back
    #[snafu(display("{}", NETWORK_FAILURE_MESSAGE))]
    Network { source: reqwest::Error },

    #[snafu(display("Invalid username or password"))]
    LoginFailed,

    /// The auth service answered but refused the sign-in for another reason
    #[snafu(display("{}", msg))]
    LoginRejected { msg: String },
}

/// Allow Error to be converted to StatusCode
impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::LoginFailed => StatusCode::UNAUTHORIZED,
            Error::LoginRejected { .. } => StatusCode::UNAUTHORIZED,
            Error::Network { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Allow errors to be rendered as response
impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        let error_info = ErrorInfo::from(&self);

        // The response mapper renders the actual page
        let mut res = Response::builder()
            .status(error_info.status_code)
            .body(Body::empty())
            .unwrap_or_default();

        res.extensions_mut().insert(error_info);
        res
    }
}

#[derive(Clone, Debug)]
pub struct ErrorInfo {
    pub status_code: StatusCode,
    pub title: String,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        let status_code: StatusCode = e.into();
        let message = if status_code.is_server_error() {
            // Internal details stay in the logs
            tracing::error!("{}", e);
            "Something went wrong. Please try again later.".to_string()
        } else {
            e.to_string()
        };

        Self {
            status_code,
            title: status_code
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message,
        }
    }
}
