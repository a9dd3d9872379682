pub mod dashboard;
pub mod error;
pub mod login;
pub mod logout;
pub mod middleware;
pub mod routes;
pub mod security_headers;

use tower_cookies::{Cookie, cookie::SameSite};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

pub use dashboard::*;
pub use error::*;
pub use login::*;
pub use logout::*;
pub use routes::*;

pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// Session scoped cookie: no max age, so the browser drops it when the session ends.
pub fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .build()
}
