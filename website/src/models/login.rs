use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

use signin::dto::CredentialsDto;
use signin::validators::field_messages;

/// Pause between a successful sign-in and the navigation that follows it.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Default, Deserialize, Validate)]
pub struct LoginFormPayload {
    #[serde(default)]
    #[validate(length(min = 3))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 8))]
    pub password: String,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub show_password: bool,
}

impl LoginFormPayload {
    pub fn credentials(&self) -> CredentialsDto {
        CredentialsDto {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Everything the login form widget needs to render itself.
#[derive(Clone, Default)]
pub struct LoginFormView {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
    pub show_password: bool,
    pub username_error: Option<String>,
    pub password_error: Option<String>,
    pub error_message: Option<String>,
    pub submit_enabled: bool,

    /// Set when the page loads htmx, which is what re-enables the submit control
    pub scripted: bool,
}

impl LoginFormView {
    /// Blank form; submit stays disabled until both fields are valid.
    pub fn new(next: Option<String>) -> Self {
        Self {
            next: next.filter(|val| !val.is_empty()),
            ..Default::default()
        }
    }

    /// Form state for the given values.
    ///
    /// With `all_errors` unset, fields the user has not typed into yet do not
    /// show an error message. The submit control follows the rules either way.
    pub fn from_payload(payload: &LoginFormPayload, all_errors: bool) -> Self {
        let mut view = Self {
            username: payload.username.clone(),
            password: payload.password.clone(),
            next: payload.next.clone().filter(|val| !val.is_empty()),
            show_password: payload.show_password,
            ..Default::default()
        };

        if let Err(errors) = payload.validate() {
            let mut messages = field_messages(&errors);
            if all_errors || !payload.username.is_empty() {
                view.username_error = messages.remove("username");
            }
            if all_errors || !payload.password.is_empty() {
                view.password_error = messages.remove("password");
            }
        } else {
            view.submit_enabled = true;
        }

        view
    }

    pub fn with_scripts(mut self, scripted: bool) -> Self {
        self.scripted = scripted;
        self
    }

    /// Without scripts nothing would ever clear `disabled`, so the control
    /// stays usable and the server-side rules guard the submission.
    pub fn submit_disabled(&self) -> bool {
        self.scripted && !self.submit_enabled
    }

    pub fn with_error(mut self, message: String) -> Self {
        self.error_message = Some(message);
        self
    }

    /// Flips between masked and plain text, the value stays as it is.
    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_input_type(&self) -> &'static str {
        if self.show_password {
            "text"
        } else {
            "password"
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.show_password { "Hide" } else { "Show" }
    }
}

/// Result of one submission attempt.
///
/// The pending phase lives in the browser: the form disables its submit
/// control while the request is in flight.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    Success { redirect_url: String },
    Failure { message: String },
}

/// What the success widget renders while waiting to navigate.
#[derive(Clone)]
pub struct LoginSuccessView {
    pub redirect_url: String,
    pub continue_url: String,
    pub delay_secs: u64,
}

impl LoginSuccessView {
    pub fn new(redirect_url: &str) -> Self {
        Self {
            redirect_url: redirect_url.to_string(),
            continue_url: format!(
                "/login/continue?next={}",
                urlencoding::encode(redirect_url)
            ),
            delay_secs: REDIRECT_DELAY.as_secs(),
        }
    }

    /// Value of the `Refresh` header used for plain page loads.
    pub fn refresh_header(&self) -> String {
        format!("{}; url={}", self.delay_secs, self.redirect_url)
    }
}

/// Only same-site absolute paths are accepted as redirect targets.
///
/// Control characters are refused too, the target ends up in a header.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.contains('\\')
        && !url.chars().any(char::is_control)
}

/// Picks where to go after signing in: the prior destination when it is safe,
/// otherwise the default.
pub fn redirect_target(next: Option<&str>, default: &str) -> String {
    match next {
        Some(url) if is_local_path(url) => url.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(username: &str, password: &str) -> LoginFormPayload {
        LoginFormPayload {
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_enabled_rules() {
        assert!(!LoginFormView::from_payload(&payload("", ""), true).submit_enabled);
        assert!(!LoginFormView::from_payload(&payload("", "password1"), true).submit_enabled);
        assert!(!LoginFormView::from_payload(&payload("ab", "password1"), true).submit_enabled);
        assert!(!LoginFormView::from_payload(&payload("alice", ""), true).submit_enabled);
        assert!(!LoginFormView::from_payload(&payload("alice", "short12"), true).submit_enabled);

        assert!(LoginFormView::from_payload(&payload("abc", "12345678"), true).submit_enabled);
        assert!(LoginFormView::from_payload(&payload("alice", "password1"), true).submit_enabled);

        // Length is all that counts, blanks included
        assert!(LoginFormView::from_payload(&payload("   ", "password1"), true).submit_enabled);
        assert!(LoginFormView::from_payload(&payload("alice", "        "), true).submit_enabled);
        assert!(!LoginFormView::from_payload(&payload("alice", "       "), true).submit_enabled);
    }

    #[test]
    fn test_submit_disabled_needs_scripts() {
        let view = LoginFormView::from_payload(&payload("", ""), true);
        assert!(!view.submit_disabled());

        let view = view.with_scripts(true);
        assert!(view.submit_disabled());

        let view = LoginFormView::from_payload(&payload("alice", "password1"), true).with_scripts(true);
        assert!(!view.submit_disabled());
    }

    #[test]
    fn test_new_form_is_disabled() {
        let view = LoginFormView::new(Some("/reports".to_string()));
        assert!(!view.submit_enabled);
        assert_eq!(view.next.as_deref(), Some("/reports"));
        assert!(view.username_error.is_none());
        assert!(view.password_error.is_none());
        assert_eq!(view.password_input_type(), "password");

        let view = LoginFormView::new(Some("".to_string()));
        assert!(view.next.is_none());
    }

    #[test]
    fn test_field_errors() {
        let view = LoginFormView::from_payload(&payload("ab", "short"), false);
        assert_eq!(
            view.username_error.as_deref(),
            Some("must be at least 3 characters")
        );
        assert_eq!(
            view.password_error.as_deref(),
            Some("must be at least 8 characters")
        );

        // Untouched fields stay quiet during live validation
        let view = LoginFormView::from_payload(&payload("alice", ""), false);
        assert!(view.username_error.is_none());
        assert!(view.password_error.is_none());
        assert!(!view.submit_enabled);

        let view = LoginFormView::from_payload(&payload("alice", ""), true);
        assert!(view.password_error.is_some());
    }

    #[test]
    fn test_toggle_password_keeps_value() {
        let mut view = LoginFormView::from_payload(&payload("alice", "password1"), true);
        assert_eq!(view.password_input_type(), "password");
        assert_eq!(view.toggle_label(), "Show");

        view.toggle_password();
        assert_eq!(view.password_input_type(), "text");
        assert_eq!(view.toggle_label(), "Hide");
        assert_eq!(view.password, "password1");

        view.toggle_password();
        assert_eq!(view.password_input_type(), "password");
        assert_eq!(view.password, "password1");
    }

    #[test]
    fn test_redirect_target() {
        assert_eq!(redirect_target(None, "/dashboard"), "/dashboard");
        assert_eq!(redirect_target(Some("/reports?id=1"), "/dashboard"), "/reports?id=1");
        assert_eq!(redirect_target(Some(""), "/dashboard"), "/dashboard");
        assert_eq!(redirect_target(Some("//evil.com"), "/dashboard"), "/dashboard");
        assert_eq!(
            redirect_target(Some("https://evil.com"), "/dashboard"),
            "/dashboard"
        );
        assert_eq!(redirect_target(Some("/\\evil.com"), "/dashboard"), "/dashboard");
        assert_eq!(redirect_target(Some("/a\nb"), "/dashboard"), "/dashboard");
        assert_eq!(redirect_target(Some("/a\tb"), "/dashboard"), "/dashboard");
        assert_eq!(redirect_target(Some("/caf\u{e9}"), "/dashboard"), "/caf\u{e9}");
    }

    #[test]
    fn test_success_view() {
        let view = LoginSuccessView::new("/reports?id=1");
        assert_eq!(view.delay_secs, 1);
        assert_eq!(view.refresh_header(), "1; url=/reports?id=1");
        assert_eq!(view.continue_url, "/login/continue?next=%2Freports%3Fid%3D1");
    }

    #[test]
    fn test_credentials_from_payload() {
        let creds = payload("alice", "password1").credentials();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "password1");
    }
}
