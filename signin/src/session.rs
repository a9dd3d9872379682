//! Keys of the session-scoped entries written after a successful sign-in.

/// Boolean flag, stored as `"true"`.
pub const AUTHENTICATED_KEY: &str = "is_authenticated";

/// JSON copy of the submitted form data.
pub const USER_DATA_KEY: &str = "user_data";

pub const AUTHENTICATED_VALUE: &str = "true";
