use serde::{Deserialize, Serialize};

/// Status value the auth service reports on a successful sign-in.
pub const AUTH_SUCCESS_STATUS: u16 = 200;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponseDto {
    pub status: u16,

    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponseDto {
    pub fn is_success(&self) -> bool {
        self.status == AUTH_SUCCESS_STATUS
    }
}
