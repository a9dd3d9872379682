use serde::{Deserialize, Serialize};

/// Body of the outbound sign-in request.
///
/// The password travels as-is; the auth service is expected to sit behind TLS.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsDto {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsDto")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
