use serde::{Deserialize, Serialize};

/// JSON error body returned by the auth service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorMessageDto {
    #[serde(default)]
    pub status_code: Option<u16>,

    pub message: String,

    #[serde(default)]
    pub error: Option<String>,
}
