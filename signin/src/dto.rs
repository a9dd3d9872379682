mod auth;
mod credentials;
mod error;

pub use auth::*;
pub use credentials::*;
pub use error::*;
