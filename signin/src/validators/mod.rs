mod error;

pub use error::{field_messages, flatten_errors};
