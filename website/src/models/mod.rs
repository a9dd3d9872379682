pub mod login;
pub mod template;

pub use login::*;
pub use template::*;
