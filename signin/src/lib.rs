pub mod dto;
pub mod session;
pub mod validators;
