#![warn(clippy::pedantic)]

pub mod command_type;
pub mod error;
pub mod utf8;

pub use command_type::CommandType;
pub use error::WireError;
