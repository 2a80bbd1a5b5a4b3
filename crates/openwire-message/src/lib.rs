#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod message;
pub mod stream;
pub mod text_message;

mod summary;

pub use config::WireFormat;
pub use error::{DecodeError, EncodeError, MessageError, ReadOnlyBodyError};
pub use message::Message;
pub use text_message::{TextBody, TextMessage};
