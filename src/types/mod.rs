mod auth;
mod chat;
mod health;
mod message;
mod profile;

pub use auth::*;
pub use chat::*;
pub use health::*;
pub use message::*;
pub use profile::*;
