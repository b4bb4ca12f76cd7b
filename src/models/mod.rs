pub mod chat;
pub mod company;
pub mod message;
pub mod user;

pub use chat::Chat;
pub use company::Company;
pub use message::Message;
pub use user::User;
