pub mod chat;
pub mod users;
