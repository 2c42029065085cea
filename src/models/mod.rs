pub mod chat;
pub mod bot;
