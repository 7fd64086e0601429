pub mod error;
pub mod mail;
pub mod reminder;
pub mod response;
pub mod session;
pub mod user;
