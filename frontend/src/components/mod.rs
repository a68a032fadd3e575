pub mod auth;
pub mod avatar;
pub mod chat;
pub mod forms;
pub mod layout;
pub mod leads;
