pub mod ai;
pub mod auth;
pub mod chat;
pub mod feedback;
pub mod helper;
pub mod student;
