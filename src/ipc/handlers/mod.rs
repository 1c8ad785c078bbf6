pub mod admin;
pub mod auth;
pub mod core;
pub mod students;
pub mod subjects;
