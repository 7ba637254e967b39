//! HTTP route handlers

pub mod auth;
pub mod progress;
pub mod reports;
pub mod users;
