//! Business logic services

pub mod reports;
pub mod sessions;
