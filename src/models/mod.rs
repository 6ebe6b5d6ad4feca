//! Database models shared across the repository.

pub mod member;
pub mod team;

#[cfg(feature = "server")]
pub mod config;
