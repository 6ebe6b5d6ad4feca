//! Domain aggregates and search value objects.

pub mod member;
pub mod predicate;
pub mod search;
pub mod team;
pub mod types;
