//! Database layer for moodlog
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Entry and achievement-unlock queries keyed by user

pub mod repo;
pub mod schema;

pub use repo::Database;
