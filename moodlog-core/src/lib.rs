//! # moodlog-core
//!
//! Core library for moodlog - a mood journal with streaks, achievements
//! and emotion reports.
//!
//! This library provides:
//! - Domain types for entries, emotions and achievements
//! - The rewards/statistics engine (pure functions over entry lists)
//! - SQLite entry store
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use moodlog_core::analytics::Rewards;
//! use moodlog_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let rewards = Rewards::new(config.templates(), config.level_curve().expect("bad curve"));
//! let prior = rewards.restore(&db.unlocked_achievements("local").expect("query failed"));
//! let entries = db.list_entries("local").expect("query failed");
//! let snapshot = rewards.recompute(&entries, &prior, &Local::now());
//! println!("level {}", snapshot.stats.level);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod limits;
pub mod logging;
pub mod types;
