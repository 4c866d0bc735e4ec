//! Analytics module for moodlog
//!
//! Turns an entry list into derived views:
//! - Streaks (current and longest consecutive-day runs)
//! - Emotion statistics over any window
//! - Trend scoring between windows
//! - Achievements, points and levels
//! - Weekly/monthly reports
//!
//! Everything here is a pure function of the entries it is given plus an
//! injected "now". Nothing reads the clock or touches the database, so the
//! host recomputes after each change to the entry list.

pub mod achievements;
pub mod leveling;
pub mod report;
pub mod rewards;
pub mod stats;
pub mod streak;
pub mod trend;

pub use achievements::{default_templates, evaluate, Evaluation};
pub use leveling::{points_for, LevelCurve, DEFAULT_LEVEL_THRESHOLDS};
pub use report::{generate_report, Report, ReportConfig, ReportPeriod, TrendComparison};
pub use rewards::{NoopListener, Rewards, RewardsSnapshot, UnlockListener};
pub use stats::{aggregate, aggregate_with, AggregateOptions, EmotionShare, EmotionSummary};
pub use streak::{compute_streak, StreakStats};
pub use trend::{classify_trend, score, Trend};
