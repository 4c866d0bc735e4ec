//! moodlog - mood journal CLI
//!
//! Record journal entries, track streaks and achievements, and read
//! weekly or monthly emotion reports.

mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use moodlog_core::analytics::{generate_report, ReportPeriod, Rewards};
use moodlog_core::classify::{annotate, ManualClassification};
use moodlog_core::limits::{check_entry_limit, month_start};
use moodlog_core::{Achievement, Config, Database, Emotion, JournalEntry};

#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(about = "Mood journal with streaks, achievements and emotion reports")]
#[command(version)]
struct Args {
    /// Journal owner
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a journal entry
    Add {
        /// Entry text
        text: String,

        /// Primary emotion (happy, sad, anxious, angry, neutral, excited, calm)
        #[arg(long)]
        emotion: Option<String>,

        /// Intensity from 1 to 10
        #[arg(long, default_value_t = 5)]
        intensity: i64,

        /// Trigger label, repeatable
        #[arg(long = "trigger")]
        triggers: Vec<String>,
    },

    /// Show streaks, points, level and achievements
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Emotion report for a week or month (default: current month)
    Report {
        /// Week containing this date (format: YYYY-MM-DD)
        #[arg(long, conflicts_with = "month")]
        week: Option<String>,

        /// Month to report on (format: YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,

        /// Skip the trend comparison
        #[arg(long)]
        no_trend: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = moodlog_core::logging::init(&config.logging).ok();

    let db = Database::open(&Config::database_path()).context("failed to open database")?;
    db.migrate().context("failed to run migrations")?;

    let rewards = Rewards::new(
        config.templates(),
        config.level_curve().context("invalid level curve")?,
    );

    match args.command {
        Command::Add {
            text,
            emotion,
            intensity,
            triggers,
        } => add_entry(
            &db, &config, &rewards, &args.user, text, emotion, intensity, triggers,
        ),
        Command::Stats { json } => show_stats(&db, &rewards, &args.user, json),
        Command::Report {
            week,
            month,
            export,
            no_trend,
        } => show_report(
            &db,
            &config,
            &args.user,
            week.as_deref(),
            month.as_deref(),
            export.as_deref(),
            no_trend,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn add_entry(
    db: &Database,
    config: &Config,
    rewards: &Rewards,
    user: &str,
    text: String,
    emotion: Option<String>,
    intensity: i64,
    triggers: Vec<String>,
) -> Result<()> {
    let now = Local::now();

    let used = db
        .count_entries_since(user, month_start(&now))
        .context("failed to count entries")?;
    let remaining = check_entry_limit(used, config.limits.monthly_entries)?;

    let annotation = match emotion {
        Some(label) => {
            if let Err(e) = label.parse::<Emotion>() {
                bail!(
                    "{}. Use one of: {}",
                    e,
                    Emotion::ALL.map(|e| e.as_str()).join(", ")
                );
            }
            if !(1..=10).contains(&intensity) {
                bail!("Intensity must be between 1 and 10");
            }
            annotate(&ManualClassification::new(label, intensity, triggers), &text)
        }
        None if !triggers.is_empty() => bail!("--trigger requires --emotion"),
        None => None,
    };

    let entry = JournalEntry::new(text, now.with_timezone(&Utc), annotation);
    db.insert_entry(user, &entry)
        .context("failed to store entry")?;
    tracing::info!(user, id = %entry.id, "Entry stored");

    let prior = rewards.restore(
        &db.unlocked_achievements(user)
            .context("failed to load achievements")?,
    );
    let entries = db.list_entries(user).context("failed to load entries")?;

    let mut announce = |a: &Achievement| render::print_unlock(a);
    let snapshot = rewards.recompute_with(&entries, &prior, &now, &mut announce);
    db.record_unlocks(user, &snapshot.newly_unlocked)
        .context("failed to save achievements")?;

    println!(
        "Saved entry. Streak: {} · Level {} ({} pts)",
        moodlog_core::format::plural(snapshot.stats.current_streak, "day"),
        snapshot.stats.level,
        snapshot.stats.points
    );
    if config.limits.monthly_entries.is_some() {
        println!(
            "{} left this month",
            moodlog_core::format::plural(remaining.saturating_sub(1), "entry slot")
        );
    }

    Ok(())
}

fn show_stats(db: &Database, rewards: &Rewards, user: &str, json: bool) -> Result<()> {
    let now = Local::now();
    let prior = rewards.restore(
        &db.unlocked_achievements(user)
            .context("failed to load achievements")?,
    );
    let entries = db.list_entries(user).context("failed to load entries")?;

    // Catalogue changes can make existing entries qualify
    let snapshot = rewards.recompute(&entries, &prior, &now);
    db.record_unlocks(user, &snapshot.newly_unlocked)
        .context("failed to save achievements")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        render::print_stats(&snapshot, rewards.curve().max_level());
    }
    Ok(())
}

fn show_report(
    db: &Database,
    config: &Config,
    user: &str,
    week: Option<&str>,
    month: Option<&str>,
    export: Option<&str>,
    no_trend: bool,
) -> Result<()> {
    let today = Local::now().date_naive();
    let week_start = config.reports.week_starts_on.weekday();

    let period = if let Some(date_str) = week {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .context("Invalid week date. Use YYYY-MM-DD (e.g., 2024-12-02)")?;
        ReportPeriod::week_containing(date, week_start)
    } else if let Some(month_str) = month {
        // Parse YYYY-MM format
        let parts: Vec<&str> = month_str.split('-').collect();
        if parts.len() != 2 {
            bail!("Invalid month format. Use YYYY-MM (e.g., 2024-12)");
        }
        let year: i32 = parts[0].parse().context("Invalid year")?;
        let month: u32 = parts[1].parse().context("Invalid month")?;
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12");
        }
        ReportPeriod::Month(year, month)
    } else {
        ReportPeriod::month_containing(today)
    };

    let mut report_config = config.report_config();
    report_config.include_trend = !no_trend;

    let entries = db.list_entries(user).context("failed to load entries")?;
    let report = generate_report(&entries, period, &report_config, &Local);

    match export {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        Some("md") => render::print_report_markdown(&report),
        Some(other) => bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => render::print_report(&report),
    }

    Ok(())
}
