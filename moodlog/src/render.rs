//! Terminal and markdown output.

use chrono::Utc;
use moodlog_core::analytics::{Report, RewardsSnapshot};
use moodlog_core::format::{format_relative_time, plural, progress_bar};
use moodlog_core::Achievement;

const WIDTH: usize = 50;

pub fn print_unlock(achievement: &Achievement) {
    println!(
        "🏆 Achievement unlocked: {} {} - {}",
        achievement.template.icon, achievement.template.title, achievement.template.description
    );
}

fn header(title: &str) {
    println!();
    println!("╭{}╮", "─".repeat(WIDTH));
    println!("│{:^width$}│", title, width = WIDTH);
    println!("╰{}╯", "─".repeat(WIDTH));
    println!();
}

pub fn print_stats(snapshot: &RewardsSnapshot, max_level: u32) {
    let stats = &snapshot.stats;
    header("Your Journal");

    println!("PROGRESS");
    println!("   Level:    {} of {}", stats.level, max_level);
    println!("   Points:   {}", stats.points);
    match snapshot.points_to_next_level {
        Some(needed) => println!(
            "   Next:     {} {}%  ({} to go)",
            progress_bar(snapshot.level_progress, 20),
            snapshot.level_progress,
            plural(needed, "point")
        ),
        None => println!("   Next:     max level reached"),
    }
    println!();

    println!("STREAKS");
    println!("   Current:  {}", plural(stats.current_streak, "day"));
    println!("   Longest:  {}", plural(stats.longest_streak, "day"));
    println!();

    println!("JOURNAL");
    println!("   Entries:  {:<12} Emotions: {}", stats.total_entries, stats.unique_emotions);
    println!("   Triggers: {}", stats.total_triggers);
    println!();

    println!(
        "ACHIEVEMENTS ({}/{})",
        snapshot.unlocked_count(),
        snapshot.achievements.len()
    );
    let now = Utc::now();
    for achievement in &snapshot.achievements {
        let t = &achievement.template;
        match achievement.unlocked_at {
            Some(at) if achievement.unlocked => println!(
                "   {} {:<22} {}",
                t.icon,
                t.title,
                format_relative_time(at, now)
            ),
            _ => println!("   🔒 {:<22} {}", t.title, t.description),
        }
    }
    println!();
}

pub fn print_report(report: &Report) {
    header(&format!("Mood Report: {}", report.period.display_name()));

    let summary = &report.summary;
    if summary.total_entries == 0 {
        println!("  No entries found for this period.");
        println!();
        return;
    }

    println!("SUMMARY");
    println!(
        "   Entries:  {:<12} Active days: {} of {} ({:.0}%)",
        summary.total_entries,
        report.active_days,
        report.total_days,
        report.activity_percentage()
    );
    println!(
        "   Avg intensity: {:.1}   Score: {:+.2}",
        summary.avg_intensity, report.score
    );
    if let Some(dominant) = summary.dominant_emotion {
        println!("   Dominant: {} {}", dominant.emoji(), dominant.label());
    }
    println!();

    if !summary.emotion_breakdown.is_empty() {
        println!("EMOTIONS");
        for row in &summary.emotion_breakdown {
            println!(
                "   {} {:<9} {} {:>3}%  ({}, avg intensity {})",
                row.emotion.emoji(),
                row.emotion.label(),
                progress_bar(row.percentage, 20),
                row.percentage,
                row.count,
                row.avg_intensity
            );
        }
        let split = &summary.sentiment;
        println!(
            "   Positive {}%  Negative {}%  Neutral {}%",
            split.positive_pct, split.negative_pct, split.neutral_pct
        );
        println!();
    }

    if !summary.trigger_counts.is_empty() {
        println!("TOP TRIGGERS");
        for (i, (trigger, count)) in summary.trigger_counts.iter().enumerate() {
            println!("   {}. {:<16} {:>4}", i + 1, trigger, count);
        }
        println!();
    }

    if let Some(trend) = &report.trend {
        println!("TREND");
        println!(
            "   {} {} ({} vs previous, {:+.2} -> {:+.2})",
            trend.trend.arrow(),
            trend.trend.as_str(),
            trend.format_delta(),
            trend.previous_score,
            trend.current_score
        );
        println!();
    }
}

pub fn print_report_markdown(report: &Report) {
    println!("# Mood Report: {}", report.period.display_name());
    println!();

    let summary = &report.summary;
    if summary.total_entries == 0 {
        println!("*No entries found for this period.*");
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Entries | {} |", summary.total_entries);
    println!(
        "| Active days | {} of {} ({:.0}%) |",
        report.active_days,
        report.total_days,
        report.activity_percentage()
    );
    println!("| Average intensity | {:.1} |", summary.avg_intensity);
    println!("| Score | {:+.2} |", report.score);
    if let Some(dominant) = summary.dominant_emotion {
        println!("| Dominant emotion | {} {} |", dominant.emoji(), dominant.label());
    }
    println!();

    if !summary.emotion_breakdown.is_empty() {
        println!("## Emotions");
        println!();
        println!("| Emotion | Entries | Share | Avg intensity |");
        println!("|---------|---------|-------|---------------|");
        for row in &summary.emotion_breakdown {
            println!(
                "| {} {} | {} | {}% | {} |",
                row.emotion.emoji(),
                row.emotion.label(),
                row.count,
                row.percentage,
                row.avg_intensity
            );
        }
        println!();
    }

    if !summary.trigger_counts.is_empty() {
        println!("## Top Triggers");
        println!();
        for (i, (trigger, count)) in summary.trigger_counts.iter().enumerate() {
            println!("{}. **{}** - {}", i + 1, trigger, plural(*count, "time"));
        }
        println!();
    }

    if let Some(trend) = &report.trend {
        println!("## Trend");
        println!();
        println!(
            "{} **{}** ({} vs previous period)",
            trend.trend.arrow(),
            trend.trend.as_str(),
            trend.format_delta()
        );
        println!();
    }

    println!("---");
    println!("*Generated by moodlog*");
}
