use moodlog_core::Database;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        for dir in [&home, &xdg_data, &xdg_config, &xdg_state] {
            fs::create_dir_all(dir).expect("failed to create test directory");
        }

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("moodlog/journal.db")
    }

    fn write_config(&self, contents: &str) {
        let dir = self.xdg_config.join("moodlog");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(assert_cmd::cargo::cargo_bin!("moodlog"))
            .args(args)
            .env("HOME", &self.home)
            .env("XDG_DATA_HOME", &self.xdg_data)
            .env("XDG_CONFIG_HOME", &self.xdg_config)
            .env("XDG_STATE_HOME", &self.xdg_state)
            .output()
            .unwrap_or_else(|e| panic!("failed to execute moodlog: {e}"))
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "moodlog {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn stats_json(&self, user: &str) -> Value {
        let stdout = self.run_ok(&["--user", user, "stats", "--json"]);
        serde_json::from_str(&stdout).expect("stats --json should print JSON")
    }
}

fn unlocked_ids(snapshot: &Value) -> Vec<String> {
    snapshot["achievements"]
        .as_array()
        .expect("achievements array")
        .iter()
        .filter(|a| a["unlocked"] == Value::Bool(true))
        .map(|a| a["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn add_announces_first_achievement_once() {
    let env = CliTestEnv::new();

    let first = env.run_ok(&[
        "add",
        "Long day but a good walk",
        "--emotion",
        "calm",
        "--intensity",
        "6",
        "--trigger",
        "exercise",
    ]);
    assert!(
        first.contains("Achievement unlocked: ✍️ First Steps"),
        "expected unlock line, got:\n{first}"
    );
    assert!(first.contains("Saved entry. Streak: 1 day"));

    let second = env.run_ok(&["add", "Short note", "--emotion", "happy"]);
    assert!(
        !second.contains("First Steps"),
        "first_entry should not unlock twice, got:\n{second}"
    );

    let db_path = env.db_path();
    assert!(db_path.exists(), "database should exist at {}", db_path.display());
    let db = Database::open(&db_path).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    let entries = db.list_entries("local").expect("failed to list entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].triggers(), ["exercise".to_string()]);
    assert_eq!(
        db.unlocked_achievements("local").unwrap().len(),
        1,
        "only first_entry should be stored"
    );
}

#[test]
fn stats_json_reports_points_and_level() {
    let env = CliTestEnv::new();
    env.run_ok(&["add", "Morning pages", "--emotion", "excited", "--intensity", "8"]);

    let snapshot = env.stats_json("local");
    let stats = &snapshot["stats"];
    assert_eq!(stats["total_entries"], 1);
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["unique_emotions"], 1);
    // 1 entry * 10 + 1 streak day * 5 + 1 achievement * 25
    assert_eq!(stats["points"], 40);
    assert_eq!(stats["level"], 1);
    assert_eq!(unlocked_ids(&snapshot), vec!["first_entry"]);
}

#[test]
fn users_are_isolated() {
    let env = CliTestEnv::new();
    env.run_ok(&["--user", "alice", "add", "Alice's entry", "--emotion", "sad"]);

    assert_eq!(env.stats_json("alice")["stats"]["total_entries"], 1);
    let bob = env.stats_json("bob");
    assert_eq!(bob["stats"]["total_entries"], 0);
    assert!(unlocked_ids(&bob).is_empty());
}

#[test]
fn monthly_limit_from_config_blocks_add() {
    let env = CliTestEnv::new();
    env.write_config("[limits]\nmonthly_entries = 1\n");

    env.run_ok(&["add", "Only one allowed", "--emotion", "neutral"]);
    let output = env.run(&["add", "One too many", "--emotion", "neutral"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("entry limit reached: 1 of 1"),
        "unexpected stderr:\n{stderr}"
    );
    assert_eq!(env.stats_json("local")["stats"]["total_entries"], 1);
}

#[test]
fn add_rejects_bad_input() {
    let env = CliTestEnv::new();

    let unknown = env.run(&["add", "Hmm", "--emotion", "bewildered"]);
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("unknown emotion"));

    let orphan = env.run(&["add", "Hmm", "--trigger", "work"]);
    assert!(!orphan.status.success());

    let range = env.run(&["add", "Hmm", "--emotion", "sad", "--intensity", "11"]);
    assert!(!range.status.success());

    assert_eq!(env.stats_json("local")["stats"]["total_entries"], 0);
}

#[test]
fn report_exports_current_month() {
    let env = CliTestEnv::new();
    env.run_ok(&["add", "Deadline", "--emotion", "anxious", "--trigger", "work"]);
    env.run_ok(&["add", "Shipped it", "--emotion", "happy", "--trigger", "work"]);

    let json = env.run_ok(&["report", "--export", "json"]);
    let report: Value = serde_json::from_str(&json).expect("report should be JSON");
    assert_eq!(report["summary"]["total_entries"], 2);
    assert_eq!(report["active_days"], 1);
    assert_eq!(report["summary"]["trigger_counts"][0][0], "work");
    assert_eq!(report["summary"]["trigger_counts"][0][1], 2);

    let markdown = env.run_ok(&["report", "--export", "md"]);
    assert!(markdown.starts_with("# Mood Report: "));
    assert!(markdown.contains("## Top Triggers"));
    assert!(markdown.contains("**work** - 2 times"));

    let text = env.run_ok(&["report"]);
    assert!(text.contains("TOP TRIGGERS"));

    let bad = env.run(&["report", "--export", "csv"]);
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("Unknown export format"));
}

#[test]
fn report_for_empty_week_has_no_entries() {
    let env = CliTestEnv::new();
    let stdout = env.run_ok(&["report", "--week", "2020-01-08"]);
    assert!(stdout.contains("Mood Report"));
    assert!(stdout.contains("No entries found for this period."));

    let bad = env.run(&["report", "--month", "2024-13"]);
    assert!(!bad.status.success());
}
