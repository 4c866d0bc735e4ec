//! Database repository layer
//!
//! Entry and unlock storage keyed by user id. The analytics never call into
//! this module; the host loads entries, recomputes, and writes unlocks back.

use crate::error::{Error, Result};
use crate::types::{Achievement, EmotionAnnotation, JournalEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const ENTRY_COLUMNS: &str =
    "id, created_at, content, primary_emotion, intensity, triggers";

/// SQLite-backed entry store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::run_migrations(&conn)
    }

    /// A panic while holding the lock cannot leave SQLite half-written, so a
    /// poisoned mutex is still safe to use.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================
    // Entry operations
    // ============================================

    /// Store a new entry for `user_id`.
    pub fn insert_entry(&self, user_id: &str, entry: &JournalEntry) -> Result<()> {
        if entry.content.trim().is_empty() {
            return Err(Error::InvalidEntry("entry content is empty".to_string()));
        }

        let (emotion, intensity, triggers) = match &entry.emotion {
            Some(annotation) => (
                Some(annotation.primary_emotion.as_str()),
                Some(annotation.intensity as i64),
                Some(serde_json::to_string(&annotation.triggers)?),
            ),
            None => (None, None, None),
        };

        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO entries (id, user_id, created_at, content, primary_emotion, intensity, triggers)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.id,
                user_id,
                format_ts(entry.created_at),
                entry.content,
                emotion,
                intensity,
                triggers,
            ],
        )?;

        tracing::debug!(entry_id = %entry.id, user_id, "Entry stored");
        Ok(())
    }

    /// Get a single entry.
    pub fn get_entry(&self, user_id: &str, id: &str) -> Result<Option<JournalEntry>> {
        let conn = self.conn();
        let entry = conn
            .query_row(
                &format!(
                    "SELECT {} FROM entries WHERE user_id = ?1 AND id = ?2",
                    ENTRY_COLUMNS
                ),
                params![user_id, id],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Delete an entry.
    pub fn delete_entry(&self, user_id: &str, id: &str) -> Result<()> {
        let conn = self.conn();
        let deleted = conn.execute(
            "DELETE FROM entries WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if deleted == 0 {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        Ok(())
    }

    /// All entries for a user, newest first.
    pub fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM entries WHERE user_id = ?1 ORDER BY created_at DESC, id",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![user_id], Self::row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Entries created in `[start, end)`, newest first.
    pub fn entries_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<JournalEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM entries
            WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
            ORDER BY created_at DESC, id
            "#,
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(
                params![user_id, format_ts(start), format_ts(end)],
                Self::row_to_entry,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Number of entries created at or after `since`.
    pub fn count_entries_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u32> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE user_id = ?1 AND created_at >= ?2",
            params![user_id, format_ts(since)],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    fn row_to_entry(row: &Row) -> rusqlite::Result<JournalEntry> {
        let created_at_str: String = row.get("created_at")?;
        let emotion: Option<String> = row.get("primary_emotion")?;
        let intensity: Option<i64> = row.get("intensity")?;
        let triggers_str: Option<String> = row.get("triggers")?;

        let created_at = parse_ts(&created_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
        })?;

        // Rows are normalized the same way as fresh classifier output
        let emotion = match emotion {
            Some(label) => {
                let triggers: Vec<String> = match triggers_str {
                    Some(s) => serde_json::from_str(&s).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                    })?,
                    None => Vec::new(),
                };
                Some(EmotionAnnotation::from_raw(
                    &label,
                    intensity.unwrap_or(1),
                    triggers,
                ))
            }
            None => None,
        };

        Ok(JournalEntry {
            id: row.get("id")?,
            created_at,
            content: row.get("content")?,
            emotion,
        })
    }

    // ============================================
    // Achievement unlock operations
    // ============================================

    /// Persisted unlock times by achievement id.
    pub fn unlocked_achievements(&self, user_id: &str) -> Result<HashMap<String, DateTime<Utc>>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT achievement_id, unlocked_at FROM achievement_unlocks WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                let id: String = row.get(0)?;
                let at: String = row.get(1)?;
                Ok((id, at))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut unlocks = HashMap::with_capacity(rows.len());
        for (id, at) in rows {
            match parse_ts(&at) {
                Ok(ts) => {
                    unlocks.insert(id, ts);
                }
                Err(e) => {
                    tracing::warn!(achievement = %id, error = %e, "Skipping unreadable unlock time")
                }
            }
        }
        Ok(unlocks)
    }

    /// Persist unlock times. The first recorded time for an achievement
    /// wins; later writes for the same id are ignored.
    ///
    /// Returns the number of newly recorded unlocks.
    pub fn record_unlocks(&self, user_id: &str, achievements: &[Achievement]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut recorded = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO achievement_unlocks (user_id, achievement_id, unlocked_at)
                VALUES (?1, ?2, ?3)
                "#,
            )?;
            for achievement in achievements.iter().filter(|a| a.unlocked) {
                let Some(at) = achievement.unlocked_at else {
                    continue;
                };
                recorded += stmt.execute(params![user_id, achievement.id(), format_ts(at)])?;
            }
        }
        tx.commit()?;
        Ok(recorded)
    }
}

/// Fixed-width UTC timestamps so string order matches time order.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AchievementKind, AchievementTemplate, Emotion};
    use chrono::Duration;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn base() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    fn entry(offset_hours: i64, emotion: Option<Emotion>) -> JournalEntry {
        JournalEntry::new(
            "Today I wrote something",
            base() + Duration::hours(offset_hours),
            emotion.map(|e| EmotionAnnotation::new(e, 6, vec!["work".into(), "sleep".into()])),
        )
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = test_db();
        let original = entry(0, Some(Emotion::Anxious));
        db.insert_entry("alice", &original).unwrap();

        let loaded = db.get_entry("alice", &original.id).unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(db.get_entry("bob", &original.id).unwrap().is_none());
    }

    #[test]
    fn test_unannotated_entry() {
        let db = test_db();
        let original = entry(0, None);
        db.insert_entry("alice", &original).unwrap();
        let loaded = db.get_entry("alice", &original.id).unwrap().unwrap();
        assert!(loaded.emotion.is_none());
    }

    #[test]
    fn test_empty_content_rejected() {
        let db = test_db();
        let mut blank = entry(0, None);
        blank.content = "   ".to_string();
        assert!(matches!(
            db.insert_entry("alice", &blank),
            Err(Error::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_list_newest_first_per_user() {
        let db = test_db();
        db.insert_entry("alice", &entry(-48, Some(Emotion::Sad))).unwrap();
        db.insert_entry("alice", &entry(0, Some(Emotion::Happy))).unwrap();
        db.insert_entry("alice", &entry(-24, None)).unwrap();
        db.insert_entry("bob", &entry(0, Some(Emotion::Calm))).unwrap();

        let entries = db.list_entries("alice").unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(entries[0].primary_emotion(), Some(Emotion::Happy));
    }

    #[test]
    fn test_entries_between_and_count() {
        let db = test_db();
        for hours in [-72, -30, -2, 0] {
            db.insert_entry("alice", &entry(hours, Some(Emotion::Neutral)))
                .unwrap();
        }
        let window = db
            .entries_between("alice", base() - Duration::hours(48), base())
            .unwrap();
        assert_eq!(window.len(), 2);

        let since = db
            .count_entries_since("alice", base() - Duration::hours(2))
            .unwrap();
        assert_eq!(since, 2);
    }

    #[test]
    fn test_delete_entry() {
        let db = test_db();
        let e = entry(0, None);
        db.insert_entry("alice", &e).unwrap();
        db.delete_entry("alice", &e.id).unwrap();
        assert!(matches!(
            db.delete_entry("alice", &e.id),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_bad_stored_emotion_is_normalized() {
        let db = test_db();
        db.connection_for_test()
            .execute(
                "INSERT INTO entries (id, user_id, created_at, content, primary_emotion, intensity, triggers)
                 VALUES ('x', 'alice', '2024-06-15T12:00:00.000000Z', 'text', 'ecstatic', 99, '[]')",
                [],
            )
            .unwrap();
        let loaded = db.get_entry("alice", "x").unwrap().unwrap();
        let annotation = loaded.emotion.unwrap();
        assert_eq!(annotation.primary_emotion, Emotion::Neutral);
        assert_eq!(annotation.intensity, 10);
    }

    #[test]
    fn test_first_unlock_time_wins() {
        let db = test_db();
        let template = AchievementTemplate {
            id: "first_entry".into(),
            title: "First".into(),
            description: "d".into(),
            icon: "x".into(),
            requirement: 1,
            kind: AchievementKind::Entries,
        };
        let first = Achievement {
            template: template.clone(),
            unlocked: true,
            unlocked_at: Some(base()),
        };
        let later = Achievement {
            unlocked_at: Some(base() + Duration::days(1)),
            ..first.clone()
        };
        let locked = Achievement::locked(AchievementTemplate {
            id: "other".into(),
            ..template
        });

        assert_eq!(db.record_unlocks("alice", &[first, locked]).unwrap(), 1);
        assert_eq!(db.record_unlocks("alice", &[later]).unwrap(), 0);

        let unlocks = db.unlocked_achievements("alice").unwrap();
        assert_eq!(unlocks.len(), 1);
        assert_eq!(unlocks["first_entry"], base());
        assert!(db.unlocked_achievements("bob").unwrap().is_empty());
    }

    impl Database {
        fn connection_for_test(&self) -> MutexGuard<'_, Connection> {
            self.conn()
        }
    }
}
