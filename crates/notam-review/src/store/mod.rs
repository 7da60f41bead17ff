//! Per-user record store for notam-review.
//!
//! This module provides the CSV-backed feedback store: on first login the
//! reference dataset is copied into a per-user file, which is then mutated
//! in place at the cursor position on every save and never deleted.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{Feedback, UserRow};

/// Review progress for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Rows with feedback saved at least once.
    pub reviewed: usize,
    /// Total rows in the collection.
    pub total: usize,
}

impl Progress {
    /// Reviewed fraction in percent, rounded down. Empty collections are 100%.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        u8::try_from(self.reviewed * 100 / self.total).unwrap_or(100)
    }
}

/// Normalize and validate a username.
///
/// Usernames are lowercased and trimmed; only ASCII alphanumerics, `-`, `_`
/// and `.` are accepted since the name becomes part of a file name.
///
/// # Errors
///
/// Returns [`Error::InvalidUsername`] for empty names or names with other
/// characters.
pub fn normalize_username(raw: &str) -> Result<String> {
    let name = raw.trim().to_lowercase();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidUsername {
            name: raw.to_string(),
        })
    }
}

/// A per-user copy of the record collection with feedback columns.
#[derive(Debug)]
pub struct UserStore {
    /// The (normalized) username this store belongs to.
    username: String,
    /// Path to the user's feedback file.
    path: PathBuf,
    /// All rows, in dataset order.
    rows: Vec<UserRow>,
}

impl UserStore {
    /// Open the feedback store for a user, creating it from the reference
    /// dataset on first login.
    ///
    /// Feedback columns missing from an existing file (older formats) are
    /// backfilled as empty by the row deserializer.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is invalid, the reference dataset is
    /// missing when it is needed, or file I/O fails.
    pub fn open(config: &Config, username: &str) -> Result<Self> {
        let username = normalize_username(username)?;
        let path = config.feedback_path(&username);

        if path.exists() {
            debug!("Loading feedback file {}", path.display());
            let rows = read_rows(&path)?;
            return Ok(Self {
                username,
                path,
                rows,
            });
        }

        let dataset = config.dataset_path();
        if !dataset.exists() {
            return Err(Error::DatasetMissing { path: dataset });
        }

        debug!(
            "Initializing feedback file for '{}' from {}",
            username,
            dataset.display()
        );
        let rows = read_rows(&dataset)?;
        let store = Self {
            username,
            path,
            rows,
        };
        store.persist()?;
        info!(
            "Created feedback file for '{}' with {} records",
            store.username,
            store.rows.len()
        );
        Ok(store)
    }

    /// Open an existing feedback store without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserFileMissing`] if the user has no feedback file.
    pub fn open_existing(config: &Config, username: &str) -> Result<Self> {
        let username = normalize_username(username)?;
        let path = config.feedback_path(&username);
        if !path.exists() {
            return Err(Error::UserFileMissing {
                user: username,
                path,
            });
        }
        let rows = read_rows(&path)?;
        Ok(Self {
            username,
            path,
            rows,
        })
    }

    /// The username this store belongs to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Path to the feedback file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the record at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] past the end of the collection; the
    /// form layer treats that as "review complete".
    pub fn get(&self, index: usize) -> Result<&UserRow> {
        self.rows.get(index).ok_or(Error::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Overwrite the feedback columns of the row at `index` and persist the
    /// whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the write fails.
    pub fn record_feedback(&mut self, index: usize, feedback: &Feedback) -> Result<()> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(Error::RowOutOfRange { index, len })?;
        feedback.apply_to(row);
        self.persist()?;
        debug!("Saved feedback for '{}' at row {}", self.username, index);
        Ok(())
    }

    /// The stored resume position, if any.
    ///
    /// The cursor lives in the `last_index` cell of the first data row.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.rows
            .first()
            .and_then(|row| row.last_index.trim().parse().ok())
    }

    /// Persist the resume position ("exit for today").
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is empty or the write fails.
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        let first = self
            .rows
            .first_mut()
            .ok_or_else(|| Error::internal("cannot set cursor on an empty collection"))?;
        first.last_index = index.to_string();
        self.persist()?;
        info!("Stored cursor {} for '{}'", index, self.username);
        Ok(())
    }

    /// Count reviewed rows vs. total.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            reviewed: self.rows.iter().filter(|r| r.is_reviewed()).count(),
            total: self.rows.len(),
        }
    }

    /// Write all rows back to the feedback file.
    ///
    /// The write goes to a temporary sibling first and is renamed over the
    /// target, so a crash mid-write leaves the previous file intact.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for row in &self.rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Read all rows from a CSV file.
fn read_rows(path: &Path) -> Result<Vec<UserRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<UserRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ImpactLevel;

    fn test_dirs(tag: &str) -> (PathBuf, Config) {
        let base = std::env::temp_dir().join(format!(
            "notam_review_store_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&base);
        std::fs::create_dir_all(&base).unwrap();

        let mut config = Config::default();
        config.dataset.path = Some(base.join("db.csv"));
        config.storage.data_dir = Some(base.join("users"));
        (base, config)
    }

    fn write_dataset(config: &Config, rows: usize) {
        let mut writer = csv::Writer::from_path(config.dataset_path()).unwrap();
        writer
            .write_record([
                "e_line",
                "tag_type",
                "relevance_level",
                "class_impact_med",
                "class_impact_tech",
                "class_impact_land",
            ])
            .unwrap();
        for i in 0..rows {
            writer
                .write_record([
                    &format!("<Purpose>P{i}</Purpose> <Topic>T{i}</Topic> BODY {i}"),
                    "RWY CLSD",
                    "Critical",
                    "Low",
                    "Medium",
                    "High",
                ])
                .unwrap();
        }
        writer.flush().unwrap();
    }

    fn sample_feedback() -> Feedback {
        Feedback {
            style_agrees: true,
            category_correct: true,
            corrected_category: None,
            realism_high: true,
            impact_med: ImpactLevel::Low,
            impact_tech: ImpactLevel::Medium,
            impact_land: ImpactLevel::High,
            notes: String::new(),
        }
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice ").unwrap(), "alice");
        assert_eq!(normalize_username("bob_2.a-c").unwrap(), "bob_2.a-c");
        assert!(normalize_username("").is_err());
        assert!(normalize_username("   ").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username("../escape").is_err());
    }

    #[test]
    fn test_first_login_copies_dataset() {
        let (base, config) = test_dirs("first_login");
        write_dataset(&config, 3);

        let store = UserStore::open(&config, "Alice").unwrap();
        assert_eq!(store.username(), "alice");
        assert_eq!(store.len(), 3);
        assert!(config.feedback_path("alice").exists());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_open_missing_dataset() {
        let (base, config) = test_dirs("missing_dataset");

        let result = UserStore::open(&config, "alice");
        assert!(matches!(result, Err(Error::DatasetMissing { .. })));

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_open_existing_requires_file() {
        let (base, config) = test_dirs("open_existing");
        write_dataset(&config, 2);

        let result = UserStore::open_existing(&config, "ghost");
        assert!(result.unwrap_err().is_user_file_missing());

        UserStore::open(&config, "real").unwrap();
        let store = UserStore::open_existing(&config, "real").unwrap();
        assert_eq!(store.len(), 2);

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_get_out_of_range() {
        let (base, config) = test_dirs("get_oob");
        write_dataset(&config, 2);

        let store = UserStore::open(&config, "alice").unwrap();
        assert!(store.get(1).is_ok());
        let err = store.get(2).unwrap_err();
        assert!(err.is_row_out_of_range());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_record_feedback_persists() {
        let (base, config) = test_dirs("save");
        write_dataset(&config, 3);

        let mut store = UserStore::open(&config, "alice").unwrap();
        store.record_feedback(1, &sample_feedback()).unwrap();

        // Reload from disk and verify the round trip.
        let reloaded = UserStore::open(&config, "alice").unwrap();
        assert!(!reloaded.get(0).unwrap().is_reviewed());
        let row = reloaded.get(1).unwrap();
        assert!(row.is_reviewed());
        assert_eq!(row.fb_style, "2");
        assert_eq!(row.fb_impact_land, "High");
        // Record columns are untouched.
        assert!(row.e_line.contains("BODY 1"));

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_record_feedback_out_of_range() {
        let (base, config) = test_dirs("save_oob");
        write_dataset(&config, 1);

        let mut store = UserStore::open(&config, "alice").unwrap();
        let err = store.record_feedback(5, &sample_feedback()).unwrap_err();
        assert!(err.is_row_out_of_range());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_cursor_round_trip() {
        let (base, config) = test_dirs("cursor");
        write_dataset(&config, 4);

        let mut store = UserStore::open(&config, "alice").unwrap();
        assert_eq!(store.cursor(), None);

        store.set_cursor(2).unwrap();
        assert_eq!(store.cursor(), Some(2));

        // The cursor survives reload and later saves.
        let mut reloaded = UserStore::open(&config, "alice").unwrap();
        assert_eq!(reloaded.cursor(), Some(2));
        reloaded.record_feedback(0, &sample_feedback()).unwrap();
        let again = UserStore::open(&config, "alice").unwrap();
        assert_eq!(again.cursor(), Some(2));

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_cursor_only_on_first_row() {
        let (base, config) = test_dirs("cursor_first");
        write_dataset(&config, 3);

        let mut store = UserStore::open(&config, "alice").unwrap();
        store.set_cursor(1).unwrap();

        let reloaded = UserStore::open(&config, "alice").unwrap();
        assert_eq!(reloaded.get(0).unwrap().last_index, "1");
        assert_eq!(reloaded.get(1).unwrap().last_index, "");
        assert_eq!(reloaded.get(2).unwrap().last_index, "");

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_progress() {
        let (base, config) = test_dirs("progress");
        write_dataset(&config, 4);

        let mut store = UserStore::open(&config, "alice").unwrap();
        assert_eq!(
            store.progress(),
            Progress {
                reviewed: 0,
                total: 4
            }
        );

        store.record_feedback(0, &sample_feedback()).unwrap();
        store.record_feedback(2, &sample_feedback()).unwrap();
        let progress = store.progress();
        assert_eq!(progress.reviewed, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.percent(), 50);

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_progress_percent_empty() {
        let progress = Progress {
            reviewed: 0,
            total: 0,
        };
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let (base, config) = test_dirs("tmp");
        write_dataset(&config, 1);

        let mut store = UserStore::open(&config, "alice").unwrap();
        store.record_feedback(0, &sample_feedback()).unwrap();

        let tmp = config.feedback_path("alice").with_extension("csv.tmp");
        assert!(!tmp.exists());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_reads_pre_feedback_format() {
        // A user file written before the feedback columns existed loads with
        // empty feedback.
        let (base, config) = test_dirs("legacy");
        write_dataset(&config, 2);

        // Place the dataset-format file directly as the user's feedback file.
        std::fs::create_dir_all(config.data_dir()).unwrap();
        std::fs::copy(config.dataset_path(), config.feedback_path("legacy")).unwrap();

        let store = UserStore::open(&config, "legacy").unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.get(0).unwrap().is_reviewed());
        assert_eq!(store.cursor(), None);

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_second_login_does_not_reset_feedback() {
        let (base, config) = test_dirs("relogin");
        write_dataset(&config, 2);

        let mut store = UserStore::open(&config, "alice").unwrap();
        store.record_feedback(0, &sample_feedback()).unwrap();

        // Rewrite the dataset; an existing user file must win over it.
        write_dataset(&config, 5);
        let reloaded = UserStore::open(&config, "alice").unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get(0).unwrap().is_reviewed());

        let _ = std::fs::remove_dir_all(base);
    }
}
