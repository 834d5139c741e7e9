//! Knowledge file persistence
//!
//! The file is a JSON array of `{"question": ..., "answer": ...}` records.
//! A missing or unreadable file is never fatal: callers get the built-in
//! defaults and a status describing what went wrong. An unreadable file is
//! renamed to `<name>.corrupt` so later saves cannot clobber it.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ChatError, Result};
use crate::memory::knowledge::{default_entries, KnowledgeEntry};

/// How the knowledge entries were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Read from disk
    Loaded { count: usize },
    /// No file yet, defaults used
    Missing,
    /// File present but unusable, defaults used. `backup` is where the bad
    /// file was moved; `None` means it is still in place.
    Corrupt {
        reason: String,
        backup: Option<PathBuf>,
    },
}

impl LoadStatus {
    pub fn used_defaults(&self) -> bool {
        !matches!(self, LoadStatus::Loaded { .. })
    }

    /// Whether writing to the original path would destroy unread data
    pub fn blocks_save(&self) -> bool {
        matches!(self, LoadStatus::Corrupt { backup: None, .. })
    }
}

/// Knowledge file load/save
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file, failing on any problem
    pub fn load(&self) -> Result<Vec<KnowledgeEntry>> {
        let json = fs::read_to_string(&self.path)?;
        let records: Vec<KnowledgeEntry> = serde_json::from_str(&json)?;

        let total = records.len();
        let entries: Vec<KnowledgeEntry> = records
            .into_iter()
            .filter(|e| !e.question.trim().is_empty())
            .collect();
        if entries.len() < total {
            warn!(
                path = %self.path.display(),
                skipped = total - entries.len(),
                "Skipping knowledge records with empty questions"
            );
        }
        Ok(entries)
    }

    /// Load the file, falling back to the built-in defaults
    pub fn load_or_default(&self) -> (Vec<KnowledgeEntry>, LoadStatus) {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Knowledge file not found, using defaults");
            return (default_entries(), LoadStatus::Missing);
        }

        match self.load() {
            Ok(entries) => {
                debug!(path = %self.path.display(), count = entries.len(), "Loaded knowledge file");
                let count = entries.len();
                (entries, LoadStatus::Loaded { count })
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Knowledge file unusable, using defaults");
                let backup = match self.set_aside() {
                    Ok(backup) => {
                        warn!(
                            path = %self.path.display(),
                            backup = %backup.display(),
                            "Moved unreadable knowledge file aside"
                        );
                        Some(backup)
                    }
                    Err(err) => {
                        warn!(path = %self.path.display(), error = %err, "Could not move knowledge file aside");
                        None
                    }
                };
                (
                    default_entries(),
                    LoadStatus::Corrupt {
                        reason: e.to_string(),
                        backup,
                    },
                )
            }
        }
    }

    /// Rename the current file to the first free `<name>.corrupt[.N]`
    fn set_aside(&self) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(ChatError::StoreProtected(self.path.display().to_string()));
        }

        let base = self.path.as_os_str().to_os_string();
        let mut n = 0usize;
        let backup = loop {
            let mut candidate = base.clone();
            candidate.push(".corrupt");
            if n > 0 {
                candidate.push(format!(".{}", n));
            }
            let candidate = PathBuf::from(candidate);
            if !candidate.exists() {
                break candidate;
            }
            n += 1;
        };

        fs::rename(&self.path, &backup)?;
        Ok(backup)
    }

    /// Write all entries, creating parent directories as needed
    pub fn save(&self, entries: &[KnowledgeEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = entries.len(), "Saved knowledge file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_preserves_set() {
        let dir = TempDir::new().unwrap();
        let store = KnowledgeStore::new(dir.path().join("kb.json"));
        let entries = vec![
            KnowledgeEntry::new("What is the capital of France?", "Paris."),
            KnowledgeEntry::new("Who wrote Hamlet?", "Shakespeare."),
        ];

        store.save(&entries).unwrap();
        let loaded = store.load().unwrap();

        let before: HashSet<_> = entries.into_iter().collect();
        let after: HashSet<_> = loaded.into_iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = KnowledgeStore::new(dir.path().join("absent.json"));

        let (entries, status) = store.load_or_default();
        assert_eq!(status, LoadStatus::Missing);
        assert_eq!(entries, default_entries());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, "{ not json").unwrap();

        let (entries, status) = KnowledgeStore::new(&path).load_or_default();
        assert!(matches!(status, LoadStatus::Corrupt { .. }));
        assert!(status.used_defaults());
        assert!(!entries.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        let original = r#"[{"question": "What is my dog called?", "answer": "Rex"},]"#;
        fs::write(&path, original).unwrap();

        let store = KnowledgeStore::new(&path);
        let (_, status) = store.load_or_default();
        let backup = match &status {
            LoadStatus::Corrupt {
                backup: Some(backup),
                ..
            } => backup.clone(),
            other => panic!("unexpected status {:?}", other),
        };
        assert!(!status.blocks_save());
        assert_eq!(backup, dir.path().join("kb.json.corrupt"));
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);

        // A second bad file does not replace the first backup
        fs::write(&path, "still broken").unwrap();
        let (_, status) = store.load_or_default();
        assert!(matches!(
            status,
            LoadStatus::Corrupt { backup: Some(ref b), .. } if *b == dir.path().join("kb.json.corrupt.1")
        ));
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);
    }

    #[test]
    fn test_unmovable_file_blocks_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        fs::create_dir(&path).unwrap();

        let (_, status) = KnowledgeStore::new(&path).load_or_default();
        assert!(matches!(status, LoadStatus::Corrupt { backup: None, .. }));
        assert!(status.blocks_save());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, r#"[{"q": "missing fields"}]"#).unwrap();

        let (_, status) = KnowledgeStore::new(&path).load_or_default();
        assert!(matches!(status, LoadStatus::Corrupt { .. }));
    }

    #[test]
    fn test_blank_questions_skipped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(
            &path,
            r#"[{"question": "", "answer": "x"}, {"question": "q", "answer": "a"}]"#,
        )
        .unwrap();

        let (entries, status) = KnowledgeStore::new(&path).load_or_default();
        assert_eq!(status, LoadStatus::Loaded { count: 1 });
        assert_eq!(entries[0].question, "q");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("kb.json");
        KnowledgeStore::new(&path).save(&default_entries()).unwrap();
        assert!(path.exists());
    }
}
