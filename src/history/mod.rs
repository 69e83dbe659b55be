use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::dialogue::{Outcome, Severity, Symptom};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No history entry with id {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Triage,
}

/// Details of a completed symptom interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageDetails {
    pub symptom: Symptom,
    pub answers: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub kind: EntryKind,
    pub title: String,
    pub subtitle: String,
    pub details: TriageDetails,
}

/// What a caller supplies; id and date are filled in on insert
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub kind: EntryKind,
    pub title: String,
    pub subtitle: String,
    pub details: TriageDetails,
}

impl NewEntry {
    /// History record for a finished interview. `title` and `advice` are the
    /// texts the user saw.
    pub fn triage(outcome: &Outcome, title: &str, advice: &str) -> Self {
        Self {
            kind: EntryKind::Triage,
            title: title.to_string(),
            subtitle: advice.to_string(),
            details: TriageDetails {
                symptom: outcome.symptom,
                answers: outcome.answers.clone(),
                severity: outcome.advice.severity(),
            },
        }
    }
}

/// JSON-file history log, newest entry first
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries. A missing or unreadable file reads as empty.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read history");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt history");
            Vec::new()
        })
    }

    pub fn add(&self, entry: NewEntry) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.list();
        let now = Utc::now();
        let stored = HistoryEntry {
            id: format!("{}-{}", now.timestamp_millis(), &Uuid::new_v4().simple().to_string()[..8]),
            date: now,
            kind: entry.kind,
            title: entry.title,
            subtitle: entry.subtitle,
            details: entry.details,
        };
        entries.insert(0, stored.clone());
        self.write(&entries)?;
        tracing::debug!(id = %stored.id, "History entry added");
        Ok(stored)
    }

    /// Remove one entry and return what is left
    pub fn remove(&self, id: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        self.write(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        self.write(&[])
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(entries)?;
        let io_err = |source: io::Error| HistoryError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Advice;
    use tempfile::TempDir;

    fn history() -> (TempDir, History) {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("nested").join("history.json"));
        (dir, history)
    }

    fn fever_entry(days: &str) -> NewEntry {
        let outcome = Outcome {
            symptom: Symptom::Fever,
            answers: vec![days.to_string(), "normal".to_string()],
            advice: Advice::FeverMild,
        };
        NewEntry::triage(&outcome, "Fever", "Rest and drink fluids.")
    }

    #[test]
    fn missing_file_lists_empty() {
        let (_dir, history) = history();
        assert!(history.list().is_empty());
    }

    #[test]
    fn corrupt_file_lists_empty() {
        let (dir, _) = history();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(History::new(path).list().is_empty());
    }

    #[test]
    fn add_puts_newest_first() {
        let (_dir, history) = history();
        let first = history.add(fever_entry("1")).unwrap();
        let second = history.add(fever_entry("2")).unwrap();
        assert_ne!(first.id, second.id);

        let entries = history.list();
        assert_eq!(entries, vec![second, first]);
        assert_eq!(entries[0].kind, EntryKind::Triage);
        assert_eq!(entries[0].details.severity, Severity::Mild);
    }

    #[test]
    fn remove_returns_remaining() {
        let (_dir, history) = history();
        let first = history.add(fever_entry("1")).unwrap();
        let second = history.add(fever_entry("2")).unwrap();

        let remaining = history.remove(&first.id).unwrap();
        assert_eq!(remaining, vec![second]);
        assert_eq!(history.list(), remaining);
    }

    #[test]
    fn remove_unknown_id_fails() {
        let (_dir, history) = history();
        history.add(fever_entry("1")).unwrap();
        assert!(matches!(
            history.remove("nope"),
            Err(HistoryError::NotFound(id)) if id == "nope"
        ));
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn clear_empties_log() {
        let (_dir, history) = history();
        history.add(fever_entry("1")).unwrap();
        history.clear().unwrap();
        assert!(history.list().is_empty());
        assert!(history.path().exists());
    }

    #[test]
    fn stored_json_uses_snake_case_tags() {
        let (_dir, history) = history();
        history.add(fever_entry("1")).unwrap();
        let raw = fs::read_to_string(history.path()).unwrap();
        assert!(raw.contains("\"kind\": \"triage\""));
        assert!(raw.contains("\"symptom\": \"fever\""));
    }
}
