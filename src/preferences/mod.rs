use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::locale::Locale;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to write preferences file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Settings remembered between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Language code last picked with `/lang`
    pub preferred_language: Option<String>,
}

impl Preferences {
    /// The saved language, if it names a known locale
    pub fn locale(&self) -> Option<Locale> {
        let code = self.preferred_language.as_deref()?;
        match code.parse() {
            Ok(locale) => Some(locale),
            Err(e) => {
                tracing::warn!(code, error = %e, "Ignoring saved language");
                None
            }
        }
    }
}

/// JSON preference file kept next to the history log
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved preferences. A missing or unreadable file reads as defaults.
    pub fn load(&self) -> Preferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read preferences"
                );
                return Preferences::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt preferences");
            Preferences::default()
        })
    }

    /// Remember `locale` as the preferred language, keeping other settings
    pub fn set_language(&self, locale: Locale) -> Result<(), PreferencesError> {
        let mut prefs = self.load();
        if prefs.locale() == Some(locale) {
            return Ok(());
        }
        prefs.preferred_language = Some(locale.code().to_string());
        self.save(&prefs)?;
        tracing::debug!(locale = %locale, "Preferred language saved");
        Ok(())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(prefs)?;
        let io_err = |source: io::Error| PreferencesError::Write {
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
    use tempfile::TempDir;

    fn store() -> (TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested").join("preferences.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_has_no_language() {
        let (_dir, store) = store();
        assert_eq!(store.load(), Preferences::default());
        assert_eq!(store.load().locale(), None);
    }

    #[test]
    fn language_survives_reload() {
        let (_dir, store) = store();
        store.set_language(Locale::Tamil).unwrap();
        assert_eq!(store.load().locale(), Some(Locale::Tamil));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"preferredLanguage\": \"ta\""));

        store.set_language(Locale::Hindi).unwrap();
        assert_eq!(PreferenceStore::new(store.path()).load().locale(), Some(Locale::Hindi));
    }

    #[test]
    fn unknown_code_is_ignored() {
        let (dir, _) = store();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{ "preferredLanguage": "fr" }"#).unwrap();
        let prefs = PreferenceStore::new(path).load();
        assert_eq!(prefs.preferred_language.as_deref(), Some("fr"));
        assert_eq!(prefs.locale(), None);
    }

    #[test]
    fn corrupt_file_reads_as_defaults() {
        let (dir, _) = store();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(PreferenceStore::new(path).load(), Preferences::default());
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let store = PreferenceStore::new(blocker.join("preferences.json"));
        assert!(matches!(
            store.set_language(Locale::Bengali),
            Err(PreferencesError::Write { .. })
        ));
    }
}
