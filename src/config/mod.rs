use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locale::Locale;

/// Application-level constants
pub const APP_NAME: &str = "Suvidha";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Delay before the assistant returns to the main menu
pub const DEFAULT_RESET_DELAY_MS: u64 = 800;

const HISTORY_FILE: &str = "history.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Log filter used when RUST_LOG is not set
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "suvidha=debug"
    } else {
        "suvidha=warn"
    }
}

/// Per-user data directory, falling back to the working directory
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("suvidha"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub fn default_history_path() -> PathBuf {
    app_data_dir().join(HISTORY_FILE)
}

/// Preference file in the same directory as the history log
pub fn preferences_path(history_path: &Path) -> PathBuf {
    history_path.with_file_name(PREFERENCES_FILE)
}

/// Settings for one chat run
#[derive(Debug, Clone)]
pub struct Config {
    pub locale: Locale,
    pub reset_delay: Duration,
    /// `None` disables the history log
    pub history_path: Option<PathBuf>,
    /// Where `/lang` remembers the chosen language
    pub preferences_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_path_under_app_data() {
        let path = default_history_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with(HISTORY_FILE));
    }

    #[test]
    fn preferences_sit_beside_history() {
        assert_eq!(
            preferences_path(Path::new("/tmp/suvidha/log.json")),
            PathBuf::from("/tmp/suvidha/preferences.json")
        );
        assert_eq!(
            preferences_path(&default_history_path()),
            app_data_dir().join(PREFERENCES_FILE)
        );
    }

    #[test]
    fn reset_delay_default() {
        assert_eq!(DEFAULT_RESET_DELAY_MS, 800);
    }

    #[test]
    fn verbose_raises_log_level() {
        assert_eq!(default_log_filter(false), "suvidha=warn");
        assert_eq!(default_log_filter(true), "suvidha=debug");
    }

    #[test]
    fn app_name_is_suvidha() {
        assert_eq!(APP_NAME, "Suvidha");
    }
}
