//! Filesystem locations for local state.
//!
//! The data directory comes from `TUTORLY_DATA_DIR` when set, otherwise
//! `~/.tutorly`. The default SQLite database lives inside it.

use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "TUTORLY_DATA_DIR";

const DATABASE_FILE: &str = "tutorly.db";

/// Resolve the data directory without creating it.
pub fn data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tutorly"),
    }
}

/// `sqlite://` URL of the default database, created on first open.
pub fn default_database_url() -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir().join(DATABASE_FILE).display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("tutorly.db?mode=rwc"));
    }

    #[test]
    fn test_data_dir_is_absolute_or_explicit() {
        let dir = data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
