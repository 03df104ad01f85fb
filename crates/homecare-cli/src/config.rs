//! # Runtime Configuration
//!
//! Where the document lives. Resolution order for the data directory:
//!
//! 1. the `--data-dir` flag,
//! 2. the `HOMECARE_DATA_DIR` environment variable,
//! 3. `./.homecare`.
//!
//! `HOMECARE_STORAGE_KEY` overrides the storage key. Application settings
//! (currency, organisation details, colours) are part of the document,
//! not of this configuration.

use std::path::PathBuf;

use homecare_store::{FileStore, StateStore, STORAGE_KEY};

pub const DATA_DIR_ENV: &str = "HOMECARE_DATA_DIR";
pub const STORAGE_KEY_ENV: &str = "HOMECARE_STORAGE_KEY";
pub const DEFAULT_DATA_DIR: &str = ".homecare";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl Config {
    /// Resolve from the flag and the process environment.
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Self {
        Self::from_sources(
            data_dir_flag,
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(STORAGE_KEY_ENV).ok(),
        )
    }

    /// Resolve from explicit sources. Blank environment values are
    /// ignored.
    pub fn from_sources(
        data_dir_flag: Option<PathBuf>,
        data_dir_env: Option<String>,
        storage_key_env: Option<String>,
    ) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let data_dir = data_dir_flag
            .or_else(|| non_blank(data_dir_env).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let storage_key = non_blank(storage_key_env)
            .map(|k| k.trim().to_string())
            .unwrap_or_else(|| STORAGE_KEY.to_string());
        Self {
            data_dir,
            storage_key,
        }
    }

    /// The file-backed store this configuration points at.
    pub fn state_store(&self) -> StateStore<FileStore> {
        StateStore::with_key(FileStore::new(&self.data_dir), self.storage_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let cfg = Config::from_sources(None, None, None);
        assert_eq!(cfg.data_dir, PathBuf::from(".homecare"));
        assert_eq!(cfg.storage_key, "homecare_state_v1");
    }

    #[test]
    fn flag_beats_environment() {
        let cfg = Config::from_sources(
            Some(PathBuf::from("/srv/home")),
            Some("/var/lib/homecare".into()),
            None,
        );
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/home"));
    }

    #[test]
    fn environment_fills_in_and_blank_is_ignored() {
        let cfg = Config::from_sources(
            None,
            Some("/var/lib/homecare".into()),
            Some(" other ".into()),
        );
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/homecare"));
        assert_eq!(cfg.storage_key, "other");
        let cfg = Config::from_sources(None, Some("  ".into()), Some(String::new()));
        assert_eq!(cfg, Config::from_sources(None, None, None));
    }
}
