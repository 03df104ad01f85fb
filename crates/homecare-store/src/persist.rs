//! # Persistent Store Adapter
//!
//! Reads and writes the whole `AppState` document as one JSON blob under
//! one key of a [`KeyValueStore`].
//!
//! ## Load Semantics
//!
//! | Stored blob | Result |
//! |---|---|
//! | absent | seed, write, return the seed |
//! | not JSON, or not an object | copy to `{key}.corrupt`, seed, write, return the seed |
//! | an object with unreadable parts | copy to `{key}.corrupt`, normalize, return it |
//! | an object | normalize and return it |
//!
//! Unreadable parts are those decoding drops, such as a collection stored
//! as an object or a list entry that is not a record (see
//! [`AppState::unreadable_parts`]). The next save writes the document
//! without them, so the copy is the only place they survive.
//!
//! Both recovery paths are logged at `warn` and the caller receives a
//! usable document. Backend I/O failures are not recovered and surface as
//! [`StorageError`].
//!
//! ## Import / Export
//!
//! Export renders the document as pretty-printed JSON, identical in shape
//! to the stored blob. Import parses a user-supplied file and, only if it
//! parses, replaces the stored blob. A failed import changes nothing.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use homecare_core::AppState;

use crate::backend::KeyValueStore;
use crate::error::{json_type_name, ImportError, StorageError};
use crate::seed::seed;

/// Key under which the document is stored.
pub const STORAGE_KEY: &str = "homecare_state_v1";

/// Suffix of the key that preserves an unreadable blob.
const CORRUPT_SUFFIX: &str = ".corrupt";

/// Why a stored or imported blob could not be decoded.
enum DecodeFailure {
    Json(serde_json::Error),
    NotAnObject(&'static str),
}

/// A decoded document and the paths of the raw parts it left behind.
struct Decoded {
    state: AppState,
    dropped: Vec<String>,
}

/// Decode a document, requiring a top-level JSON object, and normalize it.
fn decode(raw: &str, now: DateTime<Utc>) -> Result<Decoded, DecodeFailure> {
    let value: Value = serde_json::from_str(raw).map_err(DecodeFailure::Json)?;
    if !value.is_object() {
        return Err(DecodeFailure::NotAnObject(json_type_name(&value)));
    }
    let dropped = AppState::unreadable_parts(&value);
    let mut state: AppState = serde_json::from_value(value).map_err(DecodeFailure::Json)?;
    state.normalize(now);
    Ok(Decoded { state, dropped })
}

/// Render the document as pretty-printed JSON for download.
pub fn export(state: &AppState) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// File name offered for an export taken at `now`:
/// `homecare_report_YYYYMMDD_HHmm.json`.
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("homecare_report_{}.json", now.format("%Y%m%d_%H%M"))
}

/// The persisted document under one key of a backend.
#[derive(Debug)]
pub struct StateStore<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> StateStore<S> {
    /// A store using the standard [`STORAGE_KEY`].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// A store using a custom key.
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the document, seeding if needed. See the module docs.
    pub fn load(&mut self) -> Result<AppState, StorageError> {
        let now = Utc::now();
        self.load_at(Local::now().date_naive(), now)
    }

    /// [`load`](Self::load) with an explicit clock.
    pub fn load_at(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<AppState, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            tracing::info!(key = %self.key, "no stored state; seeding sample data");
            return self.reseed(today, now);
        };

        match decode(&raw, now) {
            Ok(Decoded { state, dropped }) => {
                if !dropped.is_empty() {
                    let backup_key = self.backup_key();
                    tracing::warn!(
                        key = %self.key,
                        backup = %backup_key,
                        dropped = ?dropped,
                        "stored state has unreadable parts; kept a copy of the original"
                    );
                    self.backend.set(&backup_key, &raw)?;
                }
                tracing::debug!(key = %self.key, records = state.record_count(), "loaded state");
                Ok(state)
            }
            Err(failure) => {
                let reason = match failure {
                    DecodeFailure::Json(e) => e.to_string(),
                    DecodeFailure::NotAnObject(found) => format!("top-level {found}"),
                };
                let backup_key = self.backup_key();
                tracing::warn!(
                    key = %self.key,
                    backup = %backup_key,
                    %reason,
                    "stored state is unreadable; reseeding"
                );
                self.backend.set(&backup_key, &raw)?;
                self.reseed(today, now)
            }
        }
    }

    /// Key holding the copy of a stored blob that could not be fully read.
    pub fn backup_key(&self) -> String {
        format!("{}{CORRUPT_SUFFIX}", self.key)
    }

    fn reseed(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Result<AppState, StorageError> {
        let state = seed(today, now);
        self.save(&state)?;
        Ok(state)
    }

    /// Overwrite the stored blob with the whole document.
    pub fn save(&mut self, state: &AppState) -> Result<(), StorageError> {
        let text = serde_json::to_string(state)?;
        self.backend.set(&self.key, &text)
    }

    /// Delete the stored blob. The next load reseeds.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        tracing::info!(key = %self.key, "removing stored state");
        self.backend.remove(&self.key)
    }

    /// Overwrite the stored blob with an empty document and return it.
    pub fn clear_at(&mut self, now: DateTime<Utc>) -> Result<AppState, StorageError> {
        tracing::info!(key = %self.key, "clearing all records");
        let state = AppState::empty(now);
        self.save(&state)?;
        Ok(state)
    }

    /// Replace the stored blob with an imported document.
    ///
    /// On any decode failure the stored blob is left untouched.
    ///
    /// Parts of the imported document that cannot be read are skipped and
    /// logged at `warn`; the imported file itself is left as it was.
    pub fn import_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<AppState, ImportError> {
        let Decoded { state, dropped } = decode(text, now).map_err(|failure| match failure {
            DecodeFailure::Json(e) => ImportError::InvalidJson(e),
            DecodeFailure::NotAnObject(found) => ImportError::NotAnObject { found },
        })?;
        if !dropped.is_empty() {
            tracing::warn!(
                key = %self.key,
                dropped = ?dropped,
                "imported document has unreadable parts"
            );
        }
        self.save(&state)?;
        tracing::info!(key = %self.key, records = state.record_count(), "imported state");
        Ok(state)
    }

    /// [`import_at`](Self::import_at) at the current time.
    pub fn import(&mut self, text: &str) -> Result<AppState, ImportError> {
        self.import_at(text, Utc::now())
    }
}
