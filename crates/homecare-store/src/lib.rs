//! # homecare-store: Persistence and Repository
//!
//! Owns the lifecycle of the `AppState` document between sessions and
//! funnels every mutation through one repository.
//!
//! ## Layers
//!
//! - **Backends** (`backend.rs`): the [`KeyValueStore`] trait, the same
//!   contract as a browser-local key-value store, with an in-memory
//!   implementation and an atomic file-per-key implementation.
//!
//! - **Persistent Store Adapter** (`persist.rs`): [`StateStore`] reads and
//!   writes the whole document under one key, seeds sample data on first
//!   run or when the stored blob is unreadable, and implements import,
//!   export, reset and clear.
//!
//! - **Seed data** (`seed.rs`): the deterministic sample dataset.
//!
//! - **Repository** (`repository.rs`): [`Repository`] holds the in-memory
//!   document and exposes upsert-by-id and remove-by-id for typed records
//!   and for collections addressed by name. Each mutation persists the
//!   whole document before returning.
//!
//! ## Consistency Model
//!
//! Single writer, whole-document overwrite, last write wins. The
//! repository API takes `&mut self`; sharing one across threads requires
//! an external lock, and two processes writing the same backend will
//! silently overwrite each other.

pub mod backend;
pub mod error;
pub mod persist;
pub mod repository;
pub mod seed;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{ImportError, RepositoryError, StorageError};
pub use persist::{export, export_file_name, StateStore, STORAGE_KEY};
pub use repository::{upsert_into, Repository, UpsertOutcome};
pub use seed::seed;
