//! # homecare-core: Foundational Types for HomeCare Records
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: the single `AppState` document, the typed record of each
//! named collection, and the identifier and date primitives they use.
//! It performs no I/O; persistence lives in `homecare-store` and
//! aggregation lives in `homecare-query`.
//!
//! ## Key Design Principles
//!
//! 1. **One document.** `AppState` is the complete dataset of one
//!    installation. It is always fully present after decoding: every
//!    collection defaults to empty, `finance` and `meta.settings` default
//!    to fixed values (see [`state`]).
//!
//! 2. **Typed records, lenient decoding.** Each collection has its own
//!    record struct with named optional fields. Field decoding never fails
//!    on a wrong-typed value; numbers accept numeric strings and text
//!    accepts numbers (see [`lenient`]). Unknown fields are kept in an
//!    `extra` map so nothing is lost on a round trip.
//!
//! 3. **`RecordId` is opaque.** An empty id means "not yet assigned".
//!    Generated ids are UUID v4 strings, but any imported string is kept
//!    as-is and compared by exact equality.
//!
//! 4. **No referential integrity.** Dependent records copy a child's name
//!    by value. Nothing here validates or cascades those references.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `homecare-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod collection;
pub mod error;
pub mod identity;
pub mod lenient;
pub mod records;
pub mod state;
pub mod temporal;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use collection::{Collection, CollectionName};
pub use error::ValidationError;
pub use identity::RecordId;
pub use records::{
    Adoption, Announcement, AttendanceRecord, Child, Donation, EducationRecord, Expense,
    HealthRecord, Incident, InventoryItem, MealEntry, Record, ScheduleEvent, StaffMember,
};
pub use state::{AppState, Finance, Meta, Settings, DEFAULT_BUDGET, DEFAULT_CURRENCY};
pub use temporal::{format_iso_date, parse_calendar_date};
pub use validate::{required_fields, FormCheck};
