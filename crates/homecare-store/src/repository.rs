//! # State Repository
//!
//! The only writer of the in-memory `AppState`. Every mutation goes
//! through a method here, which applies the change and persists the whole
//! document before returning. If persisting fails the in-memory document
//! is rolled back, so memory and storage never disagree.
//!
//! ## Upsert Rules
//!
//! - A record whose id matches an existing entry replaces that entry in
//!   place, field for field.
//! - Any other record is inserted at the front of its collection. A blank
//!   id is replaced by a fresh UUID; a non-blank id that matches nothing
//!   is kept.
//!
//! Typed upserts run the record's [`FormCheck`] first. Collections
//! addressed by a name outside the typed set are custom collections: a
//! JSON array under that key of the document, created on first use.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use homecare_core::lenient::value_to_text;
use homecare_core::temporal::format_iso_date;
use homecare_core::{
    Adoption, Announcement, AppState, AttendanceRecord, Child, Collection, CollectionName,
    Donation, EducationRecord, Expense, FormCheck, HealthRecord, Incident, InventoryItem,
    MealEntry, Record, RecordId, ScheduleEvent, Settings, StaffMember,
};

use crate::backend::KeyValueStore;
use crate::error::{ImportError, RepositoryError, StorageError};
use crate::persist::StateStore;

/// Names that address non-collection parts of the document.
const RESERVED_NAMES: [&str; 2] = ["finance", "meta"];

/// Whether an upsert added a record or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Apply the upsert rules to one typed collection and return the stored
/// record.
pub fn upsert_into<R: Record>(records: &mut Vec<R>, mut record: R) -> (R, UpsertOutcome) {
    if record.id().is_assigned() {
        if let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) {
            *slot = record.clone();
            return (record, UpsertOutcome::Replaced);
        }
    } else {
        *record.id_mut() = RecordId::generate();
    }
    records.insert(0, record.clone());
    (record, UpsertOutcome::Inserted)
}

/// Text of a raw record's `id` field, if it is assigned.
fn raw_id(record: &Value) -> Option<String> {
    record
        .get("id")
        .cloned()
        .and_then(value_to_text)
        .filter(|id| !id.trim().is_empty())
}

/// [`upsert_into`] for a custom collection of raw JSON objects.
fn upsert_raw(records: &mut Vec<Value>, mut record: Value) -> (Value, UpsertOutcome) {
    match raw_id(&record) {
        Some(id) => {
            let existing = records
                .iter_mut()
                .find(|r| raw_id(r).as_deref() == Some(id.as_str()));
            if let Some(slot) = existing {
                *slot = record.clone();
                return (record, UpsertOutcome::Replaced);
            }
        }
        None => {
            if let Value::Object(map) = &mut record {
                map.insert("id".into(), Value::String(RecordId::generate().to_string()));
            }
        }
    }
    records.insert(0, record.clone());
    (record, UpsertOutcome::Inserted)
}

/// Take a custom collection out of the document as a list of records.
///
/// An absent key yields an empty list. A value that is not an array is
/// discarded.
fn take_custom(state: &mut AppState, name: &str) -> Vec<Value> {
    match state.custom.remove(name) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(
                collection = name,
                found = crate::error::json_type_name(&other),
                "custom collection is not an array; replacing it with an empty one"
            );
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Route a call generic over the record type to the type of `$collection`.
macro_rules! for_collection {
    ($self:ident, $collection:expr, $method:ident($($arg:expr),*)) => {
        match $collection {
            Collection::Children => $self.$method::<Child>($($arg),*),
            Collection::Staff => $self.$method::<StaffMember>($($arg),*),
            Collection::Donations => $self.$method::<Donation>($($arg),*),
            Collection::Inventory => $self.$method::<InventoryItem>($($arg),*),
            Collection::Health => $self.$method::<HealthRecord>($($arg),*),
            Collection::Education => $self.$method::<EducationRecord>($($arg),*),
            Collection::Attendance => $self.$method::<AttendanceRecord>($($arg),*),
            Collection::Incidents => $self.$method::<Incident>($($arg),*),
            Collection::Meals => $self.$method::<MealEntry>($($arg),*),
            Collection::Schedule => $self.$method::<ScheduleEvent>($($arg),*),
            Collection::Adoptions => $self.$method::<Adoption>($($arg),*),
            Collection::Announcements => $self.$method::<Announcement>($($arg),*),
            Collection::Expenses => $self.$method::<Expense>($($arg),*),
        }
    };
}

/// The in-memory document and the store it is persisted to.
///
/// The API takes `&mut self` for every mutation. Sharing a repository
/// across threads needs an external lock; two processes writing the same
/// backend overwrite each other (last write wins).
#[derive(Debug)]
pub struct Repository<S: KeyValueStore> {
    store: StateStore<S>,
    state: AppState,
}

impl<S: KeyValueStore> Repository<S> {
    /// Load the document from `store`, seeding it if needed.
    pub fn open(mut store: StateStore<S>) -> Result<Self, StorageError> {
        let state = store.load()?;
        Ok(Self { store, state })
    }

    /// [`open`](Self::open) with an explicit clock.
    pub fn open_at(
        mut store: StateStore<S>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, StorageError> {
        let state = store.load_at(today, now)?;
        Ok(Self { store, state })
    }

    /// Wrap an already loaded document. Nothing is written.
    pub fn from_parts(store: StateStore<S>, state: AppState) -> Self {
        Self { store, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Apply `mutation` and persist; on a persist failure, restore the
    /// document as it was before.
    fn transact<T>(
        &mut self,
        mutation: impl FnOnce(&mut AppState) -> T,
    ) -> Result<T, StorageError> {
        let snapshot = self.state.clone();
        let out = mutation(&mut self.state);
        if let Err(e) = self.store.save(&self.state) {
            self.state = snapshot;
            return Err(e);
        }
        Ok(out)
    }

    /// All records of one typed collection, in stored order.
    pub fn list<R: Record>(&self) -> &[R] {
        R::collection(&self.state)
    }

    /// The record of type `R` with the given id.
    pub fn get<R: Record>(&self, id: &str) -> Option<&R> {
        self.list::<R>().iter().find(|r| r.id().as_str() == id)
    }

    /// Validate and upsert a typed record; returns the stored record.
    pub fn upsert<R: FormCheck>(&mut self, record: R) -> Result<R, RepositoryError> {
        record.check()?;
        let (stored, outcome) =
            self.transact(|state| upsert_into(R::collection_mut(state), record))?;
        tracing::debug!(
            collection = %R::COLLECTION,
            id = %stored.id(),
            ?outcome,
            "upserted record"
        );
        Ok(stored)
    }

    /// Remove the record of type `R` with the given id. Returns whether a
    /// record was removed; removing an absent id changes nothing.
    pub fn remove_by_id<R: Record>(&mut self, id: &str) -> Result<bool, StorageError> {
        let removed = self.transact(|state| {
            let records = R::collection_mut(state);
            let before = records.len();
            records.retain(|r| r.id().as_str() != id);
            records.len() != before
        })?;
        tracing::debug!(collection = %R::COLLECTION, id, removed, "removed record");
        Ok(removed)
    }

    fn upsert_value<R: FormCheck>(&mut self, record: Value) -> Result<Value, RepositoryError> {
        let typed: R = serde_json::from_value(record).map_err(|source| RepositoryError::Decode {
            collection: R::COLLECTION.as_str().to_string(),
            source,
        })?;
        let stored = self.upsert(typed)?;
        Ok(serde_json::to_value(stored).map_err(StorageError::from)?)
    }

    fn remove_typed<R: Record>(&mut self, id: &str) -> Result<bool, StorageError> {
        self.remove_by_id::<R>(id)
    }

    fn resolve(name: &str) -> Result<CollectionName, RepositoryError> {
        let resolved = CollectionName::parse(name);
        let key = resolved.as_str();
        if key.is_empty() || RESERVED_NAMES.contains(&key) {
            return Err(RepositoryError::ReservedName {
                name: name.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Upsert a raw JSON record into the collection named `name`.
    ///
    /// Typed collections decode and validate the record; any other name
    /// addresses a custom collection. Returns the stored record.
    pub fn upsert_named(&mut self, name: &str, record: Value) -> Result<Value, RepositoryError> {
        if !record.is_object() {
            return Err(RepositoryError::NotAnObject {
                collection: name.to_string(),
            });
        }
        match Self::resolve(name)? {
            CollectionName::Known(collection) => {
                for_collection!(self, collection, upsert_value(record))
            }
            CollectionName::Custom(key) => {
                let (stored, outcome) = self.transact(|state| {
                    let mut records = take_custom(state, &key);
                    let result = upsert_raw(&mut records, record);
                    state.custom.insert(key.clone(), Value::Array(records));
                    result
                })?;
                tracing::debug!(
                    collection = %key,
                    id = ?raw_id(&stored),
                    ?outcome,
                    "upserted custom record"
                );
                Ok(stored)
            }
        }
    }

    /// Remove the record with the given id from the collection named
    /// `name`. Returns whether a record was removed.
    pub fn remove_named(&mut self, name: &str, id: &str) -> Result<bool, RepositoryError> {
        match Self::resolve(name)? {
            CollectionName::Known(collection) => {
                Ok(for_collection!(self, collection, remove_typed(id))?)
            }
            CollectionName::Custom(key) => {
                let removed = self.transact(|state| {
                    if !state.custom.contains_key(&key) {
                        return false;
                    }
                    let mut records = take_custom(state, &key);
                    let before = records.len();
                    records.retain(|r| raw_id(r).as_deref() != Some(id));
                    let removed = records.len() != before;
                    state.custom.insert(key.clone(), Value::Array(records));
                    removed
                })?;
                tracing::debug!(collection = %key, id, removed, "removed custom record");
                Ok(removed)
            }
        }
    }

    /// Replace the application settings. Unset fields take their defaults.
    pub fn update_settings(&mut self, mut settings: Settings) -> Result<&Settings, StorageError> {
        settings.fill_defaults();
        self.transact(|state| state.meta.settings = settings)?;
        tracing::debug!("updated settings");
        Ok(&self.state.meta.settings)
    }

    pub fn set_budget(&mut self, budget: f64) -> Result<(), StorageError> {
        self.transact(|state| state.finance.budget = budget)?;
        tracing::debug!(budget, "updated budget");
        Ok(())
    }

    /// Book an expense dated `date` at the front of the ledger.
    pub fn add_expense(
        &mut self,
        desc: &str,
        amount: f64,
        date: NaiveDate,
    ) -> Result<Expense, RepositoryError> {
        self.upsert(Expense {
            id: RecordId::unassigned(),
            desc: Some(desc.trim().to_string()),
            amount: Some(amount),
            date: Some(format_iso_date(date)),
            ..Default::default()
        })
    }

    /// Post an announcement dated `date` at the front of the list.
    pub fn add_announcement(
        &mut self,
        message: &str,
        date: NaiveDate,
    ) -> Result<Announcement, RepositoryError> {
        self.upsert(Announcement {
            id: RecordId::unassigned(),
            message: Some(message.trim().to_string()),
            date: Some(format_iso_date(date)),
            ..Default::default()
        })
    }

    /// Replace the whole document and persist it.
    pub fn replace_state(&mut self, state: AppState) -> Result<(), StorageError> {
        self.transact(|current| *current = state)
    }

    /// Import a document from text, replacing the current one. A failed
    /// import leaves both memory and storage unchanged.
    pub fn import_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<&AppState, ImportError> {
        self.state = self.store.import_at(text, now)?;
        Ok(&self.state)
    }

    /// Delete the stored document and reload, which reseeds it.
    pub fn reset_at(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<&AppState, StorageError> {
        self.store.reset()?;
        self.state = self.store.load_at(today, now)?;
        Ok(&self.state)
    }

    /// Replace the document with an empty one.
    pub fn clear_at(&mut self, now: DateTime<Utc>) -> Result<&AppState, StorageError> {
        self.state = self.store.clear_at(now)?;
        Ok(&self.state)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn announcement(id: String, message: String) -> Announcement {
        Announcement {
            id: RecordId::new(id),
            message: Some(message),
            ..Default::default()
        }
    }

    /// Collections of announcements with distinct, assigned ids.
    fn collection() -> impl Strategy<Value = Vec<Announcement>> {
        prop::collection::btree_map("[a-z0-9]{1,8}", "[ -~]{0,20}", 0..12).prop_map(|m| {
            m.into_iter()
                .map(|(id, message)| announcement(id, message))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn insert_grows_by_one_at_the_front(
            mut records in collection(),
            id in "[A-Z]{1,8}",
            message in "[ -~]{0,20}",
        ) {
            let before = records.clone();
            let new = announcement(id, message);
            let (stored, outcome) = upsert_into(&mut records, new.clone());
            prop_assert_eq!(outcome, UpsertOutcome::Inserted);
            prop_assert_eq!(&stored, &new);
            prop_assert_eq!(records.len(), before.len() + 1);
            prop_assert_eq!(&records[0], &new);
            prop_assert_eq!(&records[1..], &before[..]);
        }

        #[test]
        fn replace_keeps_size_and_position(
            mut records in collection().prop_filter("non-empty", |r| !r.is_empty()),
            pick in any::<prop::sample::Index>(),
            message in "[ -~]{0,20}",
        ) {
            let at = pick.index(records.len());
            let replacement = announcement(records[at].id.to_string(), message);
            let len = records.len();
            let (_, outcome) = upsert_into(&mut records, replacement.clone());
            prop_assert_eq!(outcome, UpsertOutcome::Replaced);
            prop_assert_eq!(records.len(), len);
            prop_assert_eq!(&records[at], &replacement);
        }

        #[test]
        fn upserting_twice_is_idempotent(
            mut records in collection(),
            message in "[ -~]{0,20}",
        ) {
            let (stored, _) = upsert_into(&mut records, announcement(String::new(), message));
            let after_first = records.clone();
            upsert_into(&mut records, stored);
            prop_assert_eq!(records, after_first);
        }

        #[test]
        fn remove_is_a_pure_filter(
            records in collection(),
            id in "[a-z0-9]{1,8}",
        ) {
            let mut repo = Repository::from_parts(
                StateStore::new(crate::backend::MemoryStore::new()),
                AppState {
                    announcements: records.clone(),
                    ..Default::default()
                },
            );
            let removed = repo.remove_by_id::<Announcement>(&id).unwrap();
            let expected: Vec<_> = records
                .iter()
                .filter(|r| r.id.as_str() != id)
                .cloned()
                .collect();
            prop_assert_eq!(removed, expected.len() != records.len());
            prop_assert_eq!(repo.list::<Announcement>(), &expected[..]);
        }

        #[test]
        fn saved_state_loads_back_equal(records in collection(), budget in 0u32..1_000_000) {
            let mut store = StateStore::new(crate::backend::MemoryStore::new());
            let now = Utc::now();
            let mut state = AppState::empty(now);
            state.announcements = records;
            state.finance.budget = f64::from(budget) / 4.0;
            store.save(&state).unwrap();
            prop_assert_eq!(store.load_at(now.date_naive(), now).unwrap(), state);
        }
    }
}
