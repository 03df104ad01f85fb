//! # Filtering and Search
//!
//! Text matching is a case-insensitive substring test. A blank query
//! matches everything. The child, status, category and type filters match
//! their field exactly; a date filter matches records stored on that
//! calendar day. A record without the filtered field never matches.

use chrono::NaiveDate;
use serde::Serialize;

use homecare_core::{
    parse_calendar_date, Adoption, Announcement, AppState, AttendanceRecord, Child, Collection,
    Donation, EducationRecord, Expense, HealthRecord, Incident, InventoryItem, MealEntry, Record,
    RecordId, ScheduleEvent, StaffMember,
};

/// A record that can be filtered on screen.
pub trait Searchable {
    /// The referenced child's name, for records linked to a child.
    fn child_name(&self) -> Option<&str> {
        None
    }

    /// Residency status of a child, attendance mark, or event status.
    fn status(&self) -> Option<&str> {
        None
    }

    fn category(&self) -> Option<&str> {
        None
    }

    /// The record's type: donation type, health record type, meal type
    /// or event type.
    fn kind(&self) -> Option<&str> {
        None
    }

    /// The stored date of the record.
    fn record_date(&self) -> Option<&str> {
        None
    }

    /// The fields a text query is matched against.
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Whether any search field contains `needle`, which must already be
    /// lowercase.
    fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

macro_rules! searchable {
    ($($ty:ty { $($facet:ident: $source:ident),* } => [$($field:ident),+]);+ $(;)?) => {
        $(
            impl Searchable for $ty {
                $(
                    fn $facet(&self) -> Option<&str> {
                        self.$source.as_deref()
                    }
                )*

                fn search_fields(&self) -> Vec<Option<&str>> {
                    vec![$(self.$field.as_deref()),+]
                }
            }
        )+
    };
}

searchable! {
    Child { child_name: name, status: status } => [name, status];
    StaffMember {} => [name, role];
    Donation { kind: kind, record_date: date } => [donor, kind, note];
    InventoryItem { category: category } => [item, category];
    HealthRecord { child_name: child, kind: kind, record_date: date } => [child, kind, notes];
    EducationRecord { child_name: child, record_date: date } => [child, school, grade, term, notes];
    AttendanceRecord { child_name: child, status: status, record_date: date } => [
        child, status, notes
    ];
    Incident { child_name: child, record_date: date } => [
        child, severity, description, action, reporter
    ];
    MealEntry { child_name: child, kind: meal_type, record_date: date } => [
        child, meal_type, notes
    ];
    Adoption { child_name: child, record_date: date } => [parent, agency, child];
    ScheduleEvent { status: status, kind: kind, record_date: date } => [
        title, kind, assigned_to, status, description
    ];
    Announcement { record_date: date } => [message];
    Expense { record_date: date } => [desc];
}

/// The filters of one list screen. Unset or blank criteria match every
/// record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter<'q> {
    pub child: Option<&'q str>,
    pub status: Option<&'q str>,
    pub category: Option<&'q str>,
    pub kind: Option<&'q str>,
    pub date: Option<NaiveDate>,
    pub query: &'q str,
}

fn exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted.map(str::trim).filter(|w| !w.is_empty()) {
        Some(w) => actual == Some(w),
        None => true,
    }
}

impl RecordFilter<'_> {
    /// Whether `record` passes every criterion.
    pub fn matches<R: Searchable>(&self, record: &R) -> bool {
        let on_date = self.date.map_or(true, |date| {
            record.record_date().and_then(parse_calendar_date) == Some(date)
        });
        exact(self.child, record.child_name())
            && exact(self.status, record.status())
            && exact(self.category, record.category())
            && exact(self.kind, record.kind())
            && on_date
            && record.matches_text(&self.query.trim().to_lowercase())
    }
}

/// Records passing `filter`, in collection order.
pub fn filter_records<'a, R: Searchable>(
    records: &'a [R],
    filter: &RecordFilter<'_>,
) -> Vec<&'a R> {
    records.iter().filter(|r| filter.matches(*r)).collect()
}

/// Records matching both the child filter and the text query.
pub fn filter_by_child_and_text<'a, R: Searchable>(
    records: &'a [R],
    child: Option<&str>,
    query: &str,
) -> Vec<&'a R> {
    let filter = RecordFilter {
        child,
        query,
        ..Default::default()
    };
    filter_records(records, &filter)
}

/// Matches of one query across people and donors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSearchResults<'a> {
    pub children: Vec<&'a Child>,
    pub staff: Vec<&'a StaffMember>,
    pub donations: Vec<&'a Donation>,
}

impl GlobalSearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.staff.is_empty() && self.donations.is_empty()
    }
}

fn contains(field: Option<&str>, needle: &str) -> bool {
    field.unwrap_or("").to_lowercase().contains(needle)
}

/// Children by name, staff by name, donations by donor.
pub fn global_search<'a>(state: &'a AppState, query: &str) -> GlobalSearchResults<'a> {
    let needle = query.trim().to_lowercase();
    GlobalSearchResults {
        children: state
            .children
            .iter()
            .filter(|c| contains(c.name.as_deref(), &needle))
            .collect(),
        staff: state
            .staff
            .iter()
            .filter(|s| contains(s.name.as_deref(), &needle))
            .collect(),
        donations: state
            .donations
            .iter()
            .filter(|d| contains(d.donor.as_deref(), &needle))
            .collect(),
    }
}

/// A child-linked record naming a child who is not in `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedReference {
    pub collection: Collection,
    pub id: RecordId,
    pub child: String,
}

fn orphans_in<R: Record + Searchable>(
    state: &AppState,
    known: &[&str],
    out: &mut Vec<OrphanedReference>,
) {
    for record in R::collection(state) {
        if let Some(child) = record.child_name().map(str::trim).filter(|c| !c.is_empty()) {
            if !known.contains(&child) {
                out.push(OrphanedReference {
                    collection: R::COLLECTION,
                    id: record.id().clone(),
                    child: child.to_string(),
                });
            }
        }
    }
}

/// Report child-linked records whose child name matches no child.
///
/// Advisory only: nothing is changed, and renaming or removing a child
/// never updates the records that name it.
pub fn orphaned_child_references(state: &AppState) -> Vec<OrphanedReference> {
    let known = state.child_names();
    let mut out = Vec::new();
    for collection in Collection::ALL {
        if !collection.references_child() {
            continue;
        }
        match collection {
            Collection::Health => orphans_in::<HealthRecord>(state, &known, &mut out),
            Collection::Education => orphans_in::<EducationRecord>(state, &known, &mut out),
            Collection::Attendance => orphans_in::<AttendanceRecord>(state, &known, &mut out),
            Collection::Incidents => orphans_in::<Incident>(state, &known, &mut out),
            Collection::Meals => orphans_in::<MealEntry>(state, &known, &mut out),
            Collection::Adoptions => orphans_in::<Adoption>(state, &known, &mut out),
            _ => {}
        }
    }
    out
}
