//! # Record Schemas
//!
//! One struct per typed collection. Every field except `id` is optional
//! and decoded leniently (see [`crate::lenient`]); fields not named here
//! are preserved in `extra`. JSON names are camelCase to match the
//! persisted document.
//!
//! Numeric fields are read through `*_or_zero()` accessors, which apply
//! the documented fallback of 0 for absent values.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::identity::RecordId;
use crate::lenient;
use crate::state::AppState;

/// A uniquely identified entry in one typed collection of `AppState`.
///
/// Implementations tie a record type to the collection that stores it so
/// that the repository can upsert and remove generically.
pub trait Record: Clone + std::fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// The collection this record type lives in.
    const COLLECTION: Collection;

    /// The record's identifier (possibly unassigned).
    fn id(&self) -> &RecordId;

    /// Mutable access to the identifier, used only when assigning a
    /// generated id to a new record.
    fn id_mut(&mut self) -> &mut RecordId;

    /// The collection slice inside a state document.
    fn collection(state: &AppState) -> &[Self];

    /// The collection vector inside a state document.
    fn collection_mut(state: &mut AppState) -> &mut Vec<Self>;
}

macro_rules! impl_record {
    ($ty:ty => $collection:ident, $($path:ident).+) => {
        impl Record for $ty {
            const COLLECTION: Collection = Collection::$collection;

            fn id(&self) -> &RecordId {
                &self.id
            }

            fn id_mut(&mut self) -> &mut RecordId {
                &mut self.id
            }

            fn collection(state: &AppState) -> &[Self] {
                &state.$($path).+
            }

            fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
                &mut state.$($path).+
            }
        }
    };
}

fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

// ─── Children & Staff ────────────────────────────────────────────────

/// A child resident of the home.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `"M"` or `"F"` in practice; not constrained.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Date of birth, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    /// Residency status, e.g. `"Resident"`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A member of staff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ─── Donations & Inventory ───────────────────────────────────────────

/// Donation type whose amount counts towards funds.
pub const DONATION_TYPE_FUNDS: &str = "Funds";

/// Donation type for in-kind gifts.
pub const DONATION_TYPE_GOODS: &str = "Goods";

/// A donation received by the home.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
    /// `"Funds"` or `"Goods"`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Donation {
    /// Whether this is a monetary donation.
    pub fn is_funds(&self) -> bool {
        self.kind.as_deref() == Some(DONATION_TYPE_FUNDS)
    }

    /// Whether this is an in-kind donation.
    pub fn is_goods(&self) -> bool {
        self.kind.as_deref() == Some(DONATION_TYPE_GOODS)
    }

    pub fn amount_or_zero(&self) -> f64 {
        or_zero(self.amount)
    }

    /// Apply the donation form rule: only `Funds` donations carry an
    /// amount; every other type is stored with amount 0.
    pub fn with_form_amount(mut self) -> Self {
        if !self.is_funds() {
            self.amount = Some(0.0);
        }
        self
    }
}

/// A stock item tracked in inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty: Option<f64>,
    /// Minimum stock level; at or below it the item is low.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl InventoryItem {
    /// Minimum stock level applied by the inventory form when left blank.
    pub const FORM_DEFAULT_MIN: f64 = 1.0;

    pub fn qty_or_zero(&self) -> f64 {
        or_zero(self.qty)
    }

    pub fn min_or_zero(&self) -> f64 {
        or_zero(self.min)
    }

    pub fn cost_or_zero(&self) -> f64 {
        or_zero(self.cost)
    }

    /// Apply the inventory form defaults: blank quantity and cost become
    /// 0, a blank or zero minimum becomes 1.
    pub fn with_form_defaults(mut self) -> Self {
        self.qty = Some(self.qty_or_zero());
        self.cost = Some(self.cost_or_zero());
        if self.min_or_zero() == 0.0 {
            self.min = Some(Self::FORM_DEFAULT_MIN);
        }
        self
    }
}

// ─── Child-linked records ────────────────────────────────────────────

/// A health event (checkup, treatment) for a child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    #[serde(default)]
    pub id: RecordId,
    /// Child name, copied by value.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub medical_bill: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl HealthRecord {
    pub fn medical_bill_or_zero(&self) -> f64 {
        or_zero(self.medical_bill)
    }
}

/// A schooling entry (enrolment, term fees) for a child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fees: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EducationRecord {
    pub fn fees_or_zero(&self) -> f64 {
        or_zero(self.fees)
    }
}

/// Attendance status values recognized by the daily counts.
pub const ATTENDANCE_PRESENT: &str = "Present";
pub const ATTENDANCE_ABSENT: &str = "Absent";
pub const ATTENDANCE_LATE: &str = "Late";

/// One attendance mark for a child on a date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `"Present"`, `"Absent"` or `"Late"`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub time_in: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A logged incident involving a child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `"Low"`, `"Medium"` or `"High"`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Action taken in response.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Daily consumption cost of one meal type for one child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    /// `"Breakfast"`, `"Lunch"`, `"Supper"`, `"Snack"` or `"Full Course"`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Daily amount in the configured currency.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MealEntry {
    pub fn amount_or_zero(&self) -> f64 {
        or_zero(self.amount)
    }
}

/// An adoption or placement enquiry for a child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adoption {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    /// Prospective parent.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ─── Scheduling, announcements, finance ──────────────────────────────

/// Schedule status counted as done.
pub const SCHEDULE_COMPLETED: &str = "Completed";

/// A scheduled activity, meeting or visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `"Activity"`, `"Meeting"`, `"Visit"` or `"Other"`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Staff name, copied by value.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A notice shown to staff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// An expense booked against the home's funds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        serialize_with = "lenient::serialize_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Expense {
    pub fn amount_or_zero(&self) -> f64 {
        or_zero(self.amount)
    }
}

impl_record!(Child => Children, children);
impl_record!(StaffMember => Staff, staff);
impl_record!(Donation => Donations, donations);
impl_record!(InventoryItem => Inventory, inventory);
impl_record!(HealthRecord => Health, health);
impl_record!(EducationRecord => Education, education);
impl_record!(AttendanceRecord => Attendance, attendance);
impl_record!(Incident => Incidents, incidents);
impl_record!(MealEntry => Meals, meals);
impl_record!(ScheduleEvent => Schedule, schedule);
impl_record!(Adoption => Adoptions, adoptions);
impl_record!(Announcement => Announcements, announcements);
impl_record!(Expense => Expenses, finance.expenses);
