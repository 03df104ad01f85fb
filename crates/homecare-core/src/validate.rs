//! # Form-Boundary Validation
//!
//! Required-field checks for user-entered records. The repository runs
//! [`FormCheck::check`] on every typed upsert; imported documents are
//! taken as they are.
//!
//! A field counts as present when it holds non-whitespace text.

use crate::collection::Collection;
use crate::error::ValidationError;
use crate::records::{
    Adoption, Announcement, AttendanceRecord, Child, Donation, EducationRecord, Expense,
    HealthRecord, Incident, InventoryItem, MealEntry, Record, ScheduleEvent, StaffMember,
};

/// Required-field validation for a user-entered record.
pub trait FormCheck: Record {
    /// JSON names of the fields that must be present.
    const REQUIRED: &'static [&'static str];

    /// Return the first missing required field, if any.
    fn check(&self) -> Result<(), ValidationError>;
}

/// JSON names of the fields a record of `collection` cannot be saved
/// without.
pub fn required_fields(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Children => Child::REQUIRED,
        Collection::Staff => StaffMember::REQUIRED,
        Collection::Donations => Donation::REQUIRED,
        Collection::Inventory => InventoryItem::REQUIRED,
        Collection::Health => HealthRecord::REQUIRED,
        Collection::Education => EducationRecord::REQUIRED,
        Collection::Attendance => AttendanceRecord::REQUIRED,
        Collection::Incidents => Incident::REQUIRED,
        Collection::Meals => MealEntry::REQUIRED,
        Collection::Schedule => ScheduleEvent::REQUIRED,
        Collection::Adoptions => Adoption::REQUIRED,
        Collection::Announcements => Announcement::REQUIRED,
        Collection::Expenses => Expense::REQUIRED,
    }
}

fn require<R: Record>(field: &'static str, value: &Option<String>) -> Result<(), ValidationError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField {
            collection: R::COLLECTION.as_str(),
            field,
        }),
    }
}

impl FormCheck for Child {
    const REQUIRED: &'static [&'static str] = &["name", "dob", "admissionDate"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("name", &self.name)?;
        require::<Self>("dob", &self.dob)?;
        require::<Self>("admissionDate", &self.admission_date)
    }
}

impl FormCheck for StaffMember {
    const REQUIRED: &'static [&'static str] = &["name", "role"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("name", &self.name)?;
        require::<Self>("role", &self.role)
    }
}

impl FormCheck for Donation {
    const REQUIRED: &'static [&'static str] = &["donor"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("donor", &self.donor)
    }
}

impl FormCheck for InventoryItem {
    const REQUIRED: &'static [&'static str] = &["item"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("item", &self.item)
    }
}

impl FormCheck for HealthRecord {
    const REQUIRED: &'static [&'static str] = &["child", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for EducationRecord {
    const REQUIRED: &'static [&'static str] = &["child", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for AttendanceRecord {
    const REQUIRED: &'static [&'static str] = &["child", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for Incident {
    const REQUIRED: &'static [&'static str] = &["child", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for MealEntry {
    const REQUIRED: &'static [&'static str] = &["child", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for ScheduleEvent {
    const REQUIRED: &'static [&'static str] = &["title", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("title", &self.title)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for Adoption {
    const REQUIRED: &'static [&'static str] = &["child", "parent", "date"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("child", &self.child)?;
        require::<Self>("parent", &self.parent)?;
        require::<Self>("date", &self.date)
    }
}

impl FormCheck for Announcement {
    const REQUIRED: &'static [&'static str] = &["message"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("message", &self.message)
    }
}

impl FormCheck for Expense {
    const REQUIRED: &'static [&'static str] = &["desc", "amount"];

    fn check(&self) -> Result<(), ValidationError> {
        require::<Self>("desc", &self.desc)?;
        if self.amount_or_zero() == 0.0 {
            return Err(ValidationError::ZeroAmount {
                collection: Self::COLLECTION.as_str(),
                field: "amount",
            });
        }
        Ok(())
    }
}
