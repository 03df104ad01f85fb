//! # The AppState Document
//!
//! `AppState` is the complete dataset of one installation: every named
//! collection, the finance ledger, and metadata with application
//! settings. It is persisted as one JSON document and replaced wholesale
//! on import.
//!
//! ## Normalization
//!
//! Decoding never fails because a part of the document is missing or
//! wrong-typed:
//!
//! - every collection defaults to empty,
//! - `finance` defaults to `{ expenses: [], budget: 12000 }`,
//! - `meta` and `meta.settings` default to empty and are then filled by
//!   [`AppState::normalize`], which supplies `createdAt` and each missing
//!   setting.
//!
//! `normalize` is the single defaulting step. Callers run it once after
//! decoding; consumers then read fields without further defaulting.
//!
//! Top-level keys that are not named collections are kept verbatim in
//! `custom` and written back on save.
//!
//! Defaulting a wrong-typed part drops whatever it held.
//! [`AppState::unreadable_parts`] names those parts of a raw document
//! before it is decoded.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::records::{
    Adoption, Announcement, AttendanceRecord, Child, Donation, EducationRecord, Expense,
    HealthRecord, Incident, InventoryItem, MealEntry, ScheduleEvent, StaffMember,
};

/// Budget assigned to a fresh installation.
pub const DEFAULT_BUDGET: f64 = 12_000.0;

/// Currency code used when settings carry none.
pub const DEFAULT_CURRENCY: &str = "KES";

const DEFAULT_ORG_NAME: &str = "HomeCare Orphanage";
const DEFAULT_ORG_ADDRESS: &str = "Nairobi, Kenya";
const DEFAULT_PRIMARY_COLOR: &str = "#111";
const DEFAULT_SECONDARY_COLOR: &str = "#2f6feb";
const DEFAULT_HOVER_COLOR: &str = "#f2f2f2";

/// The root document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "lenient::list")]
    pub children: Vec<Child>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub staff: Vec<StaffMember>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub donations: Vec<Donation>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub inventory: Vec<InventoryItem>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub health: Vec<HealthRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Vec<EducationRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub incidents: Vec<Incident>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub meals: Vec<MealEntry>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub schedule: Vec<ScheduleEvent>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub adoptions: Vec<Adoption>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub announcements: Vec<Announcement>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub finance: Finance,
    #[serde(default, deserialize_with = "lenient::object")]
    pub meta: Meta,
    /// Custom collections: any other top-level key, kept verbatim.
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl AppState {
    /// An empty, normalized document: no records, default finance and
    /// settings.
    pub fn empty(created_at: DateTime<Utc>) -> Self {
        let mut state = Self::default();
        state.normalize(created_at);
        state
    }

    /// Fill every defaulted field that decoding left open.
    ///
    /// Idempotent: normalizing a normalized document changes nothing.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        let missing_created_at = self
            .meta
            .created_at
            .as_deref()
            .map_or(true, |s| s.trim().is_empty());
        if missing_created_at {
            self.meta.created_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        self.meta.settings.fill_defaults();
    }

    /// Names of all children, in collection order. Unnamed children are
    /// skipped.
    pub fn child_names(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect()
    }

    /// Total number of records across all typed collections.
    pub fn record_count(&self) -> usize {
        self.children.len()
            + self.staff.len()
            + self.donations.len()
            + self.inventory.len()
            + self.health.len()
            + self.education.len()
            + self.attendance.len()
            + self.incidents.len()
            + self.meals.len()
            + self.schedule.len()
            + self.adoptions.len()
            + self.announcements.len()
            + self.finance.expenses.len()
    }

    /// The currency code configured for this installation.
    pub fn currency(&self) -> &str {
        self.meta.settings.currency()
    }

    /// Paths of the parts of a raw document that decoding will drop or
    /// replace with a default, such as `staff[0]` or `finance.budget`.
    /// Empty when the document decodes without loss.
    pub fn unreadable_parts(raw: &Value) -> Vec<String> {
        let mut out = Vec::new();
        let Some(doc) = raw.as_object() else {
            return out;
        };
        lenient::list_losses::<Child>(doc.get("children"), "children", &mut out);
        lenient::list_losses::<StaffMember>(doc.get("staff"), "staff", &mut out);
        lenient::list_losses::<Donation>(doc.get("donations"), "donations", &mut out);
        lenient::list_losses::<InventoryItem>(doc.get("inventory"), "inventory", &mut out);
        lenient::list_losses::<HealthRecord>(doc.get("health"), "health", &mut out);
        lenient::list_losses::<EducationRecord>(doc.get("education"), "education", &mut out);
        lenient::list_losses::<AttendanceRecord>(doc.get("attendance"), "attendance", &mut out);
        lenient::list_losses::<Incident>(doc.get("incidents"), "incidents", &mut out);
        lenient::list_losses::<MealEntry>(doc.get("meals"), "meals", &mut out);
        lenient::list_losses::<ScheduleEvent>(doc.get("schedule"), "schedule", &mut out);
        lenient::list_losses::<Adoption>(doc.get("adoptions"), "adoptions", &mut out);
        lenient::list_losses::<Announcement>(
            doc.get("announcements"),
            "announcements",
            &mut out,
        );

        match doc.get("finance") {
            None | Some(Value::Null) => {}
            Some(Value::Object(finance)) => {
                let expenses = finance.get("expenses");
                lenient::list_losses::<Expense>(expenses, "finance.expenses", &mut out);
                let budget = finance.get("budget");
                if budget.is_some_and(|b| !b.is_null() && lenient::value_to_number(b).is_none()) {
                    out.push("finance.budget".to_string());
                }
            }
            Some(_) => out.push("finance".to_string()),
        }

        match doc.get("meta") {
            None | Some(Value::Null) => {}
            Some(Value::Object(meta)) => match meta.get("settings") {
                None | Some(Value::Null) | Some(Value::Object(_)) => {}
                Some(_) => out.push("meta.settings".to_string()),
            },
            Some(_) => out.push("meta".to_string()),
        }
        out
    }
}

/// The finance ledger: expenses and the configured budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finance {
    #[serde(default, deserialize_with = "lenient::list")]
    pub expenses: Vec<Expense>,
    #[serde(
        default = "default_budget",
        deserialize_with = "budget",
        serialize_with = "lenient::serialize_f64"
    )]
    pub budget: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Finance {
    fn default() -> Self {
        Self {
            expenses: Vec::new(),
            budget: DEFAULT_BUDGET,
            extra: BTreeMap::new(),
        }
    }
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

fn budget<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::number(deserializer)?.unwrap_or(DEFAULT_BUDGET))
}

/// Installation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// RFC 3339 creation time of the installation.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub settings: Settings,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Application settings shown on the settings screen.
///
/// Every field is `Some` after [`Settings::fill_defaults`]; accessors
/// return the default for fields still unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// ISO 4217 code used for all money display.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub org_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub hover_color: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    /// The fixed default configuration.
    pub fn defaults() -> Self {
        let mut settings = Self::default();
        settings.fill_defaults();
        settings
    }

    /// Set every unset field to its default. A blank currency counts as
    /// unset; other blank strings are deliberate user input and kept.
    pub fn fill_defaults(&mut self) {
        let current = self.currency.as_deref().unwrap_or("");
        if current.trim().is_empty() {
            self.currency = Some(DEFAULT_CURRENCY.to_string());
        }
        fill(&mut self.org_name, DEFAULT_ORG_NAME);
        fill(&mut self.org_address, DEFAULT_ORG_ADDRESS);
        fill(&mut self.logo_url, "");
        fill(&mut self.primary_color, DEFAULT_PRIMARY_COLOR);
        fill(&mut self.secondary_color, DEFAULT_SECONDARY_COLOR);
        fill(&mut self.hover_color, DEFAULT_HOVER_COLOR);
    }

    pub fn currency(&self) -> &str {
        match self.currency.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CURRENCY,
        }
    }

    pub fn org_name(&self) -> &str {
        self.org_name.as_deref().unwrap_or(DEFAULT_ORG_NAME)
    }

    pub fn org_address(&self) -> &str {
        self.org_address.as_deref().unwrap_or(DEFAULT_ORG_ADDRESS)
    }
}

fn fill(field: &mut Option<String>, default: &str) {
    if field.is_none() {
        *field = Some(default.to_string());
    }
}
