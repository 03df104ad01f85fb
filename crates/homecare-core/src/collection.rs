//! # Collection Names
//!
//! Every named collection of `AppState` has a `Collection` variant. The
//! JSON key of each is its `as_str()` form. Expenses live inside
//! `finance` in the document but are addressed as the `expenses`
//! collection.
//!
//! Names outside this set are tolerated: they address a custom
//! collection stored verbatim in the document (see
//! [`CollectionName::Custom`]).

use serde::{Deserialize, Serialize};

/// A named collection with a typed record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Children,
    Staff,
    Donations,
    Inventory,
    Health,
    Education,
    Attendance,
    Incidents,
    Meals,
    Schedule,
    Adoptions,
    Announcements,
    Expenses,
}

impl Collection {
    /// All typed collections, in document order.
    pub const ALL: [Collection; 13] = [
        Self::Children,
        Self::Staff,
        Self::Donations,
        Self::Inventory,
        Self::Health,
        Self::Education,
        Self::Attendance,
        Self::Incidents,
        Self::Meals,
        Self::Schedule,
        Self::Adoptions,
        Self::Announcements,
        Self::Expenses,
    ];

    /// The collection's key in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Children => "children",
            Self::Staff => "staff",
            Self::Donations => "donations",
            Self::Inventory => "inventory",
            Self::Health => "health",
            Self::Education => "education",
            Self::Attendance => "attendance",
            Self::Incidents => "incidents",
            Self::Meals => "meals",
            Self::Schedule => "schedule",
            Self::Adoptions => "adoptions",
            Self::Announcements => "announcements",
            Self::Expenses => "expenses",
        }
    }

    /// Look up a typed collection by its document key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }

    /// Whether records of this collection carry a `child` name reference.
    pub fn references_child(&self) -> bool {
        matches!(
            self,
            Self::Health
                | Self::Education
                | Self::Attendance
                | Self::Incidents
                | Self::Meals
                | Self::Adoptions
        )
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection addressed by name: either typed, or custom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionName {
    /// One of the typed collections.
    Known(Collection),
    /// Any other top-level key; created empty on first use.
    Custom(String),
}

impl CollectionName {
    /// Resolve a collection name. Surrounding whitespace is ignored.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        match Collection::from_name(name) {
            Some(c) => Self::Known(c),
            None => Self::Custom(name.to_string()),
        }
    }

    /// The document key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(c) => c.as_str(),
            Self::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
