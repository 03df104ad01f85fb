//! # Ages and Demographics
//!
//! Ages are whole elapsed years, counted the way a calendar does: a child
//! born on 2020-01-01 turns 5 on 2025-01-01, not a day earlier. A date of
//! birth that is missing, unreadable, or in the future gives age 0.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use homecare_core::{parse_calendar_date, Child};

/// Signed number of whole calendar months from `from` to `to`.
///
/// A partial month does not count, in either direction. Stepping a month
/// forward lands on the same day or, in a shorter month, on its last day,
/// so 2020-02-29 to 2021-02-28 is twelve whole months.
pub fn whole_months(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -whole_months(to, from);
    }
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if months > 0 && add_months(from, months).map_or(true, |anchor| anchor > to) {
        months -= 1;
    }
    months
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}

/// Age in whole years on `today` for a stored date of birth.
pub fn age_on(dob: &str, today: NaiveDate) -> u32 {
    let Some(born) = parse_calendar_date(dob) else {
        return 0;
    };
    u32::try_from(whole_months(born, today) / 12).unwrap_or(0)
}

/// Age of a child on `today`; 0 without a date of birth.
pub fn child_age(child: &Child, today: NaiveDate) -> u32 {
    child.dob.as_deref().map_or(0, |dob| age_on(dob, today))
}

/// Head count per age band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeBands {
    pub up_to_5: usize,
    pub from_6_to_10: usize,
    pub from_11_to_15: usize,
    pub from_16: usize,
}

impl AgeBands {
    /// Band labels, in display order.
    pub const LABELS: [&'static str; 4] = ["0-5", "6-10", "11-15", "16+"];

    /// Count one child of the given age.
    pub fn add(&mut self, age: u32) {
        match age {
            0..=5 => self.up_to_5 += 1,
            6..=10 => self.from_6_to_10 += 1,
            11..=15 => self.from_11_to_15 += 1,
            _ => self.from_16 += 1,
        }
    }

    /// Counts in the order of [`Self::LABELS`].
    pub fn counts(&self) -> [usize; 4] {
        [
            self.up_to_5,
            self.from_6_to_10,
            self.from_11_to_15,
            self.from_16,
        ]
    }
}

pub fn age_bands(children: &[Child], today: NaiveDate) -> AgeBands {
    let mut bands = AgeBands::default();
    for child in children {
        bands.add(child_age(child, today));
    }
    bands
}

/// Children by recorded gender. Other or missing values count in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
}

pub fn gender_counts(children: &[Child]) -> GenderCounts {
    children
        .iter()
        .fold(GenderCounts::default(), |mut counts, child| {
            match child.gender.as_deref() {
                Some("M") => counts.male += 1,
                Some("F") => counts.female += 1,
                _ => {}
            }
            counts
        })
}

/// Mean age of `children`, rounded half away from zero; 0 when empty.
pub fn average_age(children: &[Child], today: NaiveDate) -> u32 {
    if children.is_empty() {
        return 0;
    }
    let total: u64 = children
        .iter()
        .map(|c| u64::from(child_age(c, today)))
        .sum();
    let mean = total as f64 / children.len() as f64;
    mean.round() as u32
}
