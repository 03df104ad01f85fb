//! # Donation Aggregates
//!
//! Only `Funds` donations carry money. Monthly buckets cover the six
//! calendar months ending with the month of `today`, oldest first.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use homecare_core::{parse_calendar_date, Donation};

/// Number of months in the donation trend.
pub const TREND_MONTHS: u32 = 6;

/// Funds donated in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// Short month name, e.g. `"Jan"`.
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

/// Direction of the latest month against the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DonationTrend {
    Increasing,
    Stable,
}

impl DonationTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "Increasing",
            Self::Stable => "Stable",
        }
    }
}

impl std::fmt::Display for DonationTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn total_funds(donations: &[Donation]) -> f64 {
    donations
        .iter()
        .filter(|d| d.is_funds())
        .map(Donation::amount_or_zero)
        .sum()
}

pub fn goods_count(donations: &[Donation]) -> usize {
    donations.iter().filter(|d| d.is_goods()).count()
}

/// Funds per month for the trailing [`TREND_MONTHS`] months.
pub fn monthly_fund_donations(donations: &[Donation], today: NaiveDate) -> Vec<MonthBucket> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };
    (0..TREND_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|start| {
            let amount = donations
                .iter()
                .filter(|d| d.is_funds())
                .filter(|d| {
                    d.date
                        .as_deref()
                        .and_then(parse_calendar_date)
                        .is_some_and(|date| {
                            date.year() == start.year() && date.month() == start.month()
                        })
                })
                .map(Donation::amount_or_zero)
                .sum();
            MonthBucket {
                label: start.format("%b").to_string(),
                year: start.year(),
                month: start.month(),
                amount,
            }
        })
        .collect()
}

/// `Increasing` when the latest bucket exceeds the one before it.
pub fn donation_trend(buckets: &[MonthBucket]) -> DonationTrend {
    match buckets {
        [.., previous, latest] if latest.amount > previous.amount => DonationTrend::Increasing,
        _ => DonationTrend::Stable,
    }
}
