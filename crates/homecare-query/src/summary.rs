//! # Screen Summaries
//!
//! The aggregate figures shown on the dashboard, reports, finance,
//! attendance and scheduling screens. Each summary is computed on demand
//! from the document and never stored.

use chrono::NaiveDate;
use serde::Serialize;

use homecare_core::records::{
    ATTENDANCE_ABSENT, ATTENDANCE_LATE, ATTENDANCE_PRESENT, SCHEDULE_COMPLETED,
};
use homecare_core::{
    parse_calendar_date, AppState, EducationRecord, Expense, HealthRecord, ScheduleEvent,
};

use crate::age::{age_bands, average_age, gender_counts, whole_months, AgeBands, GenderCounts};
use crate::donations::{
    donation_trend, goods_count, monthly_fund_donations, total_funds, DonationTrend, MonthBucket,
};
use crate::inventory::low_stock_count;
use crate::meals::{meal_totals, PeriodProjection};

/// Admissions within this many whole months count as new.
pub const NEW_ADMISSION_MONTHS: i64 = 3;

/// Maximum number of upcoming events listed.
pub const UPCOMING_LIMIT: usize = 10;

pub fn total_health_bills(health: &[HealthRecord]) -> f64 {
    health.iter().map(HealthRecord::medical_bill_or_zero).sum()
}

pub fn total_education_fees(education: &[EducationRecord]) -> f64 {
    education.iter().map(EducationRecord::fees_or_zero).sum()
}

pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(Expense::amount_or_zero).sum()
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_children: usize,
    pub total_staff: usize,
    pub total_funds: f64,
    pub low_stock: usize,
    pub items_in_good_stock: usize,
    /// Children admitted less than three whole months ago.
    pub new_admissions: usize,
    /// Children per staff member, rounded; `None` without staff.
    pub child_staff_ratio: Option<u64>,
    pub donation_trend: DonationTrend,
    pub monthly_donations: Vec<MonthBucket>,
    pub health_bills: f64,
    pub education_fees: f64,
    pub daily_meals: f64,
    pub age_bands: AgeBands,
    pub genders: GenderCounts,
}

impl DashboardSummary {
    /// Funds left after health bills, education fees and a year of meals,
    /// floored at zero.
    pub fn available_funds(&self) -> f64 {
        (self.total_funds - self.health_bills - self.education_fees - self.annual_meals()).max(0.0)
    }

    pub fn annual_meals(&self) -> f64 {
        PeriodProjection::from_daily(self.daily_meals).yearly
    }
}

pub fn dashboard_summary(state: &AppState, today: NaiveDate) -> DashboardSummary {
    let low_stock = low_stock_count(&state.inventory);
    let new_admissions = state
        .children
        .iter()
        .filter_map(|c| c.admission_date.as_deref().and_then(parse_calendar_date))
        .filter(|admitted| whole_months(*admitted, today) < NEW_ADMISSION_MONTHS)
        .count();
    let child_staff_ratio = match state.staff.len() {
        0 => None,
        staff => Some((state.children.len() as f64 / staff as f64).round() as u64),
    };
    let monthly_donations = monthly_fund_donations(&state.donations, today);

    DashboardSummary {
        total_children: state.children.len(),
        total_staff: state.staff.len(),
        total_funds: total_funds(&state.donations),
        low_stock,
        items_in_good_stock: state.inventory.len() - low_stock,
        new_admissions,
        child_staff_ratio,
        donation_trend: donation_trend(&monthly_donations),
        monthly_donations,
        health_bills: total_health_bills(&state.health),
        education_fees: total_education_fees(&state.education),
        daily_meals: meal_totals(&state.meals).daily,
        age_bands: age_bands(&state.children, today),
        genders: gender_counts(&state.children),
    }
}

/// Reports screen figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_children: usize,
    pub average_age: u32,
    pub total_funds: f64,
    pub goods_donations: usize,
    pub low_stock: usize,
    pub health_bills: f64,
    pub education_fees: f64,
    pub daily_meals: f64,
    pub incidents: usize,
    pub attendance_entries: usize,
}

impl ReportSummary {
    /// Health bills plus education fees.
    pub fn care_costs(&self) -> f64 {
        self.health_bills + self.education_fees
    }
}

pub fn report_summary(state: &AppState, today: NaiveDate) -> ReportSummary {
    ReportSummary {
        total_children: state.children.len(),
        average_age: average_age(&state.children, today),
        total_funds: total_funds(&state.donations),
        goods_donations: goods_count(&state.donations),
        low_stock: low_stock_count(&state.inventory),
        health_bills: total_health_bills(&state.health),
        education_fees: total_education_fees(&state.education),
        daily_meals: meal_totals(&state.meals).daily,
        incidents: state.incidents.len(),
        attendance_entries: state.attendance.len(),
    }
}

/// Finance screen figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_funds: f64,
    pub spent: f64,
    /// Funds minus spending; may be negative.
    pub balance: f64,
    pub budget: f64,
    /// Budget minus spending; may be negative.
    pub remaining_budget: f64,
}

pub fn finance_summary(state: &AppState) -> FinanceSummary {
    let funds = total_funds(&state.donations);
    let spent = total_expenses(&state.finance.expenses);
    FinanceSummary {
        total_funds: funds,
        spent,
        balance: funds - spent,
        budget: state.finance.budget,
        remaining_budget: state.finance.budget - spent,
    }
}

/// Attendance marks recorded for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

pub fn attendance_today(state: &AppState, today: NaiveDate) -> AttendanceCounts {
    state
        .attendance
        .iter()
        .filter(|a| a.date.as_deref().and_then(parse_calendar_date) == Some(today))
        .fold(AttendanceCounts::default(), |mut counts, a| {
            match a.status.as_deref() {
                Some(ATTENDANCE_PRESENT) => counts.present += 1,
                Some(ATTENDANCE_ABSENT) => counts.absent += 1,
                Some(ATTENDANCE_LATE) => counts.late += 1,
                _ => {}
            }
            counts
        })
}

/// Scheduling screen figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary<'a> {
    pub total: usize,
    /// Events dated today or later, in stored order, at most
    /// [`UPCOMING_LIMIT`].
    pub upcoming: Vec<&'a ScheduleEvent>,
    pub completed: usize,
}

pub fn schedule_summary(state: &AppState, today: NaiveDate) -> ScheduleSummary<'_> {
    ScheduleSummary {
        total: state.schedule.len(),
        upcoming: state
            .schedule
            .iter()
            .filter(|s| {
                s.date
                    .as_deref()
                    .and_then(parse_calendar_date)
                    .is_some_and(|d| d >= today)
            })
            .take(UPCOMING_LIMIT)
            .collect(),
        completed: state
            .schedule
            .iter()
            .filter(|s| s.status.as_deref() == Some(SCHEDULE_COMPLETED))
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecare_core::{
        AttendanceRecord, Child, Donation, InventoryItem, MealEntry, RecordId, StaffMember,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn child(name: &str, dob: &str, admitted: &str) -> Child {
        Child {
            name: Some(name.into()),
            dob: Some(dob.into()),
            admission_date: Some(admitted.into()),
            gender: Some("F".into()),
            ..Default::default()
        }
    }

    fn sample() -> AppState {
        AppState {
            children: vec![
                child("Amina K", "2014-03-11", "2021-06-01"),
                child("Zoe", "2020-01-01", "2024-12-01"),
                child("Chloe N", "2016-02-05", "2022-02-12"),
            ],
            staff: vec![StaffMember::default(), StaffMember::default()],
            donations: vec![
                Donation {
                    kind: Some("Funds".into()),
                    amount: Some(1500.0),
                    date: Some("2024-12-12".into()),
                    ..Default::default()
                },
                Donation {
                    kind: Some("Funds".into()),
                    amount: Some(800.0),
                    date: Some("2024-12-30".into()),
                    ..Default::default()
                },
                Donation {
                    kind: Some("Goods".into()),
                    date: Some("2024-12-20".into()),
                    ..Default::default()
                },
            ],
            inventory: vec![
                InventoryItem {
                    qty: Some(40.0),
                    min: Some(50.0),
                    ..Default::default()
                },
                InventoryItem {
                    qty: Some(120.0),
                    min: Some(60.0),
                    ..Default::default()
                },
            ],
            health: vec![HealthRecord {
                medical_bill: Some(500.0),
                ..Default::default()
            }],
            education: vec![EducationRecord {
                fees: Some(8500.0),
                ..Default::default()
            }],
            meals: vec![MealEntry {
                amount: Some(10.0),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn dashboard_figures() {
        let s = dashboard_summary(&sample(), date(2025, 1, 1));
        assert_eq!(s.total_children, 3);
        assert_eq!(s.total_funds, 2300.0);
        assert_eq!(s.low_stock, 1);
        assert_eq!(s.items_in_good_stock, 1);
        assert_eq!(s.new_admissions, 1);
        assert_eq!(s.child_staff_ratio, Some(2));
        assert_eq!(s.donation_trend, DonationTrend::Stable);
        assert_eq!(s.monthly_donations[4].amount, 2300.0);
        assert_eq!(s.monthly_donations.len(), 6);
        assert_eq!(s.annual_meals(), 3650.0);
        assert_eq!(s.available_funds(), 0.0);
        assert_eq!(s.age_bands.counts(), [1, 2, 0, 0]);
        assert_eq!(s.genders.female, 3);
    }

    #[test]
    fn ratio_is_absent_without_staff() {
        let mut state = sample();
        state.staff.clear();
        let summary = dashboard_summary(&state, date(2025, 1, 1));
        assert_eq!(summary.child_staff_ratio, None);
    }

    #[test]
    fn report_figures() {
        let r = report_summary(&sample(), date(2025, 1, 1));
        // ages 10, 5 and 8
        assert_eq!(r.average_age, 8);
        assert_eq!(r.goods_donations, 1);
        assert_eq!(r.care_costs(), 9000.0);
        assert_eq!(r.incidents, 0);
    }

    #[test]
    fn finance_balance_can_go_negative() {
        let mut state = sample();
        state.finance.expenses.push(Expense {
            id: RecordId::generate(),
            amount: Some(3000.0),
            ..Default::default()
        });
        let f = finance_summary(&state);
        assert_eq!(f.spent, 3000.0);
        assert_eq!(f.balance, -700.0);
        assert_eq!(f.budget, 12_000.0);
        assert_eq!(f.remaining_budget, 9_000.0);
    }

    #[test]
    fn attendance_counts_only_today() {
        let mark = |on: &str, status: &str| AttendanceRecord {
            date: Some(on.into()),
            status: Some(status.into()),
            ..Default::default()
        };
        let state = AppState {
            attendance: vec![
                mark("2025-01-01", "Present"),
                mark("2025-01-01", "Present"),
                mark("2025-01-01", "Late"),
                mark("2024-12-31", "Absent"),
                mark("2025-01-01", "Excused"),
            ],
            ..Default::default()
        };
        assert_eq!(
            attendance_today(&state, date(2025, 1, 1)),
            AttendanceCounts {
                present: 2,
                absent: 0,
                late: 1,
            }
        );
    }

    #[test]
    fn schedule_upcoming_is_capped_and_ordered() {
        let event = |title: String, on: &str, status: &str| ScheduleEvent {
            title: Some(title),
            date: Some(on.into()),
            status: Some(status.into()),
            ..Default::default()
        };
        let mut schedule: Vec<_> = (0..12)
            .map(|i| event(format!("e{i}"), "2025-02-01", "Scheduled"))
            .collect();
        schedule.insert(0, event("past".into(), "2024-12-01", SCHEDULE_COMPLETED));
        schedule.push(event("undated".into(), "", "Scheduled"));
        let state = AppState {
            schedule,
            ..Default::default()
        };
        let s = schedule_summary(&state, date(2025, 1, 1));
        assert_eq!(s.total, 14);
        assert_eq!(s.completed, 1);
        assert_eq!(s.upcoming.len(), UPCOMING_LIMIT);
        assert_eq!(s.upcoming[0].title.as_deref(), Some("e0"));
    }
}
