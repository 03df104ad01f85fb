//! # Report Subcommands
//!
//! Read-only views of the document: `summary`, `report`, `finance`,
//! `meals`, `attendance` and `schedule`. Each prints a text view, or the
//! underlying figures as JSON with `--json`. `--charts` draws the screen's
//! charts as text where the screen has any.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use homecare_core::{parse_calendar_date, AppState, ScheduleEvent};
use homecare_query::charts::{
    age_band_chart, budget_allocation_chart, donation_trend_chart, finance_allocation_chart,
};
use homecare_query::{
    attendance_today, dashboard_summary, finance_summary, meal_projections, meal_totals, money,
    report_summary, schedule_summary, total_quantity, total_value, Charts,
};

use crate::chart::TextChartRenderer;
use crate::table::{cell, Table};

/// Output options shared by every report.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Print the figures as JSON.
    #[arg(long)]
    pub json: bool,

    /// Draw charts as text below the figures.
    #[arg(long)]
    pub charts: bool,
}

impl ReportArgs {
    fn charts(&self) -> Charts {
        if self.charts && !self.json {
            Charts::with_renderer(Box::new(TextChartRenderer))
        } else {
            Charts::none()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}

fn kv_table<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> Table {
    let mut table = Table::new(["Metric", "Value"]);
    for (metric, value) in rows {
        table.push([metric.to_string(), value]);
    }
    table
}

pub fn run_summary(args: &ReportArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    let s = dashboard_summary(state, today);
    if args.json {
        return print_json(&s);
    }
    let ratio = s
        .child_staff_ratio
        .map_or_else(|| "n/a".to_string(), |r| format!("{r}:1"));
    println!("{}", state.meta.settings.org_name());
    println!(
        "{}",
        kv_table([
            ("Total children", s.total_children.to_string()),
            ("New this quarter", s.new_admissions.to_string()),
            ("Active staff", s.total_staff.to_string()),
            ("Child-to-staff ratio", ratio),
            ("Total funds", money(state, s.total_funds)),
            ("Donation trend", s.donation_trend.to_string()),
            ("Low stock items", s.low_stock.to_string()),
            ("Items in good stock", s.items_in_good_stock.to_string()),
            ("Health bills", money(state, s.health_bills)),
            ("Education fees", money(state, s.education_fees)),
            ("Daily meals", money(state, s.daily_meals)),
            ("Boys / girls", format!("{} / {}", s.genders.male, s.genders.female)),
        ])
    );
    println!("\nRecent donations");
    let mut recent = Table::new(["Donor", "Type", "Amount", "Date"]);
    for d in state.donations.iter().take(5) {
        let amount = if d.is_funds() {
            money(state, d.amount_or_zero())
        } else {
            "-".to_string()
        };
        recent.push([
            cell(d.donor.as_deref()),
            cell(d.kind.as_deref()),
            amount,
            cell(d.date.as_deref()),
        ]);
    }
    println!("{recent}");

    let charts = args.charts();
    charts.draw(&budget_allocation_chart(&s));
    charts.draw(&age_band_chart(&s.age_bands));
    charts.draw(&donation_trend_chart(&s.monthly_donations));
    Ok(0)
}

pub fn run_report(args: &ReportArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    let r = report_summary(state, today);
    if args.json {
        return print_json(&r);
    }
    println!(
        "{}",
        kv_table([
            ("Total children", r.total_children.to_string()),
            ("Average age", r.average_age.to_string()),
            ("Total funds", money(state, r.total_funds)),
            ("Goods donations", r.goods_donations.to_string()),
            ("Low stock items", r.low_stock.to_string()),
            ("Units in stock", total_quantity(&state.inventory).to_string()),
            ("Stock value", money(state, total_value(&state.inventory))),
            ("Health + education", money(state, r.care_costs())),
            ("Daily meals", money(state, r.daily_meals)),
            ("Incidents", r.incidents.to_string()),
            ("Attendance entries", r.attendance_entries.to_string()),
        ])
    );
    let low = homecare_query::low_stock_items(&state.inventory);
    if !low.is_empty() {
        println!("\nLow stock");
        let mut table = Table::new(["Item", "Qty", "Min"]);
        for item in low {
            table.push([
                cell(item.item.as_deref()),
                item.qty_or_zero().to_string(),
                item.min_or_zero().to_string(),
            ]);
        }
        println!("{table}");
    }
    let bands = homecare_query::age_bands(&state.children, today);
    args.charts().draw(&age_band_chart(&bands));
    Ok(0)
}

pub fn run_finance(args: &ReportArgs, state: &AppState) -> Result<u8> {
    let f = finance_summary(state);
    if args.json {
        return print_json(&f);
    }
    println!(
        "{}",
        kv_table([
            ("Total funds", money(state, f.total_funds)),
            ("Spent", money(state, f.spent)),
            ("Balance", money(state, f.balance)),
            ("Budget", money(state, f.budget)),
            ("Remaining budget", money(state, f.remaining_budget)),
        ])
    );
    println!("\nExpenses");
    let mut table = Table::new(["Description", "Amount", "Date"]);
    for e in &state.finance.expenses {
        table.push([
            cell(e.desc.as_deref()),
            money(state, e.amount_or_zero()),
            cell(e.date.as_deref()),
        ]);
    }
    if table.is_empty() {
        println!("No expenses.");
    } else {
        println!("{table}");
    }
    args.charts().draw(&finance_allocation_chart(&f));
    Ok(0)
}

pub fn run_meals(args: &ReportArgs, state: &AppState) -> Result<u8> {
    let rows = meal_projections(state);
    if args.json {
        return print_json(&rows);
    }
    let mut table = Table::new(["Child", "Daily", "Weekly", "Monthly", "Yearly"]);
    for row in &rows {
        let p = row.projection;
        table.push([
            row.child.clone(),
            money(state, p.daily),
            money(state, p.weekly),
            money(state, p.monthly),
            money(state, p.yearly),
        ]);
    }
    println!("{table}");
    let totals = meal_totals(&state.meals);
    println!(
        "\nTotal: {} per day, {} per year",
        money(state, totals.daily),
        money(state, totals.yearly)
    );
    Ok(0)
}

pub fn run_attendance(args: &ReportArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    let counts = attendance_today(state, today);
    if args.json {
        return print_json(&counts);
    }
    println!(
        "{}",
        kv_table([
            ("Present today", counts.present.to_string()),
            ("Absent today", counts.absent.to_string()),
            ("Late today", counts.late.to_string()),
            ("Entries", state.attendance.len().to_string()),
        ])
    );
    Ok(0)
}

pub fn run_schedule(args: &ReportArgs, state: &AppState, today: NaiveDate) -> Result<u8> {
    let s = schedule_summary(state, today);
    if args.json {
        return print_json(&s);
    }
    println!(
        "{}",
        kv_table([
            ("Total events", s.total.to_string()),
            ("Upcoming", s.upcoming.len().to_string()),
            ("Completed", s.completed.to_string()),
        ])
    );
    if !s.upcoming.is_empty() {
        println!("\nUpcoming");
        let mut table = Table::new(["Date", "Time", "Title", "Assigned to", "Status"]);
        for e in &s.upcoming {
            table.push([
                cell(e.date.as_deref()),
                cell(e.time.as_deref()),
                cell(e.title.as_deref()),
                cell(e.assigned_to.as_deref()),
                cell(e.status.as_deref()),
            ]);
        }
        println!("{table}");

        println!("\nCalendar");
        for line in calendar_lines(&s.upcoming) {
            println!("{line}");
        }
    }
    Ok(0)
}

/// Days shown in the upcoming calendar.
const CALENDAR_DAYS: usize = 7;

/// Upcoming events grouped by date, earliest first, for at most
/// [`CALENDAR_DAYS`] dates.
fn calendar_lines(upcoming: &[&ScheduleEvent]) -> Vec<String> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ScheduleEvent>> = BTreeMap::new();
    for &event in upcoming {
        if let Some(date) = event.date.as_deref().and_then(parse_calendar_date) {
            by_date.entry(date).or_default().push(event);
        }
    }
    let mut lines = Vec::new();
    for (date, events) in by_date.into_iter().take(CALENDAR_DAYS) {
        lines.push(date.format("%A, %b %-d").to_string());
        for e in events {
            let time = e
                .time
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("All day");
            lines.push(format!("  {}  {time}", cell(e.title.as_deref())));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn state() -> AppState {
        homecare_store::seed(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn every_report_runs_on_seed_data() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let s = state();
        for args in [
            ReportArgs::default(),
            ReportArgs {
                json: true,
                charts: false,
            },
            ReportArgs {
                json: false,
                charts: true,
            },
        ] {
            assert_eq!(run_summary(&args, &s, today).unwrap(), 0);
            assert_eq!(run_report(&args, &s, today).unwrap(), 0);
            assert_eq!(run_finance(&args, &s).unwrap(), 0);
            assert_eq!(run_meals(&args, &s).unwrap(), 0);
            assert_eq!(run_attendance(&args, &s, today).unwrap(), 0);
            assert_eq!(run_schedule(&args, &s, today).unwrap(), 0);
        }
    }

    #[test]
    fn calendar_groups_by_date() {
        let event = |title: &str, date: &str, time: Option<&str>| ScheduleEvent {
            title: Some(title.into()),
            date: Some(date.into()),
            time: time.map(Into::into),
            ..Default::default()
        };
        let later = event("Dentist", "2025-01-03", Some("10:00"));
        let first = event("Staff meeting", "2025-01-02", None);
        let same_day = event("Grocery run", "2025-01-03", Some(" "));
        let lines = calendar_lines(&[&later, &first, &same_day]);
        assert_eq!(
            lines,
            [
                "Thursday, Jan 2",
                "  Staff meeting  All day",
                "Friday, Jan 3",
                "  Dentist  10:00",
                "  Grocery run  All day",
            ]
        );
    }

    #[test]
    fn reports_run_on_an_empty_document() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let empty = AppState::empty(Utc::now());
        let code = run_summary(&ReportArgs::default(), &empty, today).unwrap();
        assert_eq!(code, 0);
        assert_eq!(run_meals(&ReportArgs::default(), &empty).unwrap(), 0);
    }
}
