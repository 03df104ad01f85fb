//! # homecare-query: Derived Figures over the AppState
//!
//! Pure, read-only computations behind every screen: ages, money
//! formatting, stock levels, meal cost projections, donation trends,
//! screen summaries and search. Functions take the document (or a slice
//! of one collection) and an explicit `today`, so results are repeatable
//! in tests.
//!
//! Nothing here mutates state, performs I/O, returns an error or panics
//! on odd data: numeric fields read as 0 when absent and unreadable dates
//! are skipped.
//!
//! Charting is a plug-in (see [`charts`]). Every aggregate is available
//! with no chart renderer installed.

pub mod age;
pub mod charts;
pub mod donations;
pub mod inventory;
pub mod meals;
pub mod money;
pub mod search;
pub mod summary;

pub use age::{age_bands, age_on, average_age, child_age, gender_counts, AgeBands, GenderCounts};
pub use charts::{ChartError, ChartKind, ChartRenderer, ChartSpec, Charts, Series};
pub use donations::{
    donation_trend, goods_count, monthly_fund_donations, total_funds, DonationTrend, MonthBucket,
};
pub use inventory::{is_low_stock, low_stock_count, low_stock_items, total_quantity, total_value};
pub use meals::{meal_projections, meal_totals, ChildMealProjection, PeriodProjection};
pub use money::{format_money, money};
pub use search::{
    filter_by_child_and_text, filter_records, global_search, orphaned_child_references,
    GlobalSearchResults, OrphanedReference, RecordFilter, Searchable,
};
pub use summary::{
    attendance_today, dashboard_summary, finance_summary, report_summary, schedule_summary,
    AttendanceCounts, DashboardSummary, FinanceSummary, ReportSummary, ScheduleSummary,
};
