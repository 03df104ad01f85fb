//! # Chart Plug-in Seam
//!
//! Charts are optional. Screens describe what they would draw as a
//! [`ChartSpec`] and hand it to [`Charts`], which forwards it to a
//! [`ChartRenderer`] when one is installed. With no renderer every draw
//! is skipped, and a renderer failure is logged and dropped. Neither case
//! affects the document or any aggregate.

use serde::Serialize;
use thiserror::Error;

use crate::age::AgeBands;
use crate::donations::MonthBucket;
use crate::summary::{DashboardSummary, FinanceSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
}

/// One named data series; values align with the chart's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// A renderer-independent chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// Errors raised by a chart renderer.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The renderer cannot draw this kind of chart.
    #[error("chart kind {kind:?} is not supported by this renderer")]
    Unsupported { kind: ChartKind },

    /// Drawing failed.
    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// A charting capability.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<(), ChartError>;
}

/// The optional charting capability of a front end.
#[derive(Default)]
pub struct Charts {
    renderer: Option<Box<dyn ChartRenderer>>,
}

impl std::fmt::Debug for Charts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Charts")
            .field("available", &self.is_available())
            .finish()
    }
}

impl Charts {
    /// No charting capability; every draw is skipped.
    pub fn none() -> Self {
        Self { renderer: None }
    }

    pub fn with_renderer(renderer: Box<dyn ChartRenderer>) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    pub fn is_available(&self) -> bool {
        self.renderer.is_some()
    }

    /// Draw `chart` if a renderer is installed. Returns whether the chart
    /// was drawn.
    pub fn draw(&self, chart: &ChartSpec) -> bool {
        let Some(renderer) = &self.renderer else {
            tracing::debug!(title = %chart.title, "no chart renderer; skipping chart");
            return false;
        };
        match renderer.render(chart) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(title = %chart.title, error = %e, "chart could not be drawn");
                false
            }
        }
    }
}

fn labels<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Monthly fund donations as a line.
pub fn donation_trend_chart(buckets: &[MonthBucket]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Donation Trends".into(),
        labels: labels(buckets.iter().map(|b| b.label.clone())),
        series: vec![Series {
            label: "Monthly Donations".into(),
            values: buckets.iter().map(|b| b.amount).collect(),
        }],
    }
}

/// Children per age band as bars.
pub fn age_band_chart(bands: &AgeBands) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Age Distribution".into(),
        labels: labels(AgeBands::LABELS),
        series: vec![Series {
            label: "Children".into(),
            values: bands.counts().iter().map(|&n| n as f64).collect(),
        }],
    }
}

/// Where the funds go: what is left after care costs and a year of meals.
pub fn budget_allocation_chart(summary: &DashboardSummary) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Budget Allocation".into(),
        labels: labels([
            "Available Funds",
            "Health Bills",
            "Education Fees",
            "Annual Meals",
        ]),
        series: vec![Series {
            label: "Amount".into(),
            values: vec![
                summary.available_funds(),
                summary.health_bills,
                summary.education_fees,
                summary.annual_meals(),
            ],
        }],
    }
}

/// Funds against spending.
pub fn finance_allocation_chart(summary: &FinanceSummary) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Funds vs Expenses".into(),
        labels: labels(["Funds", "Expenses"]),
        series: vec![Series {
            label: "Amount".into(),
            values: vec![summary.total_funds, summary.spent.max(0.0)],
        }],
    }
}
