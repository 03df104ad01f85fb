//! Text charts: every chart kind is drawn as horizontal bars.

use std::io::Write;

use homecare_query::{ChartError, ChartRenderer, ChartSpec};

const BAR_WIDTH: usize = 40;

/// Renders charts as bar rows on standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextChartRenderer;

impl TextChartRenderer {
    /// The chart as text lines, one per label and series.
    pub fn lines(chart: &ChartSpec) -> Vec<String> {
        let peak = chart
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let label_width = chart
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec![chart.title.clone()];
        for series in &chart.series {
            if chart.series.len() > 1 {
                lines.push(format!("  {}", series.label));
            }
            for (label, value) in chart.labels.iter().zip(&series.values) {
                let value = if value.is_finite() {
                    value.max(0.0)
                } else {
                    0.0
                };
                let filled = if peak > 0.0 {
                    ((value / peak) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                lines.push(format!(
                    "  {label:<label_width$}  {:<BAR_WIDTH$}  {value}",
                    "#".repeat(filled)
                ));
            }
        }
        lines
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<(), ChartError> {
        let mut out = std::io::stdout().lock();
        for line in Self::lines(chart) {
            writeln!(out, "{line}").map_err(|e| ChartError::Render(e.to_string()))?;
        }
        Ok(())
    }
}
