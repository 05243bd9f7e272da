//! Monthly trend aggregation and its chart representation.
//!
//! Counts are bucketed by calendar month only. Reports from different years
//! that share a month land in the same bucket, so a series always has twelve
//! entries running January to December.

use serde::Serialize;

/// English month names used as the chart's x axis.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Report attribute a trend is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendDimension {
    /// Group by severity label.
    Severity,
    /// Group by status label.
    Status,
}

impl TrendDimension {
    /// Chart title for the dimension.
    pub fn title(self) -> &'static str {
        match self {
            Self::Severity => "Bug Reports by Severity",
            Self::Status => "Bug Reports by Status",
        }
    }
}

/// Number of reports with `label` created in calendar `month` (1-12).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    /// Calendar month, January is 1.
    pub month: u32,
    /// Severity or status label.
    pub label: String,
    /// Reports counted.
    pub count: u64,
}

/// Twelve monthly counts for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSeries {
    label: String,
    counts: [u64; 12],
}

impl TrendSeries {
    /// Label the series counts.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Counts indexed January (0) to December (11).
    pub fn counts(&self) -> &[u64; 12] {
        &self.counts
    }
}

/// Fold monthly counts into one series per label.
///
/// Series appear in the order their label is first seen. Rows with a month
/// outside 1-12 are ignored.
///
/// # Examples
/// ```
/// use bugtracker::domain::{MonthlyCount, aggregate_monthly};
///
/// let series = aggregate_monthly([
///     MonthlyCount { month: 2, label: "High".into(), count: 3 },
///     MonthlyCount { month: 2, label: "High".into(), count: 1 },
/// ]);
/// assert_eq!(series[0].counts()[1], 4);
/// ```
pub fn aggregate_monthly(rows: impl IntoIterator<Item = MonthlyCount>) -> Vec<TrendSeries> {
    let mut series: Vec<TrendSeries> = Vec::new();
    for row in rows {
        let Some(index) = row.month.checked_sub(1).map(|m| m as usize) else {
            continue;
        };
        if index >= MONTH_NAMES.len() {
            continue;
        }
        let position = match series.iter().position(|s| s.label == row.label) {
            Some(position) => position,
            None => {
                series.push(TrendSeries {
                    label: row.label,
                    counts: [0; 12],
                });
                series.len() - 1
            }
        };
        if let Some(entry) = series.get_mut(position) {
            entry.counts[index] += row.count;
        }
    }
    series
}

/// Grouped bar chart of one trend dimension.
///
/// Serialises as a plotting figure: a `data` array with one bar trace per
/// label and a `layout` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "FigureDto")]
pub struct TrendChart {
    dimension: TrendDimension,
    series: Vec<TrendSeries>,
}

impl TrendChart {
    /// Build a chart from already aggregated series.
    pub fn new(dimension: TrendDimension, series: Vec<TrendSeries>) -> Self {
        Self { dimension, series }
    }

    /// Dimension the chart groups by.
    pub fn dimension(&self) -> TrendDimension {
        self.dimension
    }

    /// Series in display order.
    pub fn series(&self) -> &[TrendSeries] {
        &self.series
    }
}

#[derive(Serialize)]
struct FigureDto {
    data: Vec<BarTraceDto>,
    layout: LayoutDto,
}

#[derive(Serialize)]
struct BarTraceDto {
    x: [&'static str; 12],
    y: [u64; 12],
    #[serde(rename = "type")]
    kind: &'static str,
    name: String,
}

#[derive(Serialize)]
struct LayoutDto {
    title: &'static str,
    barmode: &'static str,
    yaxis: AxisDto,
}

#[derive(Serialize)]
struct AxisDto {
    tickformat: &'static str,
}

impl From<TrendChart> for FigureDto {
    fn from(chart: TrendChart) -> Self {
        Self {
            data: chart
                .series
                .into_iter()
                .map(|series| BarTraceDto {
                    x: MONTH_NAMES,
                    y: series.counts,
                    kind: "bar",
                    name: series.label,
                })
                .collect(),
            layout: LayoutDto {
                title: chart.dimension.title(),
                barmode: "group",
                yaxis: AxisDto { tickformat: ",d" },
            },
        }
    }
}
