//! Driving port for the monthly trend charts.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, TrendChart};

/// Both trend charts shown on the analysis page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// Monthly counts per severity label.
    pub severity: TrendChart,
    /// Monthly counts per status label.
    pub status: TrendChart,
}

/// Domain use-case port for trend analysis.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrendQuery: Send + Sync {
    /// Aggregate every report into severity and status charts.
    async fn trends(&self) -> Result<TrendReport, Error>;
}
