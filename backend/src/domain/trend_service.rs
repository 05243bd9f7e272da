//! Trend analysis service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    BugReportPersistenceError, BugReportRepository, TrendQuery, TrendReport,
};
use crate::domain::{Error, TrendChart, TrendDimension, aggregate_monthly};

/// Builds the severity and status charts from repository counts.
#[derive(Clone)]
pub struct TrendService<R> {
    reports: Arc<R>,
}

impl<R> TrendService<R> {
    /// Create a new service over `reports`.
    pub fn new(reports: Arc<R>) -> Self {
        Self { reports }
    }
}

impl<R: BugReportRepository> TrendService<R> {
    async fn chart(&self, dimension: TrendDimension) -> Result<TrendChart, Error> {
        let rows = self
            .reports
            .monthly_counts(dimension)
            .await
            .map_err(|err| match err {
                BugReportPersistenceError::Connection { message } => Error::service_unavailable(
                    format!("bug report repository unavailable: {message}"),
                ),
                other => Error::internal(format!("bug report repository error: {other}")),
            })?;
        Ok(TrendChart::new(dimension, aggregate_monthly(rows)))
    }
}

#[async_trait]
impl<R: BugReportRepository> TrendQuery for TrendService<R> {
    async fn trends(&self) -> Result<TrendReport, Error> {
        Ok(TrendReport {
            severity: self.chart(TrendDimension::Severity).await?,
            status: self.chart(TrendDimension::Status).await?,
        })
    }
}
