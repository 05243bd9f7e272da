//! Trend analysis handler.

use actix_web::{get, web};

use crate::domain::ports::TrendReport;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, TrendReportSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Monthly report counts by severity and by status, as plotly figures.
#[utoipa::path(
    get,
    path = "/trend_analysis",
    responses(
        (status = 200, description = "Severity and status charts", body = TrendReportSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["bugs"],
    operation_id = "trendAnalysis"
)]
#[get("/trend_analysis")]
pub async fn trend_analysis(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TrendReport>> {
    session.require_user(state.users.as_ref()).await?;
    Ok(web::Json(state.trends.trends().await?))
}
