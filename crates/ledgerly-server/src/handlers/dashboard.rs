//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use ledgerly_core::aggregate::dashboard_summary;
use ledgerly_core::models::DashboardSummary;

/// Two years of weekly records is enough for the summary and its
/// year-over-year baseline.
const DASHBOARD_WEEK_WINDOW: i64 = 104;

/// Query parameters for the dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Year to summarize; defaults to the current year
    pub year: Option<i32>,
}

/// GET /api/dashboard - Yearly summary with alerts and year-over-year deltas
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let year = params.year.unwrap_or_else(|| Utc::now().year());

    let records = state
        .db
        .list_recent_weekly(user.id, DASHBOARD_WEEK_WINDOW)?;
    let summary = dashboard_summary(&records, year);

    state.db.log_audit(
        &user.email,
        "read",
        Some("dashboard"),
        Some(&year.to_string()),
        Some(&format!("weeks_tracked={}", summary.weeks_tracked)),
    )?;

    Ok(Json(summary))
}
