//! Weekly budget record handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use ledgerly_core::models::{WeeklyPatch, WeeklyRecord};
use ledgerly_core::period::WeekKey;

fn week_key(year: i32, week: u32) -> Result<WeekKey, AppError> {
    WeekKey::new(year, week).map_err(|e| AppError::bad_request(&e.to_string()))
}

/// GET /api/weekly/:year/:week - Load one weekly record
///
/// A period with no stored record reads as an all-zero record, so the client
/// never has to special-case "not saved yet".
pub async fn get_weekly(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Json<WeeklyRecord>, AppError> {
    let key = week_key(year, week)?;

    let record = state
        .db
        .get_weekly(user.id, key)?
        .unwrap_or_else(|| WeeklyRecord {
            year: key.year,
            week: key.week,
            budget: Default::default(),
            updated_at: None,
        });

    state.db.log_audit(
        &user.email,
        "read",
        Some("weekly_budget"),
        Some(&key.doc_id()),
        None,
    )?;

    Ok(Json(record))
}

/// PUT /api/weekly/:year/:week - Merge-save a weekly record
///
/// Only the fields present in the body are written; the rest keep their
/// stored values. Returns the record as stored after the merge.
pub async fn save_weekly(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((year, week)): Path<(i32, u32)>,
    Json(patch): Json<WeeklyPatch>,
) -> Result<Json<WeeklyRecord>, AppError> {
    let key = week_key(year, week)?;

    let record = state.db.save_weekly(user.id, key, &patch)?;

    state.db.log_audit(
        &user.email,
        "save",
        Some("weekly_budget"),
        Some(&key.doc_id()),
        None,
    )?;

    Ok(Json(record))
}

/// Query parameters for listing weekly records
#[derive(Debug, Deserialize)]
pub struct ListWeeklyQuery {
    /// Maximum number of records to return, newest first
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    104
}

/// GET /api/weekly - Most recent weekly records, newest first
pub async fn list_weekly(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<ListWeeklyQuery>,
) -> Result<Json<Vec<WeeklyRecord>>, AppError> {
    if params.limit < 1 || params.limit > 1000 {
        return Err(AppError::bad_request("limit must be between 1 and 1000"));
    }

    let records = state.db.list_recent_weekly(user.id, params.limit)?;

    state.db.log_audit(
        &user.email,
        "list",
        Some("weekly_budget"),
        None,
        Some(&format!("limit={}, count={}", params.limit, records.len())),
    )?;

    Ok(Json(records))
}
