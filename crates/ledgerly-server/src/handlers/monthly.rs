//! Monthly budget record handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, AuthUser};
use ledgerly_core::models::MonthlyBudget;
use ledgerly_core::period::MonthKey;

fn month_key(year: i32, month: u32) -> Result<MonthKey, AppError> {
    MonthKey::new(year, month).map_err(|e| AppError::bad_request(&e.to_string()))
}

/// GET /api/monthly/:year/:month - Load one monthly plan
///
/// A period with no stored plan reads as an all-zero plan.
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthlyBudget>, AppError> {
    let key = month_key(year, month)?;

    let budget = state.db.get_monthly(user.id, key)?.unwrap_or_default();

    state.db.log_audit(
        &user.email,
        "read",
        Some("monthly_budget"),
        Some(&key.doc_id()),
        None,
    )?;

    Ok(Json(budget))
}

/// PUT /api/monthly/:year/:month - Full-replace save of a monthly plan
///
/// Unlike weekly saves, the whole record is replaced: fields absent from
/// the body are reset to their defaults.
pub async fn save_monthly(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((year, month)): Path<(i32, u32)>,
    Json(budget): Json<MonthlyBudget>,
) -> Result<Json<MonthlyBudget>, AppError> {
    let key = month_key(year, month)?;

    state.db.save_monthly(user.id, key, &budget)?;

    state.db.log_audit(
        &user.email,
        "save",
        Some("monthly_budget"),
        Some(&key.doc_id()),
        None,
    )?;

    Ok(Json(budget))
}
