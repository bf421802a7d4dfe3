//! GET /stats - Entry count and mean compute time.

use axum::Json;
use axum::extract::State;

use hashstat_types::entry::AggregateStats;

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AggregateStats>, AppError> {
    let stats = state.service.get_aggregate().await?;
    Ok(Json(stats))
}
