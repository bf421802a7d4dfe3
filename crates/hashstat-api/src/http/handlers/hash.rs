//! Digest submission and lookup.
//!
//! POST /hash      - reserve an entry, answer with its id, finalize later
//! GET  /hash/{id} - the stored digest as plain text

use axum::Form;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hashstat_types::entry::EntryId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Form body of `POST /hash`.
#[derive(Debug, Deserialize)]
pub struct HashForm {
    pub password: Option<String>,
}

/// POST /hash - Reserve an entry and schedule its finalization.
///
/// Responds with the new id as plain text before the digest exists.
pub async fn create_hash(
    State(state): State<AppState>,
    form: Result<Form<HashForm>, FormRejection>,
) -> Result<String, AppError> {
    let Form(form) = form?;
    let value = form
        .password
        .ok_or_else(|| AppError::Validation("missing form field 'password'".to_string()))?;

    let id = state.service.create_pending_entry().await?;
    state.scheduler.schedule(id, value);

    tracing::info!(
        id = %id,
        delay_ms = state.scheduler.delay().as_millis() as u64,
        "entry reserved, finalization scheduled"
    );

    Ok(id.to_string())
}

/// GET /hash/{id} - Return the digest of a finalized entry.
///
/// A pending entry answers `202 Accepted` with an empty body.
pub async fn get_hash(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let entry = state.service.get_entry(EntryId(id)).await?;

    Ok(match entry.digest {
        Some(digest) => (StatusCode::OK, digest).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    })
}
