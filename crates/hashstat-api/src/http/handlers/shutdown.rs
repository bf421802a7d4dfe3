//! /shutdown - Ask the server to stop.
//!
//! The response goes out first; the serve loop then stops accepting
//! connections, cancels pending finalizations and closes the store.

use axum::extract::State;

use crate::state::AppState;

pub async fn shutdown(State(state): State<AppState>) -> &'static str {
    tracing::info!(
        pending_finalizations = state.scheduler.pending_count(),
        "shutdown requested over HTTP"
    );
    state.shutdown.cancel();
    "shutting down\n"
}
