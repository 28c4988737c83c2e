use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::PostgresNotificationEngine;

pub fn routes(engine: Arc<PostgresNotificationEngine>) -> Router {
    Router::new()
        .route("/run-tick", post(run_tick))
        .with_state(engine)
}

/// Manual trigger for operators; the scheduled loop does not wait for it.
pub async fn run_tick(State(engine): State<Arc<PostgresNotificationEngine>>) -> impl IntoResponse {
    let today = chrono::Local::now().date_naive();

    match engine.run_tick(today).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "overdue_marked": summary.overdue_marked,
                "sent": summary.sent,
                "failed": summary.failed,
                "deduped": summary.deduped,
                "companies_skipped": summary.companies_skipped,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Manual notification tick failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
