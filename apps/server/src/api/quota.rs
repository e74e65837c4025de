use std::sync::Arc;

use crate::{
    dashboard::{current_alerts, AlertView},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use fixwatch_market_data::{CallKind, WindowUsage};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotaStatus {
    usage: Vec<WindowUsage>,
    alerts: Vec<AlertView>,
}

/// Current window counts and alerts for both call kinds.
async fn get_quota(State(state): State<Arc<AppState>>) -> ApiResult<Json<QuotaStatus>> {
    let now = state.client.clock().now();
    let tracker = state.client.tracker();
    let usage = CallKind::ALL
        .iter()
        .flat_map(|kind| tracker.usage(*kind, now))
        .collect();
    Ok(Json(QuotaStatus {
        usage,
        alerts: current_alerts(&state.client, now),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quota", get(get_quota))
}
