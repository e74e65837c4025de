use std::sync::Arc;

use crate::{
    dashboard::{build_dashboard, DashboardView},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

/// HTML dashboard. Fetch failures render the error page with a 502 or 503.
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Response {
    let result = match build_dashboard(&state.client, state.windows).await {
        Ok(view) => state.renderer.dashboard(&view).map_err(ApiError::from),
        Err(e) => Err(ApiError::from(e)),
    };

    match result {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_page(&state, err),
    }
}

fn error_page(state: &AppState, err: ApiError) -> Response {
    let status = err.status();
    let message = err.to_string();
    if status.is_server_error() {
        tracing::error!("{}", message);
    }
    match state.renderer.error(&message) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(render_err) => {
            tracing::error!("Failed to render error page: {}", render_err);
            (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
        }
    }
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardView>> {
    let view = build_dashboard(&state.client, state.windows).await?;
    Ok(Json(view))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(get_dashboard))
}
