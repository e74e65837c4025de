use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fixwatch_market_data::{ErrorClass, MarketDataError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch Banxico data: {0}")]
    MarketData(#[from] MarketDataError),
    #[error("Failed to render page: {0}")]
    Render(#[from] tera::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MarketData(e) => match e.class() {
                ErrorClass::Transport => StatusCode::BAD_GATEWAY,
                ErrorClass::DataUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorClass::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
