use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ruleta_core::RuletaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] RuletaError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(RuletaError::NoParticipants) => StatusCode::BAD_REQUEST,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedPayload(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::MalformedPayload(rejection) => rejection.body_text(),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {detail}");
        }

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
