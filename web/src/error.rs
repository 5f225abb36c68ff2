use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Kite(#[from] libkite::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::Kite(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::Kite(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save location".to_string(),
            ),
            Error::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
        }
    }
}

// Tell axum how to convert `Error` into a response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        let (status, message) = self.to_client_status();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
