//! Pass-through proxying for /.well-known/ requests. The upstream owns that
//! space for this host; nothing here touches the store or validator.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::warn;

const WELL_KNOWN_UPSTREAM: &str = "https://nathan.woodburn.au/.well-known";

pub(crate) async fn well_known(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let url = format!("{WELL_KNOWN_UPSTREAM}/{path}");
    let response = match state.http.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("well-known upstream request failed: {e}");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    match response.bytes().await {
        Ok(body) => ([(CONTENT_TYPE, content_type)], body.to_vec()).into_response(),
        Err(e) => {
            warn!("failed to read well-known upstream response: {e}");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}
