use crate::{error::Error, state::AppState};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use libkite::{location::Location, validator::Submission};

pub(crate) async fn list_locations(State(state): State<AppState>) -> impl IntoResponse {
    Json(Location::fetch_recent(&state.store).await)
}

pub(crate) async fn add_location(
    State(state): State<AppState>,
    payload: Option<Json<Submission>>,
) -> Result<impl IntoResponse, Error> {
    // a body that isn't a JSON object at all is still a client error
    let Json(submission) = payload.ok_or(libkite::Error::MalformedRequest)?;
    let saved = Location::submit(submission, &state.store, &state.profanity).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
