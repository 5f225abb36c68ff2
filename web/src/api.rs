use crate::state::AppState;
use axum::{Router, routing::get};

mod location;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/locations",
        get(location::list_locations).post(location::add_location),
    )
}
