//! Template rendering and the catch-all page route. None of this touches
//! the store or the validator; it exists so the site around the API keeps
//! being served.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use tracing::debug;

pub(crate) async fn index(State(state): State<AppState>) -> Response {
    match render(&state, "index.html") {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            debug!("failed to render index: {e}");
            not_found(&state)
        }
    }
}

pub(crate) async fn favicon() -> impl IntoResponse {
    Redirect::permanent("/assets/img/favicon.png")
}

/// Resolve any other path against the template directory, trying the bare
/// name and then a `.html` suffix, the way the original site was laid out.
pub(crate) async fn catch_all(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().trim_matches('/');
    if !path.is_empty() {
        for name in [path.to_string(), format!("{path}.html")] {
            if let Ok(body) = render(&state, &name) {
                return Html(body).into_response();
            }
        }
    }
    not_found(&state)
}

fn render(state: &AppState, name: &str) -> Result<String, minijinja::Error> {
    state.tmpl.get_template(name)?.render(context! {})
}

fn not_found(state: &AppState) -> Response {
    match render(state, "404.html") {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
