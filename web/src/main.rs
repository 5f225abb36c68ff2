use anyhow::Result;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use libkite::{profanity::ProfanityChecker, store::Store};
use minijinja::Environment;
use state::{AppState, SharedState};
use std::{path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

mod api;
mod error;
mod html;
mod proxy;
mod state;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the location store; overrides the default lookup
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    #[arg(short, long, default_value = "web/templates")]
    pub templates: PathBuf,
    #[arg(short, long, default_value = "localhost")]
    pub listen: String,
    #[arg(short, long, default_value = "5000")]
    pub port: u16,
    /// Endpoint of the remote profanity-classification service
    #[arg(long, default_value = libkite::profanity::DEFAULT_API_URL)]
    pub profanity_url: String,
}

pub(crate) fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(html::index))
        .route("/favicon.png", get(html::favicon))
        .route("/.well-known/{*path}", get(proxy::well_known))
        .nest_service("/assets", ServeDir::new(state.assets_dir.clone()))
        .nest("/api", api::router())
        .fallback(html::catch_all)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("KITEWEB_LOG"))
        .init();
    let args = Cli::parse();

    let store = match &args.data_dir {
        Some(dir) => Store::new(dir),
        None => Store::resolve(),
    };
    debug!("using location store at {:?}", store.path());

    let mut jinja = Environment::new();
    jinja.set_loader(minijinja::path_loader(&args.templates));

    let shared_state = Arc::new(SharedState {
        store,
        profanity: ProfanityChecker::with_url(&args.profanity_url),
        http: reqwest::Client::new(),
        tmpl: jinja,
        assets_dir: args.templates.join("assets"),
    });

    let addr = format!("{}:{}", args.listen, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app(shared_state)).await?;
    Ok(())
}
