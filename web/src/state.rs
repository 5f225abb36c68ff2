use libkite::{profanity::ProfanityChecker, store::Store};
use minijinja::Environment;
use std::{path::PathBuf, sync::Arc};

#[derive(Debug)]
pub struct SharedState {
    pub store: Store,
    pub profanity: ProfanityChecker,
    /// plain client used for the well-known passthrough
    pub http: reqwest::Client,
    pub tmpl: Environment<'static>,
    pub assets_dir: PathBuf,
}

impl SharedState {
    #[cfg(test)]
    pub fn test(datadir: &std::path::Path) -> Self {
        // the profanity endpoint points at a closed port so that remote
        // checks degrade to a clean verdict without leaving the machine
        Self {
            store: Store::new(datadir),
            profanity: ProfanityChecker::with_url("http://127.0.0.1:9"),
            http: reqwest::Client::new(),
            tmpl: Environment::new(),
            assets_dir: datadir.join("assets"),
        }
    }
}

pub type AppState = Arc<SharedState>;
