//! Flat-file persistence for location records.
//!
//! The store is a single pretty-printed JSON array that is read in full and
//! rewritten in full on every append. There is no locking: the service runs
//! as a single process with low write volume, and concurrent writers are an
//! accepted limitation rather than something this layer papers over.

use crate::{
    Error, Result,
    location::{Location, NewLocation},
};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;
use tracing::{debug, warn};

/// File that holds the persisted location records.
pub const DB_FILE: &str = "kite_locations.json";

/// Mounted data volume that takes precedence when it exists.
const DATA_DIR: &str = "/data";

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store rooted in the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(DB_FILE),
        }
    }

    /// Create a store in the default location: the external data directory
    /// if one is mounted, otherwise the working directory.
    pub fn resolve() -> Self {
        if Path::new(DATA_DIR).is_dir() {
            Self::new(DATA_DIR)
        } else {
            Self::new(".")
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record in store order. A missing, unreadable, or corrupt
    /// file yields an empty list rather than an error.
    pub async fn load(&self) -> Vec<Location> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("failed to read location store {:?}: {e}", self.path);
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(locations) => locations,
            Err(e) => {
                warn!("location store {:?} contains malformed JSON: {e}", self.path);
                Vec::new()
            }
        }
    }

    /// Append a validated record and rewrite the whole file. The record's
    /// timestamp is assigned here, at save time. Returns the record as
    /// saved.
    pub async fn append(&self, new: NewLocation) -> Result<Location> {
        let mut locations = self.load().await;
        let location = Location {
            latitude: new.latitude,
            longitude: new.longitude,
            description: new.description,
            rating: new.rating,
            date_added: OffsetDateTime::now_utc(),
        };
        locations.push(location.clone());
        let serialized =
            serde_json::to_string_pretty(&locations).map_err(|e| Error::StoreWrite(e.into()))?;
        fs::write(&self.path, serialized)
            .await
            .map_err(Error::StoreWrite)?;
        debug!("saved location to {:?}", self.path);
        Ok(location)
    }
}
