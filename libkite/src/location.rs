use crate::{Result, profanity::ProfanityChecker, store::Store, validator::Submission};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

/// Number of hours after which a record stops showing up in listings.
pub const RECENT_WINDOW_HOURS: i64 = 48;

/// A single reported kite-flying location.
///
/// Records are append-only: once written to the store they are never updated
/// or deleted. Old records simply fall out of [`Location::fetch_recent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub rating: i64,
    /// Assigned by the store when the record is appended
    #[serde(with = "time::serde::iso8601")]
    pub date_added: OffsetDateTime,
}

/// A submission that has passed validation but has not yet been written to
/// the store. The description is already sanitized.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub rating: i64,
}

impl Location {
    /// Fetch all locations reported within the last 48 hours, in store
    /// order. A record whose timestamp falls exactly on the cutoff is
    /// excluded.
    pub async fn fetch_recent(store: &Store) -> Vec<Location> {
        let cutoff = OffsetDateTime::now_utc() - Duration::hours(RECENT_WINDOW_HOURS);
        store
            .load()
            .await
            .into_iter()
            .filter(|loc| loc.date_added > cutoff)
            .collect()
    }

    /// Validate a raw submission and append it to the store. Nothing is
    /// written unless every check in the validation pipeline passes.
    pub async fn submit(
        submission: Submission,
        store: &Store,
        profanity: &ProfanityChecker,
    ) -> Result<Location> {
        let new = submission.validate(profanity).await?;
        debug!(?new, "submission passed validation");
        store.append(new).await
    }
}
