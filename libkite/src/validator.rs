//! Validation of incoming location submissions.
//!
//! The checks run in a fixed order and stop at the first failure: presence
//! and format of the coordinates, description length, profanity, JSON
//! safety, and finally the rating. Cheap structural checks run before the
//! network-bound profanity check, and the profanity check always sees the
//! raw description rather than the sanitized one, so stripping characters
//! can't be used to sneak something past the screen. The sanitized result is
//! not re-screened; truncation happens after all content checks.

use crate::{Error, Result, location::NewLocation, profanity::ProfanityChecker};
use serde::Deserialize;
use serde_json::Value;

/// Maximum length of a description as submitted, in characters.
pub const MAX_RAW_DESCRIPTION: usize = 2000;
/// Maximum length of a description as stored, in characters.
pub const MAX_STORED_DESCRIPTION: usize = 500;

/// An unvalidated location submission as it arrives off the wire.
///
/// Latitude, longitude and rating may each be a JSON number or a numeric
/// string, so they are held as raw JSON values until coerced.
#[derive(Debug, Default, Deserialize)]
pub struct Submission {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    pub rating: Option<Value>,
}

impl Submission {
    /// Run the full validation pipeline, returning a record ready to be
    /// persisted or the first failure encountered.
    pub async fn validate(self, profanity: &ProfanityChecker) -> Result<NewLocation> {
        let (latitude, longitude) = match (present(self.latitude), present(self.longitude)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(Error::MissingCoordinates),
        };
        let latitude = coerce_coordinate(&latitude).ok_or(Error::InvalidCoordinateFormat)?;
        let longitude = coerce_coordinate(&longitude).ok_or(Error::InvalidCoordinateFormat)?;
        // NaN from a "nan" string fails both range checks
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::CoordinateOutOfRange);
        }

        let description = self.description.unwrap_or_default();
        if description.trim().chars().count() > MAX_RAW_DESCRIPTION {
            return Err(Error::DescriptionTooLong);
        }
        if profanity.contains_profanity(&description).await {
            return Err(Error::InappropriateContent);
        }
        if !is_json_safe(&description) {
            return Err(Error::UnsafeCharacters);
        }
        let description = sanitize(&description);

        let rating = match self.rating {
            None | Some(Value::Null) => return Err(Error::MissingRating),
            Some(value) => coerce_rating(&value).ok_or(Error::InvalidRatingFormat)?,
        };
        if !(1..=5).contains(&rating) {
            return Err(Error::RatingOutOfRange);
        }

        Ok(NewLocation {
            latitude,
            longitude,
            description,
            rating,
        })
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn coerce_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // a fractional rating is truncated toward zero
            n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Control characters that would corrupt the stored JSON if written verbatim
fn is_json_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Check that `text` can be stored as a JSON string value.
pub fn is_json_safe(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.chars().any(is_json_control) {
        return false;
    }
    serde_json::to_string(text).is_ok()
}

/// Normalize a description for storage: strip NUL characters, trim
/// surrounding whitespace, and truncate to [`MAX_STORED_DESCRIPTION`]
/// characters on a character boundary.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace('\0', "");
    let text = text.trim();
    match text.char_indices().nth(MAX_STORED_DESCRIPTION) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
