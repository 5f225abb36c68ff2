//! Objects related to reporting errors from this library

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // submission errors, surfaced verbatim to the client
    #[error("Invalid request data")]
    MalformedRequest,

    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Latitude and longitude must be valid numbers")]
    InvalidCoordinateFormat,

    #[error("Invalid coordinate values")]
    CoordinateOutOfRange,

    #[error("Notes are too long (max 2000 characters)")]
    DescriptionTooLong,

    #[error("Notes contain inappropriate language")]
    InappropriateContent,

    #[error("Input contains invalid characters")]
    UnsafeCharacters,

    #[error("Rating is required")]
    MissingRating,

    #[error("Rating must be a number")]
    InvalidRatingFormat,

    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("Failed to write the location store")]
    StoreWrite(#[source] std::io::Error),
}

impl Error {
    /// Whether the error was caused by bad client input rather than a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::StoreWrite(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
