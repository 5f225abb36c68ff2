//! This is a library that provides the data model, validation, and flat-file
//! persistence for a small service that tracks good kite-flying spots.

pub mod error;
pub mod location;
pub mod profanity;
pub mod store;
pub mod validator;

pub use error::Error;
pub use error::Result;
