//! Error types for budgetflow.
//!
//! Internally everything is an `anyhow::Error`. When an error crosses the public surface of the
//! crate it is tagged with an `ErrorType` so that callers can decide how to degrade: a `Store`
//! failure means "no data this cycle", a `Validation` failure belongs to a single form
//! submission, and so on.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an error that is returned to a caller.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The configuration or the budget home directory is missing or invalid.
    Config,
    /// The backing data store could not be reached, rejected the request, or returned bad data.
    Store,
    /// An animation or other presentation resource could not be fetched or parsed.
    Asset,
    /// A required form field was missing or malformed.
    Validation,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error that has been classified with an `ErrorType`.
pub struct TypedError {
    error_type: ErrorType,
    source: Error,
}

impl TypedError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for TypedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl Display for TypedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.source)
    }
}

impl std::error::Error for TypedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Tags a `Result` with an `ErrorType` before it is handed back to a caller.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let source: Error = e.into();
            // Keep the innermost classification if the error was already tagged.
            if source.downcast_ref::<TypedError>().is_some() {
                return source;
            }
            Error::new(TypedError { error_type, source })
        })
    }
}

/// Returns the `ErrorType` of `e`, if it has been classified.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<TypedError>().map(TypedError::error_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error() {
        let r: std::result::Result<(), Error> = Err(anyhow!("connection refused"));
        let e = r.pub_result(ErrorType::Store).unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Store));
        assert!(e.to_string().contains("connection refused"));
        assert!(e.to_string().starts_with("store error"));
    }

    #[test]
    fn test_pub_result_keeps_first_tag() {
        let r: std::result::Result<(), Error> = Err(anyhow!("bad amount"));
        let e = r
            .pub_result(ErrorType::Validation)
            .pub_result(ErrorType::Store)
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Validation));
    }

    #[test]
    fn test_untagged_error() {
        let e = anyhow!("plain");
        assert_eq!(error_type(&e), None);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::Config.to_string(), "config");
        assert_eq!("asset".parse::<ErrorType>().unwrap(), ErrorType::Asset);
    }
}
