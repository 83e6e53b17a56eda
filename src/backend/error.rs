use thiserror::Error;

/// Application-level failures surfaced by the persistence boundary.
///
/// The stores never branch on these variants. Every failure is stringified
/// into the owning store's `error` field and shown to the user; retrying
/// the same operation is always a valid recovery.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Photo error: {0}")]
    Photo(String),

    #[error("Invalid request: {0}")]
    Invalid(String),
}
