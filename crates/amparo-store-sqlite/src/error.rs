//! Error type for `amparo-store-sqlite`.
//!
//! Statement failures are classified on the way out of the database thread:
//! constraint failures become [`Error::Integrity`] tagged with the table (and
//! therefore the sub-list) that rejected the write, a closed handle becomes
//! [`Error::Connection`], and everything else stays a database error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] amparo_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// The database handle is gone; no statement reached the store.
  #[error("database connection is closed")]
  Connection,

  /// A uniqueness or foreign-key rule rejected the write.
  #[error("integrity violation on {table}: {message}")]
  Integrity {
    table:   &'static str,
    message: String,
  },

  /// A stored value could not be decoded into its domain type.
  #[error("stored value could not be decoded: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::ConnectionClosed => Error::Connection,
      // Unwrap errors stashed by `classify` inside a `call` closure.
      tokio_rusqlite::Error::Other(boxed) => match boxed.downcast::<Error>() {
        Ok(own) => *own,
        Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
      },
      other => Error::Database(other),
    }
  }
}

/// Wrap a store error so it survives the trip out of a
/// [`tokio_rusqlite::Connection::call`] closure.
pub(crate) fn stash(err: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err))
}

/// Classify a statement failure against `table`: constraint violations become
/// [`Error::Integrity`], everything else passes through unchanged.
pub(crate) fn classify(
  table: &'static str,
  err: rusqlite::Error,
) -> tokio_rusqlite::Error {
  match &err {
    rusqlite::Error::SqliteFailure(code, message)
      if code.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      stash(Error::Integrity {
        table,
        message: message.clone().unwrap_or_else(|| code.to_string()),
      })
    }
    _ => tokio_rusqlite::Error::Rusqlite(err),
  }
}
