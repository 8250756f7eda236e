//! Error types for `amparo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A field the schema requires was blank. Carries the column name so the
  /// caller can point at the offending input.
  #[error("required field is empty: {0}")]
  MissingField(&'static str),

  /// Date text that does not parse as an ISO `YYYY-MM-DD` calendar date.
  #[error("invalid date (expected YYYY-MM-DD): {0:?}")]
  InvalidDate(String),

  /// A minor cannot be recorded as its own relative.
  #[error("minor {0} cannot be related to itself")]
  SelfKinship(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
