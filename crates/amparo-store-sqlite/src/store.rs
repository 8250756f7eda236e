//! [`SqliteStore`] construction and schema initialisation.
//!
//! The repository trait implementations live in sibling modules
//! (`cases`, `followups`, `kinship`, `directory`).

use std::path::Path;

use crate::{Result, schema::SCHEMA};

/// An amparo store backed by a single SQLite file.
///
/// One value implements every repository trait from `amparo-core`. Cloning is
/// cheap; the inner connection is reference-counted, and all calls are
/// serialised on its dedicated database thread. That single serialisation
/// point assumes single-user desktop deployment; reuse in a multi-client
/// context would make it the bottleneck.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

/// SQL expression producing a persona's display name from its four name
/// columns; NULL when the joined `persona` row (aliased `p`) is absent.
pub(crate) const PERSONA_NOMBRE: &str = "TRIM(p.primer_nombre || ' ' \
   || COALESCE(p.segundo_nombre || ' ', '') \
   || p.primer_apellido \
   || COALESCE(' ' || p.segundo_apellido, ''))";

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::from_connection(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::from_connection(conn).await
  }

  /// Build a store over an already-open connection. This is the injection
  /// seam for callers that manage the handle themselves; schema
  /// initialisation (including foreign-key enforcement) still runs here so
  /// no caller can skip it.
  pub async fn from_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }
}
