//! Integration tests for `SqliteStore` against in-memory databases.

mod directory;
mod followups;
mod kinship;

use amparo_core::{
  case::NewCase,
  person::{Gender, NewPerson},
  store::{CaseStore as _, DirectoryStore as _},
};
use chrono::NaiveDate;

use crate::SqliteStore;

pub(crate) async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn person(given: &str, surname: &str) -> NewPerson {
  NewPerson::new(given, surname, Gender::F)
}

/// A staff member holding the first seeded position.
pub(crate) async fn seed_counselor(s: &SqliteStore) -> i64 {
  let positions = s.list_positions().await.unwrap();
  s.add_staff(
    person("Lucia", "Mendez"),
    positions[0].position_id,
    Some("CP-1042".into()),
  )
  .await
  .unwrap()
}

pub(crate) async fn seed_minor(s: &SqliteStore, given: &str) -> i64 {
  s.add_minor(person(given, "Rojas"), date(2014, 5, 9))
    .await
    .unwrap()
}

/// A case with no dependent rows, filed (and occurred) on `filed`.
pub(crate) async fn seed_case(
  s: &SqliteStore,
  counselor: i64,
  filed: NaiveDate,
  description: &str,
) -> i64 {
  let mut input = NewCase::new(counselor, filed, description);
  input.filed_on = Some(filed);
  s.create_case(input).await.unwrap()
}

/// Raw row count, for asserting that failed writes left nothing behind.
pub(crate) async fn count(s: &SqliteStore, table: &'static str) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
      })?)
    })
    .await
    .unwrap()
}
