//! [`FollowUpStore`] implementation.
//!
//! Appends are deliberately permissive: no existence pre-check is issued for
//! the case id, matching the behavior the rest of the system expects. The
//! schema's foreign key still rejects a fully dangling id.

use amparo_core::{
  followup::{FollowUp, NewFollowUp, parse_optional_date},
  store::{FollowUpQuery, FollowUpStore},
};
use chrono::Utc;

use crate::{
  Error, Result,
  encode::{RawFollowUp, encode_date, encode_dt, today},
  error::classify,
  store::SqliteStore,
};

impl FollowUpStore for SqliteStore {
  type Error = Error;

  async fn append_follow_up(&self, input: NewFollowUp) -> Result<i64> {
    input.validate()?;

    let entry_date = encode_date(input.entry_date()?.unwrap_or_else(today));
    let recorded_at = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO seguimiento (denuncia_id, consejero_id, fecha, registrado_en, observacion)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              input.case_id,
              input.counselor_id,
              entry_date,
              recorded_at,
              input.observation,
            ],
          )
          .map_err(|e| classify("seguimiento", e))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn list_follow_ups(&self, query: &FollowUpQuery) -> Result<Vec<FollowUp>> {
    // Both bounds are validated before any SQL is built.
    let date_from = parse_optional_date(query.date_from.as_deref())?.map(encode_date);
    let date_to = parse_optional_date(query.date_to.as_deref())?.map(encode_date);
    let case_id = query.case_id;

    let raws: Vec<RawFollowUp> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(id) = case_id {
          conds.push("denuncia_id = ?");
          values.push(Box::new(id));
        }
        if let Some(from) = date_from {
          conds.push("fecha >= ?");
          values.push(Box::new(from));
        }
        if let Some(to) = date_to {
          conds.push("fecha <= ?");
          values.push(Box::new(to));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT seguimiento_id, denuncia_id, consejero_id, fecha,
                  registrado_en, observacion
           FROM seguimiento
           {where_clause}
           ORDER BY fecha DESC, registrado_en DESC, seguimiento_id DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            |row| {
              Ok(RawFollowUp {
                follow_up_id: row.get(0)?,
                case_id:      row.get(1)?,
                counselor_id: row.get(2)?,
                entry_date:   row.get(3)?,
                recorded_at:  row.get(4)?,
                observation:  row.get(5)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFollowUp::into_follow_up).collect()
  }
}
