//! [`CaseStore`] implementation: the transactional case-record cluster.

use amparo_core::{
  case::{
    AccusedRow, Case, CasePatch, CaseSummary, Closure, ComplainantRow,
    InvolvedMinorRow, NewCase, NewClosure,
  },
  store::{CaseQuery, CaseStore, StatusFilter},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    RawCase, RawCaseSummary, RawClosure, RawInvolvedMinor, encode_date,
    encode_role, today,
  },
  error::classify,
  store::{PERSONA_NOMBRE, SqliteStore},
};

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_case(&self, input: NewCase) -> Result<i64> {
    input.validate()?;

    let filed_on = encode_date(input.filed_on.unwrap_or_else(today));
    let occurred_on = encode_date(input.occurred_on);

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO denuncia (consejero_id, fecha_registro, fecha_hecho, descripcion, abierta)
           VALUES (?1, ?2, ?3, ?4, 1)",
          rusqlite::params![
            input.counselor_id,
            filed_on,
            occurred_on,
            input.description,
          ],
        )
        .map_err(|e| classify("denuncia", e))?;
        let case_id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO nna_involucrado (denuncia_id, nna_id, rol, detalle)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for minor in &input.involved_minors {
            stmt
              .execute(rusqlite::params![
                case_id,
                minor.minor_id,
                encode_role(minor.role),
                minor.detail,
              ])
              .map_err(|e| classify("nna_involucrado", e))?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO denunciante (denuncia_id, persona_id, declaracion, lesiones)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for complainant in &input.complainants {
            stmt
              .execute(rusqlite::params![
                case_id,
                complainant.person_id,
                complainant.statement,
                complainant.injuries,
              ])
              .map_err(|e| classify("denunciante", e))?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO denunciado (denuncia_id, persona_id, medidas)
             VALUES (?1, ?2, ?3)",
          )?;
          for accused in &input.accused {
            stmt
              .execute(rusqlite::params![
                case_id,
                accused.person_id,
                accused.measures,
              ])
              .map_err(|e| classify("denunciado", e))?;
          }
        }

        tx.commit()?;
        Ok(case_id)
      })
      .await;

    match created {
      Ok(case_id) => Ok(case_id),
      Err(err) => {
        // The transaction rolled back when it was dropped uncommitted.
        let err = Error::from(err);
        tracing::warn!(error = %err, "case creation rolled back");
        Err(err)
      }
    }
  }

  async fn update_case(&self, case_id: i64, patch: CasePatch) -> Result<bool> {
    patch.validate()?;
    if patch.is_empty() {
      return Ok(false);
    }

    let affected = self
      .conn
      .call(move |conn| {
        let n = match (patch.description, patch.open) {
          (Some(description), Some(open)) => conn.execute(
            "UPDATE denuncia SET descripcion = ?1, abierta = ?2 WHERE denuncia_id = ?3",
            rusqlite::params![description, open, case_id],
          )?,
          (Some(description), None) => conn.execute(
            "UPDATE denuncia SET descripcion = ?1 WHERE denuncia_id = ?2",
            rusqlite::params![description, case_id],
          )?,
          (None, Some(open)) => conn.execute(
            "UPDATE denuncia SET abierta = ?1 WHERE denuncia_id = ?2",
            rusqlite::params![open, case_id],
          )?,
          // Unreachable: is_empty() is checked before the closure runs.
          (None, None) => 0,
        };
        Ok(n)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn delete_case(&self, case_id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM denuncia WHERE denuncia_id = ?1",
          rusqlite::params![case_id],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_cases(&self, query: &CaseQuery) -> Result<Vec<CaseSummary>> {
    let pattern = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(|t| format!("%{t}%"));
    let open_flag = match query.status {
      StatusFilter::All => None,
      StatusFilter::Open => Some(true),
      StatusFilter::Closed => Some(false),
    };

    let raws: Vec<RawCaseSummary> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(p) = pattern {
          conds.push(format!(
            "(CAST(d.denuncia_id AS TEXT) LIKE ?
              OR LOWER(d.descripcion) LIKE LOWER(?)
              OR LOWER({PERSONA_NOMBRE}) LIKE LOWER(?))"
          ));
          values.push(Box::new(p.clone()));
          values.push(Box::new(p.clone()));
          values.push(Box::new(p));
        }
        if let Some(flag) = open_flag {
          conds.push("d.abierta = ?".to_owned());
          values.push(Box::new(flag));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT d.denuncia_id, d.fecha_registro, d.fecha_hecho,
                  d.descripcion, d.abierta, {PERSONA_NOMBRE}
           FROM denuncia d
           JOIN persona p ON p.persona_id = d.consejero_id
           {where_clause}
           ORDER BY d.fecha_registro DESC, d.denuncia_id DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            |row| {
              Ok(RawCaseSummary {
                case_id:        row.get(0)?,
                filed_on:       row.get(1)?,
                occurred_on:    row.get(2)?,
                description:    row.get(3)?,
                open:           row.get(4)?,
                counselor_name: row.get(5)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCaseSummary::into_summary).collect()
  }

  async fn get_case(&self, case_id: i64) -> Result<Option<Case>> {
    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT denuncia_id, consejero_id, fecha_registro, fecha_hecho,
                      descripcion, abierta
               FROM denuncia WHERE denuncia_id = ?1",
              rusqlite::params![case_id],
              |row| {
                Ok(RawCase {
                  case_id:      row.get(0)?,
                  counselor_id: row.get(1)?,
                  filed_on:     row.get(2)?,
                  occurred_on:  row.get(3)?,
                  description:  row.get(4)?,
                  open:         row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  // ── Case-file projections ─────────────────────────────────────────────────

  async fn list_involved_minors(&self, case_id: i64) -> Result<Vec<InvolvedMinorRow>> {
    let raws: Vec<RawInvolvedMinor> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT i.denuncia_id, i.nna_id, {PERSONA_NOMBRE},
                  n.fecha_nacimiento, i.rol, i.detalle
           FROM nna_involucrado i
           JOIN nna n     ON n.persona_id = i.nna_id
           JOIN persona p ON p.persona_id = i.nna_id
           WHERE i.denuncia_id = ?1
           ORDER BY i.nna_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![case_id], |row| {
            Ok(RawInvolvedMinor {
              case_id:    row.get(0)?,
              minor_id:   row.get(1)?,
              minor_name: row.get(2)?,
              birth_date: row.get(3)?,
              role:       row.get(4)?,
              detail:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvolvedMinor::into_row).collect()
  }

  async fn list_complainants(&self, case_id: i64) -> Result<Vec<ComplainantRow>> {
    let rows = self
      .conn
      .call(move |conn| {
        // LEFT JOIN: the name expression is NULL exactly for anonymous rows.
        let sql = format!(
          "SELECT c.denunciante_id, c.denuncia_id, c.persona_id,
                  {PERSONA_NOMBRE}, c.declaracion, c.lesiones
           FROM denunciante c
           LEFT JOIN persona p ON p.persona_id = c.persona_id
           WHERE c.denuncia_id = ?1
           ORDER BY c.denunciante_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![case_id], |row| {
            Ok(ComplainantRow {
              complainant_id: row.get(0)?,
              case_id:        row.get(1)?,
              person_id:      row.get(2)?,
              person_name:    row.get(3)?,
              statement:      row.get(4)?,
              injuries:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn list_accused(&self, case_id: i64) -> Result<Vec<AccusedRow>> {
    let rows = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT a.denuncia_id, a.persona_id, {PERSONA_NOMBRE}, a.medidas
           FROM denunciado a
           JOIN persona p ON p.persona_id = a.persona_id
           WHERE a.denuncia_id = ?1
           ORDER BY a.persona_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![case_id], |row| {
            Ok(AccusedRow {
              case_id:     row.get(0)?,
              person_id:   row.get(1)?,
              person_name: row.get(2)?,
              measures:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  // ── Closure ───────────────────────────────────────────────────────────────

  async fn register_closure(&self, input: NewClosure) -> Result<i64> {
    input.validate()?;

    let closed_on = encode_date(input.closed_on.unwrap_or_else(today));

    let id = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO cierre (denuncia_id, consejero_id, fecha_cierre, acta)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              input.case_id,
              input.counselor_id,
              closed_on,
              input.closing_act,
            ],
          )
          .map_err(|e| classify("cierre", e))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn get_closure(&self, case_id: i64) -> Result<Option<Closure>> {
    let raw: Option<RawClosure> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT cierre_id, denuncia_id, consejero_id, fecha_cierre, acta
               FROM cierre WHERE denuncia_id = ?1",
              rusqlite::params![case_id],
              |row| {
                Ok(RawClosure {
                  closure_id:   row.get(0)?,
                  case_id:      row.get(1)?,
                  counselor_id: row.get(2)?,
                  closed_on:    row.get(3)?,
                  closing_act:  row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClosure::into_closure).transpose()
  }
}
