//! [`KinshipStore`] implementation: the NNA↔Familiar graph.

use amparo_core::{
  kinship::{KinshipEdge, KinshipEdgeRow, RelationType},
  store::KinshipStore,
};

use crate::{
  Error, Result,
  error::classify,
  store::{PERSONA_NOMBRE, SqliteStore},
};

impl KinshipStore for SqliteStore {
  type Error = Error;

  async fn create_kinship_edge(&self, edge: KinshipEdge) -> Result<()> {
    edge.validate()?;

    self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO relacion_nna (nna_id, familiar_id, parentesco_id, convive)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              edge.minor_id,
              edge.family_member_id,
              edge.relation_type_id,
              edge.cohabits,
            ],
          )
          .map_err(|e| classify("relacion_nna", e))?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn list_kinship_edges(&self, minor_id: i64) -> Result<Vec<KinshipEdgeRow>> {
    let fetched = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT r.nna_id, r.familiar_id, {PERSONA_NOMBRE}, f.tutor,
                  r.parentesco_id, pa.nombre, r.convive
           FROM relacion_nna r
           JOIN familiar f    ON f.persona_id = r.familiar_id
           JOIN persona p     ON p.persona_id = r.familiar_id
           JOIN parentesco pa ON pa.parentesco_id = r.parentesco_id
           WHERE r.nna_id = ?1
           ORDER BY r.familiar_id, r.parentesco_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![minor_id], |row| {
            Ok(KinshipEdgeRow {
              minor_id:           row.get(0)?,
              family_member_id:   row.get(1)?,
              family_member_name: row.get(2)?,
              is_guardian:        row.get(3)?,
              relation_type_id:   row.get(4)?,
              relation_type:      row.get(5)?,
              cohabits:           row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await;

    match fetched {
      Ok(rows) => Ok(rows),
      Err(err) => {
        // Display path: storage failures are logged, never propagated.
        let err = Error::from(err);
        tracing::warn!(error = %err, minor_id, "kinship listing failed, returning no edges");
        Ok(Vec::new())
      }
    }
  }

  async fn list_relation_types(&self) -> Result<Vec<RelationType>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT parentesco_id, nombre FROM parentesco ORDER BY parentesco_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RelationType {
              relation_type_id: row.get(0)?,
              name:             row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}
