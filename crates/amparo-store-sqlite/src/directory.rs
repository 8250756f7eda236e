//! [`DirectoryStore`] implementation: the persona hierarchy.
//!
//! Specialised adds write the base row and the specialisation row in one
//! transaction so a half-registered person can never be observed.

use amparo_core::{
  person::{
    Enrollment, FamilyMember, Minor, NewEnrollment, NewPerson, Person,
    Position, Staff, ThirdParty,
  },
  store::DirectoryStore,
};
use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawEnrollment, RawPerson, decode_date, encode_date, encode_gender},
  error::classify,
  store::SqliteStore,
};

/// The `persona` column list shared by every read, in [`raw_person_from_row`]
/// order.
const PERSONA_COLS: &str = "p.persona_id, p.cedula, p.primer_nombre, \
   p.segundo_nombre, p.primer_apellido, p.segundo_apellido, p.genero, \
   p.direccion, p.telefono, p.activo";

fn raw_person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:      row.get(0)?,
    national_id:    row.get(1)?,
    given_name:     row.get(2)?,
    middle_name:    row.get(3)?,
    first_surname:  row.get(4)?,
    second_surname: row.get(5)?,
    gender:         row.get(6)?,
    address:        row.get(7)?,
    phone:          row.get(8)?,
    active:         row.get(9)?,
  })
}

/// Insert the base `persona` row; works on a plain connection or inside a
/// transaction (via deref).
fn insert_persona(
  conn: &rusqlite::Connection,
  input: &NewPerson,
) -> std::result::Result<i64, tokio_rusqlite::Error> {
  conn
    .execute(
      "INSERT INTO persona (cedula, primer_nombre, segundo_nombre, primer_apellido,
                            segundo_apellido, genero, direccion, telefono, activo)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
      rusqlite::params![
        input.national_id,
        input.given_name,
        input.middle_name,
        input.first_surname,
        input.second_surname,
        encode_gender(input.gender),
        input.address,
        input.phone,
      ],
    )
    .map_err(|e| classify("persona", e))?;
  Ok(conn.last_insert_rowid())
}

impl DirectoryStore for SqliteStore {
  type Error = Error;

  async fn add_person(&self, input: NewPerson) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| insert_persona(conn, &input))
      .await?;
    Ok(id)
  }

  async fn add_minor(&self, input: NewPerson, birth_date: NaiveDate) -> Result<i64> {
    input.validate()?;
    let birth = encode_date(birth_date);

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_persona(&tx, &input)?;
        tx.execute(
          "INSERT INTO nna (persona_id, fecha_nacimiento) VALUES (?1, ?2)",
          rusqlite::params![person_id, birth],
        )
        .map_err(|e| classify("nna", e))?;
        tx.commit()?;
        Ok(person_id)
      })
      .await?;
    Ok(id)
  }

  async fn add_family_member(&self, input: NewPerson, is_guardian: bool) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_persona(&tx, &input)?;
        tx.execute(
          "INSERT INTO familiar (persona_id, tutor) VALUES (?1, ?2)",
          rusqlite::params![person_id, is_guardian],
        )
        .map_err(|e| classify("familiar", e))?;
        tx.commit()?;
        Ok(person_id)
      })
      .await?;
    Ok(id)
  }

  async fn add_third_party(
    &self,
    input: NewPerson,
    relation_category: String,
  ) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_persona(&tx, &input)?;
        tx.execute(
          "INSERT INTO tercero (persona_id, vinculo) VALUES (?1, ?2)",
          rusqlite::params![person_id, relation_category],
        )
        .map_err(|e| classify("tercero", e))?;
        tx.commit()?;
        Ok(person_id)
      })
      .await?;
    Ok(id)
  }

  async fn add_staff(
    &self,
    input: NewPerson,
    position_id: i64,
    credential: Option<String>,
  ) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = insert_persona(&tx, &input)?;
        tx.execute(
          "INSERT INTO personal (persona_id, cargo_id, credencial) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, position_id, credential],
        )
        .map_err(|e| classify("personal", e))?;
        tx.commit()?;
        Ok(person_id)
      })
      .await?;
    Ok(id)
  }

  async fn get_person(&self, person_id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PERSONA_COLS} FROM persona p WHERE p.persona_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id], raw_person_from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_minor(&self, person_id: i64) -> Result<Option<Minor>> {
    let raw: Option<(RawPerson, String)> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSONA_COLS}, n.fecha_nacimiento
           FROM nna n
           JOIN persona p ON p.persona_id = n.persona_id
           WHERE n.persona_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id], |row| {
              Ok((raw_person_from_row(row)?, row.get(10)?))
            })
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(person, birth)| {
        Ok(Minor {
          person:     person.into_person()?,
          birth_date: decode_date(&birth)?,
        })
      })
      .transpose()
  }

  async fn get_family_member(&self, person_id: i64) -> Result<Option<FamilyMember>> {
    let raw: Option<(RawPerson, bool)> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSONA_COLS}, f.tutor
           FROM familiar f
           JOIN persona p ON p.persona_id = f.persona_id
           WHERE f.persona_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id], |row| {
              Ok((raw_person_from_row(row)?, row.get(10)?))
            })
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(person, is_guardian)| {
        Ok(FamilyMember { person: person.into_person()?, is_guardian })
      })
      .transpose()
  }

  async fn get_third_party(&self, person_id: i64) -> Result<Option<ThirdParty>> {
    let raw: Option<(RawPerson, String)> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSONA_COLS}, t.vinculo
           FROM tercero t
           JOIN persona p ON p.persona_id = t.persona_id
           WHERE t.persona_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id], |row| {
              Ok((raw_person_from_row(row)?, row.get(10)?))
            })
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(person, relation_category)| {
        Ok(ThirdParty { person: person.into_person()?, relation_category })
      })
      .transpose()
  }

  async fn get_staff(&self, person_id: i64) -> Result<Option<Staff>> {
    let raw: Option<(RawPerson, i64, Option<String>)> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSONA_COLS}, pe.cargo_id, pe.credencial
           FROM personal pe
           JOIN persona p ON p.persona_id = pe.persona_id
           WHERE pe.persona_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id], |row| {
              Ok((raw_person_from_row(row)?, row.get(10)?, row.get(11)?))
            })
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(person, position_id, credential)| {
        Ok(Staff {
          person: person.into_person()?,
          position_id,
          credential,
        })
      })
      .transpose()
  }

  async fn deactivate_person(&self, person_id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persona SET activo = 0 WHERE persona_id = ?1",
          rusqlite::params![person_id],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn add_enrollment(&self, input: NewEnrollment) -> Result<i64> {
    input.validate()?;

    let id = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO matricula_educativa (nna_id, institucion, grado, anio_lectivo, activa)
             VALUES (?1, ?2, ?3, ?4, 1)",
            rusqlite::params![
              input.minor_id,
              input.school_name,
              input.grade,
              input.academic_year,
            ],
          )
          .map_err(|e| classify("matricula_educativa", e))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn list_enrollments(&self, minor_id: i64) -> Result<Vec<Enrollment>> {
    let raws: Vec<RawEnrollment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT matricula_id, nna_id, institucion, grado, anio_lectivo, activa
           FROM matricula_educativa
           WHERE nna_id = ?1
           ORDER BY anio_lectivo DESC, matricula_id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![minor_id], |row| {
            Ok(RawEnrollment {
              enrollment_id: row.get(0)?,
              minor_id:      row.get(1)?,
              school_name:   row.get(2)?,
              grade:         row.get(3)?,
              academic_year: row.get(4)?,
              active:        row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawEnrollment::into_enrollment).collect())
  }

  async fn list_positions(&self) -> Result<Vec<Position>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT cargo_id, nombre FROM cargo ORDER BY cargo_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Position {
              position_id: row.get(0)?,
              name:        row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}
